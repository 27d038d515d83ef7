//! Command dispatch.

pub mod ask;
pub mod chat;
pub mod serve;
pub mod topics;

use anyhow::Result;

use animey_core::{JsonFileStore, Topic, TopicBook};
use animey_constant::app::TOPICS_FILE;

use crate::cli::{Cli, Command};
use crate::identity;

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve {
            listen,
            history_file,
            model,
            timeout_secs,
        } => serve::handle(listen, history_file, model, timeout_secs).await,
        Command::Chat {
            server,
            topic,
            cadence_ms,
        } => chat::handle(&server, topic, cadence_ms).await,
        Command::Ask {
            message,
            server,
            no_animate,
            cadence_ms,
        } => ask::handle(&message.join(" "), &server, no_animate, cadence_ms).await,
        Command::Topics { action } => topics::handle(action).await,
    }
}

/// Topics saved in the client's data dir.
pub(crate) fn topic_book() -> Result<TopicBook<JsonFileStore<Topic>>> {
    let path = identity::data_dir()?.join(TOPICS_FILE);
    Ok(TopicBook::new(JsonFileStore::new(path)))
}

/// The saved user id, created on first use.
pub(crate) fn user_id() -> Result<String> {
    identity::load_or_create_user_id(&identity::data_dir()?)
}
