//! `animey ask`: one message, one reply.

use std::io;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::json;

use animey_core::{format_message, Role};

use crate::client::ChatClient;
use crate::output;
use crate::render;

pub async fn handle(message: &str, server: &str, no_animate: bool, cadence_ms: u64) -> Result<()> {
    if message.trim().is_empty() {
        return Err(anyhow!("message is empty"));
    }
    let user_id = super::user_id()?;
    let client = ChatClient::new(server);

    let spinner = output::spinner("Javob kutilmoqda...");
    let result = client.send(&user_id, message).await;
    spinner.finish_and_clear();

    let reply = result.map_err(|failure| anyhow!(failure.user_message()))?;
    let blocks = format_message(&reply);

    if output::is_json() {
        output::data("reply", &json!({ "response": reply, "blocks": blocks }));
        return Ok(());
    }

    println!("{}", render::speaker(Role::Assistant));
    if no_animate {
        render::write_blocks(&mut io::stdout(), &blocks)?;
    } else {
        let outcome =
            render::reveal_until_interrupt(blocks, Duration::from_millis(cadence_ms)).await;
        if !outcome.is_done() {
            output::dim("(to'xtatildi)");
        }
    }
    Ok(())
}
