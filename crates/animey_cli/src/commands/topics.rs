//! `animey topics` subcommands.

use std::io;

use anyhow::{anyhow, Result};
use serde_json::json;

use animey_core::{Conversation, Topic};

use crate::cli::TopicsAction;
use crate::output;
use crate::render;

pub async fn handle(action: TopicsAction) -> Result<()> {
    match action {
        TopicsAction::List => list().await,
        TopicsAction::Show { prompt } => show(&prompt).await,
        TopicsAction::Delete { prompt } => delete(&prompt).await,
    }
}

fn summary(topic: &Topic) -> serde_json::Value {
    json!({
        "prompt": topic.prompt,
        "messages": topic.messages.len(),
        "updated_at": topic.updated_at.to_rfc3339(),
    })
}

async fn list() -> Result<()> {
    let topics = super::topic_book()?.list().await?;
    if topics.is_empty() && !output::is_json() {
        output::dim("No saved topics yet. Start one with `animey chat`.");
        return Ok(());
    }

    let mut table = output::table(&["Topic", "Messages", "Updated"]);
    for topic in &topics {
        output::table_row(
            &mut table,
            &[
                topic.prompt.clone(),
                topic.messages.len().to_string(),
                topic
                    .updated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ],
        );
    }
    let items: Vec<_> = topics.iter().map(summary).collect();
    output::table_print(&table, &items);
    Ok(())
}

async fn show(prompt: &str) -> Result<()> {
    let topic = super::topic_book()?
        .get(prompt)
        .await?
        .ok_or_else(|| anyhow!("no topic named {prompt:?}"))?;

    if output::is_json() {
        output::data("topic", &topic);
        return Ok(());
    }

    output::header(&topic.prompt);
    let mut conversation = Conversation::new();
    conversation.load(topic.to_messages());
    let mut out = io::stdout();
    for message in conversation.messages() {
        render::write_message(&mut out, message)?;
        println!();
    }
    Ok(())
}

async fn delete(prompt: &str) -> Result<()> {
    if super::topic_book()?.delete(prompt).await? {
        output::success(&format!("Deleted topic {prompt:?}"));
        Ok(())
    } else {
        Err(anyhow!("no topic named {prompt:?}"))
    }
}
