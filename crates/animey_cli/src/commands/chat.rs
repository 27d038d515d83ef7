//! `animey chat`: interactive session with typed-out replies.
//!
//! Lines starting with `/` are commands: `/new`, `/topics`, `/quit`.
//! Ctrl-C stops the wait or the reveal in progress; at the prompt it exits.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use animey_constant::app::DISPLAY_NAME;
use animey_core::{Conversation, JsonFileStore, Topic, TopicBook};

use crate::client::ChatClient;
use crate::output;
use crate::render;

type Book = TopicBook<JsonFileStore<Topic>>;

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    New,
    Topics,
    Quit,
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "/new" => Input::New,
        "/topics" => Input::Topics,
        "/quit" | "/exit" => Input::Quit,
        cmd if cmd.starts_with('/') => Input::Unknown(cmd),
        text => Input::Message(text),
    }
}

struct Session {
    client: ChatClient,
    book: Book,
    user_id: String,
    cadence: Duration,
    conversation: Conversation,
    // First prompt of the current topic; the key it is saved under
    topic: Option<String>,
}

pub async fn handle(server: &str, topic: Option<String>, cadence_ms: u64) -> Result<()> {
    let mut session = Session {
        client: ChatClient::new(server),
        book: super::topic_book()?,
        user_id: super::user_id()?,
        cadence: Duration::from_millis(cadence_ms),
        conversation: Conversation::new(),
        topic: None,
    };

    output::header(&format!("{DISPLAY_NAME} 🎬"));
    output::kv("server", session.client.url());
    output::dim("/new yangi mavzu · /topics mavzular · /quit chiqish");

    if let Some(prompt) = topic {
        session.open_topic(&prompt).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", console::style("›").cyan().bold());
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            Ok(()) = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::New => {
                session.conversation.clear();
                session.topic = None;
                output::dim("Yangi mavzu boshlandi.");
            }
            Input::Topics => session.list_topics().await?,
            Input::Unknown(cmd) => output::warning(&format!("Noma'lum buyruq: {cmd}")),
            Input::Message(text) => session.exchange(text).await?,
        }
    }
    Ok(())
}

impl Session {
    async fn open_topic(&mut self, prompt: &str) -> Result<()> {
        let Some(topic) = self.book.get(prompt).await? else {
            output::warning(&format!("Mavzu topilmadi: {prompt}"));
            return Ok(());
        };
        self.conversation.load(topic.to_messages());
        self.topic = Some(topic.prompt);

        let mut out = io::stdout();
        for message in self.conversation.messages() {
            render::write_message(&mut out, message)?;
        }
        Ok(())
    }

    async fn list_topics(&self) -> Result<()> {
        let topics = self.book.list().await?;
        if topics.is_empty() {
            output::dim("Saqlangan mavzular yo'q.");
        }
        for topic in topics {
            output::kv(&topic.prompt, &format!("{} ta xabar", topic.messages.len()));
        }
        Ok(())
    }

    async fn exchange(&mut self, text: &str) -> Result<()> {
        if let Err(e) = self.conversation.submit(text) {
            output::warning(&e.to_string());
            return Ok(());
        }
        let topic = self.topic.get_or_insert_with(|| text.to_string()).clone();

        let spinner = output::spinner("Javob kutilmoqda...");
        let reply = tokio::select! {
            reply = self.client.send(&self.user_id, text) => Some(reply),
            Ok(()) = tokio::signal::ctrl_c() => None,
        };
        spinner.finish_and_clear();

        let Some(reply) = reply else {
            self.conversation.stop();
            output::dim("(bekor qilindi)");
            return Ok(());
        };
        let message = match reply {
            Ok(text) => self.conversation.receive_reply(&text),
            Err(failure) => self.conversation.receive_failure(&failure),
        };
        let blocks = message.blocks.clone();

        println!("{}", render::speaker(message.role));
        let outcome = render::reveal_until_interrupt(blocks, self.cadence).await;
        if outcome.is_done() {
            self.conversation.finish_reveal();
        } else {
            self.conversation.stop_with(outcome.blocks().to_vec());
            output::dim("(to'xtatildi)");
        }

        if let Err(e) = self.book.record(&topic, &self.conversation).await {
            tracing::warn!(error = %e, "topic not saved");
        }
        Ok(())
    }
}
