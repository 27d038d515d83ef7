//! Chat state for one client: messages plus the phase that gates input.
//!
//! Every change goes through a transition method; at most one message is
//! `is_new` (the assistant reply being typed out).

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::{CoreError, Result};
use crate::format::format_message;
use crate::render::to_markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub is_new: bool,
}

impl Message {
    pub fn new(role: Role, text: &str) -> Self {
        Self {
            role,
            blocks: format_message(text),
            is_new: false,
        }
    }

    /// Marker text of the message, as it would be saved.
    pub fn text(&self) -> String {
        to_markdown(&self.blocks)
    }
}

/// What the client is waiting for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingReply,
    Revealing,
}

/// Why a submission produced no reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The server answered with an error body.
    Server(String),
    /// The request never got an answer.
    Network,
}

impl Failure {
    /// Text shown to the user in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            Failure::Server(reason) => {
                let reason = if reason.trim().is_empty() {
                    "Noma'lum xato"
                } else {
                    reason.as_str()
                };
                format!("Kechirasiz, xatolik yuz berdi: {reason}")
            }
            Failure::Network => {
                "Kechirasiz, tarmoq xatosi yuz berdi. Iltimos, qayta urinib ko'ring.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    phase: Phase,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The assistant message currently being revealed, if any.
    pub fn revealing(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_new)
    }

    /// Add the user's message and wait for a reply.
    pub fn submit(&mut self, text: &str) -> Result<&Message> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyMessage);
        }
        match self.phase {
            Phase::Idle => {}
            Phase::AwaitingReply => return Err(CoreError::Busy("awaiting reply")),
            Phase::Revealing => return Err(CoreError::Busy("reply is being revealed")),
        }
        self.settle_new();
        self.messages.push(Message::new(Role::User, text));
        self.phase = Phase::AwaitingReply;
        Ok(self.last())
    }

    /// Append the assistant reply and start revealing it.
    pub fn receive_reply(&mut self, text: &str) -> &Message {
        self.push_assistant(text)
    }

    /// Append the friendly failure text as the reply.
    pub fn receive_failure(&mut self, failure: &Failure) -> &Message {
        self.push_assistant(&failure.user_message())
    }

    /// The reveal ran to the end.
    pub fn finish_reveal(&mut self) {
        self.settle_new();
        self.phase = Phase::Idle;
    }

    /// The user stopped the wait, before any reply arrived.
    pub fn stop(&mut self) {
        self.finish_reveal();
    }

    /// The user stopped the reveal. The reply keeps only the blocks that
    /// were fully shown.
    pub fn stop_with(&mut self, committed: Vec<Block>) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.is_new) {
            message.blocks = committed;
        }
        self.finish_reveal();
    }

    /// Replace the conversation with saved messages, all already revealed.
    pub fn load(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.settle_new();
        self.phase = Phase::Idle;
    }

    /// Start over with an empty conversation.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.phase = Phase::Idle;
    }

    fn push_assistant(&mut self, text: &str) -> &Message {
        self.settle_new();
        let mut message = Message::new(Role::Assistant, text);
        message.is_new = true;
        self.messages.push(message);
        self.phase = Phase::Revealing;
        self.last()
    }

    fn settle_new(&mut self) {
        for m in &mut self.messages {
            m.is_new = false;
        }
    }

    fn last(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_count(c: &Conversation) -> usize {
        c.messages().iter().filter(|m| m.is_new).count()
    }

    #[test]
    fn submit_then_reply_then_finish() {
        let mut c = Conversation::new();
        let user = c.submit("Salom dunyo").unwrap();
        assert_eq!(user.blocks, vec![Block::paragraph("Salom dunyo")]);
        assert!(!user.is_new);
        assert_eq!(c.phase(), Phase::AwaitingReply);

        let reply = c.receive_reply("- Naruto\n- Bleach");
        assert!(reply.is_new);
        assert_eq!(c.phase(), Phase::Revealing);
        assert_eq!(new_count(&c), 1);

        c.finish_reveal();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(new_count(&c), 0);
    }

    #[test]
    fn blank_submit_is_rejected() {
        let mut c = Conversation::new();
        assert!(matches!(c.submit("   "), Err(CoreError::EmptyMessage)));
        assert!(c.is_empty());
    }

    #[test]
    fn submit_while_busy_is_rejected() {
        let mut c = Conversation::new();
        c.submit("a").unwrap();
        assert!(matches!(c.submit("b"), Err(CoreError::Busy(_))));
        c.receive_reply("javob");
        assert!(matches!(c.submit("b"), Err(CoreError::Busy(_))));
        c.stop();
        assert!(c.submit("b").is_ok());
    }

    #[test]
    fn at_most_one_new_message() {
        let mut c = Conversation::new();
        for i in 0..3 {
            c.submit(&format!("savol {i}")).unwrap();
            c.receive_reply("javob");
            assert_eq!(new_count(&c), 1);
            c.stop();
        }
        assert_eq!(c.messages().len(), 6);
        assert_eq!(new_count(&c), 0);
    }

    #[test]
    fn failure_messages() {
        assert_eq!(
            Failure::Server("Ichki server xatoligi.".into()).user_message(),
            "Kechirasiz, xatolik yuz berdi: Ichki server xatoligi."
        );
        assert_eq!(
            Failure::Server(String::new()).user_message(),
            "Kechirasiz, xatolik yuz berdi: Noma'lum xato"
        );
        let mut c = Conversation::new();
        c.submit("a").unwrap();
        let msg = c.receive_failure(&Failure::Network);
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.is_new);
        assert!(msg.text().starts_with("Kechirasiz, tarmoq xatosi"));
    }

    #[test]
    fn stop_with_keeps_only_the_shown_prefix() {
        let mut c = Conversation::new();
        c.submit("q").unwrap();
        c.receive_reply("# Top\n- Naruto\n- Bleach");
        c.stop_with(vec![Block::heading("Top")]);

        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(new_count(&c), 0);
        assert_eq!(c.messages()[1].blocks, vec![Block::heading("Top")]);
        assert_eq!(c.messages()[0].blocks, vec![Block::paragraph("q")]);
    }

    #[test]
    fn stop_with_before_reply_leaves_messages_alone() {
        let mut c = Conversation::new();
        c.submit("q").unwrap();
        c.stop_with(Vec::new());
        assert_eq!(c.messages().len(), 1);
        assert_eq!(c.messages()[0].blocks, vec![Block::paragraph("q")]);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn load_clears_new_flags() {
        let mut saved = Message::new(Role::Assistant, "eski javob");
        saved.is_new = true;
        let mut c = Conversation::new();
        c.submit("a").unwrap();
        c.load(vec![Message::new(Role::User, "savol"), saved]);
        assert_eq!(c.messages().len(), 2);
        assert_eq!(new_count(&c), 0);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn clear_empties_and_idles() {
        let mut c = Conversation::new();
        c.submit("a").unwrap();
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.revealing().is_none());
    }
}
