//! Saved conversations on the client, keyed by their first prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, Message, Role};
use crate::error::Result;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub prompt: String,
    pub messages: Vec<TopicMessage>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    pub fn from_conversation(prompt: &str, conversation: &Conversation) -> Self {
        Self {
            prompt: prompt.trim().to_string(),
            messages: conversation
                .messages()
                .iter()
                .map(|m| TopicMessage {
                    role: m.role,
                    text: m.text(),
                })
                .collect(),
            updated_at: Utc::now(),
        }
    }

    /// Blank topics are never listed or saved.
    pub fn is_listable(&self) -> bool {
        !self.prompt.trim().is_empty() && !self.messages.is_empty()
    }

    /// Messages ready for [`Conversation::load`].
    pub fn to_messages(&self) -> Vec<Message> {
        self.messages
            .iter()
            .map(|m| Message::new(m.role, &m.text))
            .collect()
    }
}

/// Topic operations over any keyed store.
pub struct TopicBook<S> {
    store: S,
}

impl<S> TopicBook<S>
where
    S: KeyValueStore<Topic>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Listable topics, most recently updated first.
    pub async fn list(&self) -> Result<Vec<Topic>> {
        let mut topics: Vec<Topic> = self
            .store
            .entries()
            .await?
            .into_iter()
            .map(|(_, t)| t)
            .filter(Topic::is_listable)
            .collect();
        topics.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(topics)
    }

    pub async fn get(&self, prompt: &str) -> Result<Option<Topic>> {
        Ok(self
            .store
            .get(prompt.trim())
            .await?
            .filter(Topic::is_listable))
    }

    /// Save the conversation under `prompt`, replacing any earlier version.
    /// Returns `None` when there is nothing worth saving.
    pub async fn record(&self, prompt: &str, conversation: &Conversation) -> Result<Option<Topic>> {
        let topic = Topic::from_conversation(prompt, conversation);
        if !topic.is_listable() {
            return Ok(None);
        }
        self.store.put(&topic.prompt, topic.clone()).await?;
        Ok(Some(topic))
    }

    pub async fn delete(&self, prompt: &str) -> Result<bool> {
        self.store.remove(prompt.trim()).await
    }
}
