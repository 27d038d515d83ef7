//! Per-user conversation history kept by the server.
//!
//! Records use the `{ "role": "user" | "model", "parts": [{ "text": .. }] }`
//! layout so existing `chatHistory.json` files load as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    #[serde(default)]
    pub parts: Vec<TurnPart>,
}

impl Turn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Model, text)
    }

    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Turns for `user_id`; empty when nothing was saved.
    async fn history(&self, user_id: &str) -> Result<Vec<Turn>>;

    /// Replace the user's whole record.
    async fn save_history(&self, user_id: &str, turns: Vec<Turn>) -> Result<()>;

    /// Append one question/answer pair to the user's record.
    async fn append_exchange(&self, user_id: &str, question: &str, answer: &str) -> Result<()> {
        let mut turns = self.history(user_id).await?;
        turns.push(Turn::user(question));
        turns.push(Turn::model(answer));
        self.save_history(user_id, turns).await
    }
}

#[async_trait]
impl<S> HistoryStore for S
where
    S: KeyValueStore<Vec<Turn>>,
{
    async fn history(&self, user_id: &str) -> Result<Vec<Turn>> {
        Ok(self.get(user_id).await?.unwrap_or_default())
    }

    async fn save_history(&self, user_id: &str, turns: Vec<Turn>) -> Result<()> {
        self.put(user_id, turns).await
    }
}
