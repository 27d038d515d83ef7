//! One chat exchange: history in, generation, history out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::Instrument;

use animey_constant::defaults;
use animey_core::{HistoryStore, Turn, TurnRole};
use animey_llms::{GeminiProvider, GenerateRequest, Message, ProviderRegistry};
use animey_observability::{generation_span, record_duration, storage_span};

use crate::error::{AppError, AppResult};
use crate::persona::persona;

pub struct ChatService {
    history: Arc<dyn HistoryStore>,
    providers: ProviderRegistry,
    provider_id: String,
    model: String,
    persona: String,
    timeout: Duration,
    // Serialises read-modify-write of the history record
    append_lock: Mutex<()>,
}

impl ChatService {
    /// Answers come from the `"gemini"` entry of `providers` unless
    /// [`ChatService::with_provider_id`] picks another.
    pub fn new(history: Arc<dyn HistoryStore>, providers: ProviderRegistry) -> Self {
        Self {
            history,
            providers,
            provider_id: GeminiProvider::ID.to_string(),
            model: defaults::MODEL.to_string(),
            persona: persona(),
            timeout: Duration::from_secs(defaults::GENERATION_TIMEOUT_SECS),
            append_lock: Mutex::new(()),
        }
    }

    pub fn with_provider_id(mut self, id: impl Into<String>) -> Self {
        self.provider_id = id.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_provider(&self) -> bool {
        self.providers.contains(&self.provider_id)
    }

    /// Answer `message` for `user_id` and record the exchange.
    ///
    /// The history is left untouched unless a non-empty reply came back.
    pub async fn reply(&self, user_id: &str, message: &str) -> AppResult<String> {
        let provider = self
            .providers
            .get_provider(&self.provider_id)
            .map_err(|_| AppError::MissingApiKey)?;
        let message = message.trim();

        let turns = self
            .history
            .history(user_id)
            .instrument(storage_span!("history", "read", user_id))
            .await?;

        let mut messages: Vec<Message> = turns.iter().map(to_message).collect();
        messages.push(Message::user(message));
        let request = GenerateRequest::new(&self.model, messages).with_system(&self.persona);

        let started = Instant::now();
        let span = generation_span!(provider.provider_id(), self.model.as_str(), turns.len() + 1);
        let outcome = tokio::time::timeout(self.timeout, provider.generate(request))
            .instrument(span)
            .await;
        record_duration("generation.duration_ms", started.elapsed());

        let response = match outcome {
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "generation timed out");
                return Err(AppError::Timeout);
            }
            Ok(result) => result?,
        };
        let text = response.text;
        if text.trim().is_empty() {
            return Err(AppError::EmptyReply);
        }

        {
            let _guard = self.append_lock.lock().await;
            self.history
                .append_exchange(user_id, message, &text)
                .instrument(storage_span!("history", "append", user_id))
                .await?;
        }

        tracing::info!(
            user.id = %user_id,
            history_turns = turns.len() + 2,
            reply_chars = text.chars().count(),
            "chat reply sent"
        );
        Ok(text)
    }
}

fn to_message(turn: &Turn) -> Message {
    match turn.role {
        TurnRole::User => Message::user(turn.text()),
        TurnRole::Model => Message::assistant(turn.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animey_core::MemoryStore;
    use animey_llms::{GenerateResponse, Provider, Usage};
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        fn provider_id(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: GenerateRequest) -> animey_llms::Result<GenerateResponse> {
            let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(GenerateResponse {
                text: format!("{} ta xabar, oxirgisi: {last}", request.messages.len()),
                finish_reason: Default::default(),
                usage: Usage::default(),
                model: None,
            })
        }
    }

    fn service() -> (Arc<MemoryStore<Vec<Turn>>>, ChatService) {
        let store = Arc::new(MemoryStore::new());
        let providers = ProviderRegistry::new().register("echo", Echo);
        let service = ChatService::new(store.clone(), providers).with_provider_id("echo");
        (store, service)
    }

    #[tokio::test]
    async fn prior_turns_are_sent_to_the_provider() {
        let (store, service) = service();
        assert_eq!(service.reply("u", "  salom  ").await.unwrap(), "1 ta xabar, oxirgisi: salom");
        assert_eq!(service.reply("u", "yana").await.unwrap(), "3 ta xabar, oxirgisi: yana");

        let turns = store.history("u").await.unwrap();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0], Turn::user("salom"));
        assert_eq!(turns[3].role, TurnRole::Model);
    }

    #[tokio::test]
    async fn users_do_not_share_history() {
        let (store, service) = service();
        service.reply("a", "birinchi").await.unwrap();
        assert_eq!(service.reply("b", "ikkinchi").await.unwrap(), "1 ta xabar, oxirgisi: ikkinchi");
        assert_eq!(store.history("a").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn no_provider_means_missing_key() {
        let service =
            ChatService::new(Arc::new(MemoryStore::<Vec<Turn>>::new()), ProviderRegistry::new());
        assert!(!service.has_provider());
        assert!(matches!(service.reply("u", "x").await, Err(AppError::MissingApiKey)));
    }

    #[tokio::test]
    async fn provider_is_resolved_by_configured_id() {
        let store = Arc::new(MemoryStore::<Vec<Turn>>::new());
        let providers = ProviderRegistry::new().register("echo", Echo);

        let default_id = ChatService::new(store.clone(), providers.clone());
        assert!(!default_id.has_provider());
        assert!(matches!(default_id.reply("u", "x").await, Err(AppError::MissingApiKey)));
        assert!(store.history("u").await.unwrap().is_empty());

        let echo = ChatService::new(store, providers).with_provider_id("echo");
        assert!(echo.has_provider());
        assert!(echo.reply("u", "x").await.is_ok());
    }
}
