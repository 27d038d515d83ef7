//! Shared application state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use animey_core::{HistoryStore, JsonFileStore, Turn};
use animey_llms::providers::gemini::GeminiConfig;
use animey_llms::{GeminiProvider, ProviderRegistry};

use crate::config::ServerConfig;
use crate::service::ChatService;

pub struct AppState {
    pub chat: ChatService,
    started_at: Instant,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat,
            started_at: Instant::now(),
        }
    }

    /// History in the configured JSON file, Gemini when a key is present.
    pub fn from_config(config: &ServerConfig) -> Self {
        let history: Arc<dyn HistoryStore> =
            Arc::new(JsonFileStore::<Vec<Turn>>::new(&config.history_file));
        let chat = ChatService::new(history, providers(config))
            .with_model(&config.model)
            .with_timeout(config.generation_timeout);
        Self::new(chat)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Registry holding Gemini when an API key is configured; empty otherwise.
fn providers(config: &ServerConfig) -> ProviderRegistry {
    let registry = ProviderRegistry::new();
    let Some(key) = config.gemini_api_key.as_deref() else {
        return registry;
    };
    let mut gemini = GeminiConfig::new(key);
    if let Some(url) = &config.gemini_base_url {
        gemini = gemini.with_base_url(url.clone());
    }
    match GeminiProvider::new(gemini) {
        Ok(provider) => registry.register(GeminiProvider::ID, provider),
        Err(e) => {
            tracing::warn!(error = %e, "gemini provider unavailable");
            registry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_is_registered_only_with_a_key() {
        let without = ServerConfig::default();
        assert!(providers(&without).is_empty());

        let with = ServerConfig::default().with_api_key("k");
        assert_eq!(providers(&with).list_providers(), vec![GeminiProvider::ID]);
        assert!(AppState::from_config(&with).chat.has_provider());

        let blank = ServerConfig::default().with_api_key("  ");
        assert!(providers(&blank).is_empty());
    }
}
