//! The `Provider` seam and the registry the server resolves backends from.

mod trait_def;

pub use trait_def::Provider;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Generation backends by id (`"gemini"`, or a stub in tests).
///
/// Cloning is cheap: providers are shared behind `Arc`.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ProviderRegistry::insert`].
    pub fn register<P: Provider + 'static>(mut self, id: impl Into<String>, provider: P) -> Self {
        self.insert(id, Arc::new(provider));
        self
    }

    /// Add or replace the provider under `id`.
    pub fn insert(&mut self, id: impl Into<String>, provider: Arc<dyn Provider>) {
        let id = id.into();
        if self.providers.insert(id.clone(), provider).is_some() {
            tracing::debug!(provider = %id, "provider replaced");
        }
    }

    pub fn get_provider(&self, id: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ProviderNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered ids, sorted.
    pub fn list_providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}
