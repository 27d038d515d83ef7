use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerateRequest, GenerateResponse};

/// A generation backend: takes prior turns plus a new message, returns one text reply.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier, e.g. `"gemini"`.
    fn provider_id(&self) -> &str;

    /// Models this provider can serve.
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Generate a complete (non-streamed) reply.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}
