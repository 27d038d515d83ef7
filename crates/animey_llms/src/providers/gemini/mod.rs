//! Google Gemini provider module
//!
//! Implements the Provider trait for the Gemini `generateContent` endpoint.
//! API docs: https://ai.google.dev/api/generate-content

mod convert;
mod provider;
mod types;

pub use provider::GeminiProvider;
pub use types::{GeminiConfig, GeminiRequest, GeminiResponse};
