//! animey_llms: generation-API providers behind one trait.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               ProviderRegistry               │
//! │   HashMap<String, Arc<dyn Provider>>         │
//! │                     │                        │
//! │              ┌──────┴──────┐                 │
//! │              ▼             ▼                 │
//! │        ┌──────────┐  ┌──────────┐            │
//! │        │  Gemini  │  │ (future) │            │
//! │        │ Provider │  │          │            │
//! │        └──────────┘  └──────────┘            │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use animey_llms::{GeminiProvider, ProviderRegistry};
//!
//! let provider = GeminiProvider::from_env().unwrap();
//! let registry = ProviderRegistry::new().register("gemini", provider);
//! ```

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;


// Re-export core abstractions
pub use error::{Error, Result};
pub use provider::{Provider, ProviderRegistry};

// Re-export provider implementations
pub use providers::GeminiProvider;

// Re-export commonly used types
pub use types::{
    FinishReason, GenerateOptions, GenerateRequest, GenerateResponse, Message, Role, Usage,
};
