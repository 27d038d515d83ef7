//! Ways logging setup can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservabilityError {
    /// `RUST_LOG`-style directive that `EnvFilter` rejects, e.g. from `OTEL_LOG_LEVEL`.
    #[error("invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// The OTLP span exporter could not be built for the endpoint.
    #[error("OTLP exporter for {endpoint} failed: {reason}")]
    Exporter { endpoint: String, reason: String },

    /// Another global subscriber is already installed.
    #[error("tracing subscriber already set: {0}")]
    AlreadyInitialized(String),
}
