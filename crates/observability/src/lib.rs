//! Animey Observability - tracing setup shared by the server and the CLI
//!
//! Console logging through `tracing-subscriber`, plus OpenTelemetry OTLP
//! export when an endpoint is configured.
//!
//! # Quick Start
//!
//! ```no_run
//! use animey_observability::{ObservabilityConfig, init};
//!
//! let config = ObservabilityConfig::new("animey-server")
//!     .with_otlp_endpoint("http://localhost:4317")
//!     .with_log_level("info");
//!
//! init(config)?;
//! tracing::info!("Service started");
//! # Ok::<(), animey_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` or `SERVICE_NAME` - Service name
//! - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `OTEL_LOG_LEVEL` or `RUST_LOG` - Log level filter
//! - `ANIMEY_LOG_JSON` - `1`/`true` switches console output to JSON lines

pub mod config;
pub mod error;
pub mod telemetry;
pub mod spans;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use spans::{record_duration, record_error};

// Macros are exported via #[macro_export]:
// animey_observability::http_request_span!(), storage_span!(), generation_span!()
