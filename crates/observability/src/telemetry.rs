//! Subscriber initialization: console output plus optional OTLP export
//!
//! Uses the OpenTelemetry 0.31 API:
//! https://docs.rs/opentelemetry-otlp/0.31.0/opentelemetry_otlp/

use once_cell::sync::OnceCell;
use opentelemetry::{global, trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::ObservabilityConfig;
use crate::error::ObservabilityError;

// Kept for shutdown
static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

enum OtlpStatus {
    Disabled,
    Enabled(String),
    Failed(String, ObservabilityError),
}

/// Install the global subscriber.
///
/// Console output goes to stderr so it never interleaves with text the CLI
/// prints on stdout. Fails if a global subscriber is already set.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    let env_filter = match config.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| ObservabilityError::InvalidFilter {
                filter: level.to_string(),
                reason: e.to_string(),
            })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let mut attributes = vec![KeyValue::new("service.name", config.service_name.clone())];
    if let Some(version) = &config.service_version {
        attributes.push(KeyValue::new("service.version", version.clone()));
    }
    for (key, value) in &config.resource_attributes {
        attributes.push(KeyValue::new(key.clone(), value.clone()));
    }
    // Resource constructors are private in 0.31; the builder is the public API
    let resource = Resource::builder().with_attributes(attributes).build();

    // Layers are built separately and composed once to keep the types simple
    let text_layer = (config.enable_console && !config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json_layer = (config.enable_console && config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });

    let mut otlp = OtlpStatus::Disabled;
    let otel_layer = config.otlp_endpoint.as_deref().and_then(|endpoint| {
        match build_otlp_tracer_provider(&config.service_name, endpoint, resource) {
            Ok((tracer, provider)) => {
                // Global provider must be set before the layer is created
                global::set_tracer_provider(provider.clone());
                let _ = TRACER_PROVIDER.set(provider);
                otlp = OtlpStatus::Enabled(endpoint.to_string());
                Some(OpenTelemetryLayer::new(tracer))
            }
            Err(e) => {
                otlp = OtlpStatus::Failed(endpoint.to_string(), e);
                None
            }
        }
    });

    Registry::default()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))?;

    // Logged after init so the messages reach a subscriber
    match otlp {
        OtlpStatus::Enabled(endpoint) => tracing::info!(
            service.name = %config.service_name,
            otlp.endpoint = %endpoint,
            "OTLP tracing enabled"
        ),
        OtlpStatus::Disabled => tracing::debug!(
            service.name = %config.service_name,
            "Tracing initialized (console only, no OTLP endpoint configured)"
        ),
        OtlpStatus::Failed(endpoint, e) => tracing::warn!(
            service.name = %config.service_name,
            endpoint = %endpoint,
            error = %e,
            "Failed to initialize OTLP export, falling back to console-only tracing"
        ),
    }

    Ok(())
}

/// Build an OTLP span exporter and batch tracer provider.
fn build_otlp_tracer_provider(
    service_name: &str,
    endpoint: &str,
    resource: Resource,
) -> Result<(opentelemetry_sdk::trace::SdkTracer, SdkTracerProvider), ObservabilityError> {
    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint.to_string())
        .build()
        .map_err(|e| ObservabilityError::Exporter {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer(service_name.to_string());

    Ok((tracer, provider))
}

/// Flush and shut down the tracer provider, if OTLP export was enabled.
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        let _ = provider.shutdown();
        tracing::debug!("OpenTelemetry tracer provider shut down");
    }
}

/// Initialize with configuration read from environment variables
pub fn init_from_env() -> Result<(), ObservabilityError> {
    init(ObservabilityConfig::from_env())
}
