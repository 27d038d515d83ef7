//! Span macros and span helpers

/// Span for one HTTP request.
///
/// ```rust
/// use animey_observability::http_request_span;
///
/// let span = http_request_span!("POST", "/api/chat", "user_k3j9x0a1b");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! http_request_span {
    ($method:expr, $path:expr, $user_id:expr) => {
        tracing::info_span!(
            "http.request",
            http.method = $method,
            http.route = $path,
            http.status_code = tracing::field::Empty,
            user.id = $user_id,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
            generation.duration_ms = tracing::field::Empty,
        )
    };
}

/// Span for one call to a generation backend.
///
/// ```rust
/// use animey_observability::generation_span;
///
/// let span = generation_span!("gemini", "gemini-1.5-flash-latest", 4usize);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! generation_span {
    ($provider:expr, $model:expr, $turns:expr) => {
        tracing::info_span!(
            "generation",
            generation.provider = $provider,
            generation.model = $model,
            generation.turns = $turns,
        )
    };
}

/// Span for history/topic storage operations.
///
/// ```rust
/// use animey_observability::storage_span;
///
/// let span = storage_span!("json_file", "append", "user_k3j9x0a1b");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! storage_span {
    ($backend:expr, $operation:expr, $key:expr) => {
        tracing::info_span!(
            "storage.operation",
            storage.backend = $backend,
            storage.operation = $operation,
            storage.key = $key,
        )
    };
}

/// Mark the current span as failed and log the error.
///
/// Only fields declared on the span (as `http_request_span!` does) are recorded.
pub fn record_error<E: std::fmt::Display + ?Sized>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", tracing::field::display(error));
    tracing::error!(error = %error, "Operation failed");
}

/// Record a duration in milliseconds on the current span.
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
