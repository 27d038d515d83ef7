//! animey HTTP server: `POST /api/chat` in front of a generation backend.
//!
//! ```text
//! client ──POST {message, userId}──▶ handlers::chat
//!                                       │ validate
//!                                       ▼
//!                                  ChatService ──▶ HistoryStore (chatHistory.json)
//!                                       │
//!                                       ▼
//!                                  Provider (Gemini)
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod persona;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use animey_constant::defaults::CHAT_PATH;

pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use service::ChatService;
pub use state::AppState;

/// Run the server until the process is killed.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    run_with_shutdown(config, std::future::pending()).await
}

/// Run the server with graceful shutdown support.
pub async fn run_with_shutdown<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::from_config(&config));
    if !state.chat.has_provider() {
        warn!("GEMINI_API_KEY is not set; every chat request will fail with 500");
    }

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        history = %config.history_file.display(),
        model = %config.model,
        "animey server listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("animey server stopped");
    Ok(())
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            CHAT_PATH,
            post(handlers::chat).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
