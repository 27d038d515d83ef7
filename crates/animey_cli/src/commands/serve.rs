//! `animey serve`: run the chat server until Ctrl-C.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};

use animey_server::{run_with_shutdown, ServerConfig};

use crate::output;

pub async fn handle(
    listen: Option<String>,
    history_file: Option<PathBuf>,
    model: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let config = build_config(ServerConfig::from_env(), listen, history_file, model, timeout_secs)?;

    output::header("Animey chat server");
    output::kv("listen", &config.listen_addr);
    output::kv("history", &config.history_file.display().to_string());
    output::kv("model", &config.model);
    output::kv("timeout", &format!("{}s", config.generation_timeout.as_secs()));
    if config.gemini_api_key.is_none() {
        output::warning("GEMINI_API_KEY is not set; chat requests will fail until it is.");
    }

    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    })
    .await
}

/// Flags override whatever the environment configured.
fn build_config(
    mut config: ServerConfig,
    listen: Option<String>,
    history_file: Option<PathBuf>,
    model: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<ServerConfig> {
    if let Some(listen) = listen {
        config = config.with_listen_addr(listen);
    }
    if let Some(path) = history_file {
        config = config.with_history_file(path);
    }
    if let Some(model) = model {
        config = config.with_model(model);
    }
    match timeout_secs {
        Some(0) => bail!("--timeout-secs must be at least 1"),
        Some(secs) => config = config.with_generation_timeout(Duration::from_secs(secs)),
        None => {}
    }
    Ok(config)
}
