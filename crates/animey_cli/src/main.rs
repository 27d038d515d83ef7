//! CLI entry point for animey.

mod cli;
mod client;
mod commands;
mod identity;
mod output;
mod render;

use clap::Parser;

use animey_observability::ObservabilityConfig;

use crate::cli::{Cli, Command, OutputFormat};

/// Load `.env` files: the data dir's `env` first, then the nearest project
/// `.env` walking up from the working directory. Existing variables win.
fn load_env() {
    if let Ok(dir) = identity::data_dir() {
        let env_file = dir.join("env");
        if env_file.exists() {
            let _ = dotenvy::from_path(&env_file);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd;
        for _ in 0..32 {
            let env_file = dir.join(".env");
            if env_file.exists() {
                let _ = dotenvy::from_path(&env_file);
                break;
            }
            if let Some(parent) = dir.parent() {
                dir = parent.to_path_buf();
            } else {
                break;
            }
        }
    }
}

/// The server logs at info; client commands stay quiet unless `--verbose`.
fn init_logging(cli: &Cli) {
    let service = match cli.command {
        Command::Serve { .. } => "animey-server",
        _ => "animey-cli",
    };
    let mut config =
        ObservabilityConfig::from_env().with_version(animey_constant::app::VERSION);
    if matches!(cli.output, OutputFormat::Json) {
        config.json = true;
    }
    if std::env::var("OTEL_SERVICE_NAME").is_err() {
        config.service_name = service.to_string();
    }
    if cli.verbose {
        config.log_level = Some("debug".to_string());
    } else if config.log_level.is_none() {
        let level = if service == "animey-server" { "info" } else { "warn" };
        config.log_level = Some(level.to_string());
    }

    if let Err(e) = animey_observability::init(config) {
        output::warning(&format!("logging disabled: {e}"));
    }
}

#[tokio::main]
async fn main() {
    load_env();
    let cli = Cli::parse();
    output::init(cli.output);
    init_logging(&cli);

    let result = commands::handle(cli).await;
    animey_observability::shutdown();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
