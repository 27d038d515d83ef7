//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use animey_constant::app::NAME;
use animey_constant::defaults::{REVEAL_CADENCE_MS, SERVER_URL};

/// Anime-only chat assistant: server and terminal client
#[derive(Parser)]
#[command(name = NAME, about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for scripts
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the chat HTTP server
    Serve {
        /// Address to listen on. Uses ANIMEY_LISTEN if not set.
        #[arg(long)]
        listen: Option<String>,
        /// Per-user history file. Uses ANIMEY_HISTORY_FILE if not set.
        #[arg(long)]
        history_file: Option<PathBuf>,
        /// Gemini model. Uses ANIMEY_MODEL if not set.
        #[arg(long)]
        model: Option<String>,
        /// Seconds to wait for one generation call. Uses ANIMEY_TIMEOUT_SECS if not set.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Interactive chat with typed-out replies
    Chat {
        /// Chat server base URL
        #[arg(long, env = "ANIMEY_SERVER_URL", default_value = SERVER_URL)]
        server: String,
        /// Continue a saved topic (its first prompt)
        #[arg(long)]
        topic: Option<String>,
        /// Milliseconds between revealed words
        #[arg(long, default_value_t = REVEAL_CADENCE_MS)]
        cadence_ms: u64,
    },
    /// Send one message and print the reply
    Ask {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Chat server base URL
        #[arg(long, env = "ANIMEY_SERVER_URL", default_value = SERVER_URL)]
        server: String,
        /// Print the reply at once instead of typing it out
        #[arg(long)]
        no_animate: bool,
        /// Milliseconds between revealed words
        #[arg(long, default_value_t = REVEAL_CADENCE_MS)]
        cadence_ms: u64,
    },
    /// Manage saved topics
    Topics {
        #[command(subcommand)]
        action: TopicsAction,
    },
}

#[derive(Subcommand)]
pub enum TopicsAction {
    /// List saved topics, newest first
    List,
    /// Print a saved topic
    Show {
        /// Topic prompt
        prompt: String,
    },
    /// Delete a saved topic
    Delete {
        /// Topic prompt
        prompt: String,
    },
}
