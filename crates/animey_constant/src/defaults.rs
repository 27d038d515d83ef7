//! Runtime defaults shared by the server and the CLI client.

/// Address the chat server binds to
pub const LISTEN_ADDR: &str = "127.0.0.1:3000";
/// Path of the chat endpoint
pub const CHAT_PATH: &str = "/api/chat";
/// Base URL the CLI talks to
pub const SERVER_URL: &str = "http://127.0.0.1:3000";

/// Per-user history file, relative to the working directory
pub const HISTORY_FILE: &str = "chatHistory.json";

/// Gemini model used when none is configured
pub const MODEL: &str = "gemini-1.5-flash-latest";

/// Upper bound on one generation call, in seconds
pub const GENERATION_TIMEOUT_SECS: u64 = 30;

/// Typing animation cadence: one word per tick
pub const REVEAL_CADENCE_MS: u64 = 100;
