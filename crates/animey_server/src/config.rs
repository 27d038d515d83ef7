//! Server configuration

use std::path::PathBuf;
use std::time::Duration;

use animey_constant::defaults;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:3000"
    pub listen_addr: String,
    /// JSON file holding every user's history
    pub history_file: PathBuf,
    /// Gemini model id
    pub model: String,
    /// Upper bound on one generation call
    pub generation_timeout: Duration,
    /// None leaves the server running but unable to answer
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: defaults::LISTEN_ADDR.to_string(),
            history_file: PathBuf::from(defaults::HISTORY_FILE),
            model: defaults::MODEL.to_string(),
            generation_timeout: Duration::from_secs(defaults::GENERATION_TIMEOUT_SECS),
            gemini_api_key: None,
            gemini_base_url: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = path.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(addr) = std::env::var("ANIMEY_LISTEN") {
            config.listen_addr = addr;
        }

        if let Ok(path) = std::env::var("ANIMEY_HISTORY_FILE") {
            config.history_file = PathBuf::from(path);
        }

        if let Ok(model) = std::env::var("ANIMEY_MODEL") {
            config.model = model;
        }

        if let Ok(secs) = std::env::var("ANIMEY_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.generation_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %secs, "ignoring invalid ANIMEY_TIMEOUT_SECS"),
            }
        }

        config.gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        config.gemini_base_url = std::env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        config
    }
}
