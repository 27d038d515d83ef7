//! Application metadata constants

pub const NAME: &str = "animey";
pub const DISPLAY_NAME: &str = "Animey AI";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory name for animey data under the user's data dir
pub const DATA_DIR: &str = "animey";
/// File holding the generated client user id
pub const USER_ID_FILE: &str = "user_id";
/// File holding saved chat topics
pub const TOPICS_FILE: &str = "topics.json";
/// Prefix of generated client user ids
pub const USER_ID_PREFIX: &str = "user_";
