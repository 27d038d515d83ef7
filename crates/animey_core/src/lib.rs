pub mod block;
pub mod conversation;
pub mod error;
pub mod format;
pub mod history;
pub mod render;
pub mod reveal;
pub mod store;
pub mod topic;

pub use block::Block;
pub use conversation::{Conversation, Failure, Message, Phase, Role};
pub use error::{CoreError, Result};
pub use format::format_message;
pub use history::{HistoryStore, Turn, TurnRole};
pub use reveal::{
    reveal, RevealCursor, RevealObserver, RevealOutcome, RevealState, RevealedWord, Revealer,
    Tick,
};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use topic::{Topic, TopicBook, TopicMessage};
