use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("conversation is busy: {0}")]
    Busy(&'static str),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
