//! Error types for the chat server.
//!
//! Every error answers with `{"error": "<message>"}`; the message is the
//! user-facing text, internal detail only goes to the log.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use animey_core::CoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Faqat POST so'rovlari qabul qilinadi")]
    MethodNotAllowed,

    #[error("Xabar bo'sh yoki noto'g'ri formatda")]
    InvalidMessage,

    #[error("userId kiritilmagan yoki noto'g'ri")]
    InvalidUserId,

    #[error("GEMINI_API_KEY topilmadi.")]
    MissingApiKey,

    /// Backend answered without any text.
    #[error("AI javob bera olmadi.")]
    EmptyReply,

    /// Backend call failed; the detail is logged, not returned.
    #[error("AI xizmatida xatolik yuz berdi.")]
    Provider(String),

    #[error("AI xizmati vaqtida javob bermadi.")]
    Timeout,

    #[error("Ichki server xatoligi.")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidMessage | Self::InvalidUserId => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::EmptyReply | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<animey_llms::Error> for AppError {
    fn from(e: animey_llms::Error) -> Self {
        match e {
            animey_llms::Error::EmptyResponse => AppError::EmptyReply,
            animey_llms::Error::MissingApiKey(_) => AppError::MissingApiKey,
            other => AppError::Provider(other.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "chat request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "chat request rejected");
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        if matches!(self, AppError::MethodNotAllowed) {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }
        (status, body).into_response()
    }
}
