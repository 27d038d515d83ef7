//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use animey_constant::defaults::CHAT_PATH;
use animey_observability::{http_request_span, record_error};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A validated chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
}

impl ChatRequest {
    /// Validate a raw JSON body: `message` must be a non-blank string, then
    /// `userId` a non-blank string.
    pub fn from_json(body: &Value) -> AppResult<Self> {
        let message = match body.get("message") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(AppError::InvalidMessage),
        };
        let user_id = match body.get("userId") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(AppError::InvalidUserId),
        };
        Ok(Self { message, user_id })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable chat body");
        AppError::InvalidMessage
    })?;
    let request = ChatRequest::from_json(&body)?;

    let span = http_request_span!("POST", CHAT_PATH, request.user_id.as_str());
    async move {
        let result = state.chat.reply(&request.user_id, &request.message).await;
        let span = tracing::Span::current();
        match result {
            Ok(response) => {
                span.record("http.status_code", 200u16);
                Ok(Json(ChatResponse { response }))
            }
            Err(e) => {
                span.record("http.status_code", e.status_code().as_u16());
                record_error(&e);
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Any method other than POST on the chat route.
pub async fn method_not_allowed(method: Method) -> AppError {
    tracing::debug!(%method, "method not allowed on chat route");
    AppError::MethodNotAllowed
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime().as_secs(),
        "provider_configured": state.chat.has_provider(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_request_is_trimmed() {
        let req =
            ChatRequest::from_json(&json!({ "message": "  Naruto  ", "userId": "user_abc" }))
                .unwrap();
        assert_eq!(req.message, "Naruto");
        assert_eq!(req.user_id, "user_abc");
    }

    #[test]
    fn message_is_checked_before_user_id() {
        assert!(matches!(
            ChatRequest::from_json(&json!({})),
            Err(AppError::InvalidMessage)
        ));
        assert!(matches!(
            ChatRequest::from_json(&json!({ "message": 42, "userId": "u" })),
            Err(AppError::InvalidMessage)
        ));
        assert!(matches!(
            ChatRequest::from_json(&json!({ "message": "   ", "userId": "u" })),
            Err(AppError::InvalidMessage)
        ));
    }

    #[test]
    fn bad_user_id_is_rejected() {
        for user_id in [json!(null), json!(""), json!(7), json!(["u"])] {
            assert!(matches!(
                ChatRequest::from_json(&json!({ "message": "salom", "userId": user_id })),
                Err(AppError::InvalidUserId)
            ));
        }
        assert!(matches!(
            ChatRequest::from_json(&json!({ "message": "salom" })),
            Err(AppError::InvalidUserId)
        ));
    }

    #[test]
    fn non_object_body_is_invalid_message() {
        assert!(matches!(
            ChatRequest::from_json(&json!("salom")),
            Err(AppError::InvalidMessage)
        ));
    }
}
