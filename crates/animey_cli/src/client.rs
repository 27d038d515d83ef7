//! HTTP client for the chat endpoint.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use animey_constant::defaults::CHAT_PATH;
use animey_core::Failure;

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
    #[serde(rename = "userId")]
    user_id: &'a str,
}

pub struct ChatClient {
    http: Client,
    url: String,
}

impl ChatClient {
    pub fn new(server: &str) -> Self {
        Self {
            http: Client::new(),
            url: format!("{}{}", server.trim_end_matches('/'), CHAT_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one message; the reply text or why there is none.
    pub async fn send(&self, user_id: &str, message: &str) -> Result<String, Failure> {
        let response = self
            .http
            .post(&self.url)
            .json(&ChatBody { message, user_id })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %self.url, error = %e, "chat request failed");
                Failure::Network
            })?;

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%status, error = %e, "unreadable chat response");
                Value::Null
            }
        };

        if status.is_success() {
            if let Some(text) = body.get("response").and_then(Value::as_str) {
                return Ok(text.to_string());
            }
        }
        let reason = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        tracing::debug!(%status, %reason, "chat request answered with an error");
        Err(Failure::Server(reason))
    }
}
