//! The chat endpoint driven through the router, without a socket.
//!
//! Run with: cargo test -p animey-server --test api

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use animey_core::{HistoryStore, JsonFileStore, MemoryStore, Turn};
use animey_llms::{
    Error as LlmError, GeminiProvider, GenerateRequest, GenerateResponse, Provider,
    ProviderRegistry, Usage,
};
use animey_server::{AppState, ChatService, create_router};

enum Behaviour {
    Reply(&'static str),
    Empty,
    Fail,
    Hang,
}

struct Stub(Behaviour);

#[async_trait]
impl Provider for Stub {
    fn provider_id(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _request: GenerateRequest) -> animey_llms::Result<GenerateResponse> {
        let text = match self.0 {
            Behaviour::Reply(text) => text,
            Behaviour::Empty => "   ",
            Behaviour::Fail => return Err(LlmError::provider_error("Gemini API error 500: boom")),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                "kech"
            }
        };
        Ok(GenerateResponse {
            text: text.to_string(),
            finish_reason: Default::default(),
            usage: Usage::default(),
            model: None,
        })
    }
}

struct Harness {
    store: Arc<MemoryStore<Vec<Turn>>>,
    app: axum::Router,
}

fn harness(provider: Option<Behaviour>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let providers = match provider {
        Some(b) => ProviderRegistry::new().register(GeminiProvider::ID, Stub(b)),
        None => ProviderRegistry::new(),
    };
    let chat = ChatService::new(store.clone(), providers).with_timeout(Duration::from_secs(30));
    let app = create_router(Arc::new(AppState::new(chat)));
    Harness { store, app }
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn successful_exchange_is_recorded() {
    let h = harness(Some(Behaviour::Reply("# Top 3\n- Naruto\n- Bleach")));
    let (status, body) = send(
        h.app,
        post_json(r#"{"message":"  Aksion anime tavsiya qil ","userId":"user_abc123xyz"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "# Top 3\n- Naruto\n- Bleach" }));
    assert_eq!(
        h.store.history("user_abc123xyz").await.unwrap(),
        vec![
            Turn::user("Aksion anime tavsiya qil"),
            Turn::model("# Top 3\n- Naruto\n- Bleach"),
        ]
    );
}

#[tokio::test]
async fn other_methods_get_405() {
    let h = harness(Some(Behaviour::Reply("x")));
    let request = Request::builder()
        .method("GET")
        .uri("/api/chat")
        .body(Body::empty())
        .unwrap();
    let response = h.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Faqat POST so'rovlari qabul qilinadi");
}

#[tokio::test]
async fn invalid_bodies_get_400_without_backend_call() {
    let cases = [
        ("not json", "Xabar bo'sh yoki noto'g'ri formatda"),
        (r#"{"userId":"u"}"#, "Xabar bo'sh yoki noto'g'ri formatda"),
        (r#"{"message":"   ","userId":"u"}"#, "Xabar bo'sh yoki noto'g'ri formatda"),
        (r#"{"message":["a"],"userId":"u"}"#, "Xabar bo'sh yoki noto'g'ri formatda"),
        (r#"{"message":"salom"}"#, "userId kiritilmagan yoki noto'g'ri"),
        (r#"{"message":"salom","userId":""}"#, "userId kiritilmagan yoki noto'g'ri"),
        (r#"{"message":"salom","userId":12}"#, "userId kiritilmagan yoki noto'g'ri"),
    ];
    for (body, expected) in cases {
        // No provider: reaching the backend would answer 500 instead
        let h = harness(None);
        let (status, json) = send(h.app, post_json(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json["error"], expected, "body {body}");
    }
}

#[tokio::test]
async fn missing_api_key_is_500() {
    let h = harness(None);
    let (status, body) = send(h.app, post_json(r#"{"message":"salom","userId":"u"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "GEMINI_API_KEY topilmadi." }));
}

#[tokio::test]
async fn empty_reply_is_500_and_history_untouched() {
    let h = harness(Some(Behaviour::Empty));
    let (status, body) = send(h.app, post_json(r#"{"message":"salom","userId":"u"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "AI javob bera olmadi.");
    assert!(h.store.history("u").await.unwrap().is_empty());
}

#[tokio::test]
async fn provider_failure_is_502_and_history_untouched() {
    let h = harness(Some(Behaviour::Fail));
    let (status, body) = send(h.app, post_json(r#"{"message":"salom","userId":"u"}"#)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body["error"].as_str().unwrap().contains("boom"));
    assert!(h.store.history("u").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_with_504() {
    let h = harness(Some(Behaviour::Hang));
    let (status, body) = send(h.app, post_json(r#"{"message":"salom","userId":"u"}"#)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "AI xizmati vaqtida javob bermadi.");
    assert!(h.store.history("u").await.unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let h = harness(None);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(h.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider_configured"], false);
}

#[tokio::test]
async fn history_file_keeps_original_layout() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("chatHistory.json");
    let store: Arc<JsonFileStore<Vec<Turn>>> = Arc::new(JsonFileStore::new(&path));
    let providers =
        ProviderRegistry::new().register(GeminiProvider::ID, Stub(Behaviour::Reply("2002 yilda 🥷")));
    let chat = ChatService::new(store, providers);
    let app = create_router(Arc::new(AppState::new(chat)));

    let (status, _) = send(
        app,
        post_json(r#"{"message":"Naruto qachon chiqqan?","userId":"user_1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        saved,
        json!({
            "user_1": [
                { "role": "user", "parts": [{ "text": "Naruto qachon chiqqan?" }] },
                { "role": "model", "parts": [{ "text": "2002 yilda 🥷" }] }
            ]
        })
    );
}
