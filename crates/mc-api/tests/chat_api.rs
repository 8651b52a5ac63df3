//! HTTP round trips through the full router

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use mc_api::{AppState, build_router};
use mc_core::llm::MockClient;
use mc_core::{ChatProfile, Config, MemoryStore, Orchestrator};

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::in_memory().unwrap())
}

fn app_with(client: MockClient, store: Arc<MemoryStore>) -> Router {
    let profile = ChatProfile::memory().with_chunk_delay(Duration::ZERO);
    let tools = Arc::new(profile.build_tools(Some(Arc::clone(&store))));
    let orchestrator = Orchestrator::new(Arc::new(client), tools, profile);
    build_router(AppState::new(Some(Arc::new(orchestrator)), store), None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `data:` payloads of unnamed events, parsed as JSON
fn data_payloads(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter(|event| !event.contains("event:"))
        .filter_map(|event| event.lines().find_map(|line| line.strip_prefix("data:")))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}

fn streamed_text(body: &str) -> String {
    data_payloads(body)
        .iter()
        .filter_map(|payload| payload["text"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = send(app_with(MockClient::new(), store()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn get_chat_streams_start_chunks_end() {
    let client = MockClient::new().with_text("Hello there, friend!");
    let (status, body) = send(app_with(client, store()), get("/chat?message=Hi")).await;

    assert_eq!(status, StatusCode::OK);
    let start = body.find("event: start").unwrap();
    let end = body.find("event: end").unwrap();
    assert!(start < end);

    let payloads = data_payloads(&body);
    assert_eq!(payloads, vec![json!({"text": "Hello ther"}), json!({"text": "e, friend!"})]);
}

#[tokio::test]
async fn chat_stream_framing_is_exact() {
    let client = MockClient::new().with_text("Hi Ava, welcome back!");
    let response = app_with(client, store())
        .oneshot(get("/chat?message=hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/event-stream");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "event: start\ndata: \n\n\
         data: {\"text\":\"Hi Ava, we\"}\n\n\
         data: {\"text\":\"lcome back\"}\n\n\
         data: {\"text\":\"!\"}\n\n\
         event: end\ndata: \n\n"
    );
}

#[tokio::test]
async fn chat_error_framing_is_exact() {
    let client = MockClient::new().with_error("overloaded");
    let (status, body) = send(app_with(client, store()), get("/chat?message=hello")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "data: {\"error\":\"Error: Claude API error: overloaded\"}\n\n\
         event: end\ndata: \n\n"
    );
}

#[tokio::test]
async fn post_chat_uses_memory_tools() {
    let store = store();
    store.add("personal_info", "name", "Ava").unwrap();
    let client = MockClient::new()
        .with_tool_call("list_memories", json!({}))
        .with_text("Your name is Ava.");

    let (status, body) = send(
        app_with(client.clone(), store),
        post_json("/chat", json!({"message": "What do you know about me?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(streamed_text(&body), "Your name is Ava.");
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn introduction_is_remembered() {
    let store = store();
    let client = MockClient::new().with_text("Nice to meet you!");
    let app = app_with(client, Arc::clone(&store));

    let (status, _) = send(app.clone(), post_json("/chat", json!({"message": "My name is Ava"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app, get("/api/memories")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listed["status"], "success");
    assert_eq!(listed["memories"][0]["key"], "name");
    assert_eq!(listed["memories"][0]["content"], "Ava");
}

#[tokio::test]
async fn missing_message_is_400() {
    let app = app_with(MockClient::new(), store());

    for request in [
        get("/chat"),
        get("/chat?message="),
        post_json("/chat", json!({})),
        post_json("/chat", json!({"message": "   "})),
        Request::builder().method("POST").uri("/chat").body(Body::from("not json")).unwrap(),
    ] {
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"error": "Message is required"}));
    }
}

#[tokio::test]
async fn missing_api_key_is_500_before_message_check() {
    let app = build_router(AppState::new(None, store()), None);

    for request in [get("/chat?message=Hi"), get("/chat")] {
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"error": "API key not configured"}));
    }
}

#[tokio::test]
async fn state_from_config_without_key_has_no_orchestrator() {
    let mut config = Config::default();
    config.llm.api_key = String::new();
    let state = AppState::from_config(&config, store()).unwrap();
    assert!(state.orchestrator.is_none());

    config.llm.api_key = "test-key".to_string();
    let state = AppState::from_config(&config, store()).unwrap();
    assert!(state.orchestrator.is_some());
}

#[tokio::test]
async fn provider_failure_is_reported_in_band() {
    let client = MockClient::new().with_error("overloaded");
    let (status, body) = send(app_with(client, store()), get("/chat?message=Hi")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("event: start"));
    assert!(body.contains("event: end"));

    let payloads = data_payloads(&body);
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0]["error"].as_str().unwrap().contains("overloaded"));
}

#[tokio::test]
async fn restricted_cors_echoes_allowed_origin() {
    let origins = vec!["http://localhost:3000".to_string()];
    let app = build_router(AppState::new(None, store()), Some(&origins));

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}
