//! HTTP API handlers

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use mc_core::memory::ListOutcome;
use mc_core::{ChatEvent, Orchestrator};

use crate::error::{ApiError, Result};
use crate::server::AppState;

/// Chat request, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /chat?message=...`
pub async fn chat_get(
    State(state): State<AppState>,
    Query(req): Query<ChatRequest>,
) -> Result<Response> {
    chat(state, req.message)
}

/// `POST /chat` with `{"message": "..."}`
///
/// A body that is not valid JSON is treated like a missing message.
pub async fn chat_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response> {
    let req: ChatRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable chat body, treating as missing message: {}", e);
        ChatRequest::default()
    });
    chat(state, req.message)
}

fn chat(state: AppState, message: Option<String>) -> Result<Response> {
    let orchestrator = ready_orchestrator(&state)?;
    let message = message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Message is required".to_string()))?;

    info!("Chat request ({} chars)", message.chars().count());
    debug!("Chat message: {}", message);

    let frames = orchestrator
        .stream(message)
        .map(|event| Ok::<_, Infallible>(sse_frame(&event)));

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
        .into_response())
}

fn ready_orchestrator(state: &AppState) -> Result<Arc<Orchestrator>> {
    state
        .orchestrator
        .clone()
        .ok_or_else(|| ApiError::Config("API key not configured".to_string()))
}

/// Wire form of one chat event.
///
/// Named events always carry an empty `data: ` line; `EventSource` drops
/// events without one.
pub fn sse_frame(event: &ChatEvent) -> String {
    match event {
        ChatEvent::Start => "event: start\ndata: \n\n".to_string(),
        ChatEvent::Text(text) => format!("data: {}\n\n", json!({ "text": text })),
        ChatEvent::Error(message) => format!("data: {}\n\n", json!({ "error": message })),
        ChatEvent::End => "event: end\ndata: \n\n".to_string(),
    }
}

/// `GET /api/memories`: everything in the store
pub async fn list_memories(State(state): State<AppState>) -> Result<Json<ListOutcome>> {
    let outcome = state.store.list()?;
    Ok(Json(outcome))
}
