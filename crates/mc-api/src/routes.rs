//! Route definitions

use axum::{Router, routing::get};

use crate::handlers::{chat_get, chat_post, health, list_memories};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/chat", get(chat_get).post(chat_post))
        .route("/api/memories", get(list_memories))
}
