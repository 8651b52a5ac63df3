//! mc-api: HTTP transport for memchat
//!
//! Serves the chat turn as a Server-Sent Events stream, plus a couple of
//! small JSON endpoints. Built with axum.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{AppState, build_router, start_server};
