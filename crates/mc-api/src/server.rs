//! HTTP API Server
//!
//! Wires the orchestrator into an axum router and serves it.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use http::{HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use mc_core::{ChatProfile, ClaudeClient, Config, MemoryStore, Orchestrator};

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; chat requests then fail with 500
    pub orchestrator: Option<Arc<Orchestrator>>,
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(orchestrator: Option<Arc<Orchestrator>>, store: Arc<MemoryStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    /// Build the profile, tool catalog and Claude client described by `config`
    pub fn from_config(config: &Config, store: Arc<MemoryStore>) -> mc_core::Result<Self> {
        let profile = ChatProfile::from_config(&config.chat);
        let tools = Arc::new(profile.build_tools(Some(Arc::clone(&store))));

        let orchestrator = if config.llm.has_api_key() {
            let client = ClaudeClient::new(&config.llm)?;
            info!(model = %config.llm.model, profile = ?profile.kind, "Chat orchestrator ready");
            Some(Arc::new(Orchestrator::new(Arc::new(client), tools, profile)))
        } else {
            warn!("API key not configured; /chat will answer 500");
            None
        };

        Ok(Self::new(orchestrator, store))
    }
}

/// Router with CORS and request tracing
pub fn build_router(state: AppState, allowed_origins: Option<&[String]>) -> Router {
    Router::new()
        .merge(routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins)),
        )
        .with_state(state)
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Start the HTTP API server; returns after Ctrl+C
pub async fn start_server(config: &Config, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state, config.api.allowed_origins.as_deref());

    let addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
