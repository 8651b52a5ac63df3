//! LLM API HTTP client

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::*;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A provider that answers Messages API requests.
///
/// The orchestrator only talks to this trait so tests can substitute a
/// scripted client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a non-streaming request
    async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse>;

    /// Model identifier placed in every request
    fn model(&self) -> &str;

    /// Output token cap placed in every request
    fn max_tokens(&self) -> u64;
}

/// Anthropic Messages API client
#[derive(Clone)]
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u64,
    base_url: String,
}

impl ClaudeClient {
    /// Create a new client. Fails when no API key is configured.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if !config.has_api_key() {
            return Err(Error::Config("API key not configured".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(Error::Http)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LlmClient for ClaudeClient {
    async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!(
            "Sending request to Claude API: {} ({} messages, {} tools)",
            url,
            request.messages.len(),
            request.tools.as_ref().map(|t| t.len()).unwrap_or(0)
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Claude API error: {} - {}", status, body);
            return Err(Error::ClaudeApi(format!("{}: {}", status, body)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            Error::ClaudeApi(format!("Failed to parse response: {} - {}", e, body))
        })?;

        info!(
            "Claude API response: stop_reason={}, tokens={}",
            parsed.stop_reason,
            parsed.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u64 {
        self.max_tokens
    }
}
