//! Scripted LLM client for deterministic testing.
//!
//! Returns queued responses in order without making any HTTP calls and
//! records every request it receives.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::client::LlmClient;
use super::types::*;
use crate::error::{Error, Result};

/// One queued reply
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(MessagesResponse),
    Error(String),
}

/// A mock client that replays pre-configured responses.
///
/// # Example
/// ```
/// use mc_core::llm::MockClient;
/// let client = MockClient::new()
///     .with_tool_call("list_memories", serde_json::json!({}))
///     .with_text("You told me your name is Ava.");
/// ```
#[derive(Clone, Default)]
pub struct MockClient {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<MessagesRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text answer (`stop_reason = "end_turn"`)
    pub fn with_text(self, text: &str) -> Self {
        self.push(MockReply::Response(response(
            vec![MessageContent::Text { text: text.to_string() }],
            "end_turn",
        )))
    }

    /// Queue a tool_use request
    pub fn with_tool_call(self, name: &str, input: serde_json::Value) -> Self {
        let id = format!("toolu_{}", uuid::Uuid::new_v4().simple());
        self.push(MockReply::Response(response(
            vec![MessageContent::ToolUse {
                id,
                name: name.to_string(),
                input,
            }],
            "tool_use",
        )))
    }

    /// Queue a provider failure
    pub fn with_error(self, message: &str) -> Self {
        self.push(MockReply::Error(message.to_string()))
    }

    /// Queue a fully custom response
    pub fn with_response(self, response: MessagesResponse) -> Self {
        self.push(MockReply::Response(response))
    }

    fn push(self, reply: MockReply) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<MessagesRequest> {
        lock(&self.requests).clone()
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

fn response(content: Vec<MessageContent>, stop_reason: &str) -> MessagesResponse {
    MessagesResponse {
        id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
        response_type: "message".to_string(),
        role: "assistant".to_string(),
        content,
        model: "mock".to_string(),
        stop_sequence: None,
        stop_reason: stop_reason.to_string(),
        usage: Some(Usage::default()),
    }
}

#[async_trait]
impl LlmClient for MockClient {
    async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        lock(&self.requests).push(request);

        match lock(&self.replies).pop_front() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(message)) => Err(Error::ClaudeApi(message)),
            None => Err(Error::ClaudeApi("mock: no more queued responses".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn max_tokens(&self) -> u64 {
        1000
    }
}
