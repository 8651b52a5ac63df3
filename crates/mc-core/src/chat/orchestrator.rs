//! Conversation orchestrator
//!
//! One user turn: ask the model, run any tools it requests (up to the
//! profile's round limit), then replay the final text as a paced sequence
//! of [`ChatEvent`]s.

use std::sync::Arc;

use futures::Stream;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::chat::{ChatProfile, chunk_text, extract_name};
use crate::llm::{LlmClient, Message, MessagesRequestBuilder, ToolDefinition};
use crate::tool::ToolManager;
use crate::{Error, Result};

/// What the orchestrator emits for one turn.
///
/// A successful turn is `Start, Text*, End`; a failed one is
/// `Error, End` (possibly after a `Start`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Start,
    Text(String),
    Error(String),
    End,
}

/// Runs user turns against an LLM client and a tool catalog
pub struct Orchestrator {
    client: Arc<dyn LlmClient>,
    tools: Arc<ToolManager>,
    catalog: Vec<ToolDefinition>,
    profile: ChatProfile,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn LlmClient>, tools: Arc<ToolManager>, profile: ChatProfile) -> Self {
        let catalog = tools.definitions();
        Self {
            client,
            tools,
            catalog,
            profile,
        }
    }

    /// Produce the final answer text for one user message.
    ///
    /// Tool failures are handed back to the model as error results; only
    /// provider failures and an exhausted round limit surface as `Err`.
    pub async fn respond(&self, message: &str) -> Result<String> {
        if self.profile.capture_names {
            self.capture_name(message).await;
        }

        let mut transcript = vec![Message::user(message)];
        let mut rounds = 0;

        loop {
            let request = MessagesRequestBuilder::new(self.client.model())
                .max_tokens(self.client.max_tokens())
                .system(self.profile.system_prompt.as_str())
                .messages(transcript.clone())
                .tools(self.catalog.clone())
                .build();

            debug!(round = rounds, "Awaiting model response");
            let response = self.client.messages(request).await?;

            if !response.wants_tool() {
                return Ok(response.text());
            }

            let Some(call) = response.first_tool_call() else {
                warn!("tool_use stop_reason but no tool_use block found");
                return Ok(response.text());
            };

            if rounds >= self.profile.max_tool_rounds {
                warn!(tool = %call.name, "Tool round limit reached");
                return Err(Error::ToolLimitExceeded(self.profile.max_tool_rounds));
            }
            rounds += 1;

            info!(tool = %call.name, round = rounds, "Model requested tool");
            let result = self.tools.execute(&call.name, call.input.clone()).await;
            debug!(tool = %call.name, is_error = result.is_error, "Tool executed");

            transcript.push(Message::tool_use(&call));
            transcript.push(Message::tool_result(&call.id, result.to_content(), result.is_error));
        }
    }

    /// Run one turn and emit it as events.
    ///
    /// Errors never end the stream abruptly: they become an `Error` event
    /// followed by `End`.
    pub fn stream(self: Arc<Self>, message: String) -> impl Stream<Item = ChatEvent> + Send + 'static {
        async_stream::stream! {
            match self.respond(&message).await {
                Ok(text) => {
                    yield ChatEvent::Start;
                    let delay = self.profile.chunk_delay;
                    for (i, chunk) in chunk_text(&text, self.profile.chunk_size).into_iter().enumerate() {
                        if i > 0 && !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        yield ChatEvent::Text(chunk);
                    }
                    yield ChatEvent::End;
                }
                Err(e) => {
                    error!("Chat turn failed: {}", e);
                    yield ChatEvent::Error(format!("Error: {}", e));
                    yield ChatEvent::End;
                }
            }
        }
    }

    async fn capture_name(&self, message: &str) {
        let Some(name) = extract_name(message) else {
            return;
        };

        let result = self
            .tools
            .execute(
                "add_memory",
                json!({"memory_type": "personal_info", "key": "name", "content": name}),
            )
            .await;

        if result.is_error {
            warn!("Could not store user name: {}", result.output);
        } else {
            info!("Stored user name from introduction");
        }
    }
}
