//! Tool trait definition
//!
//! Defines the core trait for operations the model can invoke via tool_use.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{Error, Result};

/// Tool execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Structured output sent back to the model
    pub output: JsonValue,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: JsonValue) -> Self {
        Self {
            output,
            is_error: false,
        }
    }

    /// Create an `{"error": ...}` tool result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: serde_json::json!({ "error": message.into() }),
            is_error: true,
        }
    }

    /// Serialized form placed in the tool_result block
    pub fn to_content(&self) -> String {
        self.output.to_string()
    }
}

/// Tool trait for Claude API tool_use
///
/// Implement this trait to expose an operation the model can request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (used in Claude API tool definitions)
    fn name(&self) -> &str;

    /// Get the tool description (shown to Claude when selecting tools)
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Execute the tool with the given input
    async fn execute(&self, input: JsonValue) -> Result<JsonValue>;
}

/// Fetch a required string argument from a tool input object
pub fn required_str<'a>(input: &'a JsonValue, name: &str) -> Result<&'a str> {
    input
        .get(name)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::InvalidArgument(name.to_string()))
}
