//! Tool manager for registering and executing tools

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::Error;
use crate::llm::ToolDefinition;
use crate::tool::{Tool, ToolResult};

/// Manager for registered tools
///
/// Handles tool registration, lookup and execution. Execution never fails:
/// every problem is folded into an `{"error": ...}` result so the model
/// can see it.
pub struct ToolManager {
    /// Registered tools indexed by name
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolManager {
    /// Create a new empty tool manager
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool catalog for the Claude API, ordered by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Execute a tool by name
    ///
    /// Unknown names, unavailable backends and execution failures come back
    /// as error results rather than `Err`.
    pub async fn execute(&self, name: &str, input: JsonValue) -> ToolResult {
        let Some(tool) = self.get(name) else {
            warn!("Model requested unknown tool: {}", name);
            return ToolResult::error(format!("Unknown tool: {}", name));
        };

        debug!("Executing tool: {} with input: {}", name, input);

        match tool.execute(input).await {
            Ok(output) if output.get("error").is_some() => ToolResult {
                output,
                is_error: true,
            },
            Ok(output) => ToolResult::success(output),
            Err(Error::MemoryUnavailable) => ToolResult::error(Error::MemoryUnavailable.to_string()),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolResult::error(format!("Error executing tool {}: {}", name, e))
            }
        }
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
