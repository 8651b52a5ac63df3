//! Tool definition helpers

use serde_json::{Value as JsonValue, json};

/// Tool definition for Claude API
///
/// Re-exported from llm module for convenience.
pub use crate::llm::ToolDefinition;

/// Helper functions for creating tool schemas
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Object schema where every property is a required string.
    ///
    /// # Arguments
    /// * `properties` - A list of tuples (name, description)
    ///
    /// # Example
    /// ```
    /// use mc_core::tool::SchemaBuilder;
    /// let schema = SchemaBuilder::required_strings(&[("key", "Memory key")]);
    /// assert_eq!(schema["required"][0], "key");
    /// ```
    pub fn required_strings(properties: &[(&str, &str)]) -> JsonValue {
        let props: serde_json::Map<String, JsonValue> = properties
            .iter()
            .map(|(name, desc)| {
                (
                    name.to_string(),
                    json!({"type": "string", "description": desc}),
                )
            })
            .collect();

        let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();

        json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }

    /// Schema for a tool that takes no input
    pub fn empty() -> JsonValue {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }
}
