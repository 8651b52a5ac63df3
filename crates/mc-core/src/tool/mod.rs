//! Tool system for Claude API tool_use
//!
//! Tools are registered in a [`ToolManager`], which turns a tool name plus
//! JSON arguments into a JSON result.

pub mod clock;
pub mod definition;
pub mod manager;
pub mod memory;
pub mod traits;

pub use clock::CurrentTimeTool;
pub use definition::{SchemaBuilder, ToolDefinition};
pub use manager::ToolManager;
pub use memory::register_memory_tools;
pub use traits::{Tool, ToolResult, required_str};
