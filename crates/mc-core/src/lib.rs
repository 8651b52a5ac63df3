//! mc-core: memory chat core library
//!
//! Claude API client, tool system, SQLite-backed memory store and the
//! chat orchestrator that ties them together.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod tool;

pub use chat::{ChatEvent, ChatProfile, Orchestrator};
pub use config::{ApiConfig, ChatConfig, Config, LlmConfig, MemoryConfig, ProfileKind};
pub use error::{Error, Result};
pub use llm::{ClaudeClient, LlmClient, Message, MessageContent, ToolDefinition};
pub use memory::{Memory, MemoryStore};
pub use tool::{Tool, ToolManager, ToolResult};
