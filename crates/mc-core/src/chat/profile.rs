//! Orchestrator profiles
//!
//! A profile is everything that differs between deployments of the same
//! turn loop: prompt, tool catalog, pacing and name capture.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ChatConfig, ProfileKind};
use crate::memory::MemoryStore;
use crate::tool::{CurrentTimeTool, ToolManager, register_memory_tools};

const MEMORY_SYSTEM_PROMPT: &str = "You are a friendly personal assistant with a long-term memory. \
You can store, retrieve, list, search and update facts about the user with your memory tools. \
When the user shares personal information (name, location, preferences, plans), save it with add_memory \
using a short lowercase key such as name, location or favorite_color. \
When a question depends on what you know about the user, look it up before answering. \
Never invent memories; if nothing is stored, say so. Keep answers concise.";

const CLOCK_SYSTEM_PROMPT: &str = "You are a helpful assistant. \
Use the get_current_time tool whenever the user asks about the current date or time.";

/// Settings for one flavor of the conversation loop
#[derive(Debug, Clone)]
pub struct ChatProfile {
    pub kind: ProfileKind,
    pub system_prompt: String,
    /// Characters per streamed chunk
    pub chunk_size: usize,
    /// Pause between streamed chunks
    pub chunk_delay: Duration,
    /// Tool-call rounds allowed per user turn
    pub max_tool_rounds: usize,
    /// Store "my name is X" before asking the model
    pub capture_names: bool,
}

impl ChatProfile {
    /// Memory assistant: five memory tools, paced output
    pub fn memory() -> Self {
        Self {
            kind: ProfileKind::Memory,
            system_prompt: MEMORY_SYSTEM_PROMPT.to_string(),
            chunk_size: 10,
            chunk_delay: Duration::from_millis(10),
            max_tool_rounds: 5,
            capture_names: true,
        }
    }

    /// Clock assistant: one time tool, unpaced output
    pub fn clock() -> Self {
        Self {
            kind: ProfileKind::Clock,
            system_prompt: CLOCK_SYSTEM_PROMPT.to_string(),
            chunk_size: 10,
            chunk_delay: Duration::ZERO,
            max_tool_rounds: 5,
            capture_names: false,
        }
    }

    /// Profile defaults overridden by `[chat]` settings
    pub fn from_config(config: &ChatConfig) -> Self {
        let mut profile = match config.profile {
            ProfileKind::Memory => Self::memory(),
            ProfileKind::Clock => Self::clock(),
        };
        profile.chunk_size = config.chunk_size.max(1);
        profile.max_tool_rounds = config.max_tool_rounds;
        if let Some(ms) = config.chunk_delay_ms {
            profile.chunk_delay = Duration::from_millis(ms);
        }
        profile
    }

    /// Tool catalog for this profile
    pub fn build_tools(&self, store: Option<Arc<MemoryStore>>) -> ToolManager {
        let mut manager = ToolManager::new();
        match self.kind {
            ProfileKind::Memory => register_memory_tools(&mut manager, store),
            ProfileKind::Clock => manager.register(Arc::new(CurrentTimeTool)),
        }
        manager
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}

impl Default for ChatProfile {
    fn default() -> Self {
        Self::memory()
    }
}
