//! Memory type definitions for mc-core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored fact about the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Surrogate row id
    pub id: i64,
    /// Category label, e.g. "personal_info"
    pub memory_type: String,
    /// Unique lookup key
    pub key: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public view of a memory returned by listings and searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub memory_type: String,
    pub key: String,
    pub content: String,
}

impl From<Memory> for MemoryEntry {
    fn from(memory: Memory) -> Self {
        Self {
            memory_type: memory.memory_type,
            key: memory.key,
            content: memory.content,
        }
    }
}

/// Result of [`MemoryStore::add`](super::MemoryStore::add)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddOutcome {
    Created { key: String, content: String },
    Updated { key: String, content: String },
}

/// Result of [`MemoryStore::get`](super::MemoryStore::get)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GetOutcome {
    Found {
        memory_type: String,
        key: String,
        content: String,
    },
    NotFound { key: String },
}

/// Result of [`MemoryStore::list`](super::MemoryStore::list)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ListOutcome {
    Empty { memories: Vec<MemoryEntry> },
    Success { memories: Vec<MemoryEntry> },
}

impl ListOutcome {
    pub fn memories(&self) -> &[MemoryEntry] {
        match self {
            ListOutcome::Empty { memories } | ListOutcome::Success { memories } => memories,
        }
    }
}

/// Result of [`MemoryStore::search`](super::MemoryStore::search)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found {
        query: String,
        memories: Vec<MemoryEntry>,
    },
    NotFound {
        query: String,
        memories: Vec<MemoryEntry>,
    },
}

impl SearchOutcome {
    pub fn memories(&self) -> &[MemoryEntry] {
        match self {
            SearchOutcome::Found { memories, .. } | SearchOutcome::NotFound { memories, .. } => memories,
        }
    }
}

/// Result of [`MemoryStore::update`](super::MemoryStore::update)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    Updated { key: String, content: String },
    NotFound { key: String },
}
