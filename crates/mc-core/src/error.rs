//! Error types for mc-core

use thiserror::Error;

/// Main error type for mc-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Claude API error: {0}")]
    ClaudeApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A tool was called without a required argument (or with the wrong type)
    #[error("missing required argument '{0}'")]
    InvalidArgument(String),

    #[error("Memory service not available")]
    MemoryUnavailable,

    #[error("Tool call limit of {0} rounds exceeded")]
    ToolLimitExceeded(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for mc-core
pub type Result<T> = std::result::Result<T, Error>;
