//! LLM API client and types

mod client;
pub mod mock;
mod types;

pub use client::{ClaudeClient, LlmClient};
pub use mock::MockClient;
pub use types::*;
