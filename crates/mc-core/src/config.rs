//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `memchat.toml` in the working directory
//! 3. Built-in defaults
//!
//! `${VAR_NAME}` inside the TOML file is replaced with the value of the
//! environment variable before parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Which orchestrator profile the server runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Memory tools, name capture, paced chunks
    #[default]
    Memory,
    /// Single current-time tool, no pacing
    Clock,
}

impl ProfileKind {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "clock" | "time" => ProfileKind::Clock,
            _ => ProfileKind::Memory,
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (empty means "not configured")
    #[serde(default)]
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum output tokens per provider call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,

    /// Base URL (optional, for proxies or test servers)
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Whether an API key has been supplied
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Port for HTTP server
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Allowed CORS origins. `None` means permissive CORS.
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
            allowed_origins: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Path to SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Orchestrator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub profile: ProfileKind,

    /// Characters per streamed chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Pause between chunks; `None` uses the profile default
    #[serde(default)]
    pub chunk_delay_ms: Option<u64>,

    /// Maximum tool-call rounds per user turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKind::default(),
            chunk_size: default_chunk_size(),
            chunk_delay_ms: None,
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

/// Main configuration for memchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

fn default_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}

fn default_max_tokens() -> u64 {
    1000
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "data/memories.db".to_string()
}

fn default_chunk_size() -> usize {
    10
}

fn default_max_tool_rounds() -> usize {
    5
}

/// Default config file name looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "memchat.toml";

impl Config {
    /// Replace `${VAR_NAME}` with the value of the environment variable.
    /// Unset variables expand to an empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml_str(&toml_content)?;
        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML text (after `${VAR}` expansion)
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);
        toml::from_str(&expanded).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load from `memchat.toml` when present, otherwise from the environment
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    /// Load configuration from environment variables only.
    ///
    /// A missing API key is not an error here; it is reported when a chat
    /// request arrives.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(&mut self) {
        if let Some(api_key) = non_empty_env("ANTHROPIC_API_KEY").or_else(|| non_empty_env("LLM_API_KEY")) {
            self.llm.api_key = api_key;
        }
        if let Some(model) = non_empty_env("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(max_tokens) = non_empty_env("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.llm.max_tokens = max_tokens;
        }
        if let Some(base_url) = non_empty_env("LLM_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }

        if let Some(host) = non_empty_env("API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = non_empty_env("API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }
        if let Some(origins) = non_empty_env("API_ALLOWED_ORIGINS") {
            self.api.allowed_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        if let Some(path) = non_empty_env("DB_PATH") {
            self.memory.db_path = path;
        }

        if let Some(profile) = non_empty_env("CHAT_PROFILE") {
            self.chat.profile = ProfileKind::parse(&profile);
        }
        if let Some(size) = non_empty_env("CHAT_CHUNK_SIZE").and_then(|v| v.parse().ok()) {
            self.chat.chunk_size = size;
        }
        if let Some(delay) = non_empty_env("CHAT_CHUNK_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.chat.chunk_delay_ms = Some(delay);
        }
        if let Some(rounds) = non_empty_env("CHAT_MAX_TOOL_ROUNDS").and_then(|v| v.parse().ok()) {
            self.chat.max_tool_rounds = rounds;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "claude-3-5-sonnet-latest");
        assert_eq!(config.max_tokens, 1000);
        assert!(!config.has_api_key());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.allowed_origins.is_none());
    }

    #[test]
    fn test_chat_config_default() {
        let config = ChatConfig::default();
        assert_eq!(config.profile, ProfileKind::Memory);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.max_tool_rounds, 5);
        assert!(config.chunk_delay_ms.is_none());
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(ProfileKind::parse("clock"), ProfileKind::Clock);
        assert_eq!(ProfileKind::parse(" Time "), ProfileKind::Clock);
        assert_eq!(ProfileKind::parse("memory"), ProfileKind::Memory);
        assert_eq!(ProfileKind::parse("anything"), ProfileKind::Memory);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("MEMCHAT_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${MEMCHAT_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        let result = Config::expand_env_vars("prefix_${MEMCHAT_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("MEMCHAT_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_passthrough() {
        assert_eq!(Config::expand_env_vars("no_vars_here"), "no_vars_here");
        assert_eq!(Config::expand_env_vars("${}_content"), "_content");
        assert_eq!(Config::expand_env_vars("cost: $5"), "cost: $5");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[llm]
model = "claude-test"
api_key = "test_key"
max_tokens = 512
base_url = "http://localhost:9999"

[api]
port = 8080
allowed_origins = ["http://localhost:3000"]

[memory]
db_path = "/tmp/memories.db"

[chat]
profile = "clock"
chunk_size = 4
chunk_delay_ms = 0
max_tool_rounds = 1
"#;

        let config = Config::from_toml_str(toml_content).unwrap();

        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.api_key, "test_key");
        assert_eq!(config.llm.max_tokens, 512);
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(
            config.api.allowed_origins,
            Some(vec!["http://localhost:3000".to_string()])
        );
        assert_eq!(config.memory.db_path, "/tmp/memories.db");
        assert_eq!(config.chat.profile, ProfileKind::Clock);
        assert_eq!(config.chat.chunk_size, 4);
        assert_eq!(config.chat.chunk_delay_ms, Some(0));
        assert_eq!(config.chat.max_tool_rounds, 1);
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str("[llm]\napi_key = \"k\"\n").unwrap();
        assert!(config.llm.has_api_key());
        assert_eq!(config.llm.model, "claude-3-5-sonnet-latest");
        assert_eq!(config.memory.db_path, "data/memories.db");
        assert_eq!(config.chat.chunk_size, 10);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[llm\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
