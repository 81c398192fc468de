//! Configuration for the orchestrator.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::prompts::DEFAULT_CHAT_PROMPT;

/// Default number of stored messages replayed into chat.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Default bound on each model call.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default path for the chat prompt file.
pub const DEFAULT_CHAT_PROMPT_FILE: &str = "CHAT_PROMPT.md";

/// Orchestrator settings, built once at startup.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Stored messages replayed into chat, earliest first.
    pub history_limit: i64,
    /// Bound on each model call.
    pub model_timeout: Duration,
    /// System prompt of the chat branch.
    pub chat_prompt: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            chat_prompt: DEFAULT_CHAT_PROMPT.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `LIFTLOG_HISTORY_LIMIT`: Messages replayed into chat (default: 10)
    /// - `LIFTLOG_MODEL_TIMEOUT_SECS`: Timeout per model call (default: 60)
    /// - `LIFTLOG_CHAT_PROMPT` / `LIFTLOG_CHAT_PROMPT_FILE`: Chat prompt override
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            history_limit: parse_env("LIFTLOG_HISTORY_LIMIT")
                .filter(|limit: &i64| *limit >= 0)
                .unwrap_or(defaults.history_limit),
            model_timeout: parse_env("LIFTLOG_MODEL_TIMEOUT_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.model_timeout),
            chat_prompt: load_chat_prompt(),
        }
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }
}

/// Builder for [`OrchestratorConfig`].
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    /// Set the chat history limit.
    pub fn history_limit(mut self, limit: i64) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Set the per-call model timeout.
    pub fn model_timeout(mut self, timeout: Duration) -> Self {
        self.config.model_timeout = timeout;
        self
    }

    /// Set the chat system prompt.
    pub fn chat_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.chat_prompt = prompt.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

/// Load the chat system prompt.
///
/// Priority:
/// 1. `LIFTLOG_CHAT_PROMPT` env var (if set)
/// 2. Contents of prompt file (`LIFTLOG_CHAT_PROMPT_FILE` or default `CHAT_PROMPT.md`)
/// 3. Embedded default prompt
pub fn load_chat_prompt() -> String {
    if let Ok(prompt) = env::var("LIFTLOG_CHAT_PROMPT") {
        info!("Using chat prompt from LIFTLOG_CHAT_PROMPT env var");
        return prompt;
    }

    let prompt_file = env::var("LIFTLOG_CHAT_PROMPT_FILE")
        .unwrap_or_else(|_| DEFAULT_CHAT_PROMPT_FILE.to_string());

    if let Some(prompt) = load_prompt_file(&prompt_file) {
        info!("Loaded chat prompt from {}", prompt_file);
        return prompt;
    }

    info!("Using embedded default chat prompt");
    DEFAULT_CHAT_PROMPT.to_string()
}

/// Load a prompt from a file path.
///
/// Returns `Some(content)` if the file exists and is non-empty, `None` otherwise.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.model_timeout, Duration::from_secs(60));
        assert_eq!(config.chat_prompt, DEFAULT_CHAT_PROMPT);
    }

    #[test]
    fn test_builder() {
        let config = OrchestratorConfig::builder()
            .history_limit(3)
            .model_timeout(Duration::from_millis(50))
            .chat_prompt("be brief")
            .build();

        assert_eq!(config.history_limit, 3);
        assert_eq!(config.model_timeout, Duration::from_millis(50));
        assert_eq!(config.chat_prompt, "be brief");
    }

    #[test]
    fn test_missing_prompt_file() {
        assert_eq!(load_prompt_file("/nonexistent/CHAT_PROMPT.md"), None);
    }
}
