//! Configuration for GroqBrain.

use std::env;
use std::time::Duration;

use brain_core::BrainError;

/// Default Groq OpenAI-compatible endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai";

/// Default model for classification, extraction and SQL generation.
pub const DEFAULT_MODEL: &str = "moonshotai/kimi-k2-instruct-0905";

/// Default model for free-text chat replies.
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuration for GroqBrain.
#[derive(Debug, Clone)]
pub struct GroqBrainConfig {
    /// API base URL (without `/v1`).
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model used for structured calls.
    pub model: String,

    /// Model used for free-text replies.
    pub chat_model: String,

    /// Maximum tokens for a response.
    pub max_tokens: Option<u32>,

    /// Temperature for free-text generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP timeout for a single request.
    pub request_timeout: Duration,
}

impl Default for GroqBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.7),
            request_timeout: Duration::from_secs(45),
        }
    }
}

impl GroqBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GROQ_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GROQ_API_URL` - API URL (default: https://api.groq.com/openai)
    /// - `GROQ_MODEL` - Structured-call model (default: moonshotai/kimi-k2-instruct-0905)
    /// - `GROQ_CHAT_MODEL` - Chat model (default: llama-3.3-70b-versatile)
    /// - `GROQ_MAX_TOKENS` - Max tokens (default: 1024)
    /// - `GROQ_TEMPERATURE` - Temperature (default: 0.7)
    /// - `GROQ_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 45)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("GROQ_API_KEY")
            .map_err(|_| BrainError::Configuration("GROQ_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("GROQ_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("GROQ_MODEL").unwrap_or(defaults.model);
        let chat_model = env::var("GROQ_CHAT_MODEL").unwrap_or(defaults.chat_model);

        let max_tokens = env::var("GROQ_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("GROQ_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let request_timeout = env::var("GROQ_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Ok(Self {
            api_url,
            api_key,
            model,
            chat_model,
            max_tokens,
            temperature,
            request_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GroqBrainConfigBuilder {
        GroqBrainConfigBuilder::default()
    }

    /// Full chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for GroqBrainConfig.
#[derive(Debug, Default)]
pub struct GroqBrainConfigBuilder {
    config: GroqBrainConfig,
}

impl GroqBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the structured-call model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the HTTP request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GroqBrainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = GroqBrainConfig::builder()
            .api_key("test-key")
            .chat_model("small-chat")
            .temperature(0.2)
            .build();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.chat_model, "small-chat");
        assert_eq!(config.temperature, Some(0.2));
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let config = GroqBrainConfig::builder()
            .api_url("http://localhost:8080/")
            .build();
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }
}
