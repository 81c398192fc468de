//! GroqBrain implementation using the Groq chat completions API.

use brain_core::{
    async_trait, BrainError, ChatMessage as CoreMessage, LanguageModel, ResponseShape,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, trace};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use crate::config::GroqBrainConfig;

/// A [`LanguageModel`] backed by Groq's OpenAI-compatible API.
///
/// GroqBrain is stateless: every call carries the full prompt, and
/// conversation continuity is the caller's responsibility.
pub struct GroqBrain {
    client: Client,
    config: GroqBrainConfig,
}

impl GroqBrain {
    /// Create a new GroqBrain with the given configuration.
    pub fn new(config: GroqBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "GroqBrain initialized with model: {}, chat model: {}",
            config.model,
            config.chat_model
        );

        Ok(Self { client, config })
    }

    /// Create a GroqBrain from environment variables.
    ///
    /// See [`GroqBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GroqBrainConfig::from_env()?)
    }

    /// Build a request body.
    fn build_request(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        shape: Option<&ResponseShape>,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            // Structured answers must be reproducible.
            temperature: if shape.is_some() {
                Some(0.0)
            } else {
                self.config.temperature
            },
            response_format: shape.map(ResponseFormat::from),
        }
    }

    /// Send a request and return the text of the first choice.
    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<String, BrainError> {
        let url = self.config.completions_url();

        debug!(model = %request.model, messages = request.messages.len(), "Sending request to Groq");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BrainError::InvalidResponse("no choices in response".to_string()))?;

        trace!(finish_reason = ?choice.finish_reason, "Groq choice received");

        choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| BrainError::InvalidResponse("empty completion content".to_string()))
    }
}

/// Parse the JSON body of a structured completion.
fn parse_json_content(content: &str) -> Result<Value, BrainError> {
    serde_json::from_str(content.trim())
        .map_err(|e| BrainError::InvalidResponse(format!("completion is not JSON: {}", e)))
}

/// Pull the chosen label out of a classification answer.
fn label_from_answer(answer: &Value, labels: &[&str]) -> Result<String, BrainError> {
    let label = answer
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(|| BrainError::InvalidResponse(format!("missing category in {}", answer)))?;

    if !labels.contains(&label) {
        return Err(BrainError::InvalidResponse(format!(
            "category '{}' is not one of {:?}",
            label, labels
        )));
    }

    Ok(label.to_string())
}

#[async_trait]
impl LanguageModel for GroqBrain {
    async fn classify(
        &self,
        instructions: &str,
        text: &str,
        labels: &[&str],
    ) -> Result<String, BrainError> {
        let shape = ResponseShape::label_choice(labels);
        let answer = self.generate_structured(instructions, text, &shape).await?;
        label_from_answer(&answer, labels)
    }

    async fn generate_structured(
        &self,
        instructions: &str,
        text: &str,
        shape: &ResponseShape,
    ) -> Result<Value, BrainError> {
        let messages = vec![ChatMessage::system(instructions), ChatMessage::user(text)];
        let request = self.build_request(&self.config.model, messages, Some(shape));
        let content = self.chat_completion(request).await?;
        trace!(shape = %shape.name, raw = %content, "Structured completion");
        parse_json_content(&content)
    }

    async fn generate_text(&self, messages: &[CoreMessage]) -> Result<String, BrainError> {
        let messages = messages.iter().map(ChatMessage::from).collect();
        let request = self.build_request(&self.config.chat_model, messages, None);
        self.chat_completion(request).await
    }

    fn name(&self) -> &str {
        "GroqBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn brain() -> GroqBrain {
        let config = GroqBrainConfig::builder().api_key("test-key").build();
        GroqBrain::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = GroqBrain::new(GroqBrainConfig::default());
        assert!(matches!(result, Err(BrainError::Configuration(_))));
    }

    #[test]
    fn test_structured_request_carries_schema() {
        let brain = brain();
        let shape = ResponseShape::label_choice(&["insert", "query", "chat"]);
        let request = brain.build_request("m", vec![ChatMessage::user("hi")], Some(&shape));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "Classifier");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["temperature"], json!(0.0));
    }

    #[test]
    fn test_text_request_has_no_response_format() {
        let brain = brain();
        let request = brain.build_request("chat", vec![ChatMessage::user("hi")], None);

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("response_format").is_none());
        assert_eq!(body["model"], "chat");
    }

    #[test]
    fn test_parse_json_content() {
        let value = parse_json_content(" {\"category\": \"query\"}\n").unwrap();
        assert_eq!(value["category"], "query");
        assert!(matches!(
            parse_json_content("category: query"),
            Err(BrainError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_label_from_answer_enforces_allowed_labels() {
        let labels = ["insert", "query", "chat"];
        assert_eq!(
            label_from_answer(&json!({"category": "insert"}), &labels).unwrap(),
            "insert"
        );
        assert!(label_from_answer(&json!({"category": "delete"}), &labels).is_err());
        assert!(label_from_answer(&json!({"label": "chat"}), &labels).is_err());
    }

    #[test]
    fn test_brain_name() {
        assert_eq!(brain().name(), "GroqBrain");
    }
}
