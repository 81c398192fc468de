//! Echo model - always picks one label and echoes the user back.

use async_trait::async_trait;
use brain_core::{BrainError, ChatMessage, LanguageModel, ResponseShape, Role};
use serde_json::{json, Value};

/// A simple model with no intelligence at all.
///
/// Classification always answers the configured label, structured
/// generation returns an empty exercise list, and chat echoes the last
/// user message. Useful for running the console binary without a provider.
#[derive(Debug, Clone)]
pub struct EchoModel {
    label: String,
}

impl Default for EchoModel {
    fn default() -> Self {
        Self {
            label: "chat".to_string(),
        }
    }
}

impl EchoModel {
    /// Create an EchoModel that classifies everything as chat.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an EchoModel that classifies everything as `label`.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for EchoModel {
    async fn classify(
        &self,
        _instructions: &str,
        _text: &str,
        _labels: &[&str],
    ) -> Result<String, BrainError> {
        Ok(self.label.clone())
    }

    async fn generate_structured(
        &self,
        _instructions: &str,
        _text: &str,
        _shape: &ResponseShape,
    ) -> Result<Value, BrainError> {
        Ok(json!({ "exercises": [] }))
    }

    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String, BrainError> {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .ok_or_else(|| BrainError::ProcessingFailed("no user message to echo".to_string()))
    }

    fn name(&self) -> &str {
        "EchoModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echoes_last_user_message() {
        let model = EchoModel::new();
        let messages = [
            ChatMessage::system("be nice"),
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];

        assert_eq!(model.generate_text(&messages).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_fixed_label() {
        let model = EchoModel::with_label("insert");
        let label = model.classify("", "anything", &["insert", "chat"]).await.unwrap();
        assert_eq!(label, "insert");
    }

    #[tokio::test]
    async fn test_no_user_message_is_an_error() {
        let model = EchoModel::new();
        let result = model.generate_text(&[ChatMessage::system("x")]).await;
        assert!(result.is_err());
    }
}
