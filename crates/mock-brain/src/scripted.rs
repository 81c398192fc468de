//! Scripted model - replays queued answers and records every call.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use brain_core::{BrainError, ChatMessage, LanguageModel, ResponseShape};
use serde_json::Value;

/// A call observed by [`ScriptedModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Classify {
        instructions: String,
        text: String,
        labels: Vec<String>,
    },
    Structured {
        instructions: String,
        text: String,
        shape: String,
    },
    Text {
        messages: Vec<ChatMessage>,
    },
}

/// A model whose answers are queued up front.
///
/// Each capability has its own queue; an empty queue answers with
/// [`BrainError::Unavailable`], so an unexpected call fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    labels: Mutex<VecDeque<Result<String, BrainError>>>,
    structured: Mutex<VecDeque<Result<Value, BrainError>>>,
    texts: Mutex<VecDeque<Result<String, BrainError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn queue<T>(mutex: &mut Mutex<VecDeque<T>>) -> &mut VecDeque<T> {
    mutex.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedModel {
    /// Create a model with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a classification label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        queue(&mut self.labels).push_back(Ok(label.into()));
        self
    }

    /// Queue a classification failure.
    pub fn with_label_error(mut self, error: BrainError) -> Self {
        queue(&mut self.labels).push_back(Err(error));
        self
    }

    /// Queue a structured answer.
    pub fn with_structured(mut self, value: Value) -> Self {
        queue(&mut self.structured).push_back(Ok(value));
        self
    }

    /// Queue a structured-generation failure.
    pub fn with_structured_error(mut self, error: BrainError) -> Self {
        queue(&mut self.structured).push_back(Err(error));
        self
    }

    /// Queue a free-text answer.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        queue(&mut self.texts).push_back(Ok(text.into()));
        self
    }

    /// Queue a free-text failure.
    pub fn with_text_error(mut self, error: BrainError) -> Self {
        queue(&mut self.texts).push_back(Err(error));
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Messages passed to every `generate_text` call, in order.
    pub fn text_calls(&self) -> Vec<Vec<ChatMessage>> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Text { messages } => Some(messages.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, BrainError>>>, what: &str) -> Result<T, BrainError> {
        lock(queue)
            .pop_front()
            .unwrap_or_else(|| Err(BrainError::Unavailable(format!("no scripted {} left", what))))
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn classify(
        &self,
        instructions: &str,
        text: &str,
        labels: &[&str],
    ) -> Result<String, BrainError> {
        self.record(RecordedCall::Classify {
            instructions: instructions.to_string(),
            text: text.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        });
        Self::next(&self.labels, "label")
    }

    async fn generate_structured(
        &self,
        instructions: &str,
        text: &str,
        shape: &ResponseShape,
    ) -> Result<Value, BrainError> {
        self.record(RecordedCall::Structured {
            instructions: instructions.to_string(),
            text: text.to_string(),
            shape: shape.name.clone(),
        });
        Self::next(&self.structured, "structured answer")
    }

    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String, BrainError> {
        self.record(RecordedCall::Text {
            messages: messages.to_vec(),
        });
        Self::next(&self.texts, "text")
    }

    fn name(&self) -> &str {
        "ScriptedModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_answers_are_replayed_in_order() {
        let model = ScriptedModel::new()
            .with_text("first")
            .with_text("second");

        let messages = [ChatMessage::user("hi")];
        assert_eq!(model.generate_text(&messages).await.unwrap(), "first");
        assert_eq!(model.generate_text(&messages).await.unwrap(), "second");
        assert!(matches!(
            model.generate_text(&messages).await,
            Err(BrainError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let model = ScriptedModel::new()
            .with_label("query")
            .with_structured(json!({"exercises": []}));
        let shape = ResponseShape::label_choice(&["query"]);

        model.classify("sys", "max squat?", &["query"]).await.unwrap();
        model.generate_structured("sys", "did squats", &shape).await.unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], RecordedCall::Classify { text, .. } if text == "max squat?"));
        assert!(matches!(&calls[1], RecordedCall::Structured { shape, .. } if shape == "Classifier"));
        assert!(model.text_calls().is_empty());
    }

    #[tokio::test]
    async fn test_queued_errors_surface() {
        let model = ScriptedModel::new().with_label_error(BrainError::Timeout);
        let result = model.classify("sys", "hi", &["chat"]).await;
        assert!(matches!(result, Err(BrainError::Timeout)));
    }
}
