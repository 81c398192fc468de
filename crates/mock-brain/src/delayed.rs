//! Delayed model - wraps another model with artificial latency.

use std::time::Duration;

use async_trait::async_trait;
use brain_core::{BrainError, ChatMessage, LanguageModel, ResponseShape};
use serde_json::Value;
use tokio::time::sleep;

/// A model that sleeps before every call to the wrapped model.
///
/// Useful for testing timeout handling around model calls.
pub struct DelayedModel<M: LanguageModel> {
    inner: M,
    delay: Duration,
}

impl<M: LanguageModel> DelayedModel<M> {
    /// Wrap `inner` with the given delay.
    pub fn new(inner: M, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Wrap `inner` with a delay in milliseconds.
    pub fn with_millis(inner: M, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<M: LanguageModel> LanguageModel for DelayedModel<M> {
    async fn classify(
        &self,
        instructions: &str,
        text: &str,
        labels: &[&str],
    ) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.classify(instructions, text, labels).await
    }

    async fn generate_structured(
        &self,
        instructions: &str,
        text: &str,
        shape: &ResponseShape,
    ) -> Result<Value, BrainError> {
        sleep(self.delay).await;
        self.inner.generate_structured(instructions, text, shape).await
    }

    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.generate_text(messages).await
    }

    fn name(&self) -> &str {
        "DelayedModel"
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoModel;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_model() {
        let model = DelayedModel::with_millis(EchoModel::new(), 100);

        let start = Instant::now();
        let reply = model.generate_text(&[ChatMessage::user("test")]).await.unwrap();

        assert_eq!(reply, "test");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_ready_follows_inner() {
        let model = DelayedModel::with_millis(EchoModel::new(), 0);
        assert!(model.is_ready().await);
    }

    #[tokio::test]
    async fn test_model_name() {
        let model = DelayedModel::with_millis(EchoModel::new(), 0);
        assert_eq!(model.name(), "DelayedModel");
    }
}
