//! The LanguageModel trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::ChatMessage;
use crate::structured::ResponseShape;

/// The opaque generative capabilities the assistant depends on.
///
/// Implementations can be a hosted provider, a local model, or a scripted
/// stand-in for tests. This trait is object-safe and is normally shared as
/// `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Classify `text` into exactly one of `labels`.
    ///
    /// # Arguments
    ///
    /// * `instructions` - System prompt describing what each label means.
    /// * `text` - The text to classify.
    /// * `labels` - The allowed labels.
    ///
    /// # Returns
    ///
    /// The label chosen by the model, or an error if the call failed or the
    /// answer did not match the constrained shape.
    async fn classify(
        &self,
        instructions: &str,
        text: &str,
        labels: &[&str],
    ) -> Result<String, BrainError>;

    /// Generate a JSON value constrained to `shape`.
    async fn generate_structured(
        &self,
        instructions: &str,
        text: &str,
        shape: &ResponseShape,
    ) -> Result<serde_json::Value, BrainError>;

    /// Generate a free-text reply for a conversation.
    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String, BrainError>;

    /// Get a human-readable name for this model backend.
    fn name(&self) -> &str;

    /// Check if the backend is ready to take requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
