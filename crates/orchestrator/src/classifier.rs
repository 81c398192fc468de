//! Intent classification.

use std::sync::Arc;

use brain_core::{BrainError, LanguageModel};
use tracing::debug;

use crate::prompts::CLASSIFIER_PROMPT;
use crate::state::Category;

/// Picks the category of a message. The model is the only judge.
pub struct Classifier {
    model: Arc<dyn LanguageModel>,
}

impl Classifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Classify one message. Failures are not defaulted to any category.
    pub async fn classify(&self, user_input: &str) -> Result<Category, BrainError> {
        let label = self
            .model
            .classify(CLASSIFIER_PROMPT, user_input, &Category::LABELS)
            .await?;
        debug!(label = %label, "Classified message");
        Ok(Category::from_label(&label))
    }
}
