//! Core trait and types for language-model backends.
//!
//! This crate provides the shared interface between the liftlog orchestrator
//! and whatever model provider sits behind it. It defines:
//!
//! - [`LanguageModel`] - The three opaque capabilities the assistant relies on
//! - [`ChatMessage`] / [`Role`] - Role-tagged conversation messages
//! - [`InboundMessage`] / [`OutboundMessage`] - Transport-facing message types
//! - [`ResponseShape`] - A JSON schema constraining structured generation
//! - [`BrainError`] - Error types for model operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, ChatMessage, LanguageModel, ResponseShape};
//!
//! struct AlwaysChat;
//!
//! #[async_trait]
//! impl LanguageModel for AlwaysChat {
//!     async fn classify(
//!         &self,
//!         _instructions: &str,
//!         _text: &str,
//!         _labels: &[&str],
//!     ) -> Result<String, BrainError> {
//!         Ok("chat".to_string())
//!     }
//!
//!     async fn generate_structured(
//!         &self,
//!         _instructions: &str,
//!         _text: &str,
//!         _shape: &ResponseShape,
//!     ) -> Result<serde_json::Value, BrainError> {
//!         Ok(serde_json::json!({}))
//!     }
//!
//!     async fn generate_text(&self, _messages: &[ChatMessage]) -> Result<String, BrainError> {
//!         Ok("Hello!".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "AlwaysChat"
//!     }
//! }
//! ```

mod error;
mod message;
mod prompt;
mod structured;
mod trait_def;

pub use error::BrainError;
pub use message::{ChatMessage, InboundMessage, OutboundMessage, Role};
pub use prompt::hash_prompt;
pub use structured::{generate_typed, ResponseShape};
pub use trait_def::LanguageModel;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
