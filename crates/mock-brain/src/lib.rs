//! Mock language models for exercising the liftlog pipeline.
//!
//! This crate provides stand-ins for the [`LanguageModel`] trait:
//! - `ScriptedModel` - Replays queued answers per capability and records calls
//! - `EchoModel` - Fixed label, echoes the last user message as chat reply
//! - `DelayedModel` - Wraps another model with artificial delay
//!
//! For production use, see the `groq-brain` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{LanguageModel, ScriptedModel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let model = ScriptedModel::new().with_label("chat");
//!
//!     let label = model.classify("classify", "hello", &["insert", "query", "chat"]).await?;
//!     assert_eq!(label, "chat");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, ChatMessage, LanguageModel, ResponseShape, Role};

pub use delayed::DelayedModel;
pub use echo::EchoModel;
pub use scripted::{RecordedCall, ScriptedModel};
