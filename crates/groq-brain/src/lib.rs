//! Groq-based language model backend.
//!
//! This crate implements [`LanguageModel`] on top of Groq's OpenAI-compatible
//! chat completions API.
//!
//! # Features
//!
//! - Strict JSON-schema `response_format` for classification and extraction
//! - Separate model for free-text chat replies
//! - Per-request HTTP timeout
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use groq_brain::{GroqBrain, LanguageModel};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model: Arc<dyn LanguageModel> = Arc::new(GroqBrain::from_env()?);
//!     println!("using {}", model.name());
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::GroqBrain;
pub use config::{GroqBrainConfig, GroqBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, ChatMessage, LanguageModel, ResponseShape, Role};
