//! Error types for model operations.

use thiserror::Error;

/// Errors that can occur while calling a language model.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The model is temporarily unavailable.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The request could not be processed by the provider.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The provider answered, but the answer violates the requested shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure talking to the provider.
    #[error("network error: {0}")]
    Network(String),

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}
