//! Error types for orchestrator operations.

use std::fmt;

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// A named step of the pipeline, used in logs and timeout errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Classify,
    Extract,
    GenerateQuery,
    ExecuteQuery,
    Summarize,
    Chat,
    LoadHistory,
    Persist,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Classify => "classify",
            Operation::Extract => "extract",
            Operation::GenerateQuery => "generate_query",
            Operation::ExecuteQuery => "execute_query",
            Operation::Summarize => "summarize",
            Operation::Chat => "chat",
            Operation::LoadHistory => "load_history",
            Operation::Persist => "persist",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Message was intentionally skipped.
    #[error("message skipped: {0}")]
    Skipped(String),

    /// Model call failed or answered out of shape.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Storage failed or refused a statement.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// A step did not finish in time.
    #[error("{operation} timed out")]
    Timeout { operation: Operation },

    /// A turn reached persistence without exactly one trailing reply.
    #[error("incomplete turn: {0}")]
    IncompleteTurn(String),

    /// The transport delivered a sender id that is not a positive number.
    #[error("invalid sender: {0}")]
    InvalidSender(String),

    /// The transport delivered an event without text.
    #[error("empty message from {0}")]
    EmptyMessage(String),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}
