//! Intent classification and task routing for the liftlog workout assistant.
//!
//! This crate provides the [`Orchestrator`] type, which turns one inbound
//! message into at most one reply, and the [`Dispatcher`] that connects it to
//! a messaging transport.
//!
//! # Features
//!
//! - Classifies each message as insert, query or chat
//! - Extracts exercises and sets into typed records
//! - Answers data questions with generated SQL confined to the sender's rows
//! - Replays stored history into open chat
//! - Stores each turn in one transaction before replying
//!
//! # Architecture
//!
//! ```text
//! Transport event (sender id, text)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DISPATCHER                             │
//! │  parse sender id, drop empty text, typing indicator         │
//! │         ↓                                                   │
//! │                    ORCHESTRATOR                             │
//! │  1. Classify → insert | query | chat                        │
//! │         ↓                                                   │
//! │  2. Run one branch:                                         │
//! │     • insert → extract sets, reply "workout saved"          │
//! │     • query  → generate SQL, run scoped, summarize table    │
//! │     • chat   → system prompt + history + message            │
//! │         ↓                                                   │
//! │  3. Persist messages and sets (one transaction)             │
//! │         ↓                                                   │
//! │  4. Return reply (or retry notice if step 3 failed)         │
//! │         ↓                                                   │
//! │  send reply                                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use database::Database;
//! use groq_brain::GroqBrain;
//! use orchestrator::{Dispatcher, InboundEvent, LoggingSender, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:liftlog.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let model = Arc::new(GroqBrain::from_env()?);
//!     let orchestrator = Orchestrator::new(model, db, OrchestratorConfig::from_env());
//!     let dispatcher = Dispatcher::new(Arc::new(orchestrator), Arc::new(LoggingSender));
//!
//!     dispatcher
//!         .dispatch(InboundEvent::new("5215512345678", "bench 3x5 at 80kg"))
//!         .await;
//!     Ok(())
//! }
//! ```

mod classifier;
mod config;
mod dispatcher;
mod error;
mod extractor;
mod history;
mod orchestrator;
mod persistence;
mod prompts;
mod query;
mod sender;
mod state;

pub use classifier::Classifier;
pub use config::{OrchestratorConfig, OrchestratorConfigBuilder};
pub use dispatcher::{parse_sender_id, DispatchOutcome, Dispatcher, InboundEvent};
pub use error::{Operation, OrchestratorError};
pub use extractor::{exercise_list_shape, ExerciseList, ExerciseRecord, ExerciseSet, Extractor};
pub use history::HistoryReader;
pub use orchestrator::{Orchestrator, PERSISTENCE_FAILED_REPLY, WORKOUT_SAVED_REPLY};
pub use persistence::PersistenceGateway;
pub use query::{clean_sql_response, QueryEngine};
pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender};
pub use state::{Category, ConversationState};

// Re-export for convenience
pub use brain_core::{InboundMessage, OutboundMessage};
