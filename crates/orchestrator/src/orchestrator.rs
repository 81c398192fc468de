//! The conversation orchestrator.

use std::future::Future;
use std::sync::Arc;

use brain_core::{ChatMessage, InboundMessage, LanguageModel, OutboundMessage};
use database::Database;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::classifier::Classifier;
use crate::config::OrchestratorConfig;
use crate::error::{Operation, OrchestratorError};
use crate::extractor::Extractor;
use crate::history::HistoryReader;
use crate::persistence::PersistenceGateway;
use crate::prompts::log_prompt_fingerprints;
use crate::query::QueryEngine;
use crate::state::{Category, ConversationState};

/// Reply to a successfully stored workout.
pub const WORKOUT_SAVED_REPLY: &str = "workout saved";

/// Reply sent instead of the composed one when the turn could not be stored.
pub const PERSISTENCE_FAILED_REPLY: &str =
    "Sorry, I couldn't save that right now. Please try again in a moment.";

/// Routes one message through classification, one branch, and persistence.
///
/// Holds no per-user state: everything a turn needs is rebuilt from storage.
pub struct Orchestrator {
    model: Arc<dyn LanguageModel>,
    classifier: Classifier,
    extractor: Extractor,
    query: QueryEngine,
    history: HistoryReader,
    persistence: PersistenceGateway,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create an orchestrator over a shared model and database.
    pub fn new(model: Arc<dyn LanguageModel>, db: Database, config: OrchestratorConfig) -> Self {
        info!(
            model = model.name(),
            history_limit = config.history_limit,
            timeout_secs = config.model_timeout.as_secs_f64(),
            "Orchestrator initialized"
        );
        log_prompt_fingerprints(&config.chat_prompt);

        Self {
            classifier: Classifier::new(model.clone()),
            extractor: Extractor::new(model.clone()),
            query: QueryEngine::new(model.clone(), db.clone()),
            history: HistoryReader::new(db.clone(), config.history_limit),
            persistence: PersistenceGateway::new(db),
            model,
            config,
        }
    }

    /// Process an incoming message end-to-end.
    ///
    /// This method:
    /// 1. Classifies the message
    /// 2. Runs exactly one branch (insert, query or chat)
    /// 3. Stores the turn atomically
    /// 4. Returns the reply, or the retry notice if storing failed
    ///
    /// A branch failure returns an error and nothing is stored. An
    /// unrecognized category returns [`OrchestratorError::Skipped`].
    pub async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, OrchestratorError> {
        let user_id = message.user_id;
        info!(user_id, "Processing message");

        let category = self
            .bounded(Operation::Classify, user_id, self.classifier.classify(&message.text))
            .await?;
        let mut state = ConversationState::new(user_id, message.text.clone(), category);
        info!(user_id, category = %state.category(), "Message classified");

        match state.category().clone() {
            Category::Insert => self.insert(&mut state).await?,
            Category::Query => self.query(&mut state).await?,
            Category::Chat => self.chat(&mut state).await?,
            Category::Unrecognized(label) => {
                warn!(user_id, label = %label, "No branch for category, dropping message");
                return Err(OrchestratorError::Skipped(format!("unrecognized category '{}'", label)));
            }
        }

        let reply = match self.persistence.persist(&state).await {
            Ok(written) => {
                debug!(
                    user_id,
                    messages = written.messages,
                    workout_sets = written.workout_sets,
                    "Turn stored"
                );
                state
                    .last_assistant()
                    .map(str::to_string)
                    .unwrap_or_else(|| PERSISTENCE_FAILED_REPLY.to_string())
            }
            Err(e) => {
                error!(user_id, operation = %Operation::Persist, error = %e, "Turn not stored, sending retry notice");
                PERSISTENCE_FAILED_REPLY.to_string()
            }
        };

        Ok(OutboundMessage::reply_to(&message, reply))
    }

    /// Insert branch: extract, keep the sets, confirm.
    async fn insert(&self, state: &mut ConversationState) -> Result<(), OrchestratorError> {
        let user_id = state.user_id();
        let exercises = self
            .bounded(Operation::Extract, user_id, self.extractor.extract(state.user_input()))
            .await?;

        info!(
            user_id,
            exercises = exercises.exercises.len(),
            sets = exercises.set_count(),
            "Workout extracted"
        );
        state.set_exercise_list(exercises);
        state.push_assistant(WORKOUT_SAVED_REPLY);
        Ok(())
    }

    /// Query branch: generate, execute, summarize.
    async fn query(&self, state: &mut ConversationState) -> Result<(), OrchestratorError> {
        let user_id = state.user_id();
        let question = state.user_input().to_string();

        let sql = self
            .bounded(Operation::GenerateQuery, user_id, self.query.generate(user_id, &question))
            .await?;

        let table = self
            .query
            .execute(user_id, &sql)
            .await
            .inspect_err(|e| error!(user_id, operation = %Operation::ExecuteQuery, error = %e, "Step failed"))?;

        let answer = self
            .bounded(Operation::Summarize, user_id, self.query.summarize(&question, &table))
            .await?;

        state.push_assistant(answer);
        Ok(())
    }

    /// Chat branch: system prompt, replayed history, lower-cased message.
    async fn chat(&self, state: &mut ConversationState) -> Result<(), OrchestratorError> {
        let user_id = state.user_id();
        let history = self.history.load(user_id).await;
        debug!(user_id, history = history.len(), "Loaded chat history");

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.config.chat_prompt.clone()));
        messages.extend(history);
        messages.push(ChatMessage::user(state.user_input().to_lowercase()));

        let reply = self
            .bounded(Operation::Chat, user_id, self.model.generate_text(&messages))
            .await?;

        state.push_assistant(reply);
        Ok(())
    }

    /// Run a model call under the configured timeout and log its failure.
    async fn bounded<T, E, F>(&self, operation: Operation, user_id: i64, call: F) -> Result<T, OrchestratorError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<OrchestratorError>,
    {
        let result = match timeout(self.config.model_timeout, call).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(OrchestratorError::Timeout { operation }),
        };

        if let Err(e) = &result {
            error!(user_id, operation = %operation, error = %e, "Step failed");
        }

        result
    }
}
