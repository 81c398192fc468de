//! Persistence gateway: the only writer of conversation turns.

use database::{batch, Database, PersistedTurn};

use crate::error::OrchestratorError;
use crate::state::ConversationState;

/// Writes a finished turn atomically.
pub struct PersistenceGateway {
    db: Database,
}

impl PersistenceGateway {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store every message and every (exercise, set) pair of the state in
    /// one transaction.
    ///
    /// Not idempotent: persisting the same state twice stores it twice.
    pub async fn persist(&self, state: &ConversationState) -> Result<PersistedTurn, OrchestratorError> {
        if !state.is_complete() {
            return Err(OrchestratorError::IncompleteTurn(format!(
                "{} messages without a single trailing reply",
                state.messages().len()
            )));
        }

        let written = batch::persist_turn(
            self.db.pool(),
            state.user_id(),
            &state.new_messages(),
            &state.new_workout_sets(),
        )
        .await?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Category;
    use database::message;

    #[tokio::test]
    async fn test_incomplete_state_is_refused() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let gateway = PersistenceGateway::new(db.clone());

        let state = ConversationState::new(1, "hi", Category::Chat);
        let result = gateway.persist(&state).await;

        assert!(matches!(result, Err(OrchestratorError::IncompleteTurn(_))));
        assert_eq!(message::count_messages(db.pool(), 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persist_chat_turn() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let gateway = PersistenceGateway::new(db.clone());

        let mut state = ConversationState::new(1, "hi", Category::Chat);
        state.push_assistant("hello");
        let written = gateway.persist(&state).await.unwrap();

        assert_eq!(written.messages, 2);
        assert_eq!(written.workout_sets, 0);
    }
}
