//! Conversation history replay.

use brain_core::{ChatMessage, Role};
use database::{message, Database};
use tracing::warn;

/// Rebuilds chat context from stored messages.
pub struct HistoryReader {
    db: Database,
    limit: i64,
}

impl HistoryReader {
    pub fn new(db: Database, limit: i64) -> Self {
        Self { db, limit }
    }

    /// The earliest `limit` messages of a user, oldest first.
    ///
    /// A storage error yields an empty history.
    pub async fn load(&self, user_id: i64) -> Vec<ChatMessage> {
        let stored = match message::load_history(self.db.pool(), user_id, self.limit).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(user_id, operation = "load_history", error = %e, "History unavailable, continuing without it");
                return Vec::new();
            }
        };

        stored
            .into_iter()
            .filter_map(|m| match m.role.parse::<Role>() {
                Ok(role @ (Role::User | Role::Assistant)) => Some(ChatMessage {
                    role,
                    content: m.content,
                }),
                _ => {
                    warn!(user_id, id = m.id, role = %m.role, "Skipping stored message with unexpected role");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::NewMessage;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_load_maps_roles_in_order() {
        let db = test_db().await;
        message::insert_message(db.pool(), 1, &NewMessage::user("hi")).await.unwrap();
        message::insert_message(db.pool(), 1, &NewMessage::assistant("hello")).await.unwrap();

        let history = HistoryReader::new(db, 10).load(1).await;

        assert_eq!(history, vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")]);
    }

    #[tokio::test]
    async fn test_storage_error_gives_empty_history() {
        let db = test_db().await;
        message::insert_message(db.pool(), 1, &NewMessage::user("hi")).await.unwrap();
        db.close().await;

        let history = HistoryReader::new(db, 10).load(1).await;
        assert!(history.is_empty());
    }
}
