//! Conversation message operations.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Message, NewMessage};

/// Append a single message for a user.
///
/// Returns the new message id.
pub async fn insert_message(pool: &SqlitePool, user_id: i64, message: &NewMessage) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO messages (user_id, role, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(message.role.as_str())
    .bind(&message.content)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Load the earliest `limit` messages of a user, oldest first.
///
/// The window is anchored at the start of the conversation: once a user has
/// more than `limit` messages, later ones are not returned.
pub async fn load_history(pool: &SqlitePool, user_id: i64, limit: i64) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, role, content, created_at
        FROM messages
        WHERE user_id = ?
        ORDER BY id ASC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Count stored messages for a user.
pub async fn count_messages(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
