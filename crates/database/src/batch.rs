//! Atomic write of one conversation turn.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::models::{NewMessage, NewWorkoutSet};
use crate::user;

/// Row counts written by [`persist_turn`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistedTurn {
    pub messages: usize,
    pub workout_sets: usize,
}

/// Write a turn's messages and workout sets in a single transaction.
///
/// The sender is registered in the same transaction. Any failed statement
/// rolls the whole batch back. Replaying a batch writes duplicate rows.
pub async fn persist_turn(
    pool: &SqlitePool,
    user_id: i64,
    messages: &[NewMessage],
    sets: &[NewWorkoutSet],
) -> Result<PersistedTurn> {
    let mut tx = pool.begin().await?;

    for message in messages {
        sqlx::query(
            r#"
            INSERT INTO messages (user_id, role, content)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .execute(&mut *tx)
        .await?;
    }

    user::register_in(&mut tx, user_id).await?;

    for set in sets {
        sqlx::query(
            r#"
            INSERT INTO workout_sets (user_id, exercise, weight, reps)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&set.exercise)
        .bind(set.weight)
        .bind(i64::from(set.reps))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!(
        user_id,
        messages = messages.len(),
        workout_sets = sets.len(),
        "Persisted turn"
    );

    Ok(PersistedTurn {
        messages: messages.len(),
        workout_sets: sets.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{message, user, workout_set, Database};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_batch_commits_everything() {
        let db = test_db().await;
        let messages = [NewMessage::user("did squats"), NewMessage::assistant("workout saved")];
        let sets = [
            NewWorkoutSet::new("squats", 10, 60.0),
            NewWorkoutSet::new("squats", 8, 70.0),
        ];

        let written = persist_turn(db.pool(), 11, &messages, &sets).await.unwrap();

        assert_eq!(written, PersistedTurn { messages: 2, workout_sets: 2 });
        assert_eq!(message::count_messages(db.pool(), 11).await.unwrap(), 2);
        assert_eq!(workout_set::list_workout_sets(db.pool(), 11).await.unwrap().len(), 2);
        assert!(user::get_user(db.pool(), 11).await.unwrap().active);
    }

    #[tokio::test]
    async fn test_failed_set_rolls_back_batch() {
        let db = test_db().await;
        let messages = [NewMessage::user("log it"), NewMessage::assistant("workout saved")];
        let sets = [
            NewWorkoutSet::new("squats", 10, 60.0),
            NewWorkoutSet::new("squats", 8, 70.0),
            NewWorkoutSet::new("", 5, 80.0),
        ];

        let result = persist_turn(db.pool(), 12, &messages, &sets).await;

        assert!(result.is_err());
        assert_eq!(message::count_messages(db.pool(), 12).await.unwrap(), 0);
        assert_eq!(workout_set::count_workout_sets(db.pool()).await.unwrap(), 0);
        assert!(user::list_users(db.pool()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replay_duplicates_rows() {
        let db = test_db().await;
        let messages = [NewMessage::user("hi"), NewMessage::assistant("hello")];

        persist_turn(db.pool(), 13, &messages, &[]).await.unwrap();
        persist_turn(db.pool(), 13, &messages, &[]).await.unwrap();

        assert_eq!(message::count_messages(db.pool(), 13).await.unwrap(), 4);
        assert_eq!(user::list_users(db.pool()).await.unwrap().len(), 1);
    }
}
