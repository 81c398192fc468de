//! Workout set operations.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{NewWorkoutSet, WorkoutSet};

/// Insert a single workout set outside of a batch.
///
/// Returns the new row id.
pub async fn insert_workout_set(pool: &SqlitePool, user_id: i64, set: &NewWorkoutSet) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO workout_sets (user_id, exercise, weight, reps)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&set.exercise)
    .bind(set.weight)
    .bind(i64::from(set.reps))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List every set of a user in insertion order.
pub async fn list_workout_sets(pool: &SqlitePool, user_id: i64) -> Result<Vec<WorkoutSet>> {
    let sets = sqlx::query_as::<_, WorkoutSet>(
        r#"
        SELECT id, user_id, exercise, weight, reps, created_at
        FROM workout_sets
        WHERE user_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sets)
}

/// Count all stored sets across users.
pub async fn count_workout_sets(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM workout_sets
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        insert_workout_set(db.pool(), 3, &NewWorkoutSet::new("bench", 5, 82.5))
            .await
            .unwrap();
        insert_workout_set(db.pool(), 4, &NewWorkoutSet::new("row", 12, 40.0))
            .await
            .unwrap();

        let sets = list_workout_sets(db.pool(), 3).await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].exercise, "bench");
        assert_eq!(sets[0].reps, 5);
        assert_eq!(sets[0].weight, 82.5);
        assert_eq!(count_workout_sets(db.pool()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_exercise_is_rejected() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let result = insert_workout_set(db.pool(), 3, &NewWorkoutSet::new("", 5, 10.0)).await;
        assert!(result.is_err());
    }
}
