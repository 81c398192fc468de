//! User registry operations.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Create a new user with the given id and phone.
pub async fn create_user(pool: &SqlitePool, id: i64, phone: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, phone)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(phone)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Register a user inside an open transaction, leaving existing rows untouched.
pub(crate) async fn register_in(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (id, phone)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(id.to_string())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, first_name, last_name, phone, active, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Update a user's display name.
pub async fn update_name(pool: &SqlitePool, id: i64, first_name: &str, last_name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Mark a user inactive. Their history and sets are kept.
pub async fn deactivate_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET active = 0, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, first_name, last_name, phone, active, created_at, updated_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let db = test_db().await;

        create_user(db.pool(), 5215512345678, "5215512345678").await.unwrap();

        let user = get_user(db.pool(), 5215512345678).await.unwrap();
        assert!(user.active);
        assert_eq!(user.phone, "5215512345678");
        assert_eq!(user.first_name, "");

        update_name(db.pool(), user.id, "Ana", "Lopez").await.unwrap();
        deactivate_user(db.pool(), user.id).await.unwrap();

        let user = get_user(db.pool(), user.id).await.unwrap();
        assert_eq!(user.first_name, "Ana");
        assert!(!user.active);
        assert_eq!(list_users(db.pool()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user() {
        let db = test_db().await;
        create_user(db.pool(), 1, "1").await.unwrap();

        let result = create_user(db.pool(), 1, "1").await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let db = test_db().await;
        assert!(matches!(
            get_user(db.pool(), 42).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            deactivate_user(db.pool(), 42).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let db = test_db().await;
        for _ in 0..2 {
            let mut tx = db.pool().begin().await.unwrap();
            register_in(&mut tx, 9).await.unwrap();
            tx.commit().await.unwrap();
        }

        assert_eq!(list_users(db.pool()).await.unwrap().len(), 1);
    }
}
