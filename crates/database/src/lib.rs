//! SQLite persistence layer for liftlog.
//!
//! This crate provides async database operations for users, conversation
//! messages, and workout sets using SQLx with SQLite, plus the user-scoped
//! executor for generated read queries.
//!
//! # Example
//!
//! ```no_run
//! use database::{batch, Database, NewMessage, NewWorkoutSet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:liftlog.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Store one turn atomically
//!     batch::persist_turn(
//!         db.pool(),
//!         5215512345678,
//!         &[NewMessage::user("bench 5x80"), NewMessage::assistant("workout saved")],
//!         &[NewWorkoutSet::new("bench", 5, 80.0)],
//!     )
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod error;
pub mod message;
pub mod models;
pub mod scoped_query;
pub mod table;
pub mod user;
pub mod workout_set;

pub use batch::PersistedTurn;
pub use error::{DatabaseError, Result};
pub use models::{Message, MessageRole, NewMessage, NewWorkoutSet, User, WorkoutSet};
pub use table::{CellValue, QueryTable};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough for one task per inbound message.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/liftlog.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing, use a single connection)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_creates_schema() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(tables, vec!["messages", "users", "workout_sets"]);

        // Migrations are idempotent.
        db.migrate().await.unwrap();
        db.close().await;
    }
}
