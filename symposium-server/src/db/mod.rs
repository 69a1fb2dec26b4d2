//! Database Module
//!
//! SQLite store via sqlx: connection setup, embedded migrations, and the
//! query functions for registrations and promotional content.

pub mod content;
pub mod registrations;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored column could not be decoded into its domain type
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl RepoError {
    /// True when the statement failed on a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            RepoError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
        )
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open the database with WAL mode and apply migrations
    pub async fn new(database_url: &str) -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database, migrated; used by tests
    ///
    /// A single connection that never expires keeps the in-memory database
    /// alive for the lifetime of the pool.
    pub async fn in_memory() -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.pragma("foreign_keys", "ON");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| RepoError::Database(e.into()))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
