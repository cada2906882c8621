//! Arena Storage
//!
//! Embedded `SQLite` record store for players and their scores.
//!
//! # Architecture
//!
//! - **Two collections**: `users` keyed by email, `scores` keyed by an
//!   auto-issued id with a non-unique index on email
//! - **Vertical Slicing**: Each collection owns its own queries
//! - **Transactional upsert**: the score read-modify-write runs as one unit
//!   behind a writer lock
//!
//! # Example
//!
//! ```rust,no_run
//! use arena_core::RecordStore;
//! use arena_storage::{LocalRecordStore, StoreOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LocalRecordStore::open(&StoreOptions::new("sqlite://arena.db")).await?;
//!
//! let outcome = store
//!     .upsert_score_if_greater("ada@example.com", 120, chrono::Utc::now())
//!     .await?;
//! println!("stored score: {}", outcome.record().score);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod scores;
pub mod session_state;
pub mod users;

pub use context::LocalRecordStore;
pub use error::StorageError;

use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection settings for the record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// `SQLite` connection string (e.g., `sqlite://arena.db`)
    pub database_url: String,
    /// Pool size; forced to 1 for in-memory databases
    pub max_connections: u32,
    /// How long a writer waits on a locked database
    pub busy_timeout: Duration,
}

impl StoreOptions {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// In-memory store; contents vanish when the handle is dropped
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    fn is_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/arena.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Run database migrations
///
/// Safe to call on every start; applied migrations are skipped.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool with default settings
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with(&StoreOptions::new(database_url)).await
}

/// Create a new `SQLite` pool
///
/// # Errors
///
/// Returns an error if the URL is malformed or the database cannot be opened
pub async fn create_pool_with(options: &StoreOptions) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %options.database_url, "creating sqlite pool");

    let connect = SqliteConnectOptions::from_str(&options.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(options.busy_timeout);

    // Every connection to `:memory:` is a separate database, so the pool
    // must hold exactly one connection for its whole life.
    let pool_options = if options.is_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(options.max_connections.max(1))
    };

    let pool = pool_options.connect_with(connect).await?;

    tracing::debug!("sqlite pool ready");

    Ok(pool)
}

// Timestamps are stored as microseconds since the Unix epoch.

pub(crate) fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> error::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StorageError::Corrupt(format!("invalid timestamp: {}", micros)))
}

/// Drop sub-microsecond precision so returned values match what is stored
pub(crate) fn truncate_micros(at: DateTime<Utc>) -> error::Result<DateTime<Utc>> {
    from_micros(to_micros(at))
}
