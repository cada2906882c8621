//! Storage traits for the users/scores record store

use crate::error::Result;
use crate::types::{PublicUser, ScoreId, ScoreRecord, ScoreUpsert, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable record store holding the `users` and `scores` collections
///
/// `users` is keyed by email. `scores` is keyed by a store-issued id and
/// carries a non-unique secondary index on email. Every method is a bounded
/// request/response; implementations must allow concurrent readers and
/// serialize writers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Insert a new user
    ///
    /// Fails with `ArenaError::DuplicateKey` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Point lookup by email
    async fn get_user(&self, email: &str) -> Result<Option<User>>;

    /// All users, in no particular order
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Replace the user stored under `user.email`
    ///
    /// Fails with `ArenaError::NotFound` if absent.
    async fn update_user(&self, user: &User) -> Result<()>;

    // ========================================================================
    // Scores
    // ========================================================================

    /// Insert a score record, issuing a fresh id
    async fn insert_score(
        &self,
        email: &str,
        score: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<ScoreRecord>;

    /// Point lookup by id
    async fn get_score(&self, id: ScoreId) -> Result<Option<ScoreRecord>>;

    /// Index lookup: one record stored under `email`
    ///
    /// When the index holds more than one record the highest score wins.
    async fn get_score_by_email(&self, email: &str) -> Result<Option<ScoreRecord>>;

    /// Index scan: every record stored under `email`
    async fn get_scores_by_email(&self, email: &str) -> Result<Vec<ScoreRecord>>;

    /// All score records, in no particular order
    async fn get_all_scores(&self) -> Result<Vec<ScoreRecord>>;

    /// Replace the record stored under `record.id`
    ///
    /// Fails with `ArenaError::NotFound` if absent.
    async fn update_score(&self, record: &ScoreRecord) -> Result<()>;

    /// Atomically insert a record for `email`, or raise the existing one if
    /// `score` beats it
    ///
    /// The lookup and the write happen in one transaction; no other writer
    /// can observe or act on the state in between.
    async fn upsert_score_if_greater(
        &self,
        email: &str,
        score: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<ScoreUpsert>;
}

/// Persisted slot holding the currently logged-in user
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    /// Load the persisted session, if any
    async fn load_session(&self) -> Result<Option<PublicUser>>;

    /// Persist `user` as the current session, replacing any previous one
    async fn save_session(&self, user: &PublicUser) -> Result<()>;

    /// Clear the persisted session; clearing an empty slot succeeds
    async fn clear_session(&self) -> Result<()>;
}
