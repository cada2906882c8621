use crate::{create_pool_with, run_migrations, scores, session_state, users, StorageError, StoreOptions};
use arena_core::{
    error::Result,
    storage::{RecordStore, SessionPersistence},
    types::*,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Local record store using `SQLite`
///
/// Cheap to clone; clones share the pool and the writer lock. Construct one
/// at process start and hand it to every service.
#[derive(Clone)]
pub struct LocalRecordStore {
    pool: SqlitePool,
    score_writer: Arc<Mutex<()>>,
}

impl LocalRecordStore {
    /// Open (creating on first use) the store and bring its schema up to date
    ///
    /// Opening an already-initialized database is a no-op beyond connecting.
    ///
    /// # Errors
    ///
    /// Returns `ArenaError::StorageUnavailable` if the database cannot be
    /// opened or migrated
    pub async fn open(options: &StoreOptions) -> Result<Self> {
        let pool = create_pool_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        run_migrations(&pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;

        tracing::info!(url = %options.database_url, "record store opened");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an already-migrated pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            score_writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    // Users
    async fn insert_user(&self, user: &User) -> Result<()> {
        users::insert(&self.pool, user).await.map_err(Into::into)
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>> {
        users::get_by_email(&self.pool, email)
            .await
            .map_err(Into::into)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await.map_err(Into::into)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        users::update(&self.pool, user).await.map_err(Into::into)
    }

    // Scores
    async fn insert_score(
        &self,
        email: &str,
        score: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<ScoreRecord> {
        let _writer = self.score_writer.lock().await;
        scores::insert(&self.pool, email, score, timestamp)
            .await
            .map_err(Into::into)
    }

    async fn get_score(&self, id: ScoreId) -> Result<Option<ScoreRecord>> {
        scores::get_by_id(&self.pool, id).await.map_err(Into::into)
    }

    async fn get_score_by_email(&self, email: &str) -> Result<Option<ScoreRecord>> {
        scores::get_by_email(&self.pool, email)
            .await
            .map_err(Into::into)
    }

    async fn get_scores_by_email(&self, email: &str) -> Result<Vec<ScoreRecord>> {
        scores::get_all_by_email(&self.pool, email)
            .await
            .map_err(Into::into)
    }

    async fn get_all_scores(&self) -> Result<Vec<ScoreRecord>> {
        scores::get_all(&self.pool).await.map_err(Into::into)
    }

    async fn update_score(&self, record: &ScoreRecord) -> Result<()> {
        let _writer = self.score_writer.lock().await;
        scores::update(&self.pool, record)
            .await
            .map_err(Into::into)
    }

    async fn upsert_score_if_greater(
        &self,
        email: &str,
        score: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<ScoreUpsert> {
        // Held across the whole transaction so two submissions for the same
        // email can never both see "no record" and both insert.
        let _writer = self.score_writer.lock().await;

        let mut conn = self.pool.acquire().await.map_err(StorageError::from)?;

        // IMMEDIATE takes the write lock before the lookup, so writers on
        // other handles to the same file wait out busy_timeout.
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(StorageError::from)?;

        let result = match scores::upsert_if_greater(&mut conn, email, score, timestamp).await {
            Ok(outcome) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| outcome)
                .map_err(StorageError::from),
            Err(err) => Err(err),
        };

        if result.is_err() {
            if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                tracing::warn!(error = %e, "rollback failed, discarding connection");
                drop(conn.detach());
            }
        }

        result.map_err(Into::into)
    }
}

#[async_trait]
impl SessionPersistence for LocalRecordStore {
    async fn load_session(&self) -> Result<Option<PublicUser>> {
        session_state::load(&self.pool).await.map_err(Into::into)
    }

    async fn save_session(&self, user: &PublicUser) -> Result<()> {
        session_state::save(&self.pool, user)
            .await
            .map_err(Into::into)
    }

    async fn clear_session(&self) -> Result<()> {
        session_state::clear(&self.pool).await?;
        Ok(())
    }
}
