//! Score record queries
//!
//! Records are keyed by an auto-issued id and indexed (non-uniquely) by email.
//! The one-record-per-email rule lives in [`upsert_if_greater`], which must run
//! inside a transaction.

use crate::{from_micros, to_micros, truncate_micros, StorageError};
use arena_core::types::{ScoreId, ScoreRecord, ScoreUpsert};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor};

type Result<T> = std::result::Result<T, StorageError>;

#[derive(sqlx::FromRow)]
struct ScoreRow {
    id: ScoreId,
    email: String,
    score: i64,
    timestamp: i64,
}

impl TryFrom<ScoreRow> for ScoreRecord {
    type Error = StorageError;

    fn try_from(row: ScoreRow) -> Result<Self> {
        let score = u32::try_from(row.score).map_err(|_| {
            StorageError::Corrupt(format!("score {} out of range for id {}", row.score, row.id))
        })?;

        Ok(ScoreRecord {
            id: row.id,
            email: row.email,
            score,
            timestamp: from_micros(row.timestamp)?,
        })
    }
}

/// Insert a new score record and return it with its issued id
pub async fn insert<'e, E>(
    executor: E,
    email: &str,
    score: u32,
    timestamp: DateTime<Utc>,
) -> Result<ScoreRecord>
where
    E: SqliteExecutor<'e>,
{
    let timestamp = truncate_micros(timestamp)?;

    let result = sqlx::query("INSERT INTO scores (email, score, timestamp) VALUES (?, ?, ?)")
        .bind(email)
        .bind(score)
        .bind(to_micros(timestamp))
        .execute(executor)
        .await?;

    Ok(ScoreRecord {
        id: ScoreId::new(result.last_insert_rowid()),
        email: email.to_string(),
        score,
        timestamp,
    })
}

/// Get score record by id
pub async fn get_by_id<'e, E>(executor: E, id: ScoreId) -> Result<Option<ScoreRecord>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, ScoreRow>(
        "SELECT id, email, score, timestamp FROM scores WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(ScoreRecord::try_from).transpose()
}

/// Get the record stored under `email`
///
/// The index is not unique; if several records exist the best score wins,
/// earliest id first on ties.
pub async fn get_by_email<'e, E>(executor: E, email: &str) -> Result<Option<ScoreRecord>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, ScoreRow>(
        "SELECT id, email, score, timestamp FROM scores
         WHERE email = ?
         ORDER BY score DESC, id ASC
         LIMIT 1",
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    row.map(ScoreRecord::try_from).transpose()
}

/// Get every record stored under `email`, in issue order
pub async fn get_all_by_email<'e, E>(executor: E, email: &str) -> Result<Vec<ScoreRecord>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, ScoreRow>(
        "SELECT id, email, score, timestamp FROM scores WHERE email = ? ORDER BY id",
    )
    .bind(email)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(ScoreRecord::try_from).collect()
}

/// Get all score records
pub async fn get_all<'e, E>(executor: E) -> Result<Vec<ScoreRecord>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, ScoreRow>(
        "SELECT id, email, score, timestamp FROM scores ORDER BY id",
    )
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(ScoreRecord::try_from).collect()
}

/// Replace the record stored under `record.id`
///
/// # Errors
///
/// Returns `StorageError::NotFound` if no record has this id
pub async fn update<'e, E>(executor: E, record: &ScoreRecord) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE scores SET email = ?, score = ?, timestamp = ? WHERE id = ?")
        .bind(&record.email)
        .bind(record.score)
        .bind(to_micros(record.timestamp))
        .bind(record.id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Score", record.id.to_string()));
    }

    Ok(())
}

/// Insert a record for `email`, or raise the existing one when `score` beats it
///
/// Runs its lookup and write on `conn`; the caller owns the transaction and
/// commits it.
pub async fn upsert_if_greater(
    conn: &mut SqliteConnection,
    email: &str,
    score: u32,
    timestamp: DateTime<Utc>,
) -> Result<ScoreUpsert> {
    let Some(existing) = get_by_email(&mut *conn, email).await? else {
        let record = insert(&mut *conn, email, score, timestamp).await?;
        return Ok(ScoreUpsert::Inserted(record));
    };

    if score <= existing.score {
        return Ok(ScoreUpsert::Unchanged(existing));
    }

    let previous = existing.score;
    let record = ScoreRecord {
        score,
        timestamp: truncate_micros(timestamp)?,
        ..existing
    };
    update(&mut *conn, &record).await?;

    Ok(ScoreUpsert::Improved { previous, record })
}
