//! Persisted session slot
//!
//! Holds at most one logged-in player as a JSON blob. Kept apart from the
//! `users` collection so reading the session never touches account rows.
//!
//! # Example
//!
//! ```rust,no_run
//! use arena_storage::session_state;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! if let Some(user) = session_state::load(pool).await? {
//!     println!("welcome back, {}", user.username);
//! }
//! # Ok(())
//! # }
//! ```

use crate::StorageError;
use arena_core::types::PublicUser;
use sqlx::SqliteExecutor;

type Result<T> = std::result::Result<T, StorageError>;

/// Load the persisted session
///
/// # Errors
///
/// Returns an error if the query fails or the stored blob is not valid JSON
pub async fn load<'e, E>(executor: E) -> Result<Option<PublicUser>>
where
    E: SqliteExecutor<'e>,
{
    let blob: Option<String> =
        sqlx::query_scalar("SELECT user_json FROM session_state WHERE id = 1")
            .fetch_optional(executor)
            .await?;

    match blob {
        Some(json) => {
            let user = serde_json::from_str(&json)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Persist `user` as the session, replacing any previous one
pub async fn save<'e, E>(executor: E, user: &PublicUser) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let json = serde_json::to_string(user)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO session_state (id, user_json, updated_at)
         VALUES (1, ?, ?)
         ON CONFLICT(id) DO UPDATE SET user_json = excluded.user_json, updated_at = excluded.updated_at",
    )
    .bind(json)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Clear the session
///
/// Returns `true` if a session was removed.
pub async fn clear<'e, E>(executor: E) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM session_state WHERE id = 1")
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
