//! User account queries
//!
//! Accounts are keyed by email; inserting a taken email fails with
//! `StorageError::DuplicateKey`.

use crate::{from_micros, to_micros, StorageError};
use arena_core::types::User;
use sqlx::SqliteExecutor;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(sqlx::FromRow)]
struct UserRow {
    email: String,
    username: String,
    password_hash: String,
    created_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            created_at: from_micros(row.created_at)?,
        })
    }
}

/// Insert a new user
///
/// # Errors
///
/// Returns `StorageError::DuplicateKey` if a user with the same email exists
pub async fn insert<'e, E>(executor: E, user: &User) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO users (email, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(to_micros(user.created_at))
    .execute(executor)
    .await
    .map_err(|e| StorageError::from_insert(e, "User", &user.email))?;

    Ok(())
}

/// Get user by email
pub async fn get_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT email, username, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    row.map(User::try_from).transpose()
}

/// Get all users
pub async fn get_all<'e, E>(executor: E) -> Result<Vec<User>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT email, username, password_hash, created_at FROM users",
    )
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(User::try_from).collect()
}

/// Replace the username and credential of an existing user
///
/// `created_at` is set once at creation and is never rewritten.
///
/// # Errors
///
/// Returns `StorageError::NotFound` if no user has this email
pub async fn update<'e, E>(executor: E, user: &User) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE users SET username = ?, password_hash = ? WHERE email = ?")
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", &user.email));
    }

    Ok(())
}
