//! Core error types for the arena score store

use thiserror::Error;

/// Result type alias using `ArenaError`
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Core error type for the arena score store
#[derive(Error, Debug)]
pub enum ArenaError {
    /// A record with the same primary key already exists
    #[error("{entity} already exists: {key}")]
    DuplicateKey {
        /// Collection the record belongs to
        entity: String,
        /// The taken key
        key: String,
    },

    /// Login attempted for an email with no account
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Login secret did not match the stored credential
    #[error("Invalid credential")]
    InvalidCredential,

    /// Entity not found (update of a missing record)
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Collection the record belongs to
        entity: String,
        /// The missing key
        id: String,
    },

    /// The storage medium could not be opened
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Hashing or verifying a credential failed
    #[error("Credential error: {0}")]
    Credential(String),

    /// An operation needs an active session but nobody is logged in
    #[error("No user is logged in")]
    NotLoggedIn,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl ArenaError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a storage-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Create a credential error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the caller should offer a generic "try again".
    ///
    /// Storage failures are local to the operation in progress; the core
    /// never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Storage(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ArenaError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
