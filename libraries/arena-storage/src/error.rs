/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Primary key already taken
    #[error("{entity} already exists: {key}")]
    DuplicateKey { entity: String, key: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stored row could not be mapped back to a domain value
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
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

    /// Map a unique-constraint violation to `DuplicateKey`, pass anything
    /// else through
    pub(crate) fn from_insert(err: sqlx::Error, entity: &str, key: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::duplicate(entity, key)
            }
            other => Self::Database(other),
        }
    }
}

impl From<StorageError> for arena_core::ArenaError {
    fn from(err: StorageError) -> Self {
        use arena_core::ArenaError;

        match err {
            StorageError::Connection(msg) | StorageError::Migration(msg) => {
                ArenaError::unavailable(msg)
            }
            StorageError::DuplicateKey { entity, key } => ArenaError::duplicate(entity, key),
            StorageError::NotFound { entity, id } => ArenaError::not_found(entity, id),
            other => ArenaError::storage(other.to_string()),
        }
    }
}
