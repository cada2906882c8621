/// Score domain types
use super::ScoreId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player's stored score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Store-assigned identifier
    pub id: ScoreId,

    /// Owner's email (references `users.email`, not enforced by the store)
    pub email: String,

    /// Score value
    pub score: u32,

    /// Time of the last mutation
    pub timestamp: DateTime<Utc>,
}

/// Outcome of an upsert-if-greater write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreUpsert {
    /// No record existed for the email; a new one was inserted
    Inserted(ScoreRecord),

    /// The new score beat the stored one and replaced it in place
    Improved {
        /// Score held before the write
        previous: u32,

        /// The raised record
        record: ScoreRecord,
    },

    /// The new score did not beat the stored one; nothing was written
    Unchanged(ScoreRecord),
}

impl ScoreUpsert {
    /// The record as stored after the operation
    pub fn record(&self) -> &ScoreRecord {
        match self {
            Self::Inserted(record) | Self::Unchanged(record) | Self::Improved { record, .. } => {
                record
            }
        }
    }

    /// Consume the outcome, keeping the stored record
    pub fn into_record(self) -> ScoreRecord {
        match self {
            Self::Inserted(record) | Self::Unchanged(record) | Self::Improved { record, .. } => {
                record
            }
        }
    }

    /// Whether the operation performed a write
    pub fn wrote(&self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}
