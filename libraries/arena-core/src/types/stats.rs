/// Display statistics derived from stored scores
use super::ScoreRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a player in the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum Rank {
    /// 1-based position among `of` leaderboard entries
    Ranked {
        /// 1 + players with a strictly greater score
        position: usize,
        /// Leaderboard size
        of: usize,
    },

    /// The player has no score on the leaderboard
    Unranked,
}

impl Rank {
    /// The 1-based position, if ranked
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Ranked { position, .. } => Some(*position),
            Self::Unranked => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranked { position, of } => write!(f, "{} of {}", position, of),
            Self::Unranked => write!(f, "N/A"),
        }
    }
}

/// Summary statistics for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Records found under the player's email
    pub games_played: usize,

    /// Highest score, 0 when there are no records
    pub highest_score: u32,

    /// Arithmetic mean score, 0.0 when there are no records
    pub average_score: f64,

    /// Most recent records, newest first
    pub recent_history: Vec<ScoreRecord>,

    /// Leaderboard position of the player's best score
    pub rank: Rank,
}

/// A player's score series in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Calendar date (UTC) of each score
    pub labels: Vec<NaiveDate>,

    /// Scores, oldest first
    pub scores: Vec<u32>,

    /// Trailing moving average aligned with `scores`; `None` until the
    /// window fills
    pub moving_average: Vec<Option<f64>>,
}

/// One leaderboard row prepared for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopEntry {
    /// Local part of the email, or "Unknown"
    pub display_name: String,

    /// Best score
    pub score: u32,
}
