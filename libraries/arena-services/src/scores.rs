//! Score service: one best score per player, and the leaderboard
//!
//! A submission either inserts the player's first record, raises it in place,
//! or is silently discarded when it does not beat the stored score. A low
//! score is success with no change, never an error.

use crate::session::SessionManager;
use arena_core::{RecordStore, Result, ScoreRecord, ScoreUpsert};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ScoreService {
    store: Arc<dyn RecordStore>,
}

impl ScoreService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Record a finished game's score for `email`
    ///
    /// Returns the record as stored afterwards: the new or raised record, or
    /// the unchanged personal best.
    pub async fn submit_score(&self, email: &str, score: u32) -> Result<ScoreRecord> {
        self.submit_score_at(email, score, Utc::now()).await
    }

    /// Like [`submit_score`](Self::submit_score) with an explicit timestamp,
    /// for imports and replays
    pub async fn submit_score_at(
        &self,
        email: &str,
        score: u32,
        at: DateTime<Utc>,
    ) -> Result<ScoreRecord> {
        let outcome = self.store.upsert_score_if_greater(email, score, at).await?;

        match &outcome {
            ScoreUpsert::Inserted(record) => {
                tracing::info!(%email, score, id = %record.id, "first score recorded");
            }
            ScoreUpsert::Improved { previous, .. } => {
                tracing::info!(%email, score, previous, "personal best improved");
            }
            ScoreUpsert::Unchanged(record) => {
                tracing::debug!(%email, score, best = record.score, "score below personal best");
            }
        }

        Ok(outcome.into_record())
    }

    /// Submit for whoever is logged in
    ///
    /// # Errors
    ///
    /// `ArenaError::NotLoggedIn` when there is no active session
    pub async fn submit_for_current_user(
        &self,
        sessions: &SessionManager,
        score: u32,
    ) -> Result<ScoreRecord> {
        let email = sessions.require_email().await?;
        self.submit_score(&email, score).await
    }

    /// Records indexed under `email`; at most one while the service owns
    /// all writes
    pub async fn scores_for_user(&self, email: &str) -> Result<Vec<ScoreRecord>> {
        self.store.get_scores_by_email(email).await
    }

    /// Every stored record, in issue order
    pub async fn all_scores(&self) -> Result<Vec<ScoreRecord>> {
        self.store.get_all_scores().await
    }

    /// Best score per player, highest first
    ///
    /// Collapses to one entry per email even if the store holds duplicates.
    /// Ties keep scan order.
    pub async fn leaderboard(&self) -> Result<Vec<ScoreRecord>> {
        let all = self.all_scores().await?;
        let board = best_per_email(all);

        tracing::debug!(entries = board.len(), "leaderboard computed");
        Ok(board)
    }
}

/// Keep each email's highest record, then sort descending by score (stable)
pub(crate) fn best_per_email(records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut best: Vec<ScoreRecord> = Vec::new();

    for record in records {
        match slots.get(&record.email) {
            Some(&slot) => {
                if record.score > best[slot].score {
                    best[slot] = record;
                }
            }
            None => {
                slots.insert(record.email.clone(), best.len());
                best.push(record);
            }
        }
    }

    best.sort_by(|a, b| b.score.cmp(&a.score));
    best
}
