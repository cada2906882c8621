//! Read-only statistics derived from the score service

use crate::config::StatsSettings;
use crate::scores::{best_per_email, ScoreService};
use arena_core::{Rank, Result, ScoreRecord, Summary, TopEntry, Trend};

/// Shown when a leaderboard row has no usable email
pub const UNKNOWN_PLAYER: &str = "Unknown";

#[derive(Clone)]
pub struct StatsAggregator {
    scores: ScoreService,
    settings: StatsSettings,
}

impl StatsAggregator {
    pub fn new(scores: ScoreService, settings: StatsSettings) -> Self {
        Self { scores, settings }
    }

    /// Games played, best, mean, recent history and rank for `email`
    ///
    /// Computes over every record under the email rather than assuming
    /// there is exactly one. The player's records and the leaderboard come
    /// from the same scan, so `highest_score` and `rank` always agree.
    pub async fn summary_for(&self, email: &str) -> Result<Summary> {
        let all = self.scores.all_scores().await?;
        Ok(summarize(all, email, self.settings.recent_history_len))
    }

    /// Chronological scores with a trailing moving average
    pub async fn personal_trend(&self, email: &str) -> Result<Trend> {
        let mut records = self.scores.scores_for_user(email).await?;
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        let labels = records.iter().map(|r| r.timestamp.date_naive()).collect();
        let scores: Vec<u32> = records.iter().map(|r| r.score).collect();
        let window = self.settings.trend_window.min(scores.len());
        let moving_average = moving_average(&scores, window);

        Ok(Trend {
            labels,
            scores,
            moving_average,
        })
    }

    /// The first `n` leaderboard rows, named for display
    pub async fn top_n(&self, n: usize) -> Result<Vec<TopEntry>> {
        let leaderboard = self.scores.leaderboard().await?;

        Ok(leaderboard
            .iter()
            .take(n)
            .map(|r| TopEntry {
                display_name: display_name(&r.email),
                score: r.score,
            })
            .collect())
    }

    /// `top_n` with the configured leaderboard size
    pub async fn leaderboard_top(&self) -> Result<Vec<TopEntry>> {
        self.top_n(self.settings.leaderboard_size).await
    }
}

fn summarize(all: Vec<ScoreRecord>, email: &str, recent_history_len: usize) -> Summary {
    let mut records: Vec<ScoreRecord> = all.iter().filter(|r| r.email == email).cloned().collect();
    let leaderboard = best_per_email(all);

    let games_played = records.len();
    let highest_score = records.iter().map(|r| r.score).max().unwrap_or(0);
    let average_score = mean(records.iter().map(|r| r.score));

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    records.truncate(recent_history_len);

    Summary {
        games_played,
        highest_score,
        average_score,
        recent_history: records,
        rank: rank_of(&leaderboard, email),
    }
}

fn mean(values: impl Iterator<Item = u32>) -> f64 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| {
        (sum + u64::from(v), count + 1)
    });

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Competition rank: 1 + number of players with a strictly greater score
pub fn rank_of(leaderboard: &[ScoreRecord], email: &str) -> Rank {
    let Some(mine) = leaderboard.iter().find(|r| r.email == email) else {
        return Rank::Unranked;
    };

    let ahead = leaderboard.iter().filter(|r| r.score > mine.score).count();
    Rank::Ranked {
        position: ahead + 1,
        of: leaderboard.len(),
    }
}

/// Trailing mean over `window` values
///
/// The first `window - 1` positions have no value. A zero window yields no
/// values at all.
pub fn moving_average(values: &[u32], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum: u64 = slice.iter().copied().map(u64::from).sum();
            Some(sum as f64 / window as f64)
        })
        .collect()
}

/// Local part of the email, or [`UNKNOWN_PLAYER`]
pub fn display_name(email: &str) -> String {
    match email.split_once('@') {
        Some((local, _)) if !local.trim().is_empty() => local.to_string(),
        _ => UNKNOWN_PLAYER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::ScoreId;
    use chrono::{DateTime, Utc};

    fn entry(email: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            id: ScoreId::new(1),
            email: email.to_string(),
            score,
            timestamp: Utc::now(),
        }
    }

    fn entry_at(id: i64, email: &str, score: u32, secs: i64) -> ScoreRecord {
        ScoreRecord {
            id: ScoreId::new(id),
            email: email.to_string(),
            score,
            timestamp: DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn summary_best_and_rank_share_one_scan() {
        let all = vec![
            entry_at(1, "a@x.com", 50, 0),
            entry_at(2, "b@x.com", 60, 1),
            entry_at(3, "a@x.com", 80, 2),
            entry_at(4, "c@x.com", 70, 3),
        ];

        let summary = summarize(all, "a@x.com", 5);

        assert_eq!(summary.games_played, 2);
        assert_eq!(summary.highest_score, 80);
        assert_eq!(summary.average_score, 65.0);
        assert_eq!(summary.rank, Rank::Ranked { position: 1, of: 3 });
        let ids: Vec<_> = summary.recent_history.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn summary_for_absent_player() {
        let summary = summarize(vec![entry_at(1, "a@x.com", 10, 0)], "z@x.com", 5);

        assert_eq!(summary.games_played, 0);
        assert_eq!(summary.highest_score, 0);
        assert_eq!(summary.rank, Rank::Unranked);
    }

    #[test]
    fn moving_average_window_three() {
        assert_eq!(
            moving_average(&[10, 20, 30, 40], 3),
            vec![None, None, Some(20.0), Some(30.0)]
        );
    }

    #[test]
    fn moving_average_short_series() {
        assert_eq!(moving_average(&[], 0), Vec::<Option<f64>>::new());
        assert_eq!(moving_average(&[7], 1), vec![Some(7.0)]);
        assert_eq!(moving_average(&[10, 15], 2), vec![None, Some(12.5)]);
    }

    #[test]
    fn moving_average_zero_window() {
        assert_eq!(moving_average(&[1, 2], 0), vec![None, None]);
    }

    #[test]
    fn display_name_uses_local_part() {
        assert_eq!(display_name("ada@example.com"), "ada");
        assert_eq!(display_name("a.b+c@x.io"), "a.b+c");
    }

    #[test]
    fn display_name_falls_back_for_malformed() {
        assert_eq!(display_name(""), UNKNOWN_PLAYER);
        assert_eq!(display_name("no-at-sign"), UNKNOWN_PLAYER);
        assert_eq!(display_name("@x.com"), UNKNOWN_PLAYER);
    }

    #[test]
    fn rank_counts_strictly_greater() {
        let board = vec![
            entry("a@x.com", 90),
            entry("b@x.com", 70),
            entry("c@x.com", 70),
            entry("d@x.com", 10),
        ];

        assert_eq!(rank_of(&board, "a@x.com"), Rank::Ranked { position: 1, of: 4 });
        assert_eq!(rank_of(&board, "b@x.com"), Rank::Ranked { position: 2, of: 4 });
        assert_eq!(rank_of(&board, "c@x.com"), Rank::Ranked { position: 2, of: 4 });
        assert_eq!(rank_of(&board, "d@x.com"), Rank::Ranked { position: 4, of: 4 });
        assert_eq!(rank_of(&board, "z@x.com"), Rank::Unranked);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([1, 2].into_iter()), 1.5);
    }
}
