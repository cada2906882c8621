//! Stats aggregator tests
//! Tests summaries, trends and the named top-N leaderboard
mod common;

use arena_core::{Rank, RecordStore};
use arena_services::stats::UNKNOWN_PLAYER;
use common::{day, TestArena};

#[tokio::test]
async fn test_summary_without_scores() {
    let test = TestArena::new().await;

    let summary = test.arena.stats.summary_for("new@x.com").await.unwrap();

    assert_eq!(summary.games_played, 0);
    assert_eq!(summary.highest_score, 0);
    assert_eq!(summary.average_score, 0.0);
    assert!(summary.recent_history.is_empty());
    assert_eq!(summary.rank, Rank::Unranked);
}

#[tokio::test]
async fn test_summary_with_best_score() {
    let test = TestArena::new().await;
    let scores = &test.arena.scores;
    scores.submit_score("a@x.com", 90).await.unwrap();
    scores.submit_score("b@x.com", 60).await.unwrap();
    scores.submit_score("b@x.com", 70).await.unwrap();
    scores.submit_score("c@x.com", 20).await.unwrap();

    let summary = test.arena.stats.summary_for("b@x.com").await.unwrap();

    assert_eq!(summary.games_played, 1);
    assert_eq!(summary.highest_score, 70);
    assert_eq!(summary.average_score, 70.0);
    assert_eq!(summary.recent_history.len(), 1);
    assert_eq!(summary.rank, Rank::Ranked { position: 2, of: 3 });
    assert_eq!(summary.rank.to_string(), "2 of 3");
}

/// The aggregator computes over whatever the index returns
#[tokio::test]
async fn test_summary_over_duplicate_records() {
    let test = TestArena::new().await;
    let store = &test.arena.store;
    for (i, score) in [10u32, 20, 30, 40, 50, 60, 70].into_iter().enumerate() {
        store
            .insert_score("dup@x.com", score, day(i as i64))
            .await
            .unwrap();
    }

    let summary = test.arena.stats.summary_for("dup@x.com").await.unwrap();

    assert_eq!(summary.games_played, 7);
    assert_eq!(summary.highest_score, 70);
    assert_eq!(summary.average_score, 40.0);

    let recent: Vec<u32> = summary.recent_history.iter().map(|r| r.score).collect();
    assert_eq!(recent, vec![70, 60, 50, 40, 30]);
    assert_eq!(summary.rank, Rank::Ranked { position: 1, of: 1 });
}

#[tokio::test]
async fn test_tied_players_share_rank() {
    let test = TestArena::new().await;
    let scores = &test.arena.scores;
    scores.submit_score("top@x.com", 100).await.unwrap();
    scores.submit_score("tie1@x.com", 50).await.unwrap();
    scores.submit_score("tie2@x.com", 50).await.unwrap();

    let first = test.arena.stats.summary_for("tie1@x.com").await.unwrap();
    let second = test.arena.stats.summary_for("tie2@x.com").await.unwrap();

    assert_eq!(first.rank.position(), Some(2));
    assert_eq!(second.rank.position(), Some(2));
}

#[tokio::test]
async fn test_personal_trend_moving_average() {
    let test = TestArena::new().await;
    let store = &test.arena.store;
    // Inserted out of order; the trend sorts by timestamp
    store.insert_score("t@x.com", 30, day(3)).await.unwrap();
    store.insert_score("t@x.com", 10, day(1)).await.unwrap();
    store.insert_score("t@x.com", 40, day(4)).await.unwrap();
    store.insert_score("t@x.com", 20, day(2)).await.unwrap();

    let trend = test.arena.stats.personal_trend("t@x.com").await.unwrap();

    assert_eq!(trend.scores, vec![10, 20, 30, 40]);
    assert_eq!(
        trend.moving_average,
        vec![None, None, Some(20.0), Some(30.0)]
    );
    let expected_labels: Vec<_> = (1..=4).map(|d| day(d).date_naive()).collect();
    assert_eq!(trend.labels, expected_labels);
}

#[tokio::test]
async fn test_personal_trend_single_score() {
    let test = TestArena::new().await;
    test.arena
        .scores
        .submit_score_at("one@x.com", 42, day(0))
        .await
        .unwrap();

    let trend = test.arena.stats.personal_trend("one@x.com").await.unwrap();

    assert_eq!(trend.scores, vec![42]);
    assert_eq!(trend.moving_average, vec![Some(42.0)]);
    assert_eq!(trend.labels, vec![day(0).date_naive()]);
}

#[tokio::test]
async fn test_personal_trend_empty() {
    let test = TestArena::new().await;

    let trend = test.arena.stats.personal_trend("none@x.com").await.unwrap();

    assert!(trend.scores.is_empty());
    assert!(trend.labels.is_empty());
    assert!(trend.moving_average.is_empty());
}

#[tokio::test]
async fn test_top_n_names_and_limit() {
    let test = TestArena::new().await;
    let scores = &test.arena.scores;
    scores.submit_score("ada@example.com", 90).await.unwrap();
    scores.submit_score("bob@example.com", 70).await.unwrap();
    scores.submit_score("carol@example.com", 80).await.unwrap();

    let top = test.arena.stats.top_n(2).await.unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].display_name, "ada");
    assert_eq!(top[0].score, 90);
    assert_eq!(top[1].display_name, "carol");
    assert_eq!(top[1].score, 80);

    assert_eq!(test.arena.stats.top_n(10).await.unwrap().len(), 3);
    assert!(test.arena.stats.top_n(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_top_n_malformed_email() {
    let test = TestArena::new().await;
    test.arena.store.insert_score("", 5, day(0)).await.unwrap();

    let top = test.arena.stats.top_n(5).await.unwrap();

    assert_eq!(top[0].display_name, UNKNOWN_PLAYER);
}

#[tokio::test]
async fn test_leaderboard_top_uses_configured_size() {
    let test = TestArena::new().await;
    for i in 0..12u32 {
        test.arena
            .scores
            .submit_score(&format!("player{}@x.com", i), i * 5)
            .await
            .unwrap();
    }

    let top = test.arena.stats.leaderboard_top().await.unwrap();

    assert_eq!(top.len(), test.config.stats.leaderboard_size);
    assert_eq!(top[0].display_name, "player11");
    assert_eq!(top[0].score, 55);
}
