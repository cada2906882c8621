//! Common test utilities and fixtures
#![allow(dead_code)]

use arena_services::{Arena, ArenaConfig};
use chrono::{DateTime, Utc};
use tempfile::TempDir;

/// Test credentials
pub mod fixtures {
    pub const ADA_EMAIL: &str = "ada@example.com";
    pub const ADA_NAME: &str = "Ada";
    pub const ADA_SECRET: &str = "TestPassword123!";

    pub const BOB_EMAIL: &str = "bob@example.com";
    pub const BOB_NAME: &str = "Bob";
    pub const BOB_SECRET: &str = "AdminPassword456!";
}

/// An arena over a real `SQLite` file that is removed on drop
pub struct TestArena {
    pub arena: Arena,
    pub config: ArenaConfig,
    _temp_dir: TempDir,
}

impl TestArena {
    pub async fn new() -> Self {
        init_tracing();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&temp_dir);
        let arena = Arena::open(&config).await.expect("Failed to open arena");

        Self {
            arena,
            config,
            _temp_dir: temp_dir,
        }
    }

    /// A second arena over the same database, as after a process restart
    pub async fn reopen(&self) -> Arena {
        Arena::open(&self.config)
            .await
            .expect("Failed to reopen arena")
    }
}

/// Config pointing into `dir`, with the cheapest bcrypt cost
pub fn test_config(dir: &TempDir) -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.storage.database_url = format!("sqlite://{}", dir.path().join("arena.db").display());
    config.auth.bcrypt_cost = 4;
    config
}

/// Fixed timestamp `days` days after an arbitrary epoch
pub fn day(days: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + days * 86_400, 0).expect("valid timestamp")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
