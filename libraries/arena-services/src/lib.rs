//! Arena Services
//!
//! Session handling, the best-score policy, and display statistics on top of
//! the record store.
//!
//! One store handle is opened at process start and injected into every
//! service; nothing initializes itself lazily.
//!
//! # Example
//!
//! ```rust,no_run
//! use arena_core::NewUser;
//! use arena_services::{Arena, ArenaConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let arena = Arena::open(&ArenaConfig::load("arena.toml")?).await?;
//!
//! arena.sessions.register(NewUser::new("ada@example.com", "Ada", "hunter2")).await?;
//! arena.sessions.login("ada@example.com", "hunter2").await?;
//!
//! arena.scores.submit_for_current_user(&arena.sessions, 120).await?;
//! let summary = arena.stats.summary_for("ada@example.com").await?;
//! println!("rank: {}", summary.rank);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod scores;
pub mod session;
pub mod stats;

pub use config::ArenaConfig;
pub use credentials::CredentialHasher;
pub use scores::ScoreService;
pub use session::SessionManager;
pub use stats::StatsAggregator;

use arena_core::Result;
use arena_storage::LocalRecordStore;
use std::sync::Arc;

/// The wired-up service set sharing one store handle
pub struct Arena {
    pub store: LocalRecordStore,
    pub sessions: SessionManager,
    pub scores: ScoreService,
    pub stats: StatsAggregator,
}

impl Arena {
    /// Open the store described by `config` and build every service on it
    pub async fn open(config: &ArenaConfig) -> Result<Self> {
        config.validate()?;

        let store = LocalRecordStore::open(&config.storage.store_options()).await?;
        Self::with_store(store, config).await
    }

    /// Build the services on an already opened store
    pub async fn with_store(store: LocalRecordStore, config: &ArenaConfig) -> Result<Self> {
        let shared = Arc::new(store.clone());
        let hasher = CredentialHasher::new(config.auth.bcrypt_cost)?;

        let sessions = SessionManager::restore(shared.clone(), shared.clone(), hasher).await?;
        let scores = ScoreService::new(shared);
        let stats = StatsAggregator::new(scores.clone(), config.stats.clone());

        Ok(Self {
            store,
            sessions,
            scores,
            stats,
        })
    }
}
