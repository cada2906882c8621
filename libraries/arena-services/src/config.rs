/// Arena configuration
use arena_core::{ArenaError, Result};
use arena_storage::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::credentials::{MAX_COST, MIN_COST};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub stats: StatsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthSettings {
    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatsSettings {
    /// Entries in a summary's recent history
    #[serde(default = "default_recent_history_len")]
    pub recent_history_len: usize,

    /// Largest moving-average window for trends
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Rows in the default top-N leaderboard
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl ArenaConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()
            .map_err(|e| ArenaError::invalid_input(format!("config {}: {}", path.display(), e)))?;

        Self::finish(settings)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| ArenaError::invalid_input(format!("config: {}", e)))?;

        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ArenaError::invalid_input(format!("config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(ArenaError::invalid_input("storage.database_url is empty"));
        }

        if self.storage.max_connections == 0 {
            return Err(ArenaError::invalid_input(
                "storage.max_connections must be at least 1",
            ));
        }

        if !(MIN_COST..=MAX_COST).contains(&self.auth.bcrypt_cost) {
            return Err(ArenaError::invalid_input(format!(
                "auth.bcrypt_cost must be between {} and {}",
                MIN_COST, MAX_COST
            )));
        }

        if self.stats.trend_window == 0 {
            return Err(ArenaError::invalid_input(
                "stats.trend_window must be at least 1",
            ));
        }

        Ok(())
    }
}

impl StorageSettings {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
        }
    }
}

// Default values
impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            recent_history_len: default_recent_history_len(),
            trend_window: default_trend_window(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/arena.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    30
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_recent_history_len() -> usize {
    5
}

fn default_trend_window() -> usize {
    3
}

fn default_leaderboard_size() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ArenaConfig::default();
        config.validate().unwrap();
        assert_eq!(config.stats.recent_history_len, 5);
        assert_eq!(config.stats.trend_window, 3);
        assert_eq!(config.stats.leaderboard_size, 10);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ArenaConfig::from_toml_str(
            r#"
            [storage]
            database_url = "sqlite::memory:"

            [auth]
            bcrypt_cost = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.database_url, "sqlite::memory:");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.auth.bcrypt_cost, 4);
        assert_eq!(config.stats, StatsSettings::default());
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let err = ArenaConfig::from_toml_str("[auth]\nbcrypt_cost = 2\n").unwrap_err();
        assert!(matches!(err, ArenaError::InvalidInput(_)));
    }

    #[test]
    fn rejects_zero_trend_window() {
        let err = ArenaConfig::from_toml_str("[stats]\ntrend_window = 0\n").unwrap_err();
        assert!(matches!(err, ArenaError::InvalidInput(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArenaConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ArenaConfig::default());
    }

    #[test]
    fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.toml");
        std::fs::write(&path, "[stats]\nleaderboard_size = 3\n").unwrap();

        let config = ArenaConfig::load(&path).unwrap();
        assert_eq!(config.stats.leaderboard_size, 3);
    }

    #[test]
    fn store_options_carry_settings() {
        let settings = StorageSettings {
            database_url: "sqlite://x.db".to_string(),
            max_connections: 2,
            busy_timeout_secs: 7,
        };

        let options = settings.store_options();
        assert_eq!(options.database_url, "sqlite://x.db");
        assert_eq!(options.max_connections, 2);
        assert_eq!(options.busy_timeout, Duration::from_secs(7));
    }
}
