//! Login secret hashing

use arena_core::{ArenaError, Result};

/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Salted bcrypt hashing for login secrets
///
/// Hashing is CPU-bound and runs on the blocking pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(ArenaError::invalid_input(format!(
                "bcrypt cost {} outside {}..={}",
                cost, MIN_COST, MAX_COST
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a secret with a fresh random salt
    pub async fn hash(&self, secret: &str) -> Result<String> {
        let secret = secret.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(secret, cost))
            .await
            .map_err(|e| ArenaError::credential(e.to_string()))?
            .map_err(|e| ArenaError::credential(e.to_string()))
    }

    /// Check a secret against a stored hash
    pub async fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        let secret = secret.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash))
            .await
            .map_err(|e| ArenaError::credential(e.to_string()))?
            .map_err(|e| ArenaError::credential(e.to_string()))
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}
