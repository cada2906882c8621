//! Session manager: who is using the client right now
//!
//! State machine: `LoggedOut -> (login) -> LoggedIn -> (logout) -> LoggedOut`.
//! Registration never changes the session. The active user's public view is
//! cached in memory and mirrored to the persisted session slot so it
//! survives restarts until an explicit logout.

use crate::credentials::CredentialHasher;
use arena_core::{ArenaError, NewUser, PublicUser, RecordStore, Result, SessionPersistence, User};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct SessionManager {
    store: Arc<dyn RecordStore>,
    persistence: Arc<dyn SessionPersistence>,
    hasher: CredentialHasher,
    current: RwLock<Option<PublicUser>>,
}

impl SessionManager {
    /// Build a manager, restoring any session persisted by a previous run
    pub async fn restore(
        store: Arc<dyn RecordStore>,
        persistence: Arc<dyn SessionPersistence>,
        hasher: CredentialHasher,
    ) -> Result<Self> {
        let current = persistence.load_session().await?;
        if let Some(user) = &current {
            tracing::debug!(email = %user.email, "restored session");
        }

        Ok(Self {
            store,
            persistence,
            hasher,
            current: RwLock::new(current),
        })
    }

    /// Create an account
    ///
    /// # Errors
    ///
    /// `ArenaError::DuplicateKey` if the email is taken,
    /// `ArenaError::InvalidInput` for an empty username or malformed email
    pub async fn register(&self, new_user: NewUser) -> Result<PublicUser> {
        let email = new_user.email.trim().to_string();
        validate_email(&email)?;

        let username = new_user.username.trim().to_string();
        if username.is_empty() {
            return Err(ArenaError::invalid_input("username is empty"));
        }

        // Cheap pre-check before paying for a hash; the primary key still
        // decides races.
        if self.store.get_user(&email).await?.is_some() {
            tracing::debug!(%email, "registration rejected: email taken");
            return Err(ArenaError::duplicate("User", email));
        }

        let user = User {
            password_hash: self.hasher.hash(&new_user.secret).await?,
            email,
            username,
            // Stored with microsecond precision
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.store.insert_user(&user).await?;

        tracing::info!(email = %user.email, "user registered");
        Ok(user.public())
    }

    /// Authenticate and make `email` the active user
    ///
    /// A failed attempt leaves the current session exactly as it was.
    ///
    /// # Errors
    ///
    /// `ArenaError::UserNotFound` for an unknown email,
    /// `ArenaError::InvalidCredential` for a wrong secret
    pub async fn login(&self, email: &str, secret: &str) -> Result<PublicUser> {
        let email = email.trim();
        let user = self
            .store
            .get_user(email)
            .await?
            .ok_or_else(|| ArenaError::UserNotFound(email.to_string()))?;

        if !self.hasher.verify(secret, &user.password_hash).await? {
            tracing::warn!(%email, "login rejected: invalid credential");
            return Err(ArenaError::InvalidCredential);
        }

        let public = user.public();
        self.persistence.save_session(&public).await?;
        *self.current.write().await = Some(public.clone());

        tracing::info!(%email, "user logged in");
        Ok(public)
    }

    /// End the session; logging out twice is fine
    pub async fn logout(&self) -> Result<()> {
        self.persistence.clear_session().await?;

        if let Some(user) = self.current.write().await.take() {
            tracing::info!(email = %user.email, "user logged out");
        }

        Ok(())
    }

    /// The active user, if any
    pub async fn current_user(&self) -> Option<PublicUser> {
        self.current.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// The active user's email, or `ArenaError::NotLoggedIn`
    pub async fn require_email(&self) -> Result<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|user| user.email.clone())
            .ok_or(ArenaError::NotLoggedIn)
    }
}

fn validate_email(email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ArenaError::invalid_input(format!(
            "malformed email: {:?}",
            email
        ))),
    }
}
