/// User domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored user account, keyed by email
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Globally unique email (primary key)
    pub email: String,

    /// Display name
    pub username: String,

    /// Salted bcrypt hash of the login secret
    pub password_hash: String,

    /// Account creation timestamp, set once
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The user with the credential stripped
    pub fn public(&self) -> PublicUser {
        PublicUser {
            email: self.email.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// User view safe to hand to callers and persist as the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Account email
    pub email: String,

    /// Display name
    pub username: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Registration request
#[derive(Clone)]
pub struct NewUser {
    /// Email to register; trimmed before use
    pub email: String,

    /// Display name; must not be blank
    pub username: String,

    /// Plain secret as typed by the player; hashed before it is stored
    pub secret: String,
}

impl NewUser {
    /// Build a registration request
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            email: "ada@example.com".to_string(),
            username: "Ada".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn public_view_strips_credential() {
        let user = sample_user();
        let public = user.public();

        assert_eq!(public.email, user.email);
        assert_eq!(public.username, user.username);
        assert_eq!(public.created_at, user.created_at);

        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("$2b$"));
        assert!(json.contains("createdAt"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let user = sample_user();
        assert!(!format!("{:?}", user).contains("$2b$"));

        let new_user = NewUser::new("ada@example.com", "Ada", "hunter2");
        assert!(!format!("{:?}", new_user).contains("hunter2"));
    }
}
