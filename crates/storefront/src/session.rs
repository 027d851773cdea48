//! Explicit session context passed to every authenticated request.

use chrono::{DateTime, Utc};
use minie_core::User;
use secrecy::{ExposeSecret, SecretString};

/// An authenticated session: the bearer token plus the identity decoded from it.
///
/// Owned by [`AuthProvider`](crate::services::auth::AuthProvider); request
/// functions only borrow it.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    user: User,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    #[must_use]
    pub const fn new(token: SecretString, user: User, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token,
            user,
            expires_at,
        }
    }

    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Raw token, for persisting in a token store.
    pub(crate) fn token(&self) -> &SecretString {
        &self.token
    }
}
