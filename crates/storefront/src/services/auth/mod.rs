//! Authentication service.
//!
//! [`AuthProvider`] owns the session lifecycle: it logs in against the
//! backend, decodes the issued token, persists it in a [`TokenStore`], and
//! hands out the [`Session`] that request functions borrow.

mod error;
mod store;
mod token;

pub use error::AuthError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{decode_claims, session_from_token};

use chrono::Utc;
use minie_core::User;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::session::Session;

/// Session owner backed by a token store.
pub struct AuthProvider {
    client: ApiClient,
    store: Box<dyn TokenStore>,
    session: Option<Session>,
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AuthProvider {
    /// Create an unauthenticated provider.
    #[must_use]
    pub fn new(client: ApiClient, store: impl TokenStore + 'static) -> Self {
        Self {
            client,
            store: Box::new(store),
            session: None,
        }
    }

    /// The current session, if logged in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Resume a session from the token store.
    ///
    /// A token that no longer decodes is removed from the store. Expired
    /// tokens are kept; the backend will reject them.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store cannot be read.
    pub fn restore(&mut self) -> Result<Option<&Session>, AuthError> {
        let Some(token) = self.store.load()? else {
            return Ok(None);
        };

        match session_from_token(token) {
            Ok(session) => {
                if session.expires_at().is_some_and(|at| at <= Utc::now()) {
                    warn!(user = %session.user().name, "Stored session token has expired");
                }
                self.session = Some(session);
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable stored token");
                self.store.clear()?;
                self.session = None;
            }
        }
        Ok(self.session.as_ref())
    }

    /// Log in by user name.
    ///
    /// On any failure nothing is stored and the provider stays unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyName` for a blank name (no request is sent),
    /// `AuthError::Api` if the backend rejects the login, and
    /// `AuthError::MalformedToken` if the issued token cannot be decoded.
    #[instrument(skip(self))]
    pub async fn login(&mut self, name: &str) -> Result<&Session, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::EmptyName);
        }

        let response = self.client.login(name).await?;
        let session = session_from_token(response.access_token)?;
        self.store.save(session.token())?;

        info!(
            user_id = %session.user().id,
            role = %session.user().role,
            "Logged in"
        );
        Ok(self.session.insert(session))
    }

    /// End the session and forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the stored token cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session = None;
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }
}
