//! Login endpoint.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    token_type: String,
}

/// Token issued by `POST /login`.
pub struct LoginResponse {
    pub access_token: SecretString,
    pub token_type: String,
}

impl From<TokenBody> for LoginResponse {
    fn from(body: TokenBody) -> Self {
        Self {
            access_token: SecretString::from(body.access_token),
            token_type: body.token_type,
        }
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

impl ApiClient {
    /// `POST /login` - exchange a user name for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the user is unknown.
    #[instrument(skip(self))]
    pub async fn login(&self, name: &str) -> Result<LoginResponse> {
        let body: TokenBody = self
            .post("login", &[], Some(&LoginRequest { name }), None)
            .await?;
        Ok(body.into())
    }
}
