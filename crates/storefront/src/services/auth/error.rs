//! Authentication error types.

use thiserror::Error;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login attempted with a blank name.
    #[error("name is required")]
    EmptyName,

    /// Token could not be decoded into identity claims.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Backend rejected the login or could not be reached.
    #[error("login request failed: {0}")]
    Api(#[from] ApiError),

    /// Token store could not be read or written.
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}
