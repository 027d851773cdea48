//! Admin error types.

use minie_storefront::ApiError;
use thiserror::Error;

/// Errors that can occur when using the admin console.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The session user does not have the admin role.
    #[error("Forbidden: admin role required")]
    NotAdmin,

    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}
