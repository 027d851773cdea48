//! Minie Admin library.
//!
//! The admin console on top of the storefront API client:
//! - [`AdminClient`] - admin-only endpoints, refused for non-admin sessions
//! - [`views::OrderStatusView`] - admin order list with status transitions
//! - [`views::UserSearch`] - debounced user lookup source
//! - [`views::DashboardView`] - sales statistics and best sellers
//!
//! The backend authorises every admin call; the role check here only keeps
//! non-admins out of the console.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod error;
pub mod state;
pub mod views;

pub use client::AdminClient;
pub use error::AdminError;
pub use state::AdminConsole;
