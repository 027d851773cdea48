//! Minie Storefront library.
//!
//! Client side of the Minie shop: a typed backend API client, the session
//! lifecycle, debounced search, and the storefront views (catalog, cart,
//! order history). The admin console builds on the same client.
//!
//! All business logic (pricing, inventory, statistics, auth) lives in the
//! backend; this crate renders state and issues HTTP calls.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod search;
pub mod services;
pub mod session;
pub mod state;
pub mod views;

pub use api::ApiClient;
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use error::ApiError;
pub use notify::{Notifier, RecordingNotifier};
pub use session::Session;
pub use state::Storefront;
