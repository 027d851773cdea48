//! Minie Core - Shared domain types.
//!
//! This crate provides the types used across all Minie components:
//! - `storefront` - API client, session handling, search and storefront views
//! - `admin` - Admin console (order management, user search, statistics)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules (such as the order status
//! transition table) - no I/O, no HTTP clients. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, roles, statuses and backend models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
