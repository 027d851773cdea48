//! Core types for Minie.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! models exchanged with the backend API.

pub mod claims;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod stats;
pub mod status;
pub mod user;

pub use claims::Claims;
pub use id::*;
pub use order::{CheckoutReceipt, LineItem, Order};
pub use price::Price;
pub use product::{NewProduct, Product};
pub use stats::{BestSeller, MonthlyStats, Stats};
pub use status::*;
pub use user::User;
