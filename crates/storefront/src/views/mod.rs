//! Storefront views.
//!
//! Each view owns the collection it displays and reports failures through a
//! [`Notifier`](crate::notify::Notifier) instead of returning them.

pub mod cart;
pub mod catalog;
pub mod orders;

pub use cart::CartView;
pub use catalog::{CatalogView, catalog_view};
pub use orders::OrderHistoryView;
