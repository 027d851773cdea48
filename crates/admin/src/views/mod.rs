//! Admin console views.

pub mod dashboard;
pub mod orders;
pub mod users;

pub use dashboard::DashboardView;
pub use orders::OrderStatusView;
pub use users::{UserSearch, UserSearchView, user_search_view};
