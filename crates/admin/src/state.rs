//! Admin console state.

use std::sync::Arc;
use std::time::Duration;

use minie_storefront::{ApiClient, Notifier, Session};

use crate::client::AdminClient;
use crate::error::AdminError;
use crate::views::{DashboardView, OrderStatusView, UserSearchView, user_search_view};

/// Everything the admin console renders.
pub struct AdminConsole {
    client: AdminClient,
    pub orders: OrderStatusView,
    pub users: UserSearchView,
    pub dashboard: DashboardView,
}

impl AdminConsole {
    /// Open the console for `session`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotAdmin` unless the session user is an admin.
    pub fn new(
        api: ApiClient,
        session: Session,
        notifier: Arc<dyn Notifier>,
        search_window: Duration,
    ) -> Result<Self, AdminError> {
        let client = AdminClient::new(api, session)?;
        Ok(Self {
            orders: OrderStatusView::new(client.clone(), Arc::clone(&notifier)),
            users: user_search_view(client.clone(), search_window, Arc::clone(&notifier)),
            dashboard: DashboardView::new(client.clone(), notifier),
            client,
        })
    }

    #[must_use]
    pub const fn client(&self) -> &AdminClient {
        &self.client
    }

    /// Load the dashboard and the order list.
    pub async fn load_all(&mut self) {
        self.dashboard.load_stats().await;
        self.orders.reload().await;
        self.dashboard.load_best_sellers().await;
    }
}
