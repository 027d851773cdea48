//! Order history view.

use std::sync::Arc;

use minie_core::{Order, OrderId};
use tracing::instrument;

use crate::api::ApiClient;
use crate::notify::Notifier;
use crate::session::Session;

/// The session user's orders.
pub struct OrderHistoryView {
    client: ApiClient,
    orders: Vec<Order>,
    notifier: Arc<dyn Notifier>,
}

impl OrderHistoryView {
    #[must_use]
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            orders: Vec::new(),
            notifier,
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Re-fetch order history.
    pub async fn load(&mut self, session: &Session) -> bool {
        match self.client.orders(session).await {
            Ok(orders) => {
                self.orders = orders;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load orders");
                self.notifier.alert("Failed to load orders");
                false
            }
        }
    }

    /// Fetch a single order.
    pub async fn details(&self, session: &Session, id: &OrderId) -> Option<Order> {
        match self.client.order_details(session, id).await {
            Ok(order) => Some(order),
            Err(e) => {
                self.notifier.alert(&e.user_message("Order not found"));
                None
            }
        }
    }

    /// Cancel a pending order, then reload history.
    #[instrument(skip(self, session), fields(order_id = %id))]
    pub async fn cancel(&mut self, session: &Session, id: &OrderId) -> bool {
        match self.client.cancel_order(session, id).await {
            Ok(()) => {
                self.notifier.alert("Order cancelled");
                self.load(session).await
            }
            Err(e) => {
                self.notifier.alert(&e.user_message("Cancel failed"));
                false
            }
        }
    }
}
