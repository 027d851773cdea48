//! Admin order list with status transitions.

use std::sync::Arc;

use minie_core::{Order, OrderId, OrderStatus};
use minie_storefront::Notifier;
use tracing::{info, instrument};

use crate::client::AdminClient;

/// Every order in the store, with a status picker per order.
///
/// Updates are never applied locally: a successful change triggers one full
/// reload so the list always reflects the backend.
pub struct OrderStatusView {
    client: AdminClient,
    orders: Vec<Order>,
    notifier: Arc<dyn Notifier>,
}

impl OrderStatusView {
    #[must_use]
    pub fn new(client: AdminClient, notifier: Arc<dyn Notifier>) -> Self {
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

    /// Look up a displayed order by id.
    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Statuses the picker offers for `order`, current status included.
    #[must_use]
    pub const fn options(order: &Order) -> &'static [OrderStatus] {
        order.status.offered_transitions()
    }

    /// Re-fetch every order.
    pub async fn reload(&mut self) -> bool {
        match self.client.orders().await {
            Ok(orders) => {
                self.orders = orders;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load admin orders");
                self.notifier.alert("Failed to load admin orders");
                false
            }
        }
    }

    /// Picker changed: re-selecting the current status does nothing.
    pub async fn select(&mut self, order: &Order, status: OrderStatus) -> bool {
        if order.status == status {
            return false;
        }
        self.update(&order.id, status).await
    }

    /// Ask the backend to move `id` to `status`, then reload.
    ///
    /// The backend decides legality; a rejected change alerts its detail and
    /// leaves the list as it was.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update(&mut self, id: &OrderId, status: OrderStatus) -> bool {
        match self.client.update_order_status(id, status).await {
            Ok(()) => {
                info!("Order status updated");
                self.notifier.alert("Status updated");
                self.reload().await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order status update rejected");
                self.notifier.alert(&e.user_message("Status update failed"));
                false
            }
        }
    }
}
