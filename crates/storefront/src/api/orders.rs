//! Customer order history endpoints.

use minie_core::{Order, OrderId};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, MessageResponse};
use crate::error::Result;
use crate::session::Session;

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    #[serde(default)]
    orders: Vec<Order>,
}

impl ApiClient {
    /// `GET /orders` - the session user's orders.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn orders(&self, session: &Session) -> Result<Vec<Order>> {
        let response: OrdersResponse = self.get("orders", &[], Some(session)).await?;
        Ok(response.orders)
    }

    /// `GET /orders/details/{id}` - one of the session user's orders.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the order belongs to someone else.
    #[instrument(skip(self, session), fields(order_id = %id))]
    pub async fn order_details(&self, session: &Session, id: &OrderId) -> Result<Order> {
        let path = format!("orders/details/{}", urlencoding::encode(id.as_str()));
        let mut order: Order = self.get(&path, &[], Some(session)).await?;
        // The detail endpoint strips the id from its projection
        if order.id.is_empty() {
            order.id = id.clone();
        }
        Ok(order)
    }

    /// `PUT /orders/{id}/cancel` - cancel a pending order and restock it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the order is no longer pending.
    #[instrument(skip(self, session), fields(order_id = %id))]
    pub async fn cancel_order(&self, session: &Session, id: &OrderId) -> Result<()> {
        let path = format!("orders/{}/cancel", urlencoding::encode(id.as_str()));
        let _: MessageResponse = self.put(&path, &[], Some(session)).await?;
        Ok(())
    }
}
