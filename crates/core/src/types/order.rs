//! Cart line items and orders.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use super::price::Price;
use super::status::OrderStatus;

/// A product line in a cart or an order.
///
/// The backend copies cart lines verbatim into the order at checkout, so both
/// share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "qty")]
    pub quantity: i32,
}

impl LineItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Absent from the single-order detail endpoint.
    #[serde(rename = "_id", default)]
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    #[serde(default)]
    pub message: String,
    pub total: Price,
}
