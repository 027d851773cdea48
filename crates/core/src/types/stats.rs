//! Admin reporting aggregates. The backend computes these; the client only
//! displays them.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Store-wide order statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_orders: u64,
    pub total_revenue: Price,
    pub pending_orders: u64,
    pub delivered_orders: u64,
}

/// Revenue for the current calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyStats {
    #[serde(default)]
    pub monthly_revenue: Price,
}

/// A top-selling product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSeller {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub total_sold: u64,
    pub revenue: Price,
}
