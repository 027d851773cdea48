//! Catalog products.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as listed by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Units available to order.
    #[serde(rename = "qty", default)]
    pub quantity: i32,
}

impl Product {
    /// Products with no stock cannot be added to a cart.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Payload for creating a product (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: i64,
    pub qty: i32,
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let product: Product = serde_json::from_str(
            r#"{"product_id": 1, "name": "Running Shoe", "price": 2499, "qty": 0, "image": "shoe.png"}"#,
        )
        .unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_rupees(2499));
        assert!(!product.is_in_stock());
    }
}
