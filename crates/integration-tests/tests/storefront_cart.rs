//! Cart, checkout and order history flows.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use minie_core::{OrderId, OrderStatus, Price, ProductId};
use minie_integration_tests::MockBackend;
use minie_storefront::services::auth::MemoryTokenStore;
use minie_storefront::{ApiClient, ApiConfig, RecordingNotifier, Storefront};

struct Harness {
    backend: MockBackend,
    notifier: RecordingNotifier,
    shop: Storefront,
}

async fn logged_in(name: &str) -> Harness {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&ApiConfig::new(&backend.url()).unwrap()).unwrap();
    let notifier = RecordingNotifier::new();
    let mut shop = Storefront::new(
        client,
        MemoryTokenStore::new(),
        Arc::new(notifier.clone()),
        Duration::from_millis(500),
    );
    assert!(shop.login(name).await);
    backend.clear_requests();
    Harness {
        backend,
        notifier,
        shop,
    }
}

#[tokio::test]
async fn test_add_without_login_asks_to_login() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&ApiConfig::new(&backend.url()).unwrap()).unwrap();
    let notifier = RecordingNotifier::new();
    let mut shop = Storefront::new(
        client,
        MemoryTokenStore::new(),
        Arc::new(notifier.clone()),
        Duration::from_millis(500),
    );

    assert!(!shop.add_to_cart(ProductId::new(1)).await);

    assert_eq!(notifier.alerts(), vec!["Please login first"]);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_add_posts_then_reloads_cart_once() {
    let mut h = logged_in("asha").await;

    assert!(h.shop.add_to_cart(ProductId::new(1)).await);
    assert!(h.shop.add_to_cart(ProductId::new(1)).await);

    assert_eq!(
        h.backend.request_lines(),
        vec![
            "POST /cart?product_id=1",
            "GET /cart",
            "POST /cart?product_id=1",
            "GET /cart"
        ]
    );
    let items = h.shop.cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(h.shop.cart.subtotal(), Price::from_rupees(4998));
}

#[tokio::test]
async fn test_out_of_stock_product_alerts_without_request() {
    let mut h = logged_in("asha").await;
    h.shop.catalog.load().await;
    let scarf = h
        .shop
        .catalog
        .items()
        .iter()
        .find(|p| p.id == ProductId::new(4))
        .cloned()
        .unwrap();
    h.backend.clear_requests();

    let session = h.shop.session().cloned();
    assert!(!h.shop.cart.add_product(session.as_ref(), &scarf).await);

    assert!(h.backend.requests().is_empty());
    assert_eq!(h.notifier.alerts(), vec!["Out of stock"]);
}

#[tokio::test]
async fn test_backend_stock_limit_surfaces_detail() {
    let mut h = logged_in("asha").await;

    // Canvas Shoe has a single unit
    assert!(h.shop.add_to_cart(ProductId::new(2)).await);
    assert!(!h.shop.add_to_cart(ProductId::new(2)).await);

    assert_eq!(h.notifier.alerts(), vec!["Out of stock"]);
    assert_eq!(h.shop.cart.items()[0].quantity, 1);
}

#[tokio::test]
async fn test_remove_reloads_cart() {
    let mut h = logged_in("asha").await;
    assert!(h.shop.add_to_cart(ProductId::new(3)).await);
    h.backend.clear_requests();

    let session = h.shop.session().cloned().unwrap();
    assert!(h.shop.cart.remove(&session, ProductId::new(3)).await);

    assert!(h.shop.cart.is_empty());
    assert_eq!(h.backend.request_lines(), vec!["DELETE /cart/3", "GET /cart"]);
}

#[tokio::test]
async fn test_checkout_alerts_total_and_refreshes_orders() {
    let mut h = logged_in("asha").await;
    assert!(h.shop.add_to_cart(ProductId::new(1)).await);
    assert!(h.shop.add_to_cart(ProductId::new(3)).await);
    h.backend.clear_requests();

    assert!(h.shop.checkout().await);

    assert_eq!(h.notifier.alerts(), vec!["Success! Total: ₹2998"]);
    assert!(h.shop.cart.is_empty());
    assert_eq!(
        h.backend.request_lines(),
        vec!["POST /checkout", "GET /orders"]
    );
    let orders = h.shop.orders.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[0].total, Price::from_rupees(2998));
    assert_eq!(orders[0].items.len(), 2);
    assert_eq!(h.backend.product_qty(1), Some(4));
    assert_eq!(h.backend.cart_len(1), 0);
}

#[tokio::test]
async fn test_empty_cart_checkout_fails() {
    let mut h = logged_in("asha").await;

    assert!(!h.shop.checkout().await);

    assert_eq!(h.notifier.alerts(), vec!["Checkout failed"]);
    assert_eq!(h.backend.request_lines(), vec!["POST /checkout"]);
}

#[tokio::test]
async fn test_order_details_and_cancel() {
    let mut h = logged_in("asha").await;
    assert!(h.shop.add_to_cart(ProductId::new(3)).await);
    assert!(h.shop.checkout().await);
    let id = h.shop.orders.orders()[0].id.clone();
    let session = h.shop.session().cloned().unwrap();

    let order = h.shop.orders.details(&session, &id).await.unwrap();
    assert_eq!(order.id, id);
    assert_eq!(order.items[0].name, "Leather Belt");

    h.backend.clear_requests();
    assert!(h.shop.orders.cancel(&session, &id).await);
    assert_eq!(
        h.backend.request_lines(),
        vec![format!("PUT /orders/{id}/cancel"), "GET /orders".to_string()]
    );
    assert_eq!(h.shop.orders.orders()[0].status, OrderStatus::Cancelled);
    assert_eq!(h.backend.product_qty(3), Some(10));

    // A second cancel is refused by the backend
    assert!(!h.shop.orders.cancel(&session, &id).await);
    assert_eq!(
        h.notifier.alerts().last().map(String::as_str),
        Some("Only pending orders can be cancelled")
    );
}

#[tokio::test]
async fn test_missing_order_details_alert() {
    let h = logged_in("asha").await;
    let session = h.shop.session().cloned().unwrap();

    let order = h
        .shop
        .orders
        .details(&session, &OrderId::new("missing"))
        .await;

    assert!(order.is_none());
    assert_eq!(h.notifier.alerts(), vec!["Order not found"]);
}
