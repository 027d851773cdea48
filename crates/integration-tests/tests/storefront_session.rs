//! Login, restore and logout against the mock backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use minie_integration_tests::{MockBackend, token_for};
use minie_storefront::services::auth::{MemoryTokenStore, TokenStore};
use minie_storefront::{ApiClient, ApiConfig, RecordingNotifier, Storefront};
use secrecy::{ExposeSecret, SecretString};

struct Harness {
    backend: MockBackend,
    store: Arc<MemoryTokenStore>,
    notifier: RecordingNotifier,
    shop: Storefront,
}

async fn harness() -> Harness {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&ApiConfig::new(&backend.url()).unwrap()).unwrap();
    let store = Arc::new(MemoryTokenStore::new());
    let notifier = RecordingNotifier::new();
    let shop = Storefront::new(
        client,
        Arc::clone(&store),
        Arc::new(notifier.clone()),
        Duration::from_millis(500),
    );
    Harness {
        backend,
        store,
        notifier,
        shop,
    }
}

#[tokio::test]
async fn test_empty_login_alerts_and_stores_nothing() {
    let mut h = harness().await;

    assert!(!h.shop.login("").await);

    assert_eq!(h.notifier.alerts(), vec!["Login failed"]);
    assert!(h.store.is_empty());
    assert!(h.shop.session().is_none());
    assert!(h.backend.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_user_login_fails() {
    let mut h = harness().await;

    assert!(!h.shop.login("nobody").await);

    assert_eq!(h.notifier.alerts(), vec!["Login failed"]);
    assert!(h.store.is_empty());
    assert_eq!(h.backend.request_lines(), vec!["POST /login"]);
}

#[tokio::test]
async fn test_login_sends_name_as_typed() {
    let mut h = harness().await;

    // Names match exactly on the backend, so padding is not stripped.
    assert!(!h.shop.login(" asha ").await);

    assert_eq!(h.notifier.alerts(), vec!["Login failed"]);
    assert!(h.store.is_empty());
    assert_eq!(h.backend.request_lines(), vec!["POST /login"]);
}

#[tokio::test]
async fn test_login_stores_token_and_loads_user_views() {
    let mut h = harness().await;

    assert!(h.shop.login("asha").await);

    let user = h.shop.session().unwrap().user().clone();
    assert_eq!(user.name, "asha");
    assert!(!user.is_admin());
    assert!(!h.store.is_empty());
    assert!(h.notifier.alerts().is_empty());

    let requests = h.backend.requests();
    assert_eq!(
        h.backend.request_lines(),
        vec!["POST /login", "GET /cart", "GET /orders"]
    );
    let stored = h.store.load().unwrap().unwrap();
    let bearer = format!("Bearer {}", stored.expose_secret());
    assert_eq!(requests[0].authorization, None);
    assert_eq!(requests[1].authorization.as_deref(), Some(bearer.as_str()));
    assert_eq!(requests[2].authorization.as_deref(), Some(bearer.as_str()));
}

#[tokio::test]
async fn test_restore_resumes_stored_session_without_requests() {
    let mut h = harness().await;
    let token = token_for(&serde_json::json!({"user_id": 2, "role": "admin", "name": "ops"}));
    h.store.save(&SecretString::from(token)).unwrap();

    let session = h.shop.restore().unwrap().unwrap();

    assert!(session.is_admin());
    assert!(h.backend.requests().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_and_views() {
    let mut h = harness().await;
    assert!(h.shop.login("asha").await);
    assert!(h.shop.add_to_cart(1.into()).await);
    assert!(!h.shop.cart.is_empty());

    h.shop.logout().unwrap();

    assert!(h.shop.session().is_none());
    assert!(h.shop.cart.is_empty());
    assert!(h.store.is_empty());
}
