//! Debounced catalog search against the mock backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use minie_integration_tests::MockBackend;
use minie_storefront::search::{ManualClock, ProductSearch, SearchController, SearchView};
use minie_storefront::{ApiClient, ApiConfig, RecordingNotifier};

const WINDOW: Duration = Duration::from_millis(500);

struct Harness {
    backend: MockBackend,
    clock: ManualClock,
    notifier: RecordingNotifier,
    view: SearchView<ProductSearch, ManualClock>,
}

async fn harness() -> Harness {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&ApiConfig::new(&backend.url()).unwrap()).unwrap();
    let clock = ManualClock::new();
    let notifier = RecordingNotifier::new();
    let view = SearchView::with_controller(
        ProductSearch::new(client),
        SearchController::new(clock.clone(), WINDOW),
        Arc::new(notifier.clone()),
    );
    Harness {
        backend,
        clock,
        notifier,
        view,
    }
}

fn names(view: &SearchView<ProductSearch, ManualClock>) -> Vec<String> {
    view.items().iter().map(|p| p.name.clone()).collect()
}

#[tokio::test]
async fn test_typing_shoe_then_idle_sends_one_search() {
    let mut h = harness().await;

    for text in ["s", "sh", "sho", "shoe"] {
        h.view.input(text);
        h.clock.advance(Duration::from_millis(25));
        assert!(!h.view.poll().await);
    }
    h.clock.advance(Duration::from_millis(600));
    assert!(h.view.poll().await);
    assert!(!h.view.poll().await);

    assert_eq!(h.backend.request_lines(), vec!["GET /products/search?q=shoe"]);
    assert_eq!(names(&h.view), vec!["Running Shoe", "Canvas Shoe"]);
}

#[tokio::test]
async fn test_bursts_separated_by_a_pause_search_twice() {
    let mut h = harness().await;

    h.view.input("shoe");
    h.clock.advance(Duration::from_millis(700));
    h.view.poll().await;

    h.view.input("  belt ");
    h.clock.advance(Duration::from_millis(700));
    h.view.poll().await;

    assert_eq!(
        h.backend.request_lines(),
        vec!["GET /products/search?q=shoe", "GET /products/search?q=belt"]
    );
    assert_eq!(names(&h.view), vec!["Leather Belt"]);
}

#[tokio::test]
async fn test_clearing_the_box_lists_everything() {
    let mut h = harness().await;
    h.view.load().await;
    assert_eq!(h.view.items().len(), 4);

    h.view.input("belt");
    h.clock.advance(WINDOW);
    h.view.poll().await;
    assert_eq!(h.view.items().len(), 1);

    h.view.input("   ");
    h.clock.advance(WINDOW);
    h.view.poll().await;

    assert_eq!(h.view.items().len(), 4);
    assert_eq!(
        h.backend.request_lines(),
        vec![
            "GET /products",
            "GET /products/search?q=belt",
            "GET /products"
        ]
    );
}

#[tokio::test]
async fn test_failed_search_empties_results_and_alerts() {
    let mut h = harness().await;
    h.view.load().await;
    h.backend.fail(
        "GET",
        "/products/search",
        StatusCode::INTERNAL_SERVER_ERROR,
        "boom",
    );

    h.view.input("shoe");
    h.clock.advance(WINDOW);
    h.view.poll().await;

    assert!(h.view.items().is_empty());
    assert_eq!(h.notifier.alerts(), vec!["Product search failed"]);
}

#[tokio::test]
async fn test_every_request_carries_a_request_id() {
    let mut h = harness().await;
    h.view.load().await;
    h.view.load().await;

    let ids: Vec<String> = h
        .backend
        .requests()
        .into_iter()
        .map(|r| r.request_id.unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(h.backend.requests().iter().all(|r| r.authorization.is_none()));
}
