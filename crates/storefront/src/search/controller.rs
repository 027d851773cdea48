//! Search controller, sources and the view that applies fired queries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use minie_core::Product;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, instrument};

use super::debounce::{Clock, ScheduledTask, TokioClock};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::notify::Notifier;

/// What a fired search asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// Blank input: back to the unfiltered baseline.
    Reset,
    /// Filter by this (trimmed, non-empty) text.
    Query(String),
}

impl SearchRequest {
    #[must_use]
    pub fn from_input(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::Reset
        } else {
            Self::Query(trimmed.to_string())
        }
    }
}

/// Buffers input changes and releases one request per quiet period.
#[derive(Debug)]
pub struct SearchController<C = TokioClock> {
    clock: C,
    text: String,
    task: ScheduledTask<String>,
}

impl<C: Clock> SearchController<C> {
    #[must_use]
    pub const fn new(clock: C, window: Duration) -> Self {
        Self {
            clock,
            text: String::new(),
            task: ScheduledTask::new(window),
        }
    }

    /// Record an input change, superseding any query still waiting.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let now = self.clock.now();
        if let Some(superseded) = self.task.schedule(self.text.clone(), now) {
            debug!(superseded = %superseded, "Search input superseded");
        }
    }

    /// Current contents of the search box.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.task.is_pending()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.task.deadline()
    }

    /// Release the pending query if the window has elapsed.
    pub fn poll(&mut self) -> Option<SearchRequest> {
        let now = self.clock.now();
        self.task
            .fire(now)
            .map(|text| SearchRequest::from_input(&text))
    }
}

/// Backend lookup behind a search box.
pub trait SearchSource: Send + Sync {
    type Item: Clone + Send;

    /// Alert shown when a lookup fails.
    const FAILURE_MESSAGE: &'static str;

    /// Fetch the collection for `request`.
    fn fetch(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Self::Item>, ApiError>> + Send;
}

/// Product catalog search: blank input lists everything.
#[derive(Debug, Clone)]
pub struct ProductSearch {
    client: ApiClient,
}

impl ProductSearch {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl SearchSource for ProductSearch {
    type Item = Product;

    const FAILURE_MESSAGE: &'static str = "Product search failed";

    async fn fetch(&self, request: &SearchRequest) -> Result<Vec<Product>, ApiError> {
        match request {
            SearchRequest::Reset => self.client.list_products().await,
            SearchRequest::Query(q) => self.client.search_products(q).await,
        }
    }
}

/// A search box plus the collection it drives.
pub struct SearchView<S: SearchSource, C = TokioClock> {
    source: S,
    controller: SearchController<C>,
    items: Vec<S::Item>,
    notifier: Arc<dyn Notifier>,
}

impl<S: SearchSource> SearchView<S, TokioClock> {
    /// View on tokio time with the given quiescence window.
    #[must_use]
    pub fn new(source: S, window: Duration, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_controller(source, SearchController::new(TokioClock, window), notifier)
    }
}

impl<S: SearchSource, C: Clock> SearchView<S, C> {
    #[must_use]
    pub const fn with_controller(
        source: S,
        controller: SearchController<C>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            controller,
            items: Vec::new(),
            notifier,
        }
    }

    /// The displayed collection.
    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    #[must_use]
    pub const fn controller(&self) -> &SearchController<C> {
        &self.controller
    }

    /// Load the unfiltered baseline immediately.
    pub async fn load(&mut self) {
        self.apply(&SearchRequest::Reset).await;
    }

    /// Record an input change.
    pub fn input(&mut self, text: impl Into<String>) {
        self.controller.input(text);
    }

    /// Issue the pending query if its window has elapsed.
    ///
    /// Returns whether a query fired.
    pub async fn poll(&mut self) -> bool {
        match self.controller.poll() {
            Some(request) => {
                self.apply(&request).await;
                true
            }
            None => false,
        }
    }

    /// Replace the displayed collection with the result of `request`.
    ///
    /// On failure the collection is left empty and the user is alerted.
    #[instrument(skip(self))]
    pub async fn apply(&mut self, request: &SearchRequest) {
        let result = self.source.fetch(request).await;
        settle::<S>(&mut self.items, &*self.notifier, result);
    }
}

impl<S: SearchSource> SearchView<S, TokioClock> {
    /// Drive the view from a stream of input changes.
    ///
    /// Input keeps being read while fetches are in flight; results are
    /// applied in the order they complete. `on_update` sees the collection
    /// after every applied result. Returns once `events` is closed, nothing is
    /// pending and every fetch has settled.
    pub async fn run<F>(&mut self, mut events: mpsc::Receiver<String>, mut on_update: F)
    where
        F: FnMut(&[S::Item]),
    {
        let Self {
            source,
            controller,
            items,
            notifier,
        } = self;
        let source: &S = source;
        let mut in_flight: FuturesUnordered<BoxFuture<'_, Result<Vec<S::Item>, ApiError>>> =
            FuturesUnordered::new();
        let mut open = true;

        loop {
            if !open && !controller.is_pending() && in_flight.is_empty() {
                break;
            }
            let deadline = controller.deadline();

            tokio::select! {
                event = events.recv(), if open => match event {
                    Some(text) => controller.input(text),
                    None => open = false,
                },
                () = sleep_until_deadline(deadline) => {
                    if let Some(request) = controller.poll() {
                        debug!(request = ?request, "Search fired");
                        in_flight.push(async move { source.fetch(&request).await }.boxed());
                    }
                }
                Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                    settle::<S>(items, &**notifier, result);
                    on_update(items.as_slice());
                }
            }
        }
    }
}

fn settle<S: SearchSource>(
    items: &mut Vec<S::Item>,
    notifier: &dyn Notifier,
    result: Result<Vec<S::Item>, ApiError>,
) {
    match result {
        Ok(fetched) => {
            debug!(count = fetched.len(), "Search results applied");
            *items = fetched;
        }
        Err(e) => {
            tracing::error!(error = %e, "Search failed");
            items.clear();
            notifier.alert(S::FAILURE_MESSAGE);
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::search::ManualClock;

    const WINDOW: Duration = Duration::from_millis(500);

    /// Source that records every request and answers with its query text.
    #[derive(Clone, Default)]
    struct EchoSource {
        requests: Arc<Mutex<Vec<SearchRequest>>>,
        fail: bool,
        latency: Duration,
    }

    impl EchoSource {
        fn requests(&self) -> Vec<SearchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl SearchSource for EchoSource {
        type Item = String;

        const FAILURE_MESSAGE: &'static str = "Echo search failed";

        async fn fetch(&self, request: &SearchRequest) -> Result<Vec<String>, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.fail {
                return Err(ApiError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    detail: None,
                });
            }
            Ok(match request {
                SearchRequest::Reset => vec!["all".to_string()],
                SearchRequest::Query(q) => vec![q.clone()],
            })
        }
    }

    #[test]
    fn test_request_from_input() {
        assert_eq!(SearchRequest::from_input("   "), SearchRequest::Reset);
        assert_eq!(SearchRequest::from_input(""), SearchRequest::Reset);
        assert_eq!(
            SearchRequest::from_input("  shoe "),
            SearchRequest::Query("shoe".to_string())
        );
    }

    #[test]
    fn test_burst_within_window_fires_once() {
        let clock = ManualClock::new();
        let mut controller = SearchController::new(clock.clone(), WINDOW);

        for text in ["s", "sh", "sho", "shoe"] {
            controller.input(text);
            clock.advance(Duration::from_millis(100));
            assert_eq!(controller.poll(), None);
        }

        clock.advance(Duration::from_millis(400));
        assert_eq!(
            controller.poll(),
            Some(SearchRequest::Query("shoe".to_string()))
        );
        assert_eq!(controller.poll(), None);
    }

    #[test]
    fn test_separated_bursts_fire_twice() {
        let clock = ManualClock::new();
        let mut controller = SearchController::new(clock.clone(), WINDOW);
        let mut fired = Vec::new();

        controller.input("bag");
        clock.advance(Duration::from_millis(600));
        fired.extend(controller.poll());

        controller.input("belt");
        clock.advance(Duration::from_millis(600));
        fired.extend(controller.poll());

        assert_eq!(
            fired,
            vec![
                SearchRequest::Query("bag".to_string()),
                SearchRequest::Query("belt".to_string())
            ]
        );
    }

    #[test]
    fn test_clearing_box_resets() {
        let clock = ManualClock::new();
        let mut controller = SearchController::new(clock.clone(), WINDOW);
        controller.input("shoe");
        controller.input("");
        clock.advance(WINDOW);
        assert_eq!(controller.poll(), Some(SearchRequest::Reset));
        assert_eq!(controller.text(), "");
    }

    #[tokio::test]
    async fn test_view_applies_results_and_resets() {
        let clock = ManualClock::new();
        let source = EchoSource::default();
        let notifier = RecordingNotifier::new();
        let mut view = SearchView::with_controller(
            source.clone(),
            SearchController::new(clock.clone(), WINDOW),
            Arc::new(notifier.clone()),
        );

        view.input("hat");
        assert!(!view.poll().await);
        clock.advance(WINDOW);
        assert!(view.poll().await);
        assert_eq!(view.items(), ["hat".to_string()]);

        view.input("  ");
        clock.advance(WINDOW);
        assert!(view.poll().await);
        assert_eq!(view.items(), ["all".to_string()]);
        assert_eq!(
            source.requests(),
            vec![SearchRequest::Query("hat".to_string()), SearchRequest::Reset]
        );
        assert!(notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_view_failure_empties_and_alerts() {
        let clock = ManualClock::new();
        let notifier = RecordingNotifier::new();
        let mut view = SearchView::with_controller(
            EchoSource::default(),
            SearchController::new(clock.clone(), WINDOW),
            Arc::new(notifier.clone()),
        );
        view.load().await;
        assert_eq!(view.items().len(), 1);

        view.source.fail = true;
        view.input("hat");
        clock.advance(WINDOW);
        view.poll().await;

        assert!(view.items().is_empty());
        assert_eq!(notifier.alerts(), vec!["Echo search failed".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_typing_then_idle_fires_one_query() {
        let source = EchoSource::default();
        let mut view = SearchView::new(
            source.clone(),
            WINDOW,
            Arc::new(RecordingNotifier::new()),
        );
        let (tx, rx) = mpsc::channel(16);

        let typist = tokio::spawn(async move {
            for text in ["s", "sh", "sho", "shoe"] {
                tx.send(text.to_string()).await.unwrap();
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            tokio::time::sleep(Duration::from_millis(600)).await;
        });

        let mut updates = Vec::new();
        view.run(rx, |items| updates.push(items.to_vec())).await;
        typist.await.unwrap();

        assert_eq!(
            source.requests(),
            vec![SearchRequest::Query("shoe".to_string())]
        );
        assert_eq!(updates, vec![vec!["shoe".to_string()]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_pauses_longer_than_window_fire_each_burst() {
        let source = EchoSource::default();
        let mut view = SearchView::new(
            source.clone(),
            WINDOW,
            Arc::new(RecordingNotifier::new()),
        );
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            tx.send("cap".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(700)).await;
            tx.send("scarf".to_string()).await.unwrap();
        });

        view.run(rx, |_| {}).await;

        assert_eq!(
            source.requests(),
            vec![
                SearchRequest::Query("cap".to_string()),
                SearchRequest::Query("scarf".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_keeps_reading_input_during_slow_fetch() {
        let source = EchoSource {
            latency: Duration::from_millis(2000),
            ..EchoSource::default()
        };
        let mut view = SearchView::new(
            source.clone(),
            WINDOW,
            Arc::new(RecordingNotifier::new()),
        );
        let (tx, rx) = mpsc::channel(16);

        // Each burst arrives while the previous query is still being fetched.
        tokio::spawn(async move {
            tx.send("a".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(600)).await;
            tx.send("bag".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(700)).await;
            tx.send("belt".to_string()).await.unwrap();
        });

        let mut updates = Vec::new();
        view.run(rx, |items| updates.push(items.to_vec())).await;

        assert_eq!(
            source.requests(),
            vec![
                SearchRequest::Query("a".to_string()),
                SearchRequest::Query("bag".to_string()),
                SearchRequest::Query("belt".to_string())
            ]
        );
        assert_eq!(
            updates,
            vec![
                vec!["a".to_string()],
                vec!["bag".to_string()],
                vec!["belt".to_string()]
            ]
        );
        assert_eq!(view.items(), ["belt".to_string()]);
    }
}
