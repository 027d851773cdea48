//! Product catalog with a debounced search box.

use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::notify::Notifier;
use crate::search::{ProductSearch, SearchView};

/// The product listing: blank search shows the whole catalog.
pub type CatalogView = SearchView<ProductSearch>;

/// Build a catalog view over `client`.
#[must_use]
pub fn catalog_view(client: ApiClient, window: Duration, notifier: Arc<dyn Notifier>) -> CatalogView {
    SearchView::new(ProductSearch::new(client), window, notifier)
}
