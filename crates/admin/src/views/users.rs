//! Debounced user lookup.

use std::sync::Arc;
use std::time::Duration;

use minie_core::User;
use minie_storefront::search::{SearchRequest, SearchSource, SearchView};
use minie_storefront::{ApiError, Notifier};

use crate::client::AdminClient;

/// User search: a blank box clears the list without asking the backend.
#[derive(Debug, Clone)]
pub struct UserSearch {
    client: AdminClient,
}

impl UserSearch {
    #[must_use]
    pub const fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

impl SearchSource for UserSearch {
    type Item = User;

    const FAILURE_MESSAGE: &'static str = "User search failed";

    async fn fetch(&self, request: &SearchRequest) -> Result<Vec<User>, ApiError> {
        match request {
            SearchRequest::Reset => Ok(Vec::new()),
            SearchRequest::Query(q) => self.client.search_users(q).await,
        }
    }
}

/// The admin user search box and its matches.
pub type UserSearchView = SearchView<UserSearch>;

/// Build a user search view over `client`.
#[must_use]
pub fn user_search_view(
    client: AdminClient,
    window: Duration,
    notifier: Arc<dyn Notifier>,
) -> UserSearchView {
    SearchView::new(UserSearch::new(client), window, notifier)
}
