//! Catalog endpoints. Both are public.

use minie_core::Product;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// `GET /products` - the unfiltered catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.get("products", &[], None).await
    }

    /// `GET /products/search?q=` - case-insensitive name match.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        self.get("products/search", &[("q", query)], None).await
    }
}
