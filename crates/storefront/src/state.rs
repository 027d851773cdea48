//! Storefront state: the session plus every storefront view.

use std::sync::Arc;
use std::time::Duration;

use minie_core::ProductId;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::notify::Notifier;
use crate::services::auth::{AuthError, AuthProvider, TokenStore};
use crate::session::Session;
use crate::views::{CartView, CatalogView, OrderHistoryView, catalog_view};

/// Everything a storefront front end renders.
pub struct Storefront {
    client: ApiClient,
    auth: AuthProvider,
    notifier: Arc<dyn Notifier>,
    pub catalog: CatalogView,
    pub cart: CartView,
    pub orders: OrderHistoryView,
}

impl Storefront {
    /// Create a logged-out storefront.
    #[must_use]
    pub fn new(
        client: ApiClient,
        store: impl TokenStore + 'static,
        notifier: Arc<dyn Notifier>,
        search_window: Duration,
    ) -> Self {
        Self {
            auth: AuthProvider::new(client.clone(), store),
            catalog: catalog_view(client.clone(), search_window, Arc::clone(&notifier)),
            cart: CartView::new(client.clone(), Arc::clone(&notifier)),
            orders: OrderHistoryView::new(client.clone(), Arc::clone(&notifier)),
            client,
            notifier,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.auth.session()
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthProvider {
        &self.auth
    }

    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    /// Resume a stored session without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the token store cannot be read.
    pub fn restore(&mut self) -> Result<Option<&Session>, AuthError> {
        self.auth.restore()
    }

    /// Log in and load the user's cart and orders.
    ///
    /// Any failure alerts "Login failed" and leaves the storefront logged out.
    pub async fn login(&mut self, name: &str) -> bool {
        if let Err(e) = self.auth.login(name).await {
            warn!(error = %e, "Login failed");
            self.notifier.alert("Login failed");
            return false;
        }
        self.on_login().await;
        true
    }

    /// Load the per-user views.
    pub async fn on_login(&mut self) {
        let Some(session) = self.auth.session() else {
            return;
        };
        info!(user = %session.user().name, "Loading user views");
        self.cart.load(session).await;
        self.orders.load(session).await;
    }

    /// Log out and drop per-user state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the stored token cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.cart.clear();
        self.orders.clear();
        self.auth.logout()
    }

    /// Add a product to the cart ("Please login first" when logged out).
    pub async fn add_to_cart(&mut self, product_id: ProductId) -> bool {
        self.cart.add(self.auth.session(), product_id).await
    }

    /// Check out, then refresh order history.
    pub async fn checkout(&mut self) -> bool {
        let Some(session) = self.auth.session() else {
            self.notifier.alert("Please login first");
            return false;
        };
        if self.cart.checkout(session).await.is_none() {
            return false;
        }
        self.orders.load(session).await;
        true
    }
}
