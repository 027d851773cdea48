//! Cart view.

use std::sync::Arc;

use minie_core::{CheckoutReceipt, LineItem, Price, Product, ProductId};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::notify::Notifier;
use crate::session::Session;

/// The session user's cart. Local lines are a cache of the backend's cart.
pub struct CartView {
    client: ApiClient,
    items: Vec<LineItem>,
    notifier: Arc<dyn Notifier>,
}

impl CartView {
    #[must_use]
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            items: Vec::new(),
            notifier,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals as currently displayed.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Forget the displayed lines (e.g. on logout).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Re-fetch the cart.
    pub async fn load(&mut self, session: &Session) -> bool {
        match self.client.cart(session).await {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load cart");
                self.notifier.alert("Failed to load cart");
                false
            }
        }
    }

    /// Add one unit of a listed product.
    ///
    /// Out-of-stock products alert "Out of stock" without a request.
    pub async fn add_product(&mut self, session: Option<&Session>, product: &Product) -> bool {
        if !product.is_in_stock() {
            tracing::debug!(product_id = %product.id, "Refusing add for out-of-stock product");
            self.notifier.alert("Out of stock");
            return false;
        }
        self.add(session, product.id).await
    }

    /// Add one unit of a product, then reload the cart.
    #[instrument(skip(self, session))]
    pub async fn add(&mut self, session: Option<&Session>, product_id: ProductId) -> bool {
        let Some(session) = session else {
            self.notifier.alert("Please login first");
            return false;
        };

        match self.client.add_to_cart(session, product_id).await {
            Ok(_) => self.load(session).await,
            Err(e) => {
                self.notifier.alert(&e.user_message("Error"));
                false
            }
        }
    }

    /// Remove a line, then reload the cart.
    #[instrument(skip(self, session))]
    pub async fn remove(&mut self, session: &Session, product_id: ProductId) -> bool {
        match self.client.remove_from_cart(session, product_id).await {
            Ok(()) => self.load(session).await,
            Err(e) => {
                self.notifier.alert(&e.user_message("Error"));
                false
            }
        }
    }

    /// Place an order for the cart contents.
    ///
    /// On success the displayed cart is emptied; the caller refreshes order
    /// history.
    #[instrument(skip(self, session))]
    pub async fn checkout(&mut self, session: &Session) -> Option<CheckoutReceipt> {
        match self.client.checkout(session).await {
            Ok(receipt) => {
                info!(total = %receipt.total, "Checkout complete");
                self.notifier
                    .alert(&format!("Success! Total: {}", receipt.total));
                self.items.clear();
                Some(receipt)
            }
            Err(e) => {
                tracing::error!(error = %e, "Checkout failed");
                self.notifier.alert("Checkout failed");
                None
            }
        }
    }
}
