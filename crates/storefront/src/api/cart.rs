//! Cart and checkout endpoints.

use minie_core::{CheckoutReceipt, LineItem, ProductId};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, MessageResponse};
use crate::error::Result;
use crate::session::Session;

/// Cart body; the backend answers `{"items": []}` for users without a cart.
#[derive(Debug, Default, Deserialize)]
struct CartResponse {
    #[serde(default)]
    items: Vec<LineItem>,
}

impl ApiClient {
    /// `GET /cart` - the session user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn cart(&self, session: &Session) -> Result<Vec<LineItem>> {
        let cart: CartResponse = self.get("cart", &[], Some(session)).await?;
        Ok(cart.items)
    }

    /// `POST /cart?product_id=` - add one unit of a product.
    ///
    /// Returns the updated cart lines.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it (e.g.
    /// "Out of stock").
    #[instrument(skip(self, session))]
    pub async fn add_to_cart(
        &self,
        session: &Session,
        product_id: ProductId,
    ) -> Result<Vec<LineItem>> {
        let product_id = product_id.to_string();
        let cart: CartResponse = self
            .post(
                "cart",
                &[("product_id", product_id.as_str())],
                None::<&()>,
                Some(session),
            )
            .await?;
        Ok(cart.items)
    }

    /// `DELETE /cart/{product_id}` - drop a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn remove_from_cart(&self, session: &Session, product_id: ProductId) -> Result<()> {
        let _: MessageResponse = self
            .delete(&format!("cart/{product_id}"), Some(session))
            .await?;
        Ok(())
    }

    /// `POST /checkout` - turn the cart into a pending order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it (empty
    /// cart, insufficient stock).
    #[instrument(skip(self, session))]
    pub async fn checkout(&self, session: &Session) -> Result<CheckoutReceipt> {
        self.post("checkout", &[], None::<&()>, Some(session)).await
    }
}
