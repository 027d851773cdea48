//! Admin API client.

use minie_core::{BestSeller, MonthlyStats, NewProduct, Order, OrderId, OrderStatus, Stats, User};
use minie_storefront::api::MessageResponse;
use minie_storefront::{ApiClient, ApiError, Session};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AdminError;

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct BestSellersResponse {
    #[serde(default)]
    products: Vec<BestSeller>,
}

/// Client for the admin endpoints, bound to an admin session.
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
    session: Session,
}

impl AdminClient {
    /// Bind `api` to an admin `session`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotAdmin` unless the session user is an admin.
    pub fn new(api: ApiClient, session: Session) -> Result<Self, AdminError> {
        if !session.is_admin() {
            return Err(AdminError::NotAdmin);
        }
        Ok(Self { api, session })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// `GET /admin/users/search?q=` - users whose name matches `query`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        let response: UsersResponse = self
            .api
            .get("admin/users/search", &[("q", query)], Some(&self.session))
            .await?;
        Ok(response.users)
    }

    /// `GET /admin/orders` - every order in the store.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.api
            .get("admin/orders", &[], Some(&self.session))
            .await
    }

    /// `PUT /admin/orders/{id}/status?status=` - move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the
    /// transition ("Invalid status change").
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let path = format!("admin/orders/{}/status", urlencoding::encode(id.as_str()));
        let _: MessageResponse = self
            .api
            .put(&path, &[("status", status.as_str())], Some(&self.session))
            .await?;
        Ok(())
    }

    /// `GET /admin/stats`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.api
            .get("admin/stats", &[], Some(&self.session))
            .await
    }

    /// `GET /admin/stats/monthly` - revenue since the first of the month.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn monthly_stats(&self) -> Result<MonthlyStats, ApiError> {
        self.api
            .get("admin/stats/monthly", &[], Some(&self.session))
            .await
    }

    /// `GET /admin/stats/bestsellers` - top products by units sold.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn best_sellers(&self) -> Result<Vec<BestSeller>, ApiError> {
        let response: BestSellersResponse = self
            .api
            .get("admin/stats/bestsellers", &[], Some(&self.session))
            .await?;
        Ok(response.products)
    }

    /// `POST /products` - add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub async fn add_product(&self, product: &NewProduct) -> Result<(), ApiError> {
        let _: MessageResponse = self
            .api
            .post("products", &[], Some(product), Some(&self.session))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minie_core::{Role, UserId};
    use minie_storefront::ApiConfig;
    use secrecy::SecretString;

    use super::*;

    fn session(role: Role) -> Session {
        let user = User {
            id: UserId::new(1),
            name: "ops".to_string(),
            role,
        };
        Session::new(SecretString::from("token"), user, None)
    }

    fn api() -> ApiClient {
        ApiClient::new(&ApiConfig::new("http://127.0.0.1:9").unwrap()).unwrap()
    }

    #[test]
    fn test_customer_session_is_refused() {
        let result = AdminClient::new(api(), session(Role::Customer));
        assert!(matches!(result, Err(AdminError::NotAdmin)));
    }

    #[test]
    fn test_admin_session_is_accepted() {
        let client = AdminClient::new(api(), session(Role::Admin)).unwrap();
        assert!(client.session().is_admin());
    }
}
