//! Backend REST API client.
//!
//! One typed method per endpoint, grouped by area:
//! - [`products`] - catalog listing and search
//! - [`cart`] - cart view, mutation and checkout
//! - [`orders`] - order history, details and cancellation
//! - [`auth`] - login
//!
//! Authenticated calls take an explicit [`Session`]. Admin endpoints are
//! layered on top of the generic [`ApiClient::get`] / [`ApiClient::put`] /
//! [`ApiClient::post`] helpers by the admin crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use minie_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let products = client.search_products("shoe").await?;
//! let cart = client.add_to_cart(&session, products[0].id).await?;
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use std::net::IpAddr;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Span, debug, instrument};
use url::{Host, Url};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::session::Session;

/// Header carrying a per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Maximum number of body characters kept in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Acknowledgement body returned by mutation endpoints.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// FastAPI-style error body: `{"detail": "..."}`.
///
/// Validation errors carry a list instead of a string; those are not surfaced.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Cheaply cloneable; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// Proxies are bypassed when the backend is on a loopback address.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Resolve an endpoint path (relative, no leading slash) plus query pairs.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// `GET` an endpoint and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        session: Option<&Session>,
    ) -> Result<T> {
        self.send(Method::GET, path, query, None::<&()>, session)
            .await
    }

    /// `POST` to an endpoint with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    pub async fn post<T, B>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        session: Option<&Session>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, query, body, session).await
    }

    /// `PUT` to an endpoint (the backend takes PUT parameters in the query).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        session: Option<&Session>,
    ) -> Result<T> {
        self.send(Method::PUT, path, query, None::<&()>, session)
            .await
    }

    /// `DELETE` an endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&Session>,
    ) -> Result<T> {
        self.send(Method::DELETE, path, &[], None::<&()>, session)
            .await
    }

    /// Issue a request and decode the response body.
    #[instrument(
        skip(self, query, body, session),
        fields(request_id = tracing::field::Empty, status = tracing::field::Empty)
    )]
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        session: Option<&Session>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path, query)?;
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(session) = session {
            let value = HeaderValue::from_str(&session.bearer())
                .map_err(|_| ApiError::InvalidHeader("Authorization"))?;
            request = request.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        Span::current().record("status", status.as_u16());

        // Read as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&text),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                detail: parse_detail(&text),
            });
        }

        debug!(status = %status, "Backend request succeeded");

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&text),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

/// Extract the `detail` message from an error body.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let client = client("http://localhost:8000/api");
        let url = client
            .endpoint("/products/search", &[("q", "running shoe")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/products/search?q=running+shoe"
        );
    }

    #[test]
    fn test_endpoint_without_query() {
        let client = client("http://localhost:8000");
        let url = client.endpoint("cart", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/cart");
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(
            parse_detail(r#"{"detail": "Out of stock"}"#).as_deref(),
            Some("Out of stock")
        );
        assert_eq!(parse_detail(r#"{"detail": [{"loc": ["query", "q"]}]}"#), None);
        assert_eq!(parse_detail("Internal Server Error"), None);
    }

    #[test]
    fn test_is_loopback() {
        assert!(is_loopback(&Url::parse("http://localhost:8000").unwrap()));
        assert!(is_loopback(&Url::parse("http://127.0.0.1:8000").unwrap()));
        assert!(!is_loopback(&Url::parse("https://shop.example.com").unwrap()));
    }
}
