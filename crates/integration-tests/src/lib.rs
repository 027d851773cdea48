//! Integration test support for Minie.
//!
//! [`MockBackend`] serves the backend REST API from an in-process axum server
//! bound to `127.0.0.1:0`. It keeps its data as raw JSON so the client's wire
//! types are checked against the backend's shapes, and it records every
//! request so tests can assert exactly what the client sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p minie-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Token expiry used for every issued token (2100-01-01).
const TOKEN_EXP: i64 = 4_102_444_800;

/// One request as the backend received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

impl RecordedRequest {
    /// `METHOD /path?query`, for compact assertions.
    #[must_use]
    pub fn line(&self) -> String {
        match &self.query {
            Some(query) => format!("{} {}?{query}", self.method, self.path),
            None => format!("{} {}", self.method, self.path),
        }
    }
}

#[derive(Default)]
struct Data {
    users: Vec<Value>,
    products: Vec<Value>,
    carts: HashMap<i64, Vec<Value>>,
    orders: Vec<Value>,
    requests: Vec<RecordedRequest>,
    failures: HashMap<String, (StatusCode, String)>,
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Data>>);

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Data> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A running mock backend. The server stops when this is dropped.
pub struct MockBackend {
    addr: SocketAddr,
    data: Shared,
    server: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl MockBackend {
    /// Start a backend seeded with three users and four products.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let data = Shared::default();
        seed(&mut data.lock());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let app = router(data.clone());
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Mock backend stopped: {e}");
            }
        });

        Self { addr, data, server }
    }

    /// Base URL to point the client at.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.data.lock().requests.clone()
    }

    /// [`RecordedRequest::line`] for every request received so far.
    #[must_use]
    pub fn request_lines(&self) -> Vec<String> {
        self.data
            .lock()
            .requests
            .iter()
            .map(RecordedRequest::line)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.data.lock().requests.clear();
    }

    /// Answer `method path` with `status` and a `{"detail": ...}` body.
    pub fn fail(&self, method: &str, path: &str, status: StatusCode, detail: &str) {
        self.data
            .lock()
            .failures
            .insert(format!("{method} {path}"), (status, detail.to_string()));
    }

    /// Stop failing `method path`.
    pub fn recover(&self, method: &str, path: &str) {
        self.data.lock().failures.remove(&format!("{method} {path}"));
    }

    /// Insert an order directly.
    pub fn add_order(&self, id: &str, user_id: i64, status: &str, total: i64) {
        self.data.lock().orders.push(json!({
            "_id": id,
            "user_id": user_id,
            "items": [],
            "total": total,
            "status": status,
            "created_at": "2026-10-01T10:30:00",
        }));
    }

    /// Current status of an order.
    #[must_use]
    pub fn order_status(&self, id: &str) -> Option<String> {
        let data = self.data.lock();
        find_order(&data.orders, id)
            .and_then(|order| order["status"].as_str())
            .map(str::to_string)
    }

    /// Stock level of a product.
    #[must_use]
    pub fn product_qty(&self, product_id: i64) -> Option<i64> {
        let data = self.data.lock();
        find_product(&data.products, product_id).and_then(|p| p["qty"].as_i64())
    }

    /// Number of distinct lines in a user's cart.
    #[must_use]
    pub fn cart_len(&self, user_id: i64) -> usize {
        self.data.lock().carts.get(&user_id).map_or(0, Vec::len)
    }
}

/// Users, products and one admin.
///
/// - user 1 `asha` (customer), user 2 `ops` (admin), user 3 `ashwin` (customer)
/// - products 1-3 in stock, product 4 sold out
fn seed(data: &mut Data) {
    data.users = vec![
        json!({"user_id": 1, "name": "asha", "role": "customer"}),
        json!({"user_id": 2, "name": "ops", "role": "admin"}),
        json!({"user_id": 3, "name": "ashwin", "role": "customer"}),
    ];
    data.products = vec![
        json!({"product_id": 1, "name": "Running Shoe", "price": 2499, "qty": 5, "image": "shoe.png"}),
        json!({"product_id": 2, "name": "Canvas Shoe", "price": 1299, "qty": 1, "image": "canvas.png"}),
        json!({"product_id": 3, "name": "Leather Belt", "price": 499, "qty": 10, "image": "belt.png"}),
        json!({"product_id": 4, "name": "Silk Scarf", "price": 899, "qty": 0, "image": "scarf.png"}),
    ];
}

/// A token the mock accepts: `header.claims.signature`, claims in base64url.
#[must_use]
pub fn token_for(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.mock-signature")
}

fn router(data: Shared) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/products", get(list_products).post(add_product))
        .route("/products/search", get(search_products))
        .route("/cart", get(view_cart).post(add_to_cart))
        .route("/cart/{product_id}", delete(remove_from_cart))
        .route("/checkout", post(checkout))
        .route("/orders", get(list_orders))
        .route("/orders/details/{order_id}", get(order_details))
        .route("/orders/{order_id}/cancel", put(cancel_order))
        .route("/admin/orders", get(admin_orders))
        .route("/admin/orders/{order_id}/status", put(update_status))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/stats/monthly", get(monthly_stats))
        .route("/admin/stats/bestsellers", get(best_sellers))
        .route("/admin/users/search", get(search_users))
        .layer(middleware::from_fn_with_state(data.clone(), record))
        .with_state(data)
}

/// Record the request, then either inject a configured failure or pass on.
async fn record(State(data): State<Shared>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: header(headers, AUTHORIZATION.as_str()),
        request_id: header(headers, "x-request-id"),
    };
    let key = format!("{} {}", recorded.method, recorded.path);

    let failure = {
        let mut data = data.lock();
        data.requests.push(recorded);
        data.failures.get(&key).cloned()
    };
    if let Some((status, message)) = failure {
        return detail(status, &message);
    }
    next.run(request).await
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"detail": message}))).into_response()
}

type Handler = Result<Json<Value>, Response>;

/// Identity from the bearer token.
fn current_user(headers: &HeaderMap) -> Result<Value, Response> {
    let token = header(headers, AUTHORIZATION.as_str())
        .and_then(|value| value.strip_prefix("Bearer ").map(str::to_string))
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid auth scheme"))?;

    token
        .split('.')
        .nth(1)
        .and_then(|payload| URL_SAFE_NO_PAD.decode(payload).ok())
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn user_id(claims: &Value) -> i64 {
    claims["user_id"].as_i64().unwrap_or_default()
}

fn require_admin(headers: &HeaderMap) -> Result<Value, Response> {
    let claims = current_user(headers)?;
    if claims["role"] != "admin" {
        return Err(detail(StatusCode::FORBIDDEN, "Admin only"));
    }
    Ok(claims)
}

fn find_product(products: &[Value], id: i64) -> Option<&Value> {
    products.iter().find(|p| p["product_id"].as_i64() == Some(id))
}

fn find_order<'a>(orders: &'a [Value], id: &str) -> Option<&'a Value> {
    orders.iter().find(|o| o["_id"] == id)
}

fn name_matches(value: &Value, query: &str) -> bool {
    value["name"]
        .as_str()
        .is_some_and(|name| name.to_lowercase().contains(&query.to_lowercase()))
}

#[derive(Deserialize)]
struct LoginBody {
    name: String,
}

async fn login(State(data): State<Shared>, Json(body): Json<LoginBody>) -> Handler {
    let data = data.lock();
    let user = data
        .users
        .iter()
        .find(|u| u["name"] == body.name.as_str())
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "User not found"))?;

    let token = token_for(&json!({
        "user_id": user["user_id"],
        "role": user["role"],
        "name": user["name"],
        "exp": TOKEN_EXP,
    }));
    Ok(Json(json!({"access_token": token, "token_type": "bearer"})))
}

async fn list_products(State(data): State<Shared>) -> Json<Value> {
    Json(Value::Array(data.lock().products.clone()))
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

async fn search_products(
    State(data): State<Shared>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let data = data.lock();
    let matches = data
        .products
        .iter()
        .filter(|p| name_matches(p, &params.q))
        .cloned()
        .collect();
    Json(Value::Array(matches))
}

async fn add_product(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(product): Json<Value>,
) -> Handler {
    require_admin(&headers)?;
    data.lock().products.push(product);
    Ok(Json(json!({"message": "Product added"})))
}

async fn view_cart(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    let claims = current_user(&headers)?;
    let id = user_id(&claims);
    let items = data.lock().carts.get(&id).cloned().unwrap_or_default();
    Ok(Json(json!({"user_id": id, "items": items})))
}

#[derive(Deserialize)]
struct CartParams {
    product_id: i64,
}

async fn add_to_cart(
    State(data): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<CartParams>,
) -> Handler {
    let id = user_id(&current_user(&headers)?);
    let mut data = data.lock();
    let product = find_product(&data.products, params.product_id)
        .cloned()
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))?;
    let stock = product["qty"].as_i64().unwrap_or_default();

    let items = data.carts.entry(id).or_default();
    if let Some(item) = items
        .iter_mut()
        .find(|item| item["product_id"] == product["product_id"])
    {
        let qty = item["qty"].as_i64().unwrap_or_default();
        if qty + 1 > stock {
            return Err(detail(StatusCode::BAD_REQUEST, "Out of stock"));
        }
        item["qty"] = json!(qty + 1);
    } else {
        items.push(json!({
            "product_id": product["product_id"],
            "name": product["name"],
            "price": product["price"],
            "qty": 1,
            "image": product["image"],
        }));
    }
    Ok(Json(json!({"message": "Cart updated", "items": items})))
}

async fn remove_from_cart(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
) -> Handler {
    let id = user_id(&current_user(&headers)?);
    if let Some(items) = data.lock().carts.get_mut(&id) {
        items.retain(|item| item["product_id"].as_i64() != Some(product_id));
    }
    Ok(Json(json!({"message": "Item removed"})))
}

async fn checkout(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    let id = user_id(&current_user(&headers)?);
    let mut data = data.lock();
    let items = data.carts.get(&id).cloned().unwrap_or_default();
    if items.is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "Cart is empty"));
    }

    // Check every line before reserving any stock
    for item in &items {
        let stock = item["product_id"]
            .as_i64()
            .and_then(|product_id| find_product(&data.products, product_id))
            .and_then(|product| product["qty"].as_i64())
            .unwrap_or_default();
        if stock < item["qty"].as_i64().unwrap_or_default() {
            return Err(detail(
                StatusCode::BAD_REQUEST,
                &format!(
                    "Insufficient stock for item: {}",
                    item["name"].as_str().unwrap_or_default()
                ),
            ));
        }
    }

    let mut total = 0;
    for item in &items {
        let qty = item["qty"].as_i64().unwrap_or_default();
        adjust_stock(&mut data.products, &item["product_id"], -qty);
        total += item["price"].as_i64().unwrap_or_default() * qty;
    }

    let order_id = format!("o{}", data.orders.len() + 1);
    data.orders.push(json!({
        "_id": order_id,
        "user_id": id,
        "items": items,
        "total": total,
        "status": "pending",
        "created_at": "2026-10-18T09:00:00",
    }));
    data.carts.remove(&id);

    Ok(Json(json!({"message": "Checkout successful", "total": total})))
}

fn adjust_stock(products: &mut [Value], product_id: &Value, by: i64) {
    if let Some(product) = products
        .iter_mut()
        .find(|p| &p["product_id"] == product_id)
    {
        let qty = product["qty"].as_i64().unwrap_or_default();
        product["qty"] = json!(qty + by);
    }
}

async fn list_orders(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    let id = user_id(&current_user(&headers)?);
    let orders: Vec<Value> = data
        .lock()
        .orders
        .iter()
        .filter(|o| o["user_id"].as_i64() == Some(id))
        .cloned()
        .collect();
    Ok(Json(json!({"orders": orders})))
}

async fn order_details(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Handler {
    let id = user_id(&current_user(&headers)?);
    let data = data.lock();
    let mut order = find_order(&data.orders, &order_id)
        .filter(|o| o["user_id"].as_i64() == Some(id))
        .cloned()
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))?;
    // The detail endpoint projects the id away
    if let Some(fields) = order.as_object_mut() {
        fields.remove("_id");
    }
    Ok(Json(order))
}

async fn cancel_order(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Handler {
    let id = user_id(&current_user(&headers)?);
    let mut data = data.lock();
    let order = data
        .orders
        .iter_mut()
        .find(|o| o["_id"] == order_id.as_str())
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))?;

    if order["user_id"].as_i64() != Some(id) {
        return Err(detail(StatusCode::FORBIDDEN, "Not your order"));
    }
    if order["status"] != "pending" {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Only pending orders can be cancelled",
        ));
    }
    order["status"] = json!("cancelled");
    let items = order["items"].as_array().cloned().unwrap_or_default();

    // Cancelled stock goes back on the shelf
    for item in &items {
        let qty = item["qty"].as_i64().unwrap_or_default();
        adjust_stock(&mut data.products, &item["product_id"], qty);
    }
    Ok(Json(json!({"message": "Order cancelled"})))
}

async fn admin_orders(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    require_admin(&headers)?;
    Ok(Json(Value::Array(data.lock().orders.clone())))
}

#[derive(Deserialize)]
struct StatusParams {
    status: String,
}

async fn update_status(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Handler {
    require_admin(&headers)?;
    let mut data = data.lock();
    let order = data
        .orders
        .iter_mut()
        .find(|o| o["_id"] == order_id.as_str())
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Order not found"))?;

    let allowed: &[&str] = match order["status"].as_str() {
        Some("pending") => &["shipped", "cancelled"],
        Some("shipped") => &["delivered"],
        _ => &[],
    };
    if !allowed.contains(&params.status.as_str()) {
        return Err(detail(StatusCode::BAD_REQUEST, "Invalid status change"));
    }
    order["status"] = json!(params.status);
    Ok(Json(json!({"message": "Status updated"})))
}

async fn admin_stats(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    require_admin(&headers)?;
    let data = data.lock();
    let count = |status: &str| data.orders.iter().filter(|o| o["status"] == status).count();
    let revenue: i64 = data
        .orders
        .iter()
        .filter_map(|o| o["total"].as_i64())
        .sum();
    Ok(Json(json!({
        "total_orders": data.orders.len(),
        "total_revenue": revenue,
        "pending_orders": count("pending"),
        "delivered_orders": count("delivered"),
    })))
}

async fn monthly_stats(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    require_admin(&headers)?;
    let revenue: i64 = data
        .lock()
        .orders
        .iter()
        .filter_map(|o| o["total"].as_i64())
        .sum();
    Ok(Json(json!({"monthly_revenue": revenue})))
}

async fn best_sellers(State(data): State<Shared>, headers: HeaderMap) -> Handler {
    require_admin(&headers)?;
    let data = data.lock();

    let mut totals: HashMap<i64, (Value, i64, i64)> = HashMap::new();
    for item in data.orders.iter().flat_map(|o| o["items"].as_array().into_iter().flatten()) {
        let Some(product_id) = item["product_id"].as_i64() else {
            continue;
        };
        let qty = item["qty"].as_i64().unwrap_or_default();
        let price = item["price"].as_i64().unwrap_or_default();
        let entry = totals
            .entry(product_id)
            .or_insert_with(|| (item.clone(), 0, 0));
        entry.1 += qty;
        entry.2 += qty * price;
    }

    let mut ranked: Vec<_> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.1.cmp(&a.1.1).then(a.0.cmp(&b.0)));
    let products: Vec<Value> = ranked
        .into_iter()
        .take(5)
        .map(|(product_id, (item, sold, revenue))| {
            json!({
                "product_id": product_id,
                "name": item["name"],
                "image": item["image"],
                "total_sold": sold,
                "revenue": revenue,
            })
        })
        .collect();
    Ok(Json(json!({"products": products})))
}

async fn search_users(
    State(data): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Handler {
    require_admin(&headers)?;
    let users: Vec<Value> = data
        .lock()
        .users
        .iter()
        .filter(|u| name_matches(u, &params.q))
        .cloned()
        .collect();
    Ok(Json(json!({"users": users})))
}
