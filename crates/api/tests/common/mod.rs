#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use crave_api::auth::password::hash_password;
use crave_api::config::ServerConfig;
use crave_api::router::build_app_router;
use crave_api::state::{AppState, Integrations};
use crave_core::types::{DbId, Money};
use crave_db::models::product::{CreateProduct, CreateVariant};
use crave_db::repositories::{ProductRepo, UserRepo};
use crave_events::NotificationQueue;
use crave_mpesa::{MpesaError, PaymentGateway, PushReceipt};

pub const ADMIN_USERNAME: &str = "owner";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

// ---------------------------------------------------------------------------
// Fake payment gateway
// ---------------------------------------------------------------------------

/// Records every push and answers with a fixed checkout request id, or
/// fails when built with [`FakeGateway::failing`].
pub struct FakeGateway {
    pub calls: Mutex<Vec<(String, Money, DbId)>>,
    checkout_request_id: String,
    fail: bool,
}

impl FakeGateway {
    pub fn accepting(checkout_request_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            checkout_request_id: checkout_request_id.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            checkout_request_id: String::new(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, Money, DbId)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn request_payment(
        &self,
        phone: &str,
        amount: Money,
        order_id: DbId,
    ) -> Result<PushReceipt, MpesaError> {
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), amount, order_id));
        if self.fail {
            return Err(MpesaError::Gateway {
                status: 500,
                body: "sandbox unavailable".into(),
            });
        }
        Ok(PushReceipt {
            merchant_request_id: "29115-34620561-1".into(),
            checkout_request_id: self.checkout_request_id.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a private upload dir.
pub fn test_config() -> ServerConfig {
    let root: PathBuf = std::env::temp_dir().join(format!("crave-test-{}", uuid::Uuid::new_v4()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        admin_session_ttl_hours: 12,
        cookie_secure: false,
        upload_dir: root.join("uploads"),
        static_dir: root,
        admin_email: None,
    }
}

/// Build the full application router against `pool` with an accepting gateway.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(FakeGateway::accepting("ws_CO_TEST")))
}

/// Build the full application router with a caller-supplied gateway.
///
/// The notification queue has no worker behind it, so enqueued jobs are
/// dropped with a warning.
pub fn build_test_app_with(pool: PgPool, gateway: Arc<FakeGateway>) -> Router {
    build_test_app_from(
        pool,
        gateway,
        Integrations {
            mpesa_credentials: true,
            email_enabled: false,
        },
    )
}

/// Build the full application router with explicit integration flags.
pub fn build_test_app_from(
    pool: PgPool,
    gateway: Arc<FakeGateway>,
    integrations: Integrations,
) -> Router {
    let config = test_config();
    let (notifications, _jobs) = NotificationQueue::new(64);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
        notifications,
        integrations,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(cookie)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_with_cookie(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(cookie)).await
}

pub async fn put_json_with_cookie(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(cookie)).await
}

pub async fn delete_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(cookie)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` pair from a response's `Set-Cookie` header, ready to be sent
/// back in a `Cookie` header.
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").trim().to_string())
        .find(|pair| pair.starts_with(&format!("{name}=")))
}

/// Full `Set-Cookie` header for `name`, attributes included.
pub fn set_cookie_header(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

/// Decimal fields serialize as strings.
pub fn money(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"))
        .parse()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an active product with one variant. Returns `(product_id, variant_id)`.
pub async fn seed_product(pool: &PgPool, name: &str, price: i64) -> (DbId, DbId) {
    let product = ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            description: format!("{name} with buttercream"),
            category_id: None,
            image_url: None,
            variants: vec![CreateVariant {
                weight_label: "1kg".into(),
                price: Money::from(price),
            }],
        },
    )
    .await
    .unwrap();
    let variants = ProductRepo::list_variants(pool, product.id).await.unwrap();
    (product.id, variants[0].id)
}

pub async fn seed_admin(pool: &PgPool) {
    let hash = hash_password(ADMIN_PASSWORD).unwrap();
    UserRepo::upsert(pool, ADMIN_USERNAME, &hash).await.unwrap();
}

/// Seed the admin account, log in and return the `admin_session=...` pair.
pub async fn admin_cookie(app: Router, pool: &PgPool) -> String {
    seed_admin(pool).await;
    let response = post_json(
        app,
        "/admin/login",
        serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&response, "admin_session").expect("login must set the session cookie")
}

/// Add `quantity` of `variant_id` to the cart carried by `cart_cookie` and
/// return the updated cookie pair.
pub async fn add_to_cart(
    app: Router,
    cart_cookie: Option<&str>,
    variant_id: DbId,
    quantity: i32,
) -> String {
    let response = send(
        app,
        Method::POST,
        "/cart/add",
        Some(serde_json::json!({ "variant_id": variant_id, "quantity": quantity })),
        cart_cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&response, "crave_cart").expect("cart mutation must set the cart cookie")
}

/// Check out the cart in `cart_cookie` as Jane with `phone`. Returns the
/// placed order id.
pub async fn place_order(app: Router, cart_cookie: &str, phone: &str) -> DbId {
    let response = post_json_with_cookie(
        app,
        "/checkout",
        serde_json::json!({
            "first_name": "Jane",
            "last_name": "Wanjiku",
            "email": "jane@example.com",
            "whatsapp_number": "0700111222",
            "phone": phone,
        }),
        cart_cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["order_id"].as_i64().unwrap()
}
