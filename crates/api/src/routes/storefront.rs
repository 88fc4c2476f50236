//! Route definitions for the public storefront.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{callback, cart, catalog, checkout, payment};
use crate::state::AppState;

/// Catalog pages. They depend on nothing but the catalog tables.
///
/// ```text
/// GET    /                     -> catalog::home
/// GET    /cakes                -> catalog::cakes
/// GET    /category?id=         -> catalog::category
/// GET    /product?id=          -> catalog::product
/// ```
pub fn catalog() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::home))
        .route("/cakes", get(catalog::cakes))
        .route("/category", get(catalog::category))
        .route("/product", get(catalog::product))
}

/// Pages that read or rewrite the visitor's cart cookie, plus the payment
/// pages that follow checkout.
///
/// ```text
/// GET    /cart                 -> cart::show
/// POST   /cart/add             -> cart::add
/// POST   /cart/remove          -> cart::remove
/// POST   /cart/update          -> cart::update
///
/// GET    /checkout             -> checkout::show
/// POST   /checkout             -> checkout::place_order
/// GET    /payment?order_id=    -> payment::show
/// GET    /api/order/status?id= -> payment::status
/// ```
pub fn shopping() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/update", post(cart::update))
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        .route("/payment", get(payment::show))
        .route("/api/order/status", get(payment::status))
}

/// Server-to-server endpoint called by Safaricom.
///
/// ```text
/// POST   /api/callback/mpesa   -> callback::mpesa
/// ```
pub fn gateway() -> Router<AppState> {
    Router::new().route("/api/callback/mpesa", post(callback::mpesa))
}
