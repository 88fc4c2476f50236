//! Route definitions for the `/admin` back office.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_auth, admin_catalog, admin_orders, uploads};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Everything except `/login` requires an admin session (enforced by the
/// `AdminSession` extractor).
///
/// ```text
/// POST   /login                    -> admin_auth::login
/// POST   /logout                   -> admin_auth::logout
///
/// GET    /dashboard                -> admin_orders::dashboard
/// GET    /orders/{id}              -> admin_orders::detail
/// POST   /order/status             -> admin_orders::set_status
///
/// GET    /categories               -> admin_catalog::list_categories
/// POST   /categories               -> admin_catalog::create_category
/// DELETE /categories/{id}          -> admin_catalog::delete_category
///
/// GET    /products                 -> admin_catalog::list_products
/// POST   /products                 -> admin_catalog::create_product
/// GET    /products/{id}            -> admin_catalog::edit_product
/// PUT    /products/{id}            -> admin_catalog::update_product
/// DELETE /products/{id}            -> admin_catalog::delete_product
/// POST   /products/{id}/variants   -> admin_catalog::add_variant
/// PUT    /variants/{id}/price      -> admin_catalog::update_variant_price
///
/// POST   /uploads                  -> uploads::upload_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin_auth::login))
        .route("/logout", post(admin_auth::logout))
        .route("/dashboard", get(admin_orders::dashboard))
        .route("/orders/{id}", get(admin_orders::detail))
        .route("/order/status", post(admin_orders::set_status))
        .route(
            "/categories",
            get(admin_catalog::list_categories).post(admin_catalog::create_category),
        )
        .route(
            "/categories/{id}",
            axum::routing::delete(admin_catalog::delete_category),
        )
        .route(
            "/products",
            get(admin_catalog::list_products).post(admin_catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(admin_catalog::edit_product)
                .put(admin_catalog::update_product)
                .delete(admin_catalog::delete_product),
        )
        .route(
            "/products/{id}/variants",
            post(admin_catalog::add_variant),
        )
        .route(
            "/variants/{id}/price",
            put(admin_catalog::update_variant_price),
        )
        .route(
            "/uploads",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES)),
        )
}
