//! Application router shared by `main.rs` and the integration tests.
//!
//! ```text
//! /health                 liveness and integration readiness
//! /, /cakes, ...          catalog pages
//! /cart, /checkout, ...   cart-cookie pages            Cache-Control: no-store
//! /api/callback/mpesa     Daraja result callback
//! /admin/...              back office                  Cache-Control: no-store
//! /static/...             images, assets and uploads from STATIC_DIR
//! ```

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::middleware::from_fn;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::cache::no_store;
use crate::routes;
use crate::state::AppState;

/// Assemble the storefront, the payment callback and the back office.
///
/// Layers run outermost first: CORS, request id, tracing, request id echo,
/// timeout, panic recovery.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let shop = routes::storefront::shopping().layer(from_fn(no_store));
    let admin = routes::admin::router().layer(from_fn(no_store));

    let requests = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::new());

    Router::new()
        .merge(routes::health::router())
        .merge(routes::storefront::catalog())
        .merge(shop)
        .merge(routes::storefront::gateway())
        .nest("/admin", admin)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(requests)
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// CORS for the browser front end. Both the cart and the admin session
/// travel as cookies, so credentials are allowed and origins must be listed.
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
