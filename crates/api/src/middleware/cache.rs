//! Response caching policy for cookie-bound pages.

use axum::body::Body;
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Mark the response `Cache-Control: no-store`.
///
/// Applied to everything that reads the cart or admin session cookie, so a
/// shared proxy never replays one visitor's cart or back-office data to
/// another.
pub async fn no_store(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
