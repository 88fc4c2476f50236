//! Minimal `Cookie` / `Set-Cookie` handling.
//!
//! Only two cookies are ever read (the cart and the admin session) and both
//! carry URL-safe values, so no quoting or percent-decoding is done.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Find the value of cookie `name` across all `Cookie` headers.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// `Set-Cookie` value for an HttpOnly, site-wide cookie living `max_age_secs`.
pub fn build(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes `name`.
pub fn clear(name: &str, secure: bool) -> String {
    build(name, "", 0, secure)
}
