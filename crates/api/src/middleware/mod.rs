//! Request extractors and middleware guarding protected routes.
//!
//! - [`admin::AdminSession`] -- requires a live admin session cookie.
//! - [`cache::no_store`] -- keeps cookie-bound responses out of shared caches.

pub mod admin;
pub mod cache;
