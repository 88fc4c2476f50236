//! Admin authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- opaque session tokens and their stored digests.

pub mod password;
pub mod session;
