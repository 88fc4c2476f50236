//! Opaque admin session tokens.
//!
//! The browser holds a random token in the `admin_session` cookie; the
//! database only ever sees its SHA-256 digest.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const ADMIN_SESSION_COOKIE: &str = "admin_session";

/// Generate a fresh token. Returns `(plaintext, sha256_hex)`.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().simple().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
