//! Crave & Glaze domain core.
//!
//! Pure, I/O-free building blocks shared by the database, payment, email
//! and HTTP crates: identifier and money types, the error taxonomy, the
//! cookie cart codec, checkout validation, and the small normalization
//! helpers (phone numbers, category slugs).

pub mod cart;
pub mod checkout;
pub mod error;
pub mod naming;
pub mod order_status;
pub mod phone;
pub mod types;
