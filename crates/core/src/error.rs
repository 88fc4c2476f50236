//! Storefront domain errors.
//!
//! Each variant maps to exactly one HTTP status in the api crate.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{0}")]
    Validation(String),

    /// Checkout or the checkout page was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line points at a variant that is gone or whose product is
    /// inactive.
    #[error("'{name}' is no longer available (variant {variant_id})")]
    VariantUnavailable { variant_id: DbId, name: String },

    #[error("Unknown order status '{0}'. Expected PENDING, PAID or FAILED")]
    UnknownStatus(String),

    /// No valid admin session accompanies the request.
    #[error("{0}")]
    Unauthorized(String),
}
