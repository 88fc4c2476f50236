//! Errors from the Daraja client.

use crave_core::types::Money;

#[derive(Debug, thiserror::Error)]
pub enum MpesaError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The OAuth endpoint refused the consumer credentials.
    #[error("Daraja auth failed ({status}): {body}")]
    Auth {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The STK push endpoint rejected the request.
    #[error("Daraja push failed ({status}): {body}")]
    Gateway { status: u16, body: String },

    /// A success response whose body did not have the expected shape.
    #[error("Malformed Daraja response: {0}")]
    MalformedResponse(String),

    /// The amount cannot be expressed as a positive whole number of shillings.
    #[error("Amount {0} cannot be charged")]
    InvalidAmount(Money),
}
