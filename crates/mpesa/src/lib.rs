//! Safaricom Daraja (M-Pesa) integration.
//!
//! - [`client::DarajaClient`] acquires OAuth tokens and submits STK push
//!   requests.
//! - [`gateway::PaymentGateway`] is the seam the HTTP layer depends on, so
//!   tests can substitute a fake.
//! - [`callback`] parses and interprets the asynchronous result callback.

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;

pub use client::DarajaClient;
pub use config::MpesaConfig;
pub use error::MpesaError;
pub use gateway::{PaymentGateway, PushReceipt};
