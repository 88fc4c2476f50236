//! Order notifications for Crave & Glaze.
//!
//! - [`NotificationQueue`] accepts jobs from request handlers without
//!   blocking them.
//! - [`NotificationWorker`] drains the queue, renders receipts and hands them
//!   to a [`Mailer`], reporting failures on a separate channel.
//! - [`delivery`] holds the SMTP transport.
//! - [`receipts`] renders the customer receipt and the admin alert.

pub mod delivery;
pub mod queue;
pub mod receipts;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, Mailer, OutgoingEmail};
pub use queue::{
    log_failures, NotificationFailure, NotificationJob, NotificationQueue, NotificationWorker,
};
