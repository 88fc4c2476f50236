use std::sync::Arc;

use crave_events::NotificationQueue;
use crave_mpesa::PaymentGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: crave_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Sends STK push requests. A fake in tests.
    pub gateway: Arc<dyn PaymentGateway>,
    /// Producer half of the order email queue.
    pub notifications: NotificationQueue,
    pub integrations: Integrations,
}

/// Which outside services were configured at startup. Reported by
/// `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integrations {
    /// Daraja consumer key and secret are both present.
    pub mpesa_credentials: bool,
    /// An SMTP host is set, so order emails are delivered.
    pub email_enabled: bool,
}
