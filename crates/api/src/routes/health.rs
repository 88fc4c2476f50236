//! Liveness and readiness for the storefront.
//!
//! ```text
//! GET /health
//! ```
//!
//! The shop can take orders only when the database answers. Payments also
//! need Daraja credentials; without them orders are stored but no push
//! reaches the customer, so the service reports itself `degraded`. Email is
//! optional and never affects the status.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub payments: &'static str,
    pub email: &'static str,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match crave_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };
    let integrations = state.integrations;

    Json(HealthResponse {
        status: if database && integrations.mpesa_credentials {
            "ok"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        database,
        payments: if integrations.mpesa_credentials {
            "configured"
        } else {
            "missing_credentials"
        },
        email: if integrations.email_enabled {
            "enabled"
        } else {
            "disabled"
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
