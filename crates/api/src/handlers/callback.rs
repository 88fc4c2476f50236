//! M-Pesa result callback.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crave_core::types::DbId;
use crave_db::repositories::OrderRepo;
use crave_mpesa::callback::{CallbackAck, CallbackEnvelope, CallbackOutcome, PaymentConfirmation};

use crate::state::AppState;

/// POST /api/callback/mpesa
///
/// The gateway always gets `{"ResultCode":0,"ResultDesc":"Accepted"}`, even
/// for bodies that cannot be parsed; retrying would not help either way.
pub async fn mpesa(State(state): State<AppState>, body: Bytes) -> Json<CallbackAck> {
    let envelope = match CallbackEnvelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "Unparseable M-Pesa callback");
            return Json(CallbackAck::accepted());
        }
    };

    match envelope.interpret() {
        CallbackOutcome::Paid(confirmation) => {
            match settle(&state, &confirmation).await {
                Ok(Some(order_id)) => tracing::info!(
                    order_id,
                    receipt = confirmation.receipt.as_deref().unwrap_or(""),
                    "Order paid",
                ),
                Ok(None) => tracing::warn!(
                    checkout_request_id = confirmation.checkout_request_id.as_deref().unwrap_or(""),
                    phone = confirmation.phone.as_deref().unwrap_or(""),
                    "Payment confirmed but no pending order matched",
                ),
                Err(e) => tracing::error!(error = %e, "Failed to record payment"),
            }
        }
        CallbackOutcome::Rejected {
            checkout_request_id,
            code,
            description,
        } => {
            tracing::info!(
                checkout_request_id = checkout_request_id.as_deref().unwrap_or(""),
                code,
                description = %description,
                "Payment not completed",
            );
        }
    }

    Json(CallbackAck::accepted())
}

/// Mark the matching order paid. The checkout request id is tried first,
/// then the most recent pending order for the payer's phone.
async fn settle(
    state: &AppState,
    confirmation: &PaymentConfirmation,
) -> Result<Option<DbId>, sqlx::Error> {
    let receipt = confirmation.receipt.as_deref();

    if let Some(checkout_request_id) = confirmation.checkout_request_id.as_deref() {
        if let Some(id) =
            OrderRepo::mark_paid_by_checkout_request(&state.pool, checkout_request_id, receipt)
                .await?
        {
            return Ok(Some(id));
        }
    }

    match confirmation.phone.as_deref().filter(|p| !p.is_empty()) {
        Some(phone) => {
            OrderRepo::mark_latest_pending_paid_by_phone(&state.pool, phone, receipt).await
        }
        None => Ok(None),
    }
}
