//! Payment page and status polling.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crave_core::error::CoreError;
use crave_core::order_status::OrderStatus;
use crave_core::types::DbId;
use crave_db::repositories::{CategoryRepo, OrderRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{OrderStatusView, PaymentPage};

/// Status reported to the poller when the order cannot be read.
const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub order_id: DbId,
}

/// Lenient `?id=` for the poller; a bad value is answered, not rejected.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: Option<String>,
}

/// GET /payment?order_id=
///
/// Sends an STK push to the order's phone while it is still pending. A
/// gateway failure is logged and the page is served anyway so the customer
/// can keep polling or retry by reloading.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<DataResponse<PaymentPage>>> {
    let mut order = OrderRepo::find_by_id(&state.pool, query.order_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Order",
            id: query.order_id,
        })?;
    let items = OrderRepo::list_items(&state.pool, order.id).await?;

    let mut push_sent = false;
    if order.status == OrderStatus::Pending.as_str() {
        match state
            .gateway
            .request_payment(&order.customer_phone, order.total_amount, order.id)
            .await
        {
            Ok(receipt) => {
                OrderRepo::set_checkout_request(
                    &state.pool,
                    order.id,
                    &receipt.checkout_request_id,
                )
                .await?;
                order.checkout_request_id = Some(receipt.checkout_request_id);
                push_sent = true;
            }
            Err(e) => {
                tracing::warn!(order_id = order.id, error = %e, "STK push failed");
            }
        }
    }

    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: PaymentPage {
            categories,
            order,
            items,
            push_sent,
        },
    }))
}

/// GET /api/order/status?id=
///
/// Always 200. A missing or malformed id, an unknown order and a storage
/// failure all report `ERROR`.
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Json<OrderStatusView> {
    let Some(id) = query.id.as_deref().and_then(|s| s.trim().parse::<DbId>().ok()) else {
        return Json(OrderStatusView {
            status: STATUS_ERROR.to_string(),
        });
    };

    let status = match OrderRepo::find_status(&state.pool, id).await {
        Ok(Some(status)) => status,
        Ok(None) => STATUS_ERROR.to_string(),
        Err(e) => {
            tracing::error!(order_id = id, error = %e, "Failed to read order status");
            STATUS_ERROR.to_string()
        }
    };
    Json(OrderStatusView { status })
}
