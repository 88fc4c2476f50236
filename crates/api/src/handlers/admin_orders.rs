//! Back-office order views and manual status overrides.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crave_core::error::CoreError;
use crave_core::order_status::OrderStatus;
use crave_core::types::DbId;
use crave_db::repositories::OrderRepo;

use crate::error::AppResult;
use crate::middleware::admin::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{DashboardPage, OrderDetailPage};

/// Request body for `POST /admin/order/status`.
#[derive(Debug, Deserialize)]
pub struct StatusOverride {
    pub order_id: DbId,
    pub status: String,
}

/// GET /admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<DataResponse<DashboardPage>>> {
    let orders = OrderRepo::list(&state.pool).await?;
    let count = |wanted: OrderStatus| {
        orders
            .iter()
            .filter(|o| o.status == wanted.as_str())
            .count()
    };
    let pending_count = count(OrderStatus::Pending);
    let paid_count = count(OrderStatus::Paid);

    Ok(Json(DataResponse {
        data: DashboardPage {
            orders,
            pending_count,
            paid_count,
        },
    }))
}

/// GET /admin/orders/{id}
pub async fn detail(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderDetailPage>>> {
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;
    let items = OrderRepo::list_items(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: OrderDetailPage { order, items },
    }))
}

/// POST /admin/order/status
///
/// Any known status may replace any other.
pub async fn set_status(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(input): Json<StatusOverride>,
) -> AppResult<StatusCode> {
    let status: OrderStatus = input.status.parse()?;

    if !OrderRepo::update_status(&state.pool, input.order_id, status).await? {
        return Err(CoreError::NotFound {
            entity: "Order",
            id: input.order_id,
        }
        .into());
    }

    tracing::info!(
        order_id = input.order_id,
        status = %status,
        user_id = admin.user_id,
        "Order status overridden",
    );
    Ok(StatusCode::NO_CONTENT)
}
