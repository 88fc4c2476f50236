//! Checkout: turn the cookie cart into a persisted order.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crave_core::cart::{self, CART_COOKIE};
use crave_core::checkout::{build_order_lines, CustomerDetails};
use crave_core::error::CoreError;
use crave_core::types::{DbId, Money};
use crave_db::models::order::CreateOrder;
use crave_db::repositories::{CategoryRepo, OrderRepo, ProductRepo};
use crave_events::NotificationJob;

use crate::cookies;
use crate::error::AppResult;
use crate::handlers::cart::read_cart;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{CartLineView, CheckoutPage, OrderPlaced};

/// Customer fields posted by the checkout form.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub whatsapp_number: String,
    /// Number that receives the M-Pesa prompt.
    #[serde(default)]
    pub phone: String,
}

/// GET /checkout
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<CheckoutPage>>> {
    let lines = read_cart(&headers);
    if lines.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(Json(DataResponse {
        data: CheckoutPage {
            categories,
            lines: lines.iter().map(CartLineView::from).collect(),
            total: cart::total(&lines),
        },
    }))
}

/// POST /checkout
///
/// Prices are re-read from storage; the cookie's copies are ignored. On
/// success the cart cookie is cleared and the order confirmation emails are
/// queued.
pub async fn place_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<CheckoutForm>,
) -> AppResult<impl IntoResponse> {
    let lines = read_cart(&headers);
    if lines.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let customer = CustomerDetails::parse(
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.whatsapp_number,
        &form.phone,
    )?;

    let ids: Vec<DbId> = lines.iter().map(|l| l.variant_id).collect();
    let prices: HashMap<DbId, Money> = ProductRepo::find_variants_by_ids(&state.pool, &ids)
        .await?
        .into_iter()
        .map(|v| (v.id, v.price))
        .collect();
    let order_lines = build_order_lines(&lines, &prices)?;

    let order = OrderRepo::create(
        &state.pool,
        &CreateOrder {
            customer,
            lines: order_lines,
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        total = %order.total_amount,
        items = lines.len(),
        "Order placed",
    );
    state
        .notifications
        .enqueue(NotificationJob::OrderPlaced { order_id: order.id });

    let placed = OrderPlaced {
        order_id: order.id,
        total: order.total_amount,
        status: order.status,
        payment_url: format!("/payment?order_id={}", order.id),
    };
    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookies::clear(CART_COOKIE, state.config.cookie_secure))],
        Json(DataResponse { data: placed }),
    ))
}
