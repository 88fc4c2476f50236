//! Handlers for the cookie-held shopping cart.
//!
//! Every mutation reads the `crave_cart` cookie, applies the change and
//! writes the whole cart back with a fresh 24-hour lifetime. Nothing here
//! touches the orders tables.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crave_core::cart::{self, CartLine, CART_COOKIE, CART_TTL_HOURS};
use crave_core::checkout::validate_quantity;
use crave_core::error::CoreError;
use crave_core::types::DbId;
use crave_db::repositories::{CategoryRepo, ProductRepo};

use crate::cookies;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::CartPage;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub variant_id: DbId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub icing: String,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCart {
    pub variant_id: DbId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAction {
    Increase,
    Decrease,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartLine {
    pub variant_id: DbId,
    pub action: QuantityAction,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /cart
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<CartPage>>> {
    let lines = read_cart(&headers);
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: CartPage::new(categories, &lines),
    }))
}

/// POST /cart/add
///
/// The display name, image and price are copied from storage, never from
/// the request. Adding a variant already in the cart sums the quantities.
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AddToCart>,
) -> AppResult<impl IntoResponse> {
    validate_quantity(input.quantity)?;

    let variant = ProductRepo::find_variant(&state.pool, input.variant_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ProductVariant",
            id: input.variant_id,
        })?;

    let lines = cart::add_line(
        read_cart(&headers),
        CartLine {
            variant_id: variant.id,
            product_name: variant.product_name,
            image_url: variant.image_url,
            price: variant.price,
            quantity: input.quantity,
            message: input.message.trim().to_string(),
            icing: input.icing.trim().to_string(),
        },
    );
    if let Some(merged) = lines.iter().find(|l| l.variant_id == variant.id) {
        validate_quantity(merged.quantity)?;
    }

    tracing::debug!(variant_id = variant.id, quantity = input.quantity, "Added to cart");
    write_cart(&state, lines).await
}

/// POST /cart/remove
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RemoveFromCart>,
) -> AppResult<impl IntoResponse> {
    let lines = cart::remove_line(read_cart(&headers), input.variant_id);
    write_cart(&state, lines).await
}

/// POST /cart/update
///
/// Steps the quantity by one. Decreasing never drops below 1.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<UpdateCartLine>,
) -> AppResult<impl IntoResponse> {
    let delta = match input.action {
        QuantityAction::Increase => 1,
        QuantityAction::Decrease => -1,
    };
    let lines = cart::change_quantity(read_cart(&headers), input.variant_id, delta);
    if let Some(line) = lines.iter().find(|l| l.variant_id == input.variant_id) {
        validate_quantity(line.quantity)?;
    }
    write_cart(&state, lines).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode the cart cookie from request headers. Unreadable carts are empty.
pub fn read_cart(headers: &HeaderMap) -> Vec<CartLine> {
    cart::decode(cookies::read(headers, CART_COOKIE).as_deref())
}

/// Encode `lines` into a `Set-Cookie` value.
pub fn cart_cookie(lines: &[CartLine], secure: bool) -> String {
    cookies::build(
        CART_COOKIE,
        &cart::encode(lines),
        CART_TTL_HOURS * 3600,
        secure,
    )
}

async fn write_cart(state: &AppState, lines: Vec<CartLine>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let cookie = cart_cookie(&lines, state.config.cookie_secure);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: CartPage::new(categories, &lines),
        }),
    ))
}
