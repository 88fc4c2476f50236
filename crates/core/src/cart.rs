//! Client-held shopping cart and its cookie codec.
//!
//! The cart never touches the database. It lives in the `crave_cart` cookie
//! as base64 (URL-safe, unpadded) JSON. The encoded envelope carries its own
//! expiry so a cart older than [`CART_TTL_HOURS`] decodes as empty even when
//! the browser keeps the cookie around longer than asked.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Money, Timestamp};

/// Cookie name holding the encoded cart.
pub const CART_COOKIE: &str = "crave_cart";

/// Lifetime of a written cart.
pub const CART_TTL_HOURS: i64 = 24;

/// One line in the shopping cart.
///
/// Name, image and price are denormalized copies for display only; checkout
/// re-reads the variant from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub variant_id: DbId,
    pub product_name: String,
    pub image_url: String,
    pub price: Money,
    pub quantity: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub icing: String,
}

impl CartLine {
    /// `price × quantity` for this line.
    pub fn line_total(&self) -> Money {
        self.price * Money::from(self.quantity)
    }
}

/// Wire form of the cookie value.
#[derive(Serialize, Deserialize)]
struct Envelope {
    /// Unix seconds after which the cart is discarded.
    exp: i64,
    lines: Vec<CartLine>,
}

/// Decode a cookie value into cart lines.
///
/// Never fails: a missing, malformed or expired value yields an empty cart.
pub fn decode(value: Option<&str>) -> Vec<CartLine> {
    decode_at(value, Utc::now())
}

/// [`decode`] against an explicit clock.
pub fn decode_at(value: Option<&str>, now: Timestamp) -> Vec<CartLine> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Vec::new();
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(value) else {
        return Vec::new();
    };
    match serde_json::from_slice::<Envelope>(&bytes) {
        Ok(envelope) if envelope.exp > now.timestamp() => envelope.lines,
        _ => Vec::new(),
    }
}

/// Encode cart lines into a cookie value valid for [`CART_TTL_HOURS`].
pub fn encode(lines: &[CartLine]) -> String {
    encode_at(lines, Utc::now())
}

/// [`encode`] against an explicit clock.
pub fn encode_at(lines: &[CartLine], now: Timestamp) -> String {
    let envelope = Envelope {
        exp: (now + Duration::hours(CART_TTL_HOURS)).timestamp(),
        lines: lines.to_vec(),
    };
    // Serializing plain structs of strings and numbers cannot fail.
    let json = serde_json::to_vec(&envelope).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Add a line, merging into an existing line for the same variant.
///
/// A match sums the quantities and keeps the existing line's other fields.
pub fn add_line(mut lines: Vec<CartLine>, new_line: CartLine) -> Vec<CartLine> {
    match lines
        .iter_mut()
        .find(|line| line.variant_id == new_line.variant_id)
    {
        Some(existing) => existing.quantity += new_line.quantity,
        None => lines.push(new_line),
    }
    lines
}

/// Drop every line referencing `variant_id`.
pub fn remove_line(lines: Vec<CartLine>, variant_id: DbId) -> Vec<CartLine> {
    lines
        .into_iter()
        .filter(|line| line.variant_id != variant_id)
        .collect()
}

/// Shift the quantity of the line for `variant_id` by `delta`, never below 1.
///
/// Unknown variants leave the cart untouched. Removal only happens through
/// [`remove_line`].
pub fn change_quantity(mut lines: Vec<CartLine>, variant_id: DbId, delta: i32) -> Vec<CartLine> {
    if let Some(line) = lines.iter_mut().find(|line| line.variant_id == variant_id) {
        line.quantity = line.quantity.saturating_add(delta).max(1);
    }
    lines
}

/// Σ price × quantity over all lines.
pub fn total(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::line_total).sum()
}
