//! Order and order-item models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use crave_core::checkout::{CustomerDetails, OrderLine};
use crave_core::types::{DbId, Money, Timestamp};

/// A row from the `orders` table.
///
/// `status` is stored as text and parsed with
/// [`crave_core::order_status::OrderStatus`] at the edges.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub whatsapp_number: String,
    pub customer_phone: String,
    pub total_amount: Money,
    pub status: String,
    pub mpesa_receipt: Option<String>,
    pub checkout_request_id: Option<String>,
    pub created_at: Timestamp,
}

/// Input for [`crate::repositories::OrderRepo::create`].
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
}

/// An order item joined with the product and variant it refers to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItemDetail {
    pub id: DbId,
    pub order_id: DbId,
    pub product_variant_id: DbId,
    pub product_name: String,
    pub image_url: String,
    pub weight_label: String,
    pub quantity: i32,
    pub icing_flavor: String,
    pub custom_message: String,
    pub price_at_purchase: Money,
}

impl OrderItemDetail {
    pub fn line_total(&self) -> Money {
        self.price_at_purchase * Money::from(self.quantity)
    }
}
