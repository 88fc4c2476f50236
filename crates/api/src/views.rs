//! One view model per page.
//!
//! Every page handler answers with exactly one of these inside a
//! [`DataResponse`](crate::response::DataResponse). Storefront pages carry the
//! category list for the navigation menu.

use serde::Serialize;

use crave_core::cart::{self, CartLine};
use crave_core::types::{DbId, Money};
use crave_db::models::category::Category;
use crave_db::models::order::{Order, OrderItemDetail};
use crave_db::models::product::{Product, ProductVariant};

// ---------------------------------------------------------------------------
// Storefront
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CakesPage {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub categories: Vec<Category>,
    pub category: Category,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub categories: Vec<Category>,
    pub product: Product,
    /// Cheapest first.
    pub variants: Vec<ProductVariant>,
}

/// A cart line as displayed, with its computed subtotal.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub variant_id: DbId,
    pub product_name: String,
    pub image_url: String,
    pub price: Money,
    pub quantity: i32,
    pub message: String,
    pub icing: String,
    pub line_total: Money,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            variant_id: line.variant_id,
            product_name: line.product_name.clone(),
            image_url: line.image_url.clone(),
            price: line.price,
            quantity: line.quantity,
            message: line.message.clone(),
            icing: line.icing.clone(),
            line_total: line.line_total(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartPage {
    pub categories: Vec<Category>,
    pub lines: Vec<CartLineView>,
    pub item_count: i32,
    pub total: Money,
}

impl CartPage {
    pub fn new(categories: Vec<Category>, lines: &[CartLine]) -> Self {
        Self {
            categories,
            lines: lines.iter().map(CartLineView::from).collect(),
            item_count: lines.iter().map(|l| l.quantity).sum(),
            total: cart::total(lines),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutPage {
    pub categories: Vec<Category>,
    pub lines: Vec<CartLineView>,
    pub total: Money,
}

/// Answer to a successful `POST /checkout`.
#[derive(Debug, Serialize)]
pub struct OrderPlaced {
    pub order_id: DbId,
    pub total: Money,
    pub status: String,
    /// Where the browser goes next.
    pub payment_url: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentPage {
    pub categories: Vec<Category>,
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    /// Whether a payment prompt was sent to the phone on this visit.
    pub push_sent: bool,
}

/// Body of `GET /api/order/status`. Not enveloped.
#[derive(Debug, Serialize)]
pub struct OrderStatusView {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Back office
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub username: String,
    pub expires_at: crave_core::types::Timestamp,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    /// Newest first.
    pub orders: Vec<Order>,
    pub pending_count: usize,
    pub paid_count: usize,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailPage {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

#[derive(Debug, Serialize)]
pub struct AdminProductsPage {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct ProductEditPage {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct AdminCategoriesPage {
    pub categories: Vec<Category>,
}

/// Answer to a multipart image upload.
#[derive(Debug, Serialize)]
pub struct UploadedImage {
    /// Public URL to store as a product's `image_url`.
    pub url: String,
    pub size_bytes: usize,
}
