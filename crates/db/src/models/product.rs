//! Product and variant models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crave_core::types::{DbId, Money, Timestamp};

/// Image shown when a product has none uploaded.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/cake-placeholder.jpg";

/// A product joined with its category name and cheapest variant price.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub is_active: bool,
    /// Lowest variant price, zero when the product has no variants.
    pub starting_price: Money,
    pub created_at: Timestamp,
}

/// A row from the `product_variants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductVariant {
    pub id: DbId,
    pub product_id: DbId,
    pub weight_label: String,
    pub price: Money,
}

/// A variant joined with the display fields of its product.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VariantWithProduct {
    pub id: DbId,
    pub product_id: DbId,
    pub weight_label: String,
    pub price: Money,
    pub product_name: String,
    pub image_url: String,
    pub is_active: bool,
}

/// DTO for a variant supplied alongside a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariant {
    pub weight_label: String,
    pub price: Money,
}

/// DTO for creating a product together with its variants.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<DbId>,
    /// Defaults to [`PLACEHOLDER_IMAGE`] when omitted.
    pub image_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<CreateVariant>,
}

/// DTO for editing a product. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Absent keeps the category, `null` removes it, an id moves the
    /// product.
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<DbId>>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Wrap any value that is present in the body, `null` included, in `Some`.
/// Paired with `#[serde(default)]` so an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// What happened when a product was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The product and its variants were removed.
    Deleted,
    /// Orders reference the product, so it was hidden instead.
    Deactivated,
    NotFound,
}
