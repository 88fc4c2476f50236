//! Back-office catalog management: categories, products and variants.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crave_core::error::CoreError;
use crave_core::naming::category_slug;
use crave_core::types::{DbId, Money};
use crave_db::models::category::{Category, CreateCategory};
use crave_db::models::product::{
    CreateProduct, CreateVariant, DeleteOutcome, Product, ProductVariant, UpdateProduct,
};
use crave_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::AppResult;
use crate::middleware::admin::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{AdminCategoriesPage, AdminProductsPage, ProductEditPage};

/// Most variants accepted together with a new product.
pub const MAX_INITIAL_VARIANTS: usize = 3;

/// Request body for `PUT /admin/variants/{id}/price`.
#[derive(Debug, Deserialize)]
pub struct PriceUpdate {
    pub price: Money,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<DataResponse<AdminCategoriesPage>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: AdminCategoriesPage { categories },
    }))
}

/// POST /admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Category name is required".into()).into());
    }

    let category = CategoryRepo::create(&state.pool, name, &category_slug(name)).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// DELETE /admin/categories/{id}
///
/// Products in the category are kept and become uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Category",
            id,
        }
        .into());
    }
    tracing::info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// GET /admin/products
///
/// Includes inactive products.
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<DataResponse<AdminProductsPage>>> {
    let products = ProductRepo::list_all(&state.pool).await?;
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: AdminProductsPage {
            products,
            categories,
        },
    }))
}

/// POST /admin/products
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(mut input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(CoreError::Validation("Product name is required".into()).into());
    }
    if input.variants.len() > MAX_INITIAL_VARIANTS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_INITIAL_VARIANTS} variants can be added with a new product"
        ))
        .into());
    }
    for variant in &mut input.variants {
        validate_variant(variant)?;
    }
    ensure_category_exists(&state, input.category_id).await?;

    let product = ProductRepo::create(&state.pool, &input).await?;
    tracing::info!(
        product_id = product.id,
        variants = input.variants.len(),
        "Product created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /admin/products/{id}
pub async fn edit_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductEditPage>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    let variants = ProductRepo::list_variants(&state.pool, id).await?;
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(Json(DataResponse {
        data: ProductEditPage {
            product,
            variants,
            categories,
        },
    }))
}

/// PUT /admin/products/{id}
///
/// Omitted fields, and an empty `image_url`, keep their stored values.
/// `"category_id": null` removes the product from its category.
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::Validation("Product name cannot be empty".into()).into());
    }
    ensure_category_exists(&state, input.category_id.flatten()).await?;

    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    tracing::info!(product_id = id, "Product updated");

    Ok(Json(DataResponse { data: product }))
}

/// DELETE /admin/products/{id}
///
/// Responds with `deleted`, or `deactivated` when past orders still
/// reference the product.
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeleteOutcome>>> {
    let outcome = ProductRepo::delete(&state.pool, id).await?;
    if outcome == DeleteOutcome::NotFound {
        return Err(CoreError::NotFound {
            entity: "Product",
            id,
        }
        .into());
    }
    tracing::info!(product_id = id, outcome = ?outcome, "Product removed");
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// POST /admin/products/{id}/variants
pub async fn add_variant(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(product_id): Path<DbId>,
    Json(mut input): Json<CreateVariant>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductVariant>>)> {
    validate_variant(&mut input)?;
    ProductRepo::find_by_id(&state.pool, product_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        })?;

    let variant = ProductRepo::create_variant(&state.pool, product_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: variant })))
}

/// PUT /admin/variants/{id}/price
///
/// Orders already placed keep the price they were bought at.
pub async fn update_variant_price(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<DbId>,
    Json(input): Json<PriceUpdate>,
) -> AppResult<Json<DataResponse<ProductVariant>>> {
    validate_price(input.price)?;
    let variant = ProductRepo::update_variant_price(&state.pool, id, input.price)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ProductVariant",
            id,
        })?;
    tracing::info!(variant_id = id, price = %variant.price, "Variant price updated");
    Ok(Json(DataResponse { data: variant }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_variant(variant: &mut CreateVariant) -> Result<(), CoreError> {
    variant.weight_label = variant.weight_label.trim().to_string();
    if variant.weight_label.is_empty() {
        return Err(CoreError::Validation("Variant weight label is required".into()));
    }
    validate_price(variant.price)
}

fn validate_price(price: Money) -> Result<(), CoreError> {
    if price < Money::ZERO {
        return Err(CoreError::Validation(format!(
            "Price cannot be negative, got {price}"
        )));
    }
    Ok(())
}

async fn ensure_category_exists(state: &AppState, category_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = category_id {
        CategoryRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Category",
                id,
            })?;
    }
    Ok(())
}
