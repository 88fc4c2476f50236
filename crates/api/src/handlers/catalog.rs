//! Storefront catalog pages.

use axum::extract::{Query, State};
use axum::Json;
use crave_core::error::CoreError;
use crave_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::AppResult;
use crate::handlers::IdQuery;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{CakesPage, CategoryPage, HomePage, ProductPage};

/// GET /
pub async fn home(State(state): State<AppState>) -> AppResult<Json<DataResponse<HomePage>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let products = ProductRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse {
        data: HomePage {
            categories,
            products,
        },
    }))
}

/// GET /cakes
pub async fn cakes(State(state): State<AppState>) -> AppResult<Json<DataResponse<CakesPage>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let products = ProductRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse {
        data: CakesPage {
            categories,
            products,
        },
    }))
}

/// GET /category?id=
///
/// 404 when the category does not exist; an existing but empty category
/// renders with no products.
pub async fn category(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<DataResponse<CategoryPage>>> {
    let category = CategoryRepo::find_by_id(&state.pool, query.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Category",
            id: query.id,
        })?;
    let products = ProductRepo::list_by_category(&state.pool, category.id).await?;
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(Json(DataResponse {
        data: CategoryPage {
            categories,
            category,
            products,
        },
    }))
}

/// GET /product?id=
pub async fn product(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<DataResponse<ProductPage>>> {
    let product = ProductRepo::find_active_by_id(&state.pool, query.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id: query.id,
        })?;
    let variants = ProductRepo::list_variants(&state.pool, product.id).await?;
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(Json(DataResponse {
        data: ProductPage {
            categories,
            product,
            variants,
        },
    }))
}
