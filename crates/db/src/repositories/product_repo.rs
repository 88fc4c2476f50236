//! Repository for the `products` and `product_variants` tables.

use sqlx::PgPool;
use crave_core::types::{DbId, Money};

use crate::models::product::{
    CreateProduct, CreateVariant, DeleteOutcome, Product, ProductVariant, UpdateProduct,
    VariantWithProduct, PLACEHOLDER_IMAGE,
};

/// Product columns plus the category name and cheapest variant price.
const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.description, p.image_url, p.category_id, \
     c.name AS category_name, p.is_active, \
     COALESCE((SELECT MIN(v.price) FROM product_variants v WHERE v.product_id = p.id), 0) \
         AS starting_price, \
     p.created_at \
     FROM products p";

const VARIANT_COLUMNS: &str = "id, product_id, weight_label, price";

const VARIANT_WITH_PRODUCT_SELECT: &str =
    "SELECT v.id, v.product_id, v.weight_label, v.price, \
     p.name AS product_name, p.image_url, p.is_active \
     FROM product_variants v JOIN products p ON p.id = v.product_id";

/// Provides catalog reads and admin writes for products and their variants.
pub struct ProductRepo;

impl ProductRepo {
    // -----------------------------------------------------------------------
    // Storefront reads
    // -----------------------------------------------------------------------

    /// Active products, newest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "{PRODUCT_SELECT} LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.is_active
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// Active products in a category, newest first.
    ///
    /// Uses an inner join, so uncategorized products never appear. Callers
    /// check the category exists before treating an empty list as valid.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "{PRODUCT_SELECT} JOIN categories c ON c.id = p.category_id
             WHERE p.is_active AND p.category_id = $1
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Find an active product. Inactive products are treated as absent.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "{PRODUCT_SELECT} LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1 AND p.is_active"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Variants of a product, cheapest first.
    pub async fn list_variants(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProductVariant>, sqlx::Error> {
        let query = format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants
             WHERE product_id = $1
             ORDER BY price ASC, id ASC"
        );
        sqlx::query_as::<_, ProductVariant>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve one variant of an active product.
    pub async fn find_variant(
        pool: &PgPool,
        variant_id: DbId,
    ) -> Result<Option<VariantWithProduct>, sqlx::Error> {
        let query = format!("{VARIANT_WITH_PRODUCT_SELECT} WHERE v.id = $1 AND p.is_active");
        sqlx::query_as::<_, VariantWithProduct>(&query)
            .bind(variant_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve many variants at once. Ids that do not exist, or belong to
    /// inactive products, are simply missing from the result.
    pub async fn find_variants_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<VariantWithProduct>, sqlx::Error> {
        let query = format!("{VARIANT_WITH_PRODUCT_SELECT} WHERE v.id = ANY($1) AND p.is_active");
        sqlx::query_as::<_, VariantWithProduct>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    /// Every product, active or not, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "{PRODUCT_SELECT} LEFT JOIN categories c ON c.id = p.category_id
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// Find a product regardless of its active flag.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "{PRODUCT_SELECT} LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a product and its initial variants in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let image_url = input
            .image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE);

        let mut tx = pool.begin().await?;

        let (product_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO products (name, description, image_url, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(image_url)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        for variant in &input.variants {
            sqlx::query(
                "INSERT INTO product_variants (product_id, weight_label, price)
                 VALUES ($1, $2, $3)",
            )
            .bind(product_id)
            .bind(&variant.weight_label)
            .bind(variant.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, product_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Add a variant to an existing product.
    pub async fn create_variant(
        pool: &PgPool,
        product_id: DbId,
        input: &CreateVariant,
    ) -> Result<ProductVariant, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_variants (product_id, weight_label, price)
             VALUES ($1, $2, $3)
             RETURNING {VARIANT_COLUMNS}"
        );
        sqlx::query_as::<_, ProductVariant>(&query)
            .bind(product_id)
            .bind(&input.weight_label)
            .bind(input.price)
            .fetch_one(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied; an
    /// empty `image_url` keeps the stored image and `category_id:
    /// Some(None)` leaves the product uncategorized.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category_id = CASE WHEN $7 THEN $4 ELSE category_id END,
                image_url = COALESCE(NULLIF($5, ''), image_url),
                is_active = COALESCE($6, is_active)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id.flatten())
        .bind(&input.image_url)
        .bind(input.is_active)
        .bind(input.category_id.is_some())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Overwrite a variant's price. Existing order items keep their own
    /// `price_at_purchase`.
    pub async fn update_variant_price(
        pool: &PgPool,
        variant_id: DbId,
        price: Money,
    ) -> Result<Option<ProductVariant>, sqlx::Error> {
        let query = format!(
            "UPDATE product_variants SET price = $2 WHERE id = $1 RETURNING {VARIANT_COLUMNS}"
        );
        sqlx::query_as::<_, ProductVariant>(&query)
            .bind(variant_id)
            .bind(price)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product, or deactivate it when order items reference any of
    /// its variants.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let (referenced,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM order_items oi
                JOIN product_variants v ON v.id = oi.product_variant_id
                WHERE v.product_id = $1
             )",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = if referenced {
            sqlx::query("UPDATE products SET is_active = false WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::Deactivated
        } else {
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::Deleted
        };

        tx.commit().await?;
        Ok(outcome)
    }
}
