//! Repository for the `orders` and `order_items` tables.

use sqlx::PgPool;
use crave_core::checkout::order_total;
use crave_core::order_status::OrderStatus;
use crave_core::types::DbId;

use crate::models::order::{CreateOrder, Order, OrderItemDetail};

const COLUMNS: &str = "id, first_name, last_name, email, whatsapp_number, customer_phone, \
                       total_amount, status, mpesa_receipt, checkout_request_id, created_at";

/// Provides order creation, lookup and payment status transitions.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order and all of its items atomically.
    ///
    /// Status is always `PENDING` and `created_at` is assigned by the
    /// database. The total is computed from the lines' `price_at_purchase`.
    /// Any failing item insert rolls back the whole order.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let customer = &input.customer;
        let total = order_total(&input.lines);

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO orders
                (first_name, last_name, email, whatsapp_number, customer_phone,
                 total_amount, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(&customer.whatsapp_number)
            .bind(&customer.payment_phone)
            .bind(total)
            .bind(OrderStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

        for line in &input.lines {
            sqlx::query(
                "INSERT INTO order_items
                    (order_id, product_variant_id, quantity, icing_flavor,
                     custom_message, price_at_purchase)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order.id)
            .bind(line.variant_id)
            .bind(line.quantity)
            .bind(&line.icing_flavor)
            .bind(&line.custom_message)
            .bind(line.price_at_purchase)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(order_id = order.id, items = input.lines.len(), "Order persisted");
        Ok(order)
    }

    /// All orders, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Order>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Just the status column, for the payment page's polling endpoint.
    pub async fn find_status(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite an order's status. No transition rules are applied.
    /// Returns `true` if the order exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: OrderStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the gateway's `CheckoutRequestID` for a submitted push.
    pub async fn set_checkout_request(
        pool: &PgPool,
        id: DbId,
        checkout_request_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE orders SET checkout_request_id = $2 WHERE id = $1")
            .bind(id)
            .bind(checkout_request_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark the pending order carrying `checkout_request_id` as paid.
    ///
    /// Returns the id of the updated order, or `None` when nothing matched.
    pub async fn mark_paid_by_checkout_request(
        pool: &PgPool,
        checkout_request_id: &str,
        receipt: Option<&str>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE orders
             SET status = 'PAID', mpesa_receipt = COALESCE($2, mpesa_receipt)
             WHERE checkout_request_id = $1 AND status = 'PENDING'
             RETURNING id",
        )
        .bind(checkout_request_id)
        .bind(receipt)
        .fetch_optional(pool)
        .await
    }

    /// Mark the most recent pending order for `phone` as paid.
    ///
    /// Concurrent pending orders from one phone are told apart only by
    /// recency (highest id wins).
    pub async fn mark_latest_pending_paid_by_phone(
        pool: &PgPool,
        phone: &str,
        receipt: Option<&str>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE orders
             SET status = 'PAID', mpesa_receipt = COALESCE($2, mpesa_receipt)
             WHERE id = (
                SELECT id FROM orders
                WHERE customer_phone = $1 AND status = 'PENDING'
                ORDER BY id DESC
                LIMIT 1
                FOR UPDATE
             )
             RETURNING id",
        )
        .bind(phone)
        .bind(receipt)
        .fetch_optional(pool)
        .await
    }

    /// Items of an order joined with their variant and product for display.
    pub async fn list_items(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderItemDetail>, sqlx::Error> {
        sqlx::query_as::<_, OrderItemDetail>(
            "SELECT oi.id, oi.order_id, oi.product_variant_id,
                    p.name AS product_name, p.image_url, v.weight_label,
                    oi.quantity, oi.icing_flavor, oi.custom_message, oi.price_at_purchase
             FROM order_items oi
             JOIN product_variants v ON v.id = oi.product_variant_id
             JOIN products p ON p.id = v.product_id
             WHERE oi.order_id = $1
             ORDER BY oi.id ASC",
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }
}
