//! Order repository.
//!
//! Placing an order is a single transaction: resolve the customer, reserve
//! stock, freeze prices, insert the order and its items. Either all of it
//! commits or none of it does.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use football_shop_core::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

/// Hash stored for customers provisioned at checkout. Not a valid PHC
/// string, so password verification always fails for it.
pub const UNUSABLE_PASSWORD_HASH: &str = "!unusable";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    customer_name: String,
    customer_phone: String,
    customer_email: String,
    delivery_address: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    qty: i32,
    unit_price: Decimal,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let qty = u32::try_from(row.qty).map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid qty for order item {}", row.id))
        })?;
        let unit_price = Price::new(row.unit_price).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid unit price for order item {}", row.id))
        })?;

        Ok(Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            qty,
            unit_price,
        })
    }
}

fn order_from_rows(row: OrderRow, items: Vec<OrderItemRow>) -> Result<Order, RepositoryError> {
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(RepositoryError::DataCorruption)?;

    Ok(Order {
        id: OrderId::new(row.id),
        user_id: UserId::new(row.user_id),
        customer_name: row.customer_name,
        customer_phone: row.customer_phone,
        customer_email: row.customer_email,
        delivery_address: row.delivery_address,
        status,
        created_at: row.created_at,
        items: items
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?,
    })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order atomically.
    ///
    /// The customer's user is found by email or created with an unusable
    /// password. An existing non-empty `full_name` is never overwritten.
    /// Each line decrements stock and copies the product's current price into
    /// `unit_price`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InsufficientStock` if a product is inactive,
    /// missing, or lacks stock for its line; nothing is written in that case.
    /// Returns `RepositoryError::Conflict` if the order has no lines.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn place_order(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        if order.lines.is_empty() {
            return Err(RepositoryError::Conflict("order has no lines".to_owned()));
        }

        let mut tx = self.pool.begin().await?;

        let user_id =
            find_or_create_customer(&mut tx, &order.customer.email, &order.customer.name).await?;

        let mut frozen = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let qty = i32::try_from(line.qty)
                .map_err(|_| RepositoryError::InsufficientStock(line.product_id))?;

            let price: Option<Decimal> = sqlx::query_scalar(
                r"
                UPDATE products
                SET stock_qty = stock_qty - $2
                WHERE id = $1 AND is_active AND stock_qty >= $2
                RETURNING price
                ",
            )
            .bind(line.product_id)
            .bind(qty)
            .fetch_optional(&mut *tx)
            .await?;

            // Dropping `tx` without commit rolls back earlier decrements
            let price = price.ok_or(RepositoryError::InsufficientStock(line.product_id))?;
            frozen.push((line.product_id, qty, price));
        }

        let order_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO orders (user_id, customer_name, customer_phone, customer_email,
                                delivery_address, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(&order.customer.name)
        .bind(&order.customer.phone)
        .bind(&order.customer.email)
        .bind(order.customer.delivery_address.as_deref())
        .bind(OrderStatus::New.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for (product_id, qty, unit_price) in frozen {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, qty, unit_price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(qty)
            .bind(unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let order_id = OrderId::new(order_id);
        tracing::info!(order_id = %order_id, user_id = %user_id, "Order placed");
        Ok(order_id)
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, customer_name, customer_phone, customer_email,
                   delivery_address, status, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                   oi.qty, oi.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        order_from_rows(row, items).map(Some)
    }
}

/// Resolve the customer's user inside the order transaction.
async fn find_or_create_customer(
    tx: &mut Transaction<'_, Postgres>,
    email: &Email,
    full_name: &str,
) -> Result<UserId, RepositoryError> {
    let id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO users (email, password_hash, full_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET full_name = COALESCE(NULLIF(users.full_name, ''), EXCLUDED.full_name)
        RETURNING id
        ",
    )
    .bind(email)
    .bind(UNUSABLE_PASSWORD_HASH)
    .bind(full_name)
    .fetch_one(&mut **tx)
    .await?;

    Ok(UserId::new(id))
}
