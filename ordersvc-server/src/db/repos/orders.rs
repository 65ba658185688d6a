//! Order repository.
//!
//! Creation writes the whole order graph through one transaction and
//! wraps the attempt in the bounded retry policy, so a burst that
//! briefly exhausts the pool degrades into a short backoff instead of a
//! failed request. Listing comes in two variants sharing one ordering
//! key: offset pages (cheap totals, boundaries shift under concurrent
//! inserts) and keyset cursors (stable under concurrent inserts, no
//! totals).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tokio_util::sync::CancellationToken;

use ordersvc_core::retry::{self, RetryConfig, RetryError};

use super::super::StoreError;
use crate::models::{Cursor, NewOrder, OrderStatus, Paginated, Pagination};

/// Order header with its items, as persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Outcome of a bulk creation: created orders plus per-entry failures.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub created: Vec<Order>,
    pub failures: Vec<(usize, StoreError)>,
}

/// Order repository
pub struct OrderRepo<'a> {
    pool: &'a PgPool,
    retry: RetryConfig,
    shutdown: CancellationToken,
}

impl<'a> OrderRepo<'a> {
    pub fn new(pool: &'a PgPool, retry: RetryConfig, shutdown: CancellationToken) -> Self {
        Self {
            pool,
            retry,
            shutdown,
        }
    }

    /// Create an order with all of its items in a single transaction.
    ///
    /// The attempt is re-run under the configured backoff while the
    /// failure stays a transient connection error; every retry starts a
    /// fresh transaction. On success the returned order carries the
    /// generated ids and the insert-time timestamps.
    pub async fn create_with_items(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let result = retry::execute(self.retry, &self.shutdown, StoreError::is_transient, || {
            self.create_once(order)
        })
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(RetryError::Cancelled) => Err(StoreError::Cancelled),
            // non-retryable causes keep their original kind for callers
            Err(RetryError::ConditionNotMet { source }) => Err(source),
            Err(RetryError::Exhausted { attempts, source }) => Err(StoreError::RetriesExhausted {
                attempts,
                source: Box::new(source),
            }),
        }
    }

    /// One creation attempt: header insert, item inserts, commit.
    /// The transaction rolls back on drop if any step fails.
    async fn create_once(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from_tx)?;

        let header = sqlx::query(
            r#"
            INSERT INTO orders (customer_name, customer_email, total_amount, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(order.customer_name())
        .bind(order.customer_email())
        .bind(order.total_amount())
        .bind(order.status().as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::from_query)?;

        let order_id: i64 = header.get("id");
        let created_at: DateTime<Utc> = header.get("created_at");
        let updated_at: DateTime<Utc> = header.get("updated_at");

        let mut items = Vec::with_capacity(order.items().len());
        for item in order.items() {
            let row = sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_name, quantity, unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(order_id)
            .bind(item.product_name())
            .bind(item.quantity())
            .bind(item.unit_price())
            .bind(item.total_price())
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::from_query)?;

            items.push(OrderItem {
                id: row.get("id"),
                order_id,
                product_name: item.product_name().to_owned(),
                quantity: item.quantity(),
                unit_price: item.unit_price(),
                total_price: item.total_price(),
            });
        }

        tx.commit().await.map_err(StoreError::from_tx)?;

        Ok(Order {
            id: order_id,
            customer_name: order.customer_name().to_owned(),
            customer_email: order.customer_email().map(str::to_owned),
            total_amount: order.total_amount(),
            status: order.status(),
            items,
            created_at,
            updated_at,
        })
    }

    /// Create a batch of orders, one transaction per order.
    ///
    /// A failed entry is recorded and the rest of the batch proceeds;
    /// only shutdown stops the loop early.
    pub async fn create_many(&self, orders: &[NewOrder]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();

        for (index, order) in orders.iter().enumerate() {
            match self.create_with_items(order).await {
                Ok(created) => outcome.created.push(created),
                Err(err) => {
                    tracing::warn!(index, error = %err, "bulk order entry failed");
                    let cancelled = matches!(err, StoreError::Cancelled);
                    outcome.failures.push((index, err));
                    if cancelled {
                        break;
                    }
                }
            }
        }

        outcome
    }

    /// Fetch one order with its items.
    pub async fn get(&self, id: i64) -> Result<Order, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_name, customer_email, total_amount, status,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(StoreError::from_query)?
        .ok_or(StoreError::NotFound { id })?;

        let mut order = order_from_row(&row)?;
        order.items = self.items_for(order.id).await?;
        Ok(order)
    }

    /// List orders newest-first, resuming after `cursor` when given.
    ///
    /// The row-value comparison keeps the walk stable while new orders
    /// land at the head: keys of already-returned rows never change, so
    /// nothing repeats or goes missing. The returned cursor is `None`
    /// when the page came back empty.
    pub async fn list(
        &self,
        limit: i64,
        cursor: Option<&Cursor>,
    ) -> Result<(Vec<Order>, Option<Cursor>), StoreError> {
        let rows = match cursor {
            Some(c) => {
                sqlx::query(
                    r#"
                    SELECT id, customer_name, customer_email, total_amount, status,
                           created_at, updated_at
                    FROM orders
                    WHERE (created_at, id) < ($1, $2)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $3
                    "#,
                )
                .bind(c.created_at)
                .bind(c.id)
                .bind(limit)
                .fetch_all(self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, customer_name, customer_email, total_amount, status,
                           created_at, updated_at
                    FROM orders
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(self.pool)
                .await
            }
        }
        .map_err(StoreError::from_query)?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut order = order_from_row(row)?;
            order.items = self.items_for(order.id).await?;
            orders.push(order);
        }

        let next = orders.last().map(|o| Cursor::after(o.created_at, o.id));
        Ok((orders, next))
    }

    /// List one offset page newest-first, with the total row count.
    ///
    /// Boundaries shift while writes land at the head; use [`Self::list`]
    /// when walk stability matters more than page numbers.
    pub async fn list_page(&self, page: Pagination) -> Result<Paginated<Order>, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await
            .map_err(StoreError::from_query)?;

        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, customer_email, total_amount, status,
                   created_at, updated_at
            FROM orders
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await
        .map_err(StoreError::from_query)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut order = order_from_row(row)?;
            order.items = self.items_for(order.id).await?;
            items.push(order);
        }

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Flip an order's status, refreshing `updated_at`.
    ///
    /// Existence is verified through the affected-row count; racing
    /// updates are last-writer-wins.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(StoreError::from_query)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }

        Ok(())
    }

    /// Items for one order, in insertion order. A failure here aborts
    /// the surrounding listing; partial orders are never returned.
    async fn items_for(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_name, quantity, unit_price, total_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await
        .map_err(StoreError::from_query)
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let id: i64 = row.get("id");
    let status: String = row.get("status");
    let status = status
        .parse::<OrderStatus>()
        .map_err(|err| StoreError::Query {
            source: sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(err),
            },
        })?;

    Ok(Order {
        id,
        customer_name: row.get("customer_name"),
        customer_email: row.get("customer_email"),
        total_amount: row.get("total_amount"),
        status,
        items: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
