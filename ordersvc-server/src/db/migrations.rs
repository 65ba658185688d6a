//! Schema bootstrap for the order store

use sqlx::PgPool;

use super::error::StoreError;

/// Create tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("running order store migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            customer_name TEXT NOT NULL,
            customer_email TEXT,
            total_amount NUMERIC(12, 2) NOT NULL CHECK (total_amount >= 0),
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'processing', 'completed', 'cancelled')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(StoreError::from_query)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id BIGSERIAL PRIMARY KEY,
            order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            product_name TEXT NOT NULL,
            quantity INT NOT NULL CHECK (quantity > 0),
            unit_price NUMERIC(12, 2) NOT NULL CHECK (unit_price >= 0),
            total_price NUMERIC(12, 2) NOT NULL CHECK (total_price >= 0)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(StoreError::from_query)?;

    // both pagination strategies order by this key
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS orders_created_at_id_idx
         ON orders (created_at DESC, id DESC)",
    )
    .execute(pool)
    .await
    .map_err(StoreError::from_query)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS order_items_order_id_idx ON order_items (order_id)",
    )
    .execute(pool)
    .await
    .map_err(StoreError::from_query)?;

    tracing::info!("order store migrations complete");
    Ok(())
}
