//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits; pool sizing policy
//! is handed in by the caller.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// How long a request waits for a pooled connection before the attempt
/// fails (as a transient error, making it eligible for retry).
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}
