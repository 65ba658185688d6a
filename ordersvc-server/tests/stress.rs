//! Integration tests against a live PostgreSQL instance.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p ordersvc-server -- --ignored

use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use ordersvc_core::retry::RetryConfig;
use ordersvc_server::db::{create_pool, migrations, OrderRepo, StoreError};
use ordersvc_server::models::{NewOrder, NewOrderItem, OrderStatus, Pagination};

async fn test_pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url, 5).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");
    pool
}

fn price(s: &str) -> Decimal {
    s.parse().expect("bad decimal literal")
}

fn draft(customer: &str) -> NewOrder {
    NewOrder::new(
        customer,
        None,
        vec![
            NewOrderItem::new("Laptop", 1, price("999.99")).expect("valid item"),
            NewOrderItem::new("Mouse", 2, price("25.50")).expect("valid item"),
        ],
    )
    .expect("valid order")
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_then_get_round_trips() {
    let pool = test_pool().await;
    let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());

    let created = repo
        .create_with_items(&draft("John Doe"))
        .await
        .expect("create failed");

    assert_eq!(created.total_amount, price("1050.99"));
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.items.len(), 2);
    assert!(created.items.iter().all(|item| item.order_id == created.id));

    let fetched = repo.get(created.id).await.expect("get failed");
    assert_eq!(fetched.total_amount, price("1050.99"));
    assert_eq!(fetched.items.len(), 2);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
#[ignore = "requires database"]
async fn status_update_advances_updated_at() {
    let pool = test_pool().await;
    let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());

    let created = repo
        .create_with_items(&draft("John Doe"))
        .await
        .expect("create failed");

    tokio::time::sleep(Duration::from_millis(20)).await;
    repo.update_status(created.id, OrderStatus::Processing)
        .await
        .expect("status update failed");

    let fetched = repo.get(created.id).await.expect("get failed");
    assert_eq!(fetched.status, OrderStatus::Processing);
    assert!(fetched.updated_at > created.updated_at);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_status_of_missing_order_is_not_found() {
    let pool = test_pool().await;
    let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());

    let result = repo.update_status(i64::MAX, OrderStatus::Processing).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_missing_order_is_not_found() {
    let pool = test_pool().await;
    let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());

    let result = repo.get(i64::MAX).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
#[ignore = "requires database"]
async fn cursor_walk_sees_every_order_exactly_once() {
    let pool = test_pool().await;
    let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());

    let customer = format!("cursor-walk-{}", std::process::id());
    let mut seeded = HashSet::new();
    for _ in 0..25 {
        let created = repo
            .create_with_items(&draft(&customer))
            .await
            .expect("seed create failed");
        seeded.insert(created.id);
    }

    // walk the whole table; other rows may interleave but each seeded
    // order must appear exactly once, and the global order must be
    // strictly descending on (created_at, id)
    let mut seen = HashSet::new();
    let mut last_key = None;
    let mut cursor = None;

    loop {
        let (orders, next) = repo.list(10, cursor.as_ref()).await.expect("list failed");
        if orders.is_empty() {
            break;
        }
        for order in &orders {
            let key = (order.created_at, order.id);
            if let Some(last) = last_key {
                assert!(key < last, "listing not strictly descending");
            }
            last_key = Some(key);

            if seeded.contains(&order.id) {
                assert!(seen.insert(order.id), "order {} repeated", order.id);
            }
        }
        cursor = next;
    }

    assert_eq!(seen, seeded);
}

#[tokio::test]
#[ignore = "requires database"]
async fn offset_page_reports_totals() {
    let pool = test_pool().await;
    let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());

    for _ in 0..3 {
        repo.create_with_items(&draft("offset-page"))
            .await
            .expect("seed create failed");
    }

    let page = repo
        .list_page(Pagination::new(1, 10))
        .await
        .expect("list_page failed");

    assert!(page.total >= 3);
    assert!(page.items.len() <= 10);
    assert!(page.total_pages() >= 1);
    assert!(page.items.iter().all(|o| !o.items.is_empty()));
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_creates_all_commit_atomically() {
    let pool = test_pool().await;

    // burst well past the 5-connection pool so acquisition contends
    let handles: Vec<_> = (0..32)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                let repo = OrderRepo::new(&pool, RetryConfig::default(), CancellationToken::new());
                let created = repo
                    .create_with_items(&draft(&format!("burst-{}", i)))
                    .await?;

                // a reader immediately after commit sees the full graph
                let fetched = repo.get(created.id).await?;
                assert_eq!(fetched.items.len(), 2);
                Ok::<_, StoreError>(created.id)
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let id = handle
            .await
            .expect("task panicked")
            .expect("create under load failed");
        ids.insert(id);
    }

    assert_eq!(ids.len(), 32);
}
