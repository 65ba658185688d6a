//! Order endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::repos::{Order, OrderItem, OrderRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{Cursor, NewOrder, NewOrderItem, OrderStatus, ValidationError};

/// Default page size for listings
const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on requested page size
const MAX_LIMIT: i64 = 100;

/// Create order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub items: Vec<CreateOrderItemRequest>,
}

/// One requested order line
#[derive(Debug, Deserialize)]
pub struct CreateOrderItemRequest {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl CreateOrderRequest {
    /// Validate into a draft order; line and order totals are computed
    /// by the domain types, never read from the request.
    fn into_domain(self) -> Result<NewOrder, ValidationError> {
        let items = self
            .items
            .iter()
            .map(|item| NewOrderItem::new(&item.product_name, item.quantity, item.unit_price))
            .collect::<Result<Vec<_>, _>>()?;

        NewOrder::new(&self.customer_name, self.customer_email.as_deref(), items)
    }
}

/// Order response
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

/// Order line response
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            total_amount: order.total_amount,
            status: order.status,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// Bulk create request
#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub orders: Vec<CreateOrderRequest>,
}

/// Bulk create response: partial success is still a success
#[derive(Debug, Serialize)]
pub struct BulkCreateResponse {
    pub created_orders: Vec<OrderResponse>,
    pub total_created: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

/// Listing response
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn repo(state: &AppState) -> OrderRepo<'_> {
    OrderRepo::new(&state.pool, state.retry, state.shutdown.clone())
}

/// POST /orders - create an order with its items
async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let draft = req.into_domain()?;
    let created = repo(&state).create_with_items(&draft).await?;

    tracing::info!(
        order_id = created.id,
        total_amount = %created.total_amount,
        items = created.items.len(),
        "order created"
    );

    Ok((StatusCode::CREATED, Json(OrderResponse::from(created))))
}

/// POST /orders/bulk - create a batch of orders
///
/// Entries that fail validation or persistence are reported in `errors`;
/// the remaining entries are still created.
async fn bulk_create_orders(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkCreateRequest>,
) -> Result<Json<BulkCreateResponse>, ApiError> {
    let mut drafts = Vec::with_capacity(req.orders.len());
    let mut errors = Vec::new();

    for entry in req.orders {
        match entry.into_domain() {
            Ok(draft) => drafts.push(draft),
            Err(err) => errors.push(err.to_string()),
        }
    }

    let outcome = repo(&state).create_many(&drafts).await;
    errors.extend(outcome.failures.iter().map(|(_, err)| err.to_string()));

    tracing::info!(
        created = outcome.created.len(),
        failed = errors.len(),
        "bulk order creation finished"
    );

    Ok(Json(BulkCreateResponse {
        total_created: outcome.created.len(),
        created_orders: outcome
            .created
            .into_iter()
            .map(OrderResponse::from)
            .collect(),
        errors,
    }))
}

/// GET /orders - cursor-paginated listing, newest first
async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    let limit = normalize_limit(query.limit);
    let cursor = query
        .cursor
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<Cursor>)
        .transpose()?;

    let (orders, next) = repo(&state).list(limit, cursor.as_ref()).await?;

    Ok(Json(ListOrdersResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
        next_cursor: next.map(|c| c.to_string()),
    }))
}

/// GET /orders/{id}
async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = repo(&state).get(id).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// PUT /orders/{id}/status
async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let status: OrderStatus = req.status.parse()?;
    repo(&state).update_status(id, status).await?;

    tracing::info!(order_id = id, status = %status, "order status updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Clamp the requested page size the same way the offset strategy does.
fn normalize_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > MAX_LIMIT => MAX_LIMIT,
        Some(l) if l > 0 => l,
        _ => DEFAULT_LIMIT,
    }
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/bulk", post(bulk_create_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
}
