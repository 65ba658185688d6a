//! ordersvc-server: order persistence engine and HTTP API
//!
//! Orders and their line items are written in one transaction, creation
//! retries transient connection failures under a bounded backoff, and
//! listings paginate by `(created_at DESC, id DESC)` in either offset or
//! keyset form. The HTTP layer is a thin axum surface over the
//! repository.

pub mod db;
pub mod http;
pub mod models;
