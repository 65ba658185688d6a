//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Bounded connection pool shared by all request handlers; the store
//!   holds no lock, counter, or cache of its own
//! - Multi-step writes run inside transactions
//! - Errors carry a typed kind at the driver boundary so the retry
//!   policy never inspects message text

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use error::StoreError;
pub use pool::create_pool;
pub use repos::{BulkOutcome, Order, OrderItem, OrderRepo};
