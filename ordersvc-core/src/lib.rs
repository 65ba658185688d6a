//! ordersvc-core: retry policy and application configuration
//!
//! The pieces of the order service that are independent of storage and
//! HTTP: a generic bounded-backoff retry executor and the env-driven
//! configuration consumed by the binary.

pub mod config;
pub mod retry;

pub use config::{AppConfig, ConfigError};
pub use retry::{RetryConfig, RetryError};
