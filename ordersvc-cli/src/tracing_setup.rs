//! Tracing setup for the ordersvc CLI
//!
//! Usage:
//!   ordersvc --debug serve              # Debug logging to console
//!   RUST_LOG=ordersvc_server=debug ...  # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize tracing with console output.
pub fn init_tracing(debug: bool) -> Result<()> {
    let filter = if debug {
        // debug mode sets the debug level unless RUST_LOG is explicitly set
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug) // show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
