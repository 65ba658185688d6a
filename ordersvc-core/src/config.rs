//! Environment-driven application configuration.
//!
//! Every knob has a default suitable for local development; deployments
//! override through the environment (a `.env` file is honoured by the
//! binary before this module reads anything).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryConfig;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/ordersvc";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string (`DATABASE_URL`)
    pub database_url: String,
    /// HTTP bind address (`ORDERSVC_BIND`, default 127.0.0.1:8080)
    pub bind_addr: SocketAddr,
    /// Connection pool size (`ORDERSVC_MAX_CONNECTIONS`)
    pub max_connections: u32,
    /// Backoff tuning for the order-creation path
    pub retry: RetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            retry: RetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let default_retry = defaults.retry;

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse_var("ORDERSVC_BIND", defaults.bind_addr)?,
            max_connections: parse_var("ORDERSVC_MAX_CONNECTIONS", defaults.max_connections)?,
            retry: RetryConfig {
                max_retries: parse_var("ORDERSVC_RETRY_MAX", default_retry.max_retries)?,
                base_delay: Duration::from_millis(parse_var(
                    "ORDERSVC_RETRY_BASE_MS",
                    default_retry.base_delay.as_millis() as u64,
                )?),
                max_delay: Duration::from_millis(parse_var(
                    "ORDERSVC_RETRY_MAX_MS",
                    default_retry.max_delay.as_millis() as u64,
                )?),
                backoff_factor: parse_var("ORDERSVC_RETRY_FACTOR", default_retry.backoff_factor)?,
            },
        })
    }
}

fn parse_var<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value.parse().map_err(|err: T::Err| ConfigError::Invalid {
            var,
            value,
            reason: err.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_development() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.database_url, "postgres://localhost/ordersvc");
    }

    #[test]
    fn unset_vars_fall_back() {
        // none of the ORDERSVC_* vars are set in the test environment
        let parsed: u32 = parse_var("ORDERSVC_TEST_UNSET", 7).unwrap();
        assert_eq!(parsed, 7);
    }

    #[test]
    fn malformed_value_is_reported() {
        env::set_var("ORDERSVC_TEST_MALFORMED", "not-a-number");
        let result: Result<u32, _> = parse_var("ORDERSVC_TEST_MALFORMED", 7);
        env::remove_var("ORDERSVC_TEST_MALFORMED");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
