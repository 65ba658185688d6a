//! Typed store errors and transient-failure classification.
//!
//! The retry policy switches on error kind tags assigned here, at the
//! driver boundary, never on driver message text. "Transient" means the
//! pool refused or lost a connection; statement-level failures are final.

use thiserror::Error;

/// Error returned by the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order {id} not found")]
    NotFound { id: i64 },

    /// The store refused or dropped a connection; eligible for retry.
    #[error("transient connection failure: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// A statement failed (constraint, syntax, decoding); never retried.
    #[error("query failed: {source}")]
    Query {
        #[source]
        source: sqlx::Error,
    },

    /// Beginning or committing a transaction failed; never retried.
    #[error("transaction failed: {source}")]
    Transaction {
        #[source]
        source: sqlx::Error,
    },

    /// The creation path gave up after the configured attempts.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<StoreError>,
    },

    /// Shutdown fired while a retry backoff was sleeping.
    #[error("operation cancelled")]
    Cancelled,
}

impl StoreError {
    /// Classify a statement failure.
    pub(crate) fn from_query(source: sqlx::Error) -> Self {
        if is_transient(&source) {
            Self::Connection { source }
        } else {
            Self::Query { source }
        }
    }

    /// Classify a begin/commit failure.
    pub(crate) fn from_tx(source: sqlx::Error) -> Self {
        if is_transient(&source) {
            Self::Connection { source }
        } else {
            Self::Transaction { source }
        }
    }

    /// Whether the retry policy may re-attempt the failed operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Closed set of connection-level failure tags.
///
/// SQLSTATE class 08 covers connection exceptions; 53300 is
/// too_many_connections, 57P03 is cannot_connect_now. The sqlx pool and
/// transport variants cover refusals that never reached the server.
fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => true,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => true,
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => code == "53300" || code == "57P03" || code.starts_with("08"),
            None => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhaustion_is_transient() {
        let err = StoreError::from_query(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());
        assert!(matches!(err, StoreError::Connection { .. }));
    }

    #[test]
    fn closed_pool_is_transient() {
        assert!(StoreError::from_tx(sqlx::Error::PoolClosed).is_transient());
    }

    #[test]
    fn row_not_found_is_a_query_error() {
        let err = StoreError::from_query(sqlx::Error::RowNotFound);
        assert!(!err.is_transient());
        assert!(matches!(err, StoreError::Query { .. }));
    }

    #[test]
    fn commit_failure_is_a_transaction_error() {
        let err = StoreError::from_tx(sqlx::Error::WorkerCrashed);
        assert!(matches!(err, StoreError::Transaction { .. }));
    }

    #[test]
    fn not_found_and_exhausted_are_never_transient() {
        assert!(!StoreError::NotFound { id: 1 }.is_transient());

        let exhausted = StoreError::RetriesExhausted {
            attempts: 3,
            source: Box::new(StoreError::Connection {
                source: sqlx::Error::PoolTimedOut,
            }),
        };
        assert!(!exhausted.is_transient());
    }
}
