//! Backend trait for the pooled connection behind the service facade.
//!
//! The facade delegates every operation to a [`ConnectionPool`]. Production
//! code uses the PostgreSQL implementation in `crate::postgres`; tests plug in
//! a recording double.

use async_trait::async_trait;
use thiserror::Error;

use super::args::QueryArg;

/// Errors that can occur during facade operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The pool could not be created from the connection string
    #[error("Failed to open connection pool: {0}")]
    Connect(#[source] sqlx::Error),

    /// Error returned by the driver, passed through unmodified
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Health ping did not complete within the health-check timeout
    #[error("db down: health check timed out after {0:?}")]
    HealthTimeout(std::time::Duration),

    /// Health ping completed with an error
    #[error("db down: {0}")]
    Unhealthy(#[source] sqlx::Error),

    /// The service has been closed
    #[error("Database service is closed")]
    Closed,
}

impl DatabaseError {
    /// Whether this error means the process can no longer serve its contract.
    ///
    /// Construction and health failures are fatal; the binary terminates on
    /// them. Everything else is a per-operation failure for the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DatabaseError::Connect(_)
                | DatabaseError::HealthTimeout(_)
                | DatabaseError::Unhealthy(_)
        )
    }
}

/// A pooled connection handle.
///
/// # Thread Safety
///
/// Implementations must be internally synchronized (`Send + Sync`); the
/// facade shares one pool across all request tasks without extra locking.
#[async_trait]
pub trait ConnectionPool: Send + Sync + 'static {
    /// Row type produced by `fetch_all`.
    type Row: Send;

    /// Result of a statement that returns no rows.
    type ExecResult: Send;

    /// Open transaction handle.
    type Transaction: Send;

    /// Run a row-returning statement.
    async fn fetch_all(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<Vec<Self::Row>, sqlx::Error>;

    /// Run a statement for its side effects.
    async fn execute(&self, statement: &str, args: &[QueryArg])
        -> Result<Self::ExecResult, sqlx::Error>;

    /// Start a transaction on a pooled connection.
    async fn begin(&self) -> Result<Self::Transaction, sqlx::Error>;

    /// Acquire a connection and check it is alive.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Release every connection held by the pool.
    async fn close(&self);
}
