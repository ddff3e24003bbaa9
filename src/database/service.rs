//! The database service facade.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::args::QueryArg;
use super::backend::{ConnectionPool, DatabaseError};

/// Upper bound on the health-check ping.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Message returned by a successful health check.
pub const HEALTHY_MESSAGE: &str = "It's healthy";

/// Capability set exposed to callers.
///
/// Callers only ever see these operations; the pool behind them is never
/// handed out.
#[async_trait]
pub trait Service: Send + Sync {
    type Row: Send;
    type ExecResult: Send;
    type Transaction: Send;

    /// Bounded liveness check. Returns `{"message": "It's healthy"}` on success.
    ///
    /// Errors other than [`DatabaseError::Closed`] are fatal for the process
    /// and the entry point is expected to terminate on them. `Closed` only
    /// occurs once shutdown has started.
    async fn health(&self) -> Result<HashMap<String, String>, DatabaseError>;

    async fn query(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<Vec<Self::Row>, DatabaseError>;

    async fn exec(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<Self::ExecResult, DatabaseError>;

    async fn begin(&self) -> Result<Self::Transaction, DatabaseError>;

    /// Unbounded liveness check.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Release the pool. Further operations return [`DatabaseError::Closed`].
    async fn close(&self) -> Result<(), DatabaseError>;
}

/// Facade owning exactly one connection pool.
pub struct DatabaseService<P: ConnectionPool> {
    pool: P,
    closed: AtomicBool,
}

impl<P: ConnectionPool> DatabaseService<P> {
    /// Wrap an already-opened pool.
    pub fn new(pool: P) -> Self {
        Self {
            pool,
            closed: AtomicBool::new(false),
        }
    }

    /// Check if `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), DatabaseError> {
        if self.is_closed() {
            return Err(DatabaseError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl<P: ConnectionPool> Service for DatabaseService<P> {
    type Row = P::Row;
    type ExecResult = P::ExecResult;
    type Transaction = P::Transaction;

    async fn health(&self) -> Result<HashMap<String, String>, DatabaseError> {
        self.ensure_open()?;

        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, self.pool.ping()).await {
            Ok(Ok(())) => {
                tracing::debug!("Database health check passed");
                Ok(HashMap::from([(
                    "message".to_string(),
                    HEALTHY_MESSAGE.to_string(),
                )]))
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database health check failed");
                Err(DatabaseError::Unhealthy(e))
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = HEALTH_CHECK_TIMEOUT.as_millis() as u64,
                    "Database health check timed out"
                );
                Err(DatabaseError::HealthTimeout(HEALTH_CHECK_TIMEOUT))
            }
        }
    }

    async fn query(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<Vec<Self::Row>, DatabaseError> {
        self.ensure_open()?;
        tracing::trace!(statement, args = args.len(), "Running query");
        Ok(self.pool.fetch_all(statement, args).await?)
    }

    async fn exec(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<Self::ExecResult, DatabaseError> {
        self.ensure_open()?;
        tracing::trace!(statement, args = args.len(), "Executing statement");
        Ok(self.pool.execute(statement, args).await?)
    }

    async fn begin(&self) -> Result<Self::Transaction, DatabaseError> {
        self.ensure_open()?;
        Ok(self.pool.begin().await?)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.ensure_open()?;
        Ok(self.pool.ping().await?)
    }

    async fn close(&self) -> Result<(), DatabaseError> {
        // Second close is a no-op.
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.pool.close().await;
        tracing::info!("Database service closed");
        Ok(())
    }
}
