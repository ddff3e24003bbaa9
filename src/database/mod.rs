//! Database service facade.
//!
//! One [`DatabaseService`] owns one connection pool and exposes the
//! [`Service`] capability set: health, query, exec, begin, ping and close.
//! Callers never reach the pool directly.

pub mod args;
pub mod backend;
pub mod service;

pub use args::QueryArg;
pub use backend::{ConnectionPool, DatabaseError};
pub use service::{DatabaseService, Service, HEALTHY_MESSAGE, HEALTH_CHECK_TIMEOUT};

use crate::config::DatabaseConfig;
use crate::postgres::PostgresPool;

/// The facade over a PostgreSQL pool, as used by the binary.
pub type PgService = DatabaseService<PostgresPool>;

/// Open the PostgreSQL-backed service from credentials.
///
/// The pool connects lazily: this only fails when the connection string
/// cannot be parsed, which includes an empty host (all credentials unset).
/// Reachability problems surface on the first `ping` or `health`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgService, DatabaseError> {
    let pool = PostgresPool::connect_lazy(config)?;
    Ok(DatabaseService::new(pool))
}
