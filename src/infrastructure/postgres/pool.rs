//! PostgreSQL connection pool backing the database service.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgQueryResult, PgRow};
use sqlx::query::Query;
use sqlx::{Connection, Postgres, Transaction};

use crate::config::DatabaseConfig;
use crate::database::{ConnectionPool, DatabaseError, QueryArg};

/// PostgreSQL connection pool.
///
/// Only reachable through [`crate::database::DatabaseService`]; the inner
/// `PgPool` is never handed out.
pub struct PostgresPool {
    /// The underlying connection pool
    pool: PgPool,

    /// Database URL with the password masked (for logging purposes)
    database_url_masked: String,
}

impl PostgresPool {
    /// Create a pool that opens connections on first use.
    ///
    /// Fails only if the connection string cannot be parsed, an empty host
    /// included. Must be called from within a Tokio runtime.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let database_url_masked = config.masked_connection_string();

        let pool = PgPoolOptions::new()
            .connect_lazy(&config.connection_string())
            .map_err(|e| {
                tracing::error!(
                    database_url = %database_url_masked,
                    error = %e,
                    "Failed to create PostgreSQL connection pool"
                );
                DatabaseError::Connect(e)
            })?;

        tracing::info!(
            database_url = %database_url_masked,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            pool,
            database_url_masked,
        })
    }

    /// Get the database URL (masked for logging).
    pub fn database_url_masked(&self) -> &str {
        &self.database_url_masked
    }
}

/// Bind positional arguments in order.
fn bind_args<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: &[QueryArg],
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = match arg {
            // Untyped NULL is not expressible; it goes out as a text NULL.
            QueryArg::Null => query.bind(None::<String>),
            QueryArg::Bool(v) => query.bind(*v),
            QueryArg::Int(v) => query.bind(*v),
            QueryArg::Float(v) => query.bind(*v),
            QueryArg::Text(v) => query.bind(v.clone()),
            QueryArg::Bytes(v) => query.bind(v.clone()),
            QueryArg::Json(v) => query.bind(sqlx::types::Json(v.clone())),
            QueryArg::Uuid(v) => query.bind(*v),
            QueryArg::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait]
impl ConnectionPool for PostgresPool {
    type Row = PgRow;
    type ExecResult = PgQueryResult;
    type Transaction = Transaction<'static, Postgres>;

    async fn fetch_all(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        bind_args(sqlx::query(statement), args)
            .fetch_all(&self.pool)
            .await
    }

    async fn execute(
        &self,
        statement: &str,
        args: &[QueryArg],
    ) -> Result<PgQueryResult, sqlx::Error> {
        bind_args(sqlx::query(statement), args)
            .execute(&self.pool)
            .await
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    /// Close the pool gracefully.
    async fn close(&self) {
        self.pool.close().await;
        tracing::info!(
            database_url = %self.database_url_masked,
            "PostgreSQL connection pool closed"
        );
    }
}
