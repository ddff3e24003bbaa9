//! PostgreSQL persistence module.
//!
//! Provides the connection pool behind the database service facade.

pub mod pool;

pub use pool::PostgresPool;
