//! Typed statement arguments.
//!
//! Statements take positional `$n` placeholders; every placeholder is filled
//! from a [`QueryArg`] in order. The enum is closed so that both the
//! PostgreSQL adapter and test doubles can inspect arguments without knowing
//! the driver's encoding traits.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single positional argument passed through to the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    /// SQL `NULL`
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl QueryArg {
    /// Short type label, used in trace output instead of the value itself.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryArg::Null => "null",
            QueryArg::Bool(_) => "bool",
            QueryArg::Int(_) => "int",
            QueryArg::Float(_) => "float",
            QueryArg::Text(_) => "text",
            QueryArg::Bytes(_) => "bytes",
            QueryArg::Json(_) => "json",
            QueryArg::Uuid(_) => "uuid",
            QueryArg::Timestamp(_) => "timestamp",
        }
    }
}

impl From<bool> for QueryArg {
    fn from(value: bool) -> Self {
        QueryArg::Bool(value)
    }
}

impl From<i32> for QueryArg {
    fn from(value: i32) -> Self {
        QueryArg::Int(i64::from(value))
    }
}

impl From<i64> for QueryArg {
    fn from(value: i64) -> Self {
        QueryArg::Int(value)
    }
}

impl From<f64> for QueryArg {
    fn from(value: f64) -> Self {
        QueryArg::Float(value)
    }
}

impl From<&str> for QueryArg {
    fn from(value: &str) -> Self {
        QueryArg::Text(value.to_string())
    }
}

impl From<String> for QueryArg {
    fn from(value: String) -> Self {
        QueryArg::Text(value)
    }
}

impl From<Vec<u8>> for QueryArg {
    fn from(value: Vec<u8>) -> Self {
        QueryArg::Bytes(value)
    }
}

impl From<serde_json::Value> for QueryArg {
    fn from(value: serde_json::Value) -> Self {
        QueryArg::Json(value)
    }
}

impl From<Uuid> for QueryArg {
    fn from(value: Uuid) -> Self {
        QueryArg::Uuid(value)
    }
}

impl From<DateTime<Utc>> for QueryArg {
    fn from(value: DateTime<Utc>) -> Self {
        QueryArg::Timestamp(value)
    }
}

impl<T: Into<QueryArg>> From<Option<T>> for QueryArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryArg::Null, Into::into)
    }
}

/// Build a `Vec<QueryArg>` from heterogeneous values.
///
/// ```rust,ignore
/// let rows = service.query("SELECT * FROM users WHERE id = $1 AND active = $2", &args![42, true]).await?;
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::database::QueryArg>::new() };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::database::QueryArg::from($value)),+]
    };
}
