//! `LifeExecutor` Module
//!
//! Provides the `LifeExecutor` trait that abstracts materialization of a composed
//! [`Scope`](crate::query::Scope) into rows.
//!
//! Executors receive the scope itself rather than a SQL string, so a SQL-backed
//! executor renders it with [`Scope::build`](crate::query::Scope::build) while the
//! in-memory executor evaluates its [`ProxyOptions`](crate::query::ProxyOptions) directly.

use crate::query::Scope;
use std::fmt;

pub mod memory;
pub use memory::MemoryExecutor;

/// A materialized record, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// `LifeExecutor` error type
#[derive(Debug)]
pub enum LifeError {
    /// Query execution error
    QueryError(String),
    /// Row parsing/conversion error
    ParseError(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeError::QueryError(s) => {
                write!(f, "Query error: {s}")
            }
            LifeError::ParseError(s) => {
                write!(f, "Parse error: {s}")
            }
            LifeError::Other(s) => {
                write!(f, "Execution error: {s}")
            }
        }
    }
}

impl std::error::Error for LifeError {}

/// Trait for materializing composed scopes
///
/// This trait abstracts the persistence layer, allowing different implementations
/// (a pooled SQL connection, the in-memory [`MemoryExecutor`], a capturing mock in
/// tests) to be used interchangeably by [`Scope::all`](crate::query::Scope::all).
///
/// # Examples
///
/// ```no_run
/// use scoped_search::{LifeExecutor, LifeError, Row, Scope};
/// use sea_query::PostgresQueryBuilder;
///
/// struct LoggingExecutor;
///
/// impl LifeExecutor for LoggingExecutor {
///     fn query_all(&self, scope: &Scope) -> Result<Vec<Row>, LifeError> {
///         let (sql, values) = scope.build(PostgresQueryBuilder);
///         println!("{sql} {values:?}");
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait LifeExecutor {
    /// Execute the scope and return every matching row, in result order.
    ///
    /// # Errors
    ///
    /// Returns `LifeError` if the query execution fails.
    fn query_all(&self, scope: &Scope) -> Result<Vec<Row>, LifeError>;
}

impl<E: LifeExecutor + ?Sized> LifeExecutor for &E {
    fn query_all(&self, scope: &Scope) -> Result<Vec<Row>, LifeError> {
        (**self).query_all(scope)
    }
}
