//! Query execution methods for Scope.
//!
//! This module provides execution methods (`all`, `first`, `count`, `load`) which
//! hand the composed scope to a [`LifeExecutor`].

use crate::executor::{LifeError, LifeExecutor, Row};
use crate::query::select::Scope;
use serde::de::DeserializeOwned;

impl Scope {
    /// Execute the query and return all results
    ///
    /// # Example
    ///
    /// ```
    /// use scoped_search::{ColumnType, MemoryExecutor, Model};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let users = Arc::new(Model::new("users").column("age", ColumnType::Integer));
    /// let db = MemoryExecutor::new();
    /// db.insert("users", json!({ "age": 4 }))?;
    /// db.insert("users", json!({ "age": 5 }))?;
    ///
    /// let young = users.unscoped().scoped("age_lt", &[json!(5)]).unwrap().all(&db)?;
    /// assert_eq!(young.len(), 1);
    /// # Ok::<(), scoped_search::LifeError>(())
    /// ```
    pub fn all<Ex: LifeExecutor>(&self, executor: &Ex) -> Result<Vec<Row>, LifeError> {
        let rows = executor.query_all(self)?;
        log::debug!("{} row(s) from {}", rows.len(), self.table_name());
        Ok(rows)
    }

    /// Execute the query and return the first result, or None if no results
    pub fn first<Ex: LifeExecutor>(&self, executor: &Ex) -> Result<Option<Row>, LifeError> {
        Ok(self.all(executor)?.into_iter().next())
    }

    /// Number of rows the query matches
    pub fn count<Ex: LifeExecutor>(&self, executor: &Ex) -> Result<usize, LifeError> {
        Ok(self.all(executor)?.len())
    }

    /// Execute the query and deserialize every row into `M`
    pub fn load<M, Ex>(&self, executor: &Ex) -> Result<Vec<M>, LifeError>
    where
        M: DeserializeOwned,
        Ex: LifeExecutor,
    {
        self.all(executor)?
            .into_iter()
            .map(|row| {
                serde_json::from_value(serde_json::Value::Object(row))
                    .map_err(|e| LifeError::ParseError(format!("Failed to parse row: {}", e)))
            })
            .collect()
    }
}
