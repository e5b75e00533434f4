//! Models and their scope catalogs.
//!
//! A [`Model`] describes a table: its columns and the named scopes declared on it.
//! Besides the scopes declared explicitly, every column gets generated scopes:
//!
//! - one condition scope per operator alias (`username_equals`, `username_gt`,
//!   `username_greater_than`, `username_nil`, ...)
//! - the ordering scopes `ascend_by_<column>` and `descend_by_<column>`
//!
//! # Example
//!
//! ```
//! use scoped_search::{ColumnType, Model, NamedScope, Predicate, ProxyOptions, ScopeRegistry};
//! use std::sync::Arc;
//!
//! let users = Arc::new(
//!     Model::new("users")
//!         .column("id", ColumnType::Integer)
//!         .column("username", ColumnType::Text)
//!         .column("age", ColumnType::Integer)
//!         .named_scope(
//!             "four_year_olds",
//!             NamedScope::fixed(ProxyOptions::new().condition(Predicate::eq("age", 4))),
//!         ),
//! );
//!
//! assert_eq!(users.descriptor("username_gt").map(|d| d.arity), Some(1));
//! assert_eq!(users.descriptor("username_nil").map(|d| d.arity), Some(0));
//! assert_eq!(users.descriptor("four_year_olds").map(|d| d.arity), Some(0));
//! assert!(users.descriptor("unknown").is_none());
//! ```

pub mod column;
pub mod named_scope;
pub mod registry;

pub use column::{ColumnDefinition, ColumnType};
pub use named_scope::{NamedScope, ScopeDescriptor, ScopeError};
pub use registry::ScopeRegistry;

use crate::query::condition::{parse_condition_name, parse_ordering_name, ASCEND_BY, DESCEND_BY};
use crate::query::{Direction, Operator, Predicate, ProxyOptions, Scope};
use serde_json::Value;
use std::sync::Arc;

/// Table schema plus declared named scopes.
#[derive(Debug, Clone)]
pub struct Model {
    table_name: String,
    columns: Vec<ColumnDefinition>,
    named_scopes: Vec<(String, NamedScope)>,
}

impl Model {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            named_scopes: Vec::new(),
        }
    }

    /// Add a column (builder style).
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(ColumnDefinition::new(name, column_type));
        self
    }

    /// Declare a named scope (builder style).
    ///
    /// Redeclaring a name replaces the earlier scope. A named scope shadows a
    /// generated scope with the same name.
    pub fn named_scope(mut self, name: impl Into<String>, scope: NamedScope) -> Self {
        let name = name.into();
        match self.named_scopes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = scope,
            None => self.named_scopes.push((name, scope)),
        }
        self
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column_def(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Unfiltered scope over the whole table.
    pub fn unscoped(self: &Arc<Self>) -> Scope {
        Scope::new(self.clone())
    }

    fn declared(&self, name: &str) -> Option<&NamedScope> {
        self.named_scopes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, scope)| scope)
    }

    fn condition_predicate(
        &self,
        scope: &str,
        column: &str,
        operator: Operator,
        args: &[Value],
    ) -> Result<Predicate, ScopeError> {
        if operator.arity() == 0 {
            return Ok(Predicate::new(column, operator, Value::Null));
        }
        let arg = args.first().ok_or_else(|| ScopeError::WrongArity {
            scope: scope.to_string(),
            expected: 1,
            given: 0,
        })?;
        let invalid = |message: String| ScopeError::InvalidArgument {
            scope: scope.to_string(),
            message,
        };
        let value = if operator.is_pattern() {
            column::as_text(arg).map(Value::String).map_err(invalid)?
        } else {
            let column_type = self
                .column_def(column)
                .map(|c| c.column_type)
                .unwrap_or(ColumnType::Text);
            column_type.cast(arg).map_err(invalid)?
        };
        Ok(Predicate::new(column, operator, value))
    }
}

impl ScopeRegistry for Model {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.column_def(name).is_some()
    }

    fn descriptor(&self, name: &str) -> Option<ScopeDescriptor> {
        if let Some(scope) = self.declared(name) {
            return Some(ScopeDescriptor::new(name, scope.arity()));
        }
        if let Some((_, operator)) = parse_condition_name(name, |c| self.has_attribute(c)) {
            return Some(ScopeDescriptor::new(name, operator.arity()));
        }
        parse_ordering_name(name, |c| self.has_attribute(c)).map(|_| ScopeDescriptor::new(name, 0))
    }

    fn scope_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.named_scopes.iter().map(|(n, _)| n.clone()).collect();
        for column in &self.columns {
            for operator in Operator::all() {
                names.extend(operator.suffixes().map(|s| format!("{}_{}", column.name, s)));
            }
            names.push(format!("{}{}", ASCEND_BY, column.name));
            names.push(format!("{}{}", DESCEND_BY, column.name));
        }
        names
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Result<ProxyOptions, ScopeError> {
        if let Some(scope) = self.declared(name) {
            return scope.call(name, args);
        }
        if let Some((column, operator)) = parse_condition_name(name, |c| self.has_attribute(c)) {
            let predicate = self.condition_predicate(name, column, operator, args)?;
            return Ok(ProxyOptions::new().condition(predicate));
        }
        if let Some((column, ascending)) = parse_ordering_name(name, |c| self.has_attribute(c)) {
            let direction = if ascending {
                Direction::Asc
            } else {
                Direction::Desc
            };
            return Ok(ProxyOptions::new().order_by(column, direction));
        }
        Err(ScopeError::UndefinedScope(name.to_string()))
    }
}
