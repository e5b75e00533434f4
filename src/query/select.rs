//! Scope: the chainable query handle.
//!
//! This module provides [`Scope`], which pairs a [`ScopeRegistry`] with the
//! [`ProxyOptions`] applied so far. Query building methods (filter, order_by,
//! named scope calls) are defined here, while execution methods are in the
//! execution module.

use super::condition::Operator;
use super::options::{Direction, Predicate, ProxyOptions};
use crate::model::{ScopeError, ScopeRegistry};
use sea_query::{Alias, Expr, ExprTrait, Order, QueryBuilder, SelectStatement, Values};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Query handle returned by scope invocation
///
/// Every call returns a new handle; the receiver is left untouched, so one base
/// scope can seed any number of searches.
///
/// # Example
///
/// ```
/// use scoped_search::{ColumnType, Model};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let users = Arc::new(Model::new("users").column("age", ColumnType::Integer));
/// let scope = users.unscoped().scoped("age_lt", &[json!(5)])?.scoped("descend_by_age", &[])?;
///
/// assert_eq!(
///     scope.to_sql(sea_query::PostgresQueryBuilder),
///     r#"SELECT * FROM "users" WHERE "age" < 5 ORDER BY "age" DESC"#
/// );
/// # Ok::<(), scoped_search::ScopeError>(())
/// ```
#[derive(Clone)]
pub struct Scope {
    registry: Arc<dyn ScopeRegistry>,
    options: ProxyOptions,
}

impl Scope {
    /// Unfiltered scope over the registry's table
    pub fn new(registry: Arc<dyn ScopeRegistry>) -> Self {
        Self {
            registry,
            options: ProxyOptions::default(),
        }
    }

    pub fn registry(&self) -> &Arc<dyn ScopeRegistry> {
        &self.registry
    }

    pub fn table_name(&self) -> &str {
        self.registry.table_name()
    }

    /// Options applied so far
    pub fn proxy_options(&self) -> &ProxyOptions {
        &self.options
    }

    pub fn into_proxy_options(self) -> ProxyOptions {
        self.options
    }

    /// Call the named scope `name` with `args` and apply its options
    ///
    /// # Errors
    ///
    /// `UndefinedScope` when the registry has no such scope, `WrongArity` when the
    /// argument count differs from the scope's arity, and whatever the scope itself
    /// reports for unusable arguments.
    pub fn scoped(&self, name: &str, args: &[Value]) -> Result<Scope, ScopeError> {
        let descriptor = self
            .registry
            .descriptor(name)
            .ok_or_else(|| ScopeError::UndefinedScope(name.to_string()))?;
        if descriptor.arity != args.len() {
            return Err(ScopeError::WrongArity {
                scope: name.to_string(),
                expected: descriptor.arity,
                given: args.len(),
            });
        }
        let options = self.registry.invoke(name, args)?;
        Ok(self.clone().merge(options))
    }

    /// Apply `options` after the ones already present
    pub fn merge(mut self, options: ProxyOptions) -> Self {
        self.options.merge(options);
        self
    }

    /// Add a filter condition
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.options.conditions.push(predicate);
        self
    }

    /// Restrict the scope to no rows; later scopes cannot widen it
    pub fn none(mut self) -> Self {
        self.options.matches_none = true;
        self
    }

    /// Add an ORDER BY clause
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.options = self.options.order_by(column, direction);
        self
    }

    /// Render as a SeaQuery `SELECT * FROM <table> WHERE .. ORDER BY ..` statement
    pub fn to_statement(&self) -> SelectStatement {
        let mut query = SelectStatement::default();
        query
            .column(sea_query::Asterisk)
            .from(Alias::new(self.table_name().to_string()));
        if self.options.matches_none {
            query.and_where(Expr::val(1).eq(0));
        }
        for predicate in &self.options.conditions {
            query.and_where(predicate_expr(predicate));
        }
        for clause in &self.options.order {
            let order = match clause.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            query.order_by(Alias::new(clause.column.clone()), order);
        }
        query
    }

    /// SQL with placeholders plus the bound values
    pub fn build<T: QueryBuilder>(&self, builder: T) -> (String, Values) {
        self.to_statement().build(builder)
    }

    /// SQL with values inlined
    pub fn to_sql<T: QueryBuilder>(&self, builder: T) -> String {
        self.to_statement().to_string(builder)
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.table_name() == other.table_name() && self.options == other.options
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("table", &self.table_name())
            .field("options", &self.options)
            .finish()
    }
}

fn column(name: &str) -> Expr {
    Expr::col(Alias::new(name.to_string()))
}

fn sql_value(value: &Value) -> sea_query::Value {
    match value {
        Value::Null => sea_query::Value::String(None),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        Value::String(s) => s.clone().into(),
        other => other.to_string().into(),
    }
}

fn pattern(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn predicate_expr(predicate: &Predicate) -> Expr {
    let col = column(&predicate.column);
    let value = &predicate.value;
    match predicate.operator {
        Operator::Equals if value.is_null() => col.is_null(),
        Operator::DoesNotEqual if value.is_null() => col.is_not_null(),
        Operator::Equals => col.eq(sql_value(value)),
        Operator::DoesNotEqual => col.ne(sql_value(value)),
        Operator::LessThan => col.lt(sql_value(value)),
        Operator::LessThanOrEqualTo => col.lte(sql_value(value)),
        Operator::GreaterThan => col.gt(sql_value(value)),
        Operator::GreaterThanOrEqualTo => col.gte(sql_value(value)),
        Operator::Like => col.like(format!("%{}%", pattern(value))),
        Operator::NotLike => col.not_like(format!("%{}%", pattern(value))),
        Operator::BeginsWith => col.like(format!("{}%", pattern(value))),
        Operator::NotBeginWith => col.not_like(format!("{}%", pattern(value))),
        Operator::EndsWith => col.like(format!("%{}", pattern(value))),
        Operator::NotEndWith => col.not_like(format!("%{}", pattern(value))),
        Operator::Null => col.is_null(),
        Operator::NotNull => col.is_not_null(),
        Operator::Empty => col.eq(""),
        Operator::Blank => col.is_null().or(column(&predicate.column).eq("")),
        Operator::NotBlank => col.is_not_null().and(column(&predicate.column).ne("")),
    }
}
