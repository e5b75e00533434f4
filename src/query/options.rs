//! Comparable representation of a composed query.

use super::condition::Operator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `column <op> value` filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    /// `Value::Null` for arity-0 operators.
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Equals, value)
    }
}

/// Sort direction of an [`OrderBy`] clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `ORDER BY column direction` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Options accumulated by applying scopes to a base query.
///
/// Predicates are AND-ed in the order they were applied; order clauses are applied
/// in sequence. Two handles built from the same scope calls in the same order compare
/// equal, which is how a search is checked against direct scope invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyOptions {
    pub conditions: Vec<Predicate>,
    pub order: Vec<OrderBy>,
    /// Set once any applied scope can match no rows; survives every later merge.
    #[serde(default)]
    pub matches_none: bool,
}

impl ProxyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate (builder style).
    pub fn condition(mut self, predicate: Predicate) -> Self {
        self.conditions.push(predicate);
        self
    }

    /// Add an order clause (builder style).
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    /// Mark the options as matching no rows (builder style).
    pub fn none(mut self) -> Self {
        self.matches_none = true;
        self
    }

    /// Append everything in `other` after the options already present.
    pub fn merge(&mut self, other: ProxyOptions) {
        self.conditions.extend(other.conditions);
        self.order.extend(other.order);
        self.matches_none |= other.matches_none;
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.order.is_empty() && !self.matches_none
    }
}
