//! In-memory executor.
//!
//! Evaluates a scope's [`ProxyOptions`](crate::query::ProxyOptions) directly against
//! rows held in memory. Missing columns read as `null`.

use super::{LifeError, LifeExecutor, Row};
use crate::query::{Direction, Operator, Predicate, Scope};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

/// Table storage keyed by table name, with an auto-increment `id` per table.
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    tables: Mutex<HashMap<String, Table>>,
}

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: Vec<Row>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row and return it as stored.
    ///
    /// An `id` is assigned when the row has none. Generated ids continue after the
    /// largest integer id seen so far.
    pub fn insert(&self, table: &str, row: Value) -> Result<Row, LifeError> {
        let Value::Object(mut row) = row else {
            return Err(LifeError::QueryError(format!(
                "row for '{}' must be a JSON object",
                table
            )));
        };
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| LifeError::Other("memory executor lock poisoned".to_string()))?;
        let table = tables.entry(table.to_string()).or_default();
        match row.get("id") {
            None | Some(Value::Null) => {
                table.next_id += 1;
                row.insert("id".to_string(), Value::from(table.next_id));
            }
            Some(id) => {
                if let Some(id) = id.as_i64() {
                    table.next_id = table.next_id.max(id);
                }
            }
        }
        table.rows.push(row.clone());
        Ok(row)
    }
}

impl LifeExecutor for MemoryExecutor {
    fn query_all(&self, scope: &Scope) -> Result<Vec<Row>, LifeError> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| LifeError::Other("memory executor lock poisoned".to_string()))?;
        let options = scope.proxy_options();
        if options.matches_none {
            return Ok(Vec::new());
        }
        let mut rows: Vec<Row> = tables
            .get(scope.table_name())
            .map(|t| t.rows.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|row| options.conditions.iter().all(|p| matches(p, row)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            options
                .order
                .iter()
                .map(|clause| {
                    let ord = compare_values(field(a, &clause.column), field(b, &clause.column))
                        .unwrap_or(Ordering::Equal);
                    match clause.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(rows)
    }
}

fn field<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Integers compare exactly; only non-integers go through `f64`.
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => return Some(x.cmp(&y)),
        // the other side is a u64 above i64::MAX
        (Some(_), None) if b.is_u64() => return Some(Ordering::Less),
        (None, Some(_)) if a.is_u64() => return Some(Ordering::Greater),
        _ => {}
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn text(value: &Value) -> Option<&str> {
    value.as_str()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn matches(predicate: &Predicate, row: &Row) -> bool {
    let actual = field(row, &predicate.column);
    let expected = &predicate.value;
    let cmp = || {
        if actual.is_null() {
            None
        } else {
            compare_values(actual, expected)
        }
    };
    let pattern = |check: fn(&str, &str) -> bool| match (text(actual), text(expected)) {
        (Some(a), Some(e)) => check(a, e),
        _ => false,
    };
    match predicate.operator {
        Operator::Equals if expected.is_null() => actual.is_null(),
        Operator::DoesNotEqual if expected.is_null() => !actual.is_null(),
        Operator::Equals => cmp() == Some(Ordering::Equal),
        Operator::DoesNotEqual => matches!(cmp(), Some(Ordering::Less | Ordering::Greater)),
        Operator::LessThan => cmp() == Some(Ordering::Less),
        Operator::LessThanOrEqualTo => matches!(cmp(), Some(Ordering::Less | Ordering::Equal)),
        Operator::GreaterThan => cmp() == Some(Ordering::Greater),
        Operator::GreaterThanOrEqualTo => {
            matches!(cmp(), Some(Ordering::Greater | Ordering::Equal))
        }
        Operator::Like => pattern(|a, e| a.contains(e)),
        Operator::NotLike => pattern(|a, e| !a.contains(e)),
        Operator::BeginsWith => pattern(|a, e| a.starts_with(e)),
        Operator::NotBeginWith => pattern(|a, e| !a.starts_with(e)),
        Operator::EndsWith => pattern(|a, e| a.ends_with(e)),
        Operator::NotEndWith => pattern(|a, e| !a.ends_with(e)),
        Operator::Null => actual.is_null(),
        Operator::NotNull => !actual.is_null(),
        Operator::Empty => actual.as_str() == Some(""),
        Operator::Blank => is_blank(actual),
        Operator::NotBlank => !is_blank(actual),
    }
}
