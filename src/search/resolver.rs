//! Condition name normalization and resolution.
//!
//! A condition name resolves, in priority order, to:
//!
//! 1. a scope the registry knows by that exact name (operator aliases such as
//!    `username_gt`, generated null checks, declared named scopes);
//! 2. a bare column, which means `<column>_equals`;
//! 3. the reserved `order` key, whose value names an arity-0 ordering scope.

use super::error::SearchError;
use crate::model::{ScopeDescriptor, ScopeRegistry};
use crate::query::Operator;
use serde_json::Value;

/// Condition key whose value names an ordering scope.
pub const ORDER_KEY: &str = "order";

/// What a stored condition calls when the search is composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Call this scope. Arity 0 means the value toggles the call.
    Scope(ScopeDescriptor),
    /// Call the named ordering scope; `None` when the ordering was cleared.
    Order(Option<String>),
}

/// Strip the symbol marker (`:username`) and setter marker (`username=`).
pub fn normalize_name(raw: &str) -> &str {
    let name = raw.strip_prefix(':').unwrap_or(raw);
    name.strip_suffix('=').unwrap_or(name)
}

/// Name of the implicit equality scope for a bare column.
pub fn equals_scope_name(column: &str) -> String {
    format!("{}_{}", column, Operator::Equals.canonical())
}

/// Resolve a normalized condition name for `value`.
///
/// # Errors
///
/// `UnknownCondition` carrying the name that failed to resolve. For `order` that
/// is the value when it names no arity-0 scope.
pub fn resolve(
    registry: &dyn ScopeRegistry,
    name: &str,
    value: &Value,
) -> Result<Target, SearchError> {
    if let Some(descriptor) = registry.descriptor(name) {
        return Ok(Target::Scope(descriptor));
    }
    if registry.has_attribute(name) {
        if let Some(descriptor) = registry.descriptor(&equals_scope_name(name)) {
            return Ok(Target::Scope(descriptor));
        }
    }
    if name == ORDER_KEY {
        return resolve_order(registry, value);
    }
    Err(SearchError::UnknownCondition {
        name: name.to_string(),
    })
}

/// Whether `name` can be read or written, independent of any value.
pub fn is_known(registry: &dyn ScopeRegistry, name: &str) -> bool {
    registry.descriptor(name).is_some()
        || (registry.has_attribute(name)
            && registry.descriptor(&equals_scope_name(name)).is_some())
        || name == ORDER_KEY
}

fn resolve_order(registry: &dyn ScopeRegistry, value: &Value) -> Result<Target, SearchError> {
    match value {
        Value::Null => Ok(Target::Order(None)),
        Value::String(s) if s.trim().is_empty() => Ok(Target::Order(None)),
        Value::String(s) => match registry.descriptor(s) {
            Some(descriptor) if descriptor.arity == 0 => Ok(Target::Order(Some(descriptor.name))),
            _ => Err(SearchError::UnknownCondition { name: s.clone() }),
        },
        _ => Err(SearchError::UnknownCondition {
            name: ORDER_KEY.to_string(),
        }),
    }
}
