//! The capability a search is resolved against.

use super::named_scope::{ScopeDescriptor, ScopeError};
use crate::query::ProxyOptions;
use serde_json::Value;

/// Catalog of the named scopes available on a model.
///
/// A [`Scope`](crate::query::Scope) carries the registry it was created from, so a
/// search built on any scope (a model, an association, an already scoped chain)
/// resolves condition names against the same catalog.
pub trait ScopeRegistry: Send + Sync {
    /// Table the scopes select from.
    fn table_name(&self) -> &str;

    /// Whether `name` is a column of the model.
    fn has_attribute(&self, name: &str) -> bool;

    /// Name and arity of the scope called `name`, if it exists.
    fn descriptor(&self, name: &str) -> Option<ScopeDescriptor>;

    /// Every scope name this registry answers to.
    fn scope_names(&self) -> Vec<String>;

    /// Options produced by calling scope `name` with `args`.
    ///
    /// Callers check arity against [`descriptor`](Self::descriptor) first.
    fn invoke(&self, name: &str, args: &[Value]) -> Result<ProxyOptions, ScopeError>;
}
