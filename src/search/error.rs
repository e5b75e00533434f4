//! Search error types

use crate::executor::LifeError;
use crate::model::ScopeError;

/// Errors raised by [`Search`](super::Search)
#[derive(Debug)]
pub enum SearchError {
    /// No base scope to search from
    MissingScope,
    /// Condition name matches no scope, attribute or ordering scope
    UnknownCondition { name: String },
    /// Error from invoking a scope, unchanged
    Scope(ScopeError),
    /// Error from materializing the composed scope, unchanged
    Execution(LifeError),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::MissingScope => write!(f, "A search requires a base scope"),
            SearchError::UnknownCondition { name } => write!(
                f,
                "The {} condition is not a valid condition. Conditions must be a named scope, a column, or an ordering scope.",
                name
            ),
            SearchError::Scope(e) => write!(f, "{}", e),
            SearchError::Execution(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Scope(e) => Some(e),
            SearchError::Execution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ScopeError> for SearchError {
    fn from(err: ScopeError) -> Self {
        SearchError::Scope(err)
    }
}

impl From<LifeError> for SearchError {
    fn from(err: LifeError) -> Self {
        SearchError::Execution(err)
    }
}
