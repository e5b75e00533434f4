//! Named scope definitions and invocation errors.

use crate::query::ProxyOptions;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Name and arity of a scope, as reported by a [`ScopeRegistry`](super::ScopeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeDescriptor {
    pub name: String,
    pub arity: usize,
}

impl ScopeDescriptor {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// Errors raised while invoking a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeError {
    /// No scope with this name exists on the model
    UndefinedScope(String),
    /// Scope called with the wrong number of arguments
    WrongArity {
        scope: String,
        expected: usize,
        given: usize,
    },
    /// Argument could not be used by the scope (e.g. text on an integer column)
    InvalidArgument { scope: String, message: String },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::UndefinedScope(name) => write!(f, "Undefined scope: {}", name),
            ScopeError::WrongArity {
                scope,
                expected,
                given,
            } => write!(
                f,
                "Scope '{}' takes {} argument(s), {} given",
                scope, expected, given
            ),
            ScopeError::InvalidArgument { scope, message } => {
                write!(f, "Invalid argument for scope '{}': {}", scope, message)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

type ScopeFn = dyn Fn(&[Value]) -> Result<ProxyOptions, ScopeError> + Send + Sync;

/// A scope declared on a model by name.
///
/// # Example
///
/// ```
/// use scoped_search::{NamedScope, Predicate, ProxyOptions};
/// use scoped_search::query::Operator;
///
/// // conditions: age = 4
/// let four_year_olds = NamedScope::fixed(ProxyOptions::new().condition(Predicate::eq("age", 4)));
/// assert_eq!(four_year_olds.arity(), 0);
///
/// let older_than = NamedScope::with_args(1, |args| {
///     let older = Predicate::new("age", Operator::GreaterThan, args[0].clone());
///     Ok(ProxyOptions::new().condition(older))
/// });
/// assert_eq!(older_than.arity(), 1);
/// ```
#[derive(Clone)]
pub struct NamedScope {
    arity: usize,
    body: Arc<ScopeFn>,
}

impl NamedScope {
    /// Arity-0 scope that always applies the same options.
    pub fn fixed(options: ProxyOptions) -> Self {
        Self {
            arity: 0,
            body: Arc::new(move |_| Ok(options.clone())),
        }
    }

    /// Scope computed from `arity` arguments.
    ///
    /// `body` only ever sees exactly `arity` arguments.
    pub fn with_args<F>(arity: usize, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<ProxyOptions, ScopeError> + Send + Sync + 'static,
    {
        Self {
            arity,
            body: Arc::new(body),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Run the scope body as scope `name`.
    ///
    /// Fails with `WrongArity` instead of running the body when `args` has the wrong length.
    pub(crate) fn call(&self, name: &str, args: &[Value]) -> Result<ProxyOptions, ScopeError> {
        if args.len() != self.arity {
            return Err(ScopeError::WrongArity {
                scope: name.to_string(),
                expected: self.arity,
                given: args.len(),
            });
        }
        (self.body)(args)
    }
}

impl fmt::Debug for NamedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedScope")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
