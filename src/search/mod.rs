//! The search proxy.
//!
//! A [`Search`] holds condition names and values for one search over a base
//! [`Scope`]. Every name is checked against the base scope's registry when it is
//! set; composing the search calls the resolved scope of each condition on the
//! base, in the order the conditions were first set.
//!
//! The proxy never merges conditions. `username_gt` and `username_greater_than`
//! build the same predicate but are stored, read and applied independently.
//!
//! # Example
//!
//! ```
//! use scoped_search::{ColumnType, Model};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let users = Arc::new(
//!     Model::new("users")
//!         .column("username", ColumnType::Text)
//!         .column("age", ColumnType::Integer),
//! );
//!
//! let mut search = users.unscoped().search_with([("username", json!("joe"))])?;
//! search.set("age_lt", 30)?;
//! search.set("username_nil", false)?;
//!
//! let direct = users
//!     .unscoped()
//!     .scoped("username_equals", &[json!("joe")])?
//!     .scoped("age_lt", &[json!(30)])?;
//! assert_eq!(search.proxy_options()?, *direct.proxy_options());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod coerce;
pub mod error;
pub mod resolver;

pub use error::SearchError;
pub use resolver::Target;

use crate::config::SearchConfig;
use crate::executor::{LifeExecutor, Row};
#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
use crate::query::{ProxyOptions, Scope};
use resolver::normalize_name;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
struct Condition {
    name: String,
    target: Target,
    value: Value,
}

/// Search proxy over a base scope.
#[derive(Debug, Clone)]
pub struct Search {
    base: Scope,
    config: SearchConfig,
    conditions: Vec<Condition>,
}

impl Search {
    /// Empty search over `base`.
    ///
    /// # Errors
    ///
    /// `MissingScope` when `base` is `None`.
    pub fn new(base: Option<Scope>) -> Result<Self, SearchError> {
        let base = base.ok_or(SearchError::MissingScope)?;
        Ok(Self {
            base,
            config: SearchConfig::default(),
            conditions: Vec::new(),
        })
    }

    /// Search over `base` seeded from `conditions`.
    ///
    /// Each entry is set exactly as [`set`](Self::set) would; the first invalid
    /// name fails construction.
    pub fn with_conditions<I, K, V>(
        base: Option<Scope>,
        conditions: I,
    ) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut search = Self::new(base)?;
        search.set_conditions(conditions)?;
        Ok(search)
    }

    /// Replace the configuration used when composing.
    pub fn configure(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Scope the search was created on.
    pub fn base(&self) -> &Scope {
        &self.base
    }

    /// Value last written under `name`, or `None` when it was never set.
    ///
    /// # Errors
    ///
    /// `UnknownCondition` when `name` could never be set on this search.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, SearchError> {
        let name = normalize_name(name);
        if let Some(condition) = self.find(name) {
            return Ok(Some(&condition.value));
        }
        if resolver::is_known(self.base.registry().as_ref(), name) {
            Ok(None)
        } else {
            Err(SearchError::UnknownCondition {
                name: name.to_string(),
            })
        }
    }

    /// Store `value` under `name`.
    ///
    /// A name that was already set keeps its position in the composition order.
    ///
    /// # Errors
    ///
    /// `UnknownCondition` when `name` does not resolve; the search is unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SearchError> {
        let name = normalize_name(name);
        let value = value.into();
        let target = match resolver::resolve(self.base.registry().as_ref(), name, &value) {
            Ok(target) => target,
            Err(e) => {
                log::warn!("rejected condition '{}' on {}: {}", name, self.base.table_name(), e);
                #[cfg(feature = "metrics")]
                METRICS.record_unknown_condition();
                return Err(e);
            }
        };
        log::debug!("condition '{}' resolved to {:?}", name, target);

        match self.conditions.iter_mut().find(|c| c.name == name) {
            Some(condition) => {
                condition.target = target;
                condition.value = value;
            }
            None => self.conditions.push(Condition {
                name: name.to_string(),
                target,
                value,
            }),
        }
        Ok(())
    }

    /// Set every entry of `conditions`, in iteration order.
    ///
    /// Entries before the first invalid name stay set.
    pub fn set_conditions<I, K, V>(&mut self, conditions: I) -> Result<(), SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in conditions {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Remove `name`, returning its value if it was set.
    pub fn delete(&mut self, name: &str) -> Result<Option<Value>, SearchError> {
        let name = normalize_name(name);
        match self.conditions.iter().position(|c| c.name == name) {
            Some(index) => Ok(Some(self.conditions.remove(index).value)),
            None => self.get(name).map(|_| None),
        }
    }

    /// Whether `name` can be set on this search.
    pub fn is_condition(&self, name: &str) -> bool {
        resolver::is_known(self.base.registry().as_ref(), normalize_name(name))
    }

    /// Stored conditions in composition order.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|c| (c.name.as_str(), &c.value))
    }

    /// Stored conditions as a JSON object.
    pub fn to_params(&self) -> serde_json::Map<String, Value> {
        self.conditions
            .iter()
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Compose every stored condition onto the base scope.
    ///
    /// # Errors
    ///
    /// Errors from invoking a scope are returned unchanged as `SearchError::Scope`.
    pub fn scope(&self) -> Result<Scope, SearchError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "search.compose",
            table = self.base.table_name(),
            conditions = self.conditions.len()
        )
        .entered();

        let started = Instant::now();
        let mut scope = self.base.clone();
        let mut applied = 0;
        for condition in &self.conditions {
            match self.call_for(condition) {
                Some((name, args)) => {
                    scope = scope.scoped(name, &args)?;
                    applied += 1;
                }
                None => log::debug!("condition '{}' left out", condition.name),
            }
        }

        #[cfg(feature = "metrics")]
        METRICS.record_compose(started.elapsed(), applied);
        log::debug!(
            "composed {} of {} condition(s) on {} in {:?}",
            applied,
            self.conditions.len(),
            self.base.table_name(),
            started.elapsed()
        );
        Ok(scope)
    }

    /// Options of the composed scope.
    pub fn proxy_options(&self) -> Result<ProxyOptions, SearchError> {
        Ok(self.scope()?.into_proxy_options())
    }

    /// Materialize the composed scope.
    pub fn all<Ex: LifeExecutor>(&self, executor: &Ex) -> Result<Vec<Row>, SearchError> {
        Ok(self.scope()?.all(executor)?)
    }

    pub fn first<Ex: LifeExecutor>(&self, executor: &Ex) -> Result<Option<Row>, SearchError> {
        Ok(self.scope()?.first(executor)?)
    }

    pub fn count<Ex: LifeExecutor>(&self, executor: &Ex) -> Result<usize, SearchError> {
        Ok(self.scope()?.count(executor)?)
    }

    fn find(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.name == name)
    }

    /// Scope name and arguments for one condition, or `None` to leave it out.
    fn call_for<'a>(&self, condition: &'a Condition) -> Option<(&'a str, Vec<Value>)> {
        match &condition.target {
            Target::Order(scope) => scope.as_deref().map(|name| (name, Vec::new())),
            Target::Scope(descriptor) if descriptor.arity == 0 => {
                coerce::is_truthy(&condition.value).then(|| (descriptor.name.as_str(), Vec::new()))
            }
            Target::Scope(descriptor) => {
                if self.config.ignore_blank_values && coerce::is_blank(&condition.value) {
                    return None;
                }
                let args = match &condition.value {
                    Value::Array(items)
                        if descriptor.arity > 1 && items.len() == descriptor.arity =>
                    {
                        items.clone()
                    }
                    value => vec![value.clone()],
                };
                Some((descriptor.name.as_str(), args))
            }
        }
    }
}

impl Scope {
    /// Empty search with this scope as its base.
    pub fn search(&self) -> Search {
        Search {
            base: self.clone(),
            config: SearchConfig::default(),
            conditions: Vec::new(),
        }
    }

    /// Search with this scope as its base, seeded from `conditions`.
    pub fn search_with<I, K, V>(&self, conditions: I) -> Result<Search, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Search::with_conditions(Some(self.clone()), conditions)
    }
}
