//! # Scoped Search
//!
//! Search proxy over named, composable query scopes.
//!
//! A [`Search`] maps condition names such as `username`, `age_lt`, `username_nil` or
//! `four_year_olds` to values, checks every name against the scopes of its base
//! [`Scope`], and composes the matching scope calls into one query handle. The
//! handle renders to SQL through SeaQuery and materializes through a
//! [`LifeExecutor`].
//!
//! ```
//! use scoped_search::{ColumnType, MemoryExecutor, Model, NamedScope, Predicate, ProxyOptions};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let users = Arc::new(
//!     Model::new("users")
//!         .column("username", ColumnType::Text)
//!         .column("age", ColumnType::Integer)
//!         .named_scope(
//!             "four_year_olds",
//!             NamedScope::fixed(ProxyOptions::new().condition(Predicate::eq("age", 4))),
//!         ),
//! );
//!
//! let db = MemoryExecutor::new();
//! for age in 3..=5 {
//!     db.insert("users", json!({ "age": age }))?;
//! }
//!
//! let search = users.unscoped().search_with([("four_year_olds", true)])?;
//! assert_eq!(search.count(&db)?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod executor;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod model;
pub mod query;
pub mod relation;
pub mod search;

pub use config::SearchConfig;
pub use executor::{LifeError, LifeExecutor, MemoryExecutor, Row};
pub use model::{
    ColumnDefinition, ColumnType, Model, NamedScope, ScopeDescriptor, ScopeError, ScopeRegistry,
};
pub use query::{Direction, Operator, OrderBy, Predicate, ProxyOptions, Scope};
pub use relation::{BelongsTo, HasMany};
pub use search::{Search, SearchError};
