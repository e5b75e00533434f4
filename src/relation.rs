//! Associations between models.
//!
//! Provides scopes over related records, usable as the base of a search:
//! - belongs_to: Many-to-one relationship
//! - has_many: One-to-many relationship

use crate::executor::Row;
use crate::model::{Model, ScopeRegistry};
use crate::query::{Predicate, Scope};
use serde_json::Value;
use std::sync::Arc;

/// One-to-many relationship (e.g. Company has_many Users)
///
/// # Example
///
/// ```
/// use scoped_search::{ColumnType, HasMany, MemoryExecutor, Model};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let users = Arc::new(
///     Model::new("users")
///         .column("id", ColumnType::Integer)
///         .column("company_id", ColumnType::Integer),
/// );
/// let company_users = HasMany::new(users, "company_id");
///
/// let db = MemoryExecutor::new();
/// let company = db.insert("companies", json!({}))?;
/// db.insert("users", json!({}))?;
/// let user = db.insert("users", json!({ "company_id": company["id"] }))?;
///
/// let found = company_users.of(&company).search().all(&db)?;
/// assert_eq!(found, vec![user]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct HasMany {
    target: Arc<Model>,
    foreign_key: String,
    owner_key: String,
}

impl HasMany {
    /// Relationship keyed by `foreign_key` on the target, referencing the owner's `id`.
    pub fn new(target: Arc<Model>, foreign_key: impl Into<String>) -> Self {
        Self {
            target,
            foreign_key: foreign_key.into(),
            owner_key: "id".to_string(),
        }
    }

    /// Reference an owner column other than `id`.
    pub fn references(mut self, owner_key: impl Into<String>) -> Self {
        self.owner_key = owner_key.into();
        self
    }

    pub fn target(&self) -> &Arc<Model> {
        &self.target
    }

    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// Target records whose foreign key equals `key`.
    pub fn scope_for(&self, key: impl Into<Value>) -> Scope {
        self.target
            .unscoped()
            .filter(Predicate::eq(self.foreign_key.clone(), key))
    }

    /// Target records belonging to `owner`.
    ///
    /// An owner without the referenced key (not yet saved) owns nothing, so the
    /// scope matches no rows.
    pub fn of(&self, owner: &Row) -> Scope {
        match owner_key(owner, &self.owner_key) {
            Some(key) => self.scope_for(key.clone()),
            None => {
                log::debug!(
                    "owner has no '{}'; {} association is empty",
                    self.owner_key,
                    self.target.table_name()
                );
                self.target.unscoped().none()
            }
        }
    }
}

/// Many-to-one relationship (e.g. User belongs_to Company)
#[derive(Debug, Clone)]
pub struct BelongsTo {
    target: Arc<Model>,
    foreign_key: String,
    target_key: String,
}

impl BelongsTo {
    /// Relationship through `foreign_key` on the owner, referencing the target's `id`.
    pub fn new(target: Arc<Model>, foreign_key: impl Into<String>) -> Self {
        Self {
            target,
            foreign_key: foreign_key.into(),
            target_key: "id".to_string(),
        }
    }

    /// Scope over the single target record of `owner`.
    ///
    /// An owner with a missing or null foreign key references nothing.
    pub fn of(&self, owner: &Row) -> Scope {
        let base = self.target.unscoped();
        match owner_key(owner, &self.foreign_key) {
            Some(key) => base.filter(Predicate::eq(self.target_key.clone(), key.clone())),
            None => base.none(),
        }
    }
}

fn owner_key<'a>(owner: &'a Row, column: &str) -> Option<&'a Value> {
    owner.get(column).filter(|value| !value.is_null())
}
