//! Integration tests for the search proxy
//!
//! These tests pin down how a search resolves condition names against a model's
//! scopes and composes them, using the in-memory executor for materialization.
//!
//! Fixtures:
//! - User (id, username, age, company_id) with a `four_year_olds` named scope
//! - Company has_many Users

use scoped_search::{
    ColumnType, HasMany, MemoryExecutor, Model, NamedScope, Operator, Predicate, ProxyOptions, Row,
    Scope, Search, SearchError,
};
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

fn user_model() -> Model {
    Model::new("users")
        .column("id", ColumnType::Integer)
        .column("username", ColumnType::Text)
        .column("age", ColumnType::Integer)
        .column("company_id", ColumnType::Integer)
}

fn users() -> Arc<Model> {
    Arc::new(user_model())
}

fn users_with_four_year_olds() -> Arc<Model> {
    Arc::new(user_model().named_scope(
        "four_year_olds",
        NamedScope::fixed(ProxyOptions::new().condition(Predicate::eq("age", 4))),
    ))
}

fn direct(scope: &Scope, name: &str, args: &[Value]) -> ProxyOptions {
    scope.scoped(name, args).unwrap().into_proxy_options()
}

fn ids(rows: &[Row]) -> Vec<Value> {
    rows.iter().map(|r| r["id"].clone()).collect()
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_requires_a_base_scope() {
    assert!(matches!(Search::new(None), Err(SearchError::MissingScope)));
}

#[test]
fn test_sets_the_conditions() {
    let search = users().unscoped().search_with([("username", "bjohnson")]).unwrap();
    assert_eq!(
        search.to_params(),
        *json!({"username": "bjohnson"}).as_object().unwrap()
    );
}

// ============================================================================
// Setting conditions
// ============================================================================

#[test]
fn test_conditions_are_accessible_individually() {
    let search = users().unscoped().search_with([("username", "bjohnson")]).unwrap();
    assert_eq!(search.get("username").unwrap(), Some(&json!("bjohnson")));
}

#[test]
fn test_string_and_symbol_keys_are_equivalent() {
    let from_text = users().unscoped().search_with([("username", "bjohnson")]).unwrap();
    let from_symbol = users().unscoped().search_with([(":username", "bjohnson")]).unwrap();
    assert_eq!(from_text.to_params(), from_symbol.to_params());
    assert_eq!(from_symbol.get("username").unwrap(), Some(&json!("bjohnson")));
}

#[test]
fn test_seeding_equals_setting_afterwards() {
    let seeded = users()
        .unscoped()
        .search_with([("username", json!("bjohnson")), ("age_gt", json!(3))])
        .unwrap();

    let mut set = users().unscoped().search();
    set.set("username", "bjohnson").unwrap();
    set.set("age_gt", 3).unwrap();

    assert_eq!(seeded.to_params(), set.to_params());
    assert_eq!(seeded.proxy_options().unwrap(), set.proxy_options().unwrap());
}

#[test]
fn test_seeding_with_an_unknown_condition_fails_like_setting() {
    let result = users().unscoped().search_with([("unknown", true)]);
    assert!(matches!(
        result,
        Err(SearchError::UnknownCondition { ref name }) if name == "unknown"
    ));
}

#[test]
fn test_seeding_from_a_json_object() {
    let params = json!({"username": "bjohnson", "age_lt": "5"});
    let search = users()
        .unscoped()
        .search_with(params.as_object().cloned().unwrap())
        .unwrap();
    assert_eq!(search.get("age_lt").unwrap(), Some(&json!("5")));
}

#[test]
fn test_setting_columns_individually() {
    let mut search = users().unscoped().search();
    search.set("username", "bjohnson").unwrap();
    assert_eq!(search.get("username").unwrap(), Some(&json!("bjohnson")));
}

#[test]
fn test_setting_operator_conditions_individually() {
    let mut search = users().unscoped().search();
    search.set("username_gt", "bjohnson").unwrap();
    assert_eq!(search.get("username_gt").unwrap(), Some(&json!("bjohnson")));
}

#[test]
fn test_conflicting_conditions_are_not_merged() {
    let mut search = users().unscoped().search();
    search.set("username_greater_than", "bjohnson1").unwrap();
    search.set("username_gt", "bjohnson2").unwrap();

    assert_eq!(
        search.get("username_greater_than").unwrap(),
        Some(&json!("bjohnson1"))
    );
    assert_eq!(search.get("username_gt").unwrap(), Some(&json!("bjohnson2")));

    let base = users().unscoped();
    let expected = base
        .scoped("username_greater_than", &[json!("bjohnson1")])
        .and_then(|s| s.scoped("username_gt", &[json!("bjohnson2")]))
        .unwrap();
    assert_eq!(search.proxy_options().unwrap(), *expected.proxy_options());
}

#[test]
fn test_setting_named_scopes_individually() {
    let mut search = users_with_four_year_olds().unscoped().search();
    search.set("four_year_olds", true).unwrap();
    assert_eq!(search.get("four_year_olds").unwrap(), Some(&json!(true)));
}

#[test]
fn test_conditions_that_are_not_scopes_are_rejected() {
    let mut search = users().unscoped().search();
    assert!(matches!(
        search.set("unknown", true),
        Err(SearchError::UnknownCondition { ref name }) if name == "unknown"
    ));

    search.set("username", "bjohnson").unwrap();
    assert!(matches!(
        search.set("unknown", true),
        Err(SearchError::UnknownCondition { .. })
    ));
}

// ============================================================================
// Taking action
// ============================================================================

#[test]
fn test_all_without_conditions() {
    let db = MemoryExecutor::new();
    for _ in 0..3 {
        db.insert("users", json!({})).unwrap();
    }
    assert_eq!(users().unscoped().search().all(&db).unwrap().len(), 3);
}

#[test]
fn test_current_scope_from_an_association() {
    let db = MemoryExecutor::new();
    db.insert("users", json!({})).unwrap();
    let company = db.insert("companies", json!({})).unwrap();
    let user = db
        .insert("users", json!({"company_id": company["id"]}))
        .unwrap();

    let company_users = HasMany::new(users(), "company_id");
    assert_eq!(
        company_users.of(&company).search().all(&db).unwrap(),
        vec![user]
    );
}

#[test]
fn test_conditions_fold_onto_an_association() {
    let db = MemoryExecutor::new();
    let company = db.insert("companies", json!({})).unwrap();
    let other = db.insert("companies", json!({})).unwrap();
    let young = db
        .insert("users", json!({"company_id": company["id"], "age": 3}))
        .unwrap();
    db.insert("users", json!({"company_id": company["id"], "age": 7}))
        .unwrap();
    db.insert("users", json!({"company_id": other["id"], "age": 2}))
        .unwrap();

    let company_users = HasMany::new(users(), "company_id");
    let search = company_users
        .of(&company)
        .search_with([("age_lt", 5)])
        .unwrap();

    assert_eq!(
        search.proxy_options().unwrap().conditions,
        vec![
            Predicate::eq("company_id", company["id"].clone()),
            Predicate::new("age", Operator::LessThan, 5),
        ]
    );
    assert_eq!(search.all(&db).unwrap(), vec![young]);
}

#[test]
fn test_unsaved_owner_association_finds_nothing() {
    let db = MemoryExecutor::new();
    db.insert("users", json!({})).unwrap();

    let company_users = HasMany::new(users(), "company_id");
    let unsaved = json!({"name": "new"}).as_object().cloned().unwrap();
    let search = company_users.of(&unsaved).search();

    assert!(search.all(&db).unwrap().is_empty());
    assert_eq!(search.count(&db).unwrap(), 0);
}

#[test]
fn test_current_scope_from_a_named_scope() {
    let model = users_with_four_year_olds();
    let db = MemoryExecutor::new();
    for age in 3..=5 {
        db.insert("users", json!({"age": age})).unwrap();
    }

    let four_year_olds = model.unscoped().scoped("four_year_olds", &[]).unwrap();
    let found = four_year_olds.search().all(&db).unwrap();
    let by_age = model
        .unscoped()
        .scoped("age_equals", &[json!(4)])
        .unwrap()
        .all(&db)
        .unwrap();

    assert_eq!(ids(&found), ids(&by_age));
    assert_eq!(found.len(), 1);
}

#[test]
fn test_named_scope_condition_materializes_like_the_scope() {
    let model = users_with_four_year_olds();
    let db = MemoryExecutor::new();
    for age in [3, 4, 4, 5] {
        db.insert("users", json!({"age": age})).unwrap();
    }

    let search = model.unscoped().search_with([("four_year_olds", true)]).unwrap();
    let direct_rows = model
        .unscoped()
        .scoped("four_year_olds", &[])
        .unwrap()
        .all(&db)
        .unwrap();
    assert_eq!(search.all(&db).unwrap(), direct_rows);
    assert_eq!(search.count(&db).unwrap(), 2);
}

#[test]
fn test_calls_named_scopes_for_conditions() {
    let base = users().unscoped();
    let search = base.search_with([("age_less_than", 5)]).unwrap();
    assert_eq!(
        search.proxy_options().unwrap(),
        direct(&base, "age_less_than", &[json!(5)])
    );
}

#[test]
fn test_exact_column_names_alias_equals() {
    let base = users().unscoped();
    let search = base.search_with([("username", "joe")]).unwrap();
    assert_eq!(
        search.proxy_options().unwrap(),
        direct(&base, "username_equals", &[json!("joe")])
    );
}

#[test]
fn test_recognizes_existing_named_scopes() {
    let base = users_with_four_year_olds().unscoped();
    let search = base.search_with([("four_year_olds", true)]).unwrap();
    assert_eq!(
        search.proxy_options().unwrap(),
        direct(&base, "four_year_olds", &[])
    );
}

#[test]
fn test_truthy_values_apply_arity_zero_scopes() {
    let base = users().unscoped();
    let expected = direct(&base, "username_nil", &[]);
    for value in [json!(true), json!("true"), json!("1")] {
        let search = base.search_with([("username_nil", value.clone())]).unwrap();
        assert_eq!(search.proxy_options().unwrap(), expected, "value {value}");
    }
}

#[test]
fn test_falsy_values_ignore_arity_zero_scopes() {
    let base = users().unscoped();
    for value in [json!(false), json!("false")] {
        let search = base.search_with([("username_nil", value.clone())]).unwrap();
        assert_eq!(
            search.proxy_options().unwrap(),
            ProxyOptions::default(),
            "value {value}"
        );
        assert_eq!(search.get("username_nil").unwrap(), Some(&value));
    }
}

#[test]
fn test_falsy_arity_zero_scope_over_a_scoped_base_keeps_the_base() {
    let base = users_with_four_year_olds()
        .unscoped()
        .scoped("four_year_olds", &[])
        .unwrap();
    let search = base.search_with([("username_nil", false)]).unwrap();
    assert_eq!(search.proxy_options().unwrap(), *base.proxy_options());
}

#[test]
fn test_recognizes_the_order_condition() {
    let base = users().unscoped();
    let search = base.search_with([("order", "ascend_by_username")]).unwrap();
    assert_eq!(
        search.proxy_options().unwrap(),
        direct(&base, "ascend_by_username", &[])
    );
}

#[test]
fn test_order_naming_an_unknown_scope_is_rejected() {
    let result = users().unscoped().search_with([("order", "ascend_by_email")]);
    assert!(matches!(
        result,
        Err(SearchError::UnknownCondition { ref name }) if name == "ascend_by_email"
    ));
}

#[test]
fn test_composition_follows_insertion_order() {
    let db = MemoryExecutor::new();
    for (name, age) in [("carol", 4), ("alice", 4), ("bob", 5)] {
        db.insert("users", json!({"username": name, "age": age})).unwrap();
    }

    let search = users()
        .unscoped()
        .search_with([
            ("order", json!("ascend_by_username")),
            ("age", json!(4)),
        ])
        .unwrap();
    let names: Vec<Value> = search
        .all(&db)
        .unwrap()
        .iter()
        .map(|r| r["username"].clone())
        .collect();
    assert_eq!(names, vec![json!("alice"), json!("carol")]);
    assert_eq!(
        search
            .scope()
            .unwrap()
            .to_sql(sea_query::PostgresQueryBuilder),
        r#"SELECT * FROM "users" WHERE "age" = 4 ORDER BY "username" ASC"#
    );
}

#[test]
fn test_conflicting_equalities_are_both_applied() {
    let db = MemoryExecutor::new();
    db.insert("users", json!({"username": "joe"})).unwrap();

    let search = users()
        .unscoped()
        .search_with([("username", "joe"), ("username_eq", "bob")])
        .unwrap();
    assert_eq!(search.proxy_options().unwrap().conditions.len(), 2);
    assert!(search.all(&db).unwrap().is_empty());
}
