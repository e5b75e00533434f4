//! Condition operators and the alias table used to name generated scopes.
//!
//! Every column of a [`Model`](crate::Model) gets one generated scope per operator
//! alias, named `<column>_<alias>`. `username_gt` and `username_greater_than` are
//! distinct scope names that build the same predicate.

use serde::{Deserialize, Serialize};

/// Comparison applied by a generated condition scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equals,
    DoesNotEqual,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
    NotLike,
    BeginsWith,
    NotBeginWith,
    EndsWith,
    NotEndWith,
    Null,
    NotNull,
    Empty,
    Blank,
    NotBlank,
}

/// Alias table: `(operator, canonical suffix, alternative suffixes)`.
const ALIASES: &[(Operator, &str, &[&str])] = &[
    (Operator::Equals, "equals", &["eq", "is"]),
    (
        Operator::DoesNotEqual,
        "does_not_equal",
        &["ne", "not_eq", "not_equal_to", "is_not", "not"],
    ),
    (Operator::LessThan, "less_than", &["lt", "before"]),
    (Operator::LessThanOrEqualTo, "less_than_or_equal_to", &["lte"]),
    (Operator::GreaterThan, "greater_than", &["gt", "after"]),
    (Operator::GreaterThanOrEqualTo, "greater_than_or_equal_to", &["gte"]),
    (Operator::Like, "like", &["contains", "includes"]),
    (Operator::NotLike, "not_like", &["does_not_include"]),
    (Operator::BeginsWith, "begins_with", &["bw", "starts_with"]),
    (Operator::NotBeginWith, "not_begin_with", &["does_not_begin_with"]),
    (Operator::EndsWith, "ends_with", &["ew"]),
    (Operator::NotEndWith, "not_end_with", &["does_not_end_with"]),
    (Operator::Null, "null", &["nil"]),
    (Operator::NotNull, "not_null", &["not_nil"]),
    (Operator::Empty, "empty", &[]),
    (Operator::Blank, "blank", &[]),
    (Operator::NotBlank, "not_blank", &["present"]),
];

/// Prefix of generated ascending ordering scopes.
pub const ASCEND_BY: &str = "ascend_by_";
/// Prefix of generated descending ordering scopes.
pub const DESCEND_BY: &str = "descend_by_";

impl Operator {
    /// All operators, in alias table order.
    pub fn all() -> impl Iterator<Item = Operator> {
        ALIASES.iter().map(|(op, _, _)| *op)
    }

    /// Canonical scope suffix, e.g. `greater_than`.
    pub fn canonical(self) -> &'static str {
        self.entry().1
    }

    /// Canonical suffix followed by every alternative alias.
    pub fn suffixes(self) -> impl Iterator<Item = &'static str> {
        let (_, canonical, aliases) = self.entry();
        std::iter::once(*canonical).chain(aliases.iter().copied())
    }

    /// Number of arguments the generated scope takes.
    ///
    /// Null and blank checks are on/off filters and take none.
    pub fn arity(self) -> usize {
        match self {
            Operator::Null
            | Operator::NotNull
            | Operator::Empty
            | Operator::Blank
            | Operator::NotBlank => 0,
            _ => 1,
        }
    }

    /// Whether the argument is used as a text pattern.
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Operator::Like
                | Operator::NotLike
                | Operator::BeginsWith
                | Operator::NotBeginWith
                | Operator::EndsWith
                | Operator::NotEndWith
        )
    }

    /// Look up an operator by any of its suffixes.
    pub fn from_suffix(suffix: &str) -> Option<Operator> {
        ALIASES
            .iter()
            .find(|(_, canonical, aliases)| *canonical == suffix || aliases.contains(&suffix))
            .map(|(op, _, _)| *op)
    }

    fn entry(self) -> &'static (Operator, &'static str, &'static [&'static str]) {
        ALIASES
            .iter()
            .find(|(op, _, _)| *op == self)
            .unwrap_or(&ALIASES[0])
    }
}

/// Split a condition scope name into `(column, operator)`.
///
/// Suffixes are tried longest first so `age_not_null` resolves to `NotNull` rather
/// than `Null` on a column called `age_not`. A split is accepted only when the prefix
/// satisfies `is_column`.
pub fn parse_condition_name<'a>(
    name: &'a str,
    is_column: impl Fn(&str) -> bool,
) -> Option<(&'a str, Operator)> {
    let mut suffixes: Vec<(&'static str, Operator)> = ALIASES
        .iter()
        .flat_map(|(op, _, _)| op.suffixes().map(move |s| (s, *op)))
        .collect();
    suffixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    suffixes.into_iter().find_map(|(suffix, op)| {
        let column = name.strip_suffix(suffix)?.strip_suffix('_')?;
        (!column.is_empty() && is_column(column)).then_some((column, op))
    })
}

/// Split an ordering scope name into `(column, ascending)`.
pub fn parse_ordering_name<'a>(
    name: &'a str,
    is_column: impl Fn(&str) -> bool,
) -> Option<(&'a str, bool)> {
    if let Some(column) = name.strip_prefix(ASCEND_BY) {
        return is_column(column).then_some((column, true));
    }
    if let Some(column) = name.strip_prefix(DESCEND_BY) {
        return is_column(column).then_some((column, false));
    }
    None
}
