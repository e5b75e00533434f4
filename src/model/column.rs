//! Column metadata and argument casting.
//!
//! Condition scopes cast their argument to the column type before building a
//! predicate, so `age_lt = "5"` and `age_lt = 5` produce the same options.

use serde_json::{Number, Value};

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Boolean,
}

/// Column definition metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

impl ColumnType {
    /// Cast a scope argument to this type.
    ///
    /// `Null` passes through unchanged. Arrays and objects are never accepted.
    /// Returns a message describing the rejected value on failure.
    pub fn cast(self, value: &Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self {
            ColumnType::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| format!("'{}' is not an integer", s)),
                other => Err(format!("{} is not an integer", other)),
            },
            ColumnType::Float => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("'{}' is not a number", s)),
                other => Err(format!("{} is not a number", other)),
            },
            ColumnType::Text => as_text(value).map(Value::String),
            ColumnType::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::String(s) => match s.as_str() {
                    "true" | "t" | "1" => Ok(Value::Bool(true)),
                    "false" | "f" | "0" => Ok(Value::Bool(false)),
                    _ => Err(format!("'{}' is not a boolean", s)),
                },
                other => Err(format!("{} is not a boolean", other)),
            },
        }
    }
}

/// Text form of a scalar value, used for pattern arguments.
pub(crate) fn as_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("{} is not a text value", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_cast_accepts_numeric_strings() {
        assert_eq!(ColumnType::Integer.cast(&json!("5")), Ok(json!(5)));
        assert_eq!(ColumnType::Integer.cast(&json!(5)), Ok(json!(5)));
        assert!(ColumnType::Integer.cast(&json!("five")).is_err());
        assert!(ColumnType::Integer.cast(&json!(4.5)).is_err());
    }

    #[test]
    fn test_text_cast_stringifies_scalars() {
        assert_eq!(ColumnType::Text.cast(&json!("joe")), Ok(json!("joe")));
        assert_eq!(ColumnType::Text.cast(&json!(42)), Ok(json!("42")));
        assert!(ColumnType::Text.cast(&json!(["a"])).is_err());
    }

    #[test]
    fn test_boolean_cast() {
        assert_eq!(ColumnType::Boolean.cast(&json!("1")), Ok(json!(true)));
        assert_eq!(ColumnType::Boolean.cast(&json!("f")), Ok(json!(false)));
        assert!(ColumnType::Boolean.cast(&json!("maybe")).is_err());
    }

    #[test]
    fn test_null_passes_through() {
        for ty in [
            ColumnType::Integer,
            ColumnType::Float,
            ColumnType::Text,
            ColumnType::Boolean,
        ] {
            assert_eq!(ty.cast(&Value::Null), Ok(Value::Null));
        }
    }

    #[test]
    fn test_float_cast() {
        assert_eq!(ColumnType::Float.cast(&json!("2.5")), Ok(json!(2.5)));
        assert!(ColumnType::Float.cast(&json!("NaN-ish")).is_err());
    }
}
