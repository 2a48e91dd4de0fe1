//! Column types and updatable field definitions

use crate::sql::update::FieldMap;

/// Storage type of an updatable column, used to bind values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// TEXT / VARCHAR
    String,
    /// INTEGER
    Integer,
    /// NUMERIC
    Decimal,
}

impl ColumnType {
    /// Check that a JSON value can be bound to a column of this type
    pub fn validate_value(&self, value: &serde_json::Value) -> Result<(), String> {
        // Nullability is enforced by the table, not here
        if value.is_null() {
            return Ok(());
        }

        match (self, value) {
            (ColumnType::String, serde_json::Value::String(_)) => Ok(()),
            (ColumnType::Integer, serde_json::Value::Number(n)) => {
                let fits = n.as_i64().is_some_and(|v| i32::try_from(v).is_ok());
                if fits {
                    Ok(())
                } else {
                    Err(format!("{} is not a 32-bit integer", n))
                }
            }
            (ColumnType::Decimal, serde_json::Value::Number(_)) => Ok(()),
            (ColumnType::Decimal, serde_json::Value::String(s)) => s
                .parse::<rust_decimal::Decimal>()
                .map(|_| ())
                .map_err(|_| format!("Cannot convert '{}' to decimal", s)),
            _ => Err(format!("Type mismatch: expected {:?}, got {}", self, value)),
        }
    }
}

/// A field a caller may change through a partial update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatableField {
    /// Caller-facing name, e.g. `numEmployees`
    pub field: &'static str,
    /// Column name, e.g. `num_employees`
    pub column: &'static str,
    pub column_type: ColumnType,
}

impl UpdatableField {
    pub const fn new(field: &'static str, column: &'static str, column_type: ColumnType) -> Self {
        Self {
            field,
            column,
            column_type,
        }
    }
}

/// Look up an updatable field by its caller-facing name
pub fn find_field<'a>(fields: &'a [UpdatableField], name: &str) -> Option<&'a UpdatableField> {
    fields.iter().find(|f| f.field == name)
}

/// Translation table for the fields whose column name differs
pub fn field_map(fields: &[UpdatableField]) -> FieldMap {
    fields
        .iter()
        .filter(|f| f.field != f.column)
        .map(|f| (f.field, f.column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[UpdatableField] = &[
        UpdatableField::new("name", "name", ColumnType::String),
        UpdatableField::new("numEmployees", "num_employees", ColumnType::Integer),
    ];

    #[test]
    fn test_validate_matching_types() {
        assert!(ColumnType::String.validate_value(&json!("x")).is_ok());
        assert!(ColumnType::Integer.validate_value(&json!(42)).is_ok());
        assert!(ColumnType::Decimal.validate_value(&json!(0.25)).is_ok());
        assert!(ColumnType::Decimal.validate_value(&json!("0.25")).is_ok());
    }

    #[test]
    fn test_validate_null_for_any_type() {
        assert!(ColumnType::Integer.validate_value(&json!(null)).is_ok());
        assert!(ColumnType::String.validate_value(&json!(null)).is_ok());
    }

    #[test]
    fn test_validate_mismatches() {
        assert!(ColumnType::String.validate_value(&json!(1)).is_err());
        assert!(ColumnType::Integer.validate_value(&json!("1")).is_err());
        assert!(ColumnType::Integer.validate_value(&json!(1.5)).is_err());
        assert!(ColumnType::Integer.validate_value(&json!(5_000_000_000i64)).is_err());
        assert!(ColumnType::Decimal.validate_value(&json!("abc")).is_err());
        assert!(ColumnType::Decimal.validate_value(&json!(true)).is_err());
    }

    #[test]
    fn test_field_map_only_translated_fields() {
        let map = field_map(FIELDS);
        assert_eq!(map, FieldMap::new().with("numEmployees", "num_employees"));
    }

    #[test]
    fn test_find_field() {
        assert_eq!(find_field(FIELDS, "numEmployees").unwrap().column, "num_employees");
        assert!(find_field(FIELDS, "num_employees").is_none());
    }
}
