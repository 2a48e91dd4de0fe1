//! Partial-update `SET` clause construction

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::sql::clause::{ClauseBuilder, SqlClause};
use crate::sql::sanitize::quote_identifier;

/// Sparse set of fields to change, in caller order
pub type UpdateRequest = Map<String, Value>;

/// Translation from caller-facing field names to column names
///
/// Only fields whose names differ need an entry; anything else resolves to
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    columns: HashMap<String, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Column name for `field`
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }
}

impl<F: Into<String>, C: Into<String>> FromIterator<(F, C)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(field, column)| (field.into(), column.into()))
                .collect(),
        }
    }
}

/// Build a `SET` clause fragment from `updates`
///
/// Produces `"col_a"=$1, "col_b"=$2, ...` with the update values as params,
/// in the order of `updates`. Nulls are passed through as params.
///
/// Fails with [`StoreError::Validation`] when `updates` is empty.
///
/// # Example
/// ```
/// use jobly_store::sql::{build_set_clause, FieldMap};
///
/// let updates = serde_json::json!({"numEmployees": 10, "name": "Acme"});
/// let map = FieldMap::new().with("numEmployees", "num_employees");
/// let clause = build_set_clause(updates.as_object().unwrap(), &map).unwrap();
///
/// assert_eq!(clause.sql, "\"num_employees\"=$1, \"name\"=$2");
/// ```
pub fn build_set_clause(updates: &UpdateRequest, field_map: &FieldMap) -> Result<SqlClause> {
    Ok(set_clause_builder(updates, field_map)?.finish(", "))
}

/// Like [`build_set_clause`], but also returns the next free placeholder
/// number so the caller can bind a trailing `WHERE` key.
pub fn build_set_clause_with_next(
    updates: &UpdateRequest,
    field_map: &FieldMap,
) -> Result<(SqlClause, usize)> {
    let builder = set_clause_builder(updates, field_map)?;
    let next = builder.next_placeholder();
    Ok((builder.finish(", "), next))
}

fn set_clause_builder(updates: &UpdateRequest, field_map: &FieldMap) -> Result<ClauseBuilder> {
    if updates.is_empty() {
        return Err(StoreError::validation("No data"));
    }

    let mut builder = ClauseBuilder::new();
    for (field, value) in updates {
        let column = quote_identifier(field_map.resolve(field));
        builder.push(value.clone(), |placeholder| {
            format!("{}={}", column, placeholder)
        });
    }

    Ok(builder)
}
