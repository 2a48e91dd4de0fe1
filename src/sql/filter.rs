//! Filter `WHERE` clause construction
//!
//! Each entity exposes a fixed [`FilterRuleTable`]. A filter key selects its
//! column, operator and value transform from the table; there is no generic
//! predicate language.

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::sql::clause::{ClauseBuilder, SqlClause};

/// How a filter value becomes a bound parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueTransform {
    /// Numeric value, bound unchanged
    Identity,
    /// String value, matched as a case-insensitive substring. LIKE
    /// metacharacters in the value are escaped and both sides are folded by
    /// `LOWER`.
    CaseFoldContains,
    /// Boolean flag. `true` emits the term bound to the given number,
    /// `false` emits nothing.
    WhenTrue(i64),
}

/// One recognized filter key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRule {
    pub key: &'static str,
    /// Column expression, e.g. `LOWER(name)`
    pub column: &'static str,
    pub operator: &'static str,
    pub transform: ValueTransform,
}

impl FilterRule {
    /// Bound value for `value`, or `None` if the term should be skipped
    fn bind(&self, value: &Value) -> Result<Option<Value>> {
        match self.transform {
            ValueTransform::Identity => {
                if !value.is_number() {
                    return Err(StoreError::invalid_filter(format!(
                        "'{}' expects a number",
                        self.key
                    )));
                }
                Ok(Some(value.clone()))
            }
            ValueTransform::CaseFoldContains => {
                let text = value.as_str().ok_or_else(|| {
                    StoreError::invalid_filter(format!("'{}' expects a string", self.key))
                })?;
                Ok(Some(Value::String(format!("%{}%", escape_like(text)))))
            }
            ValueTransform::WhenTrue(bound) => match value.as_bool() {
                Some(true) => Ok(Some(Value::from(bound))),
                Some(false) => Ok(None),
                None => Err(StoreError::invalid_filter(format!(
                    "'{}' expects a boolean",
                    self.key
                ))),
            },
        }
    }

    /// Render the term for `placeholder`
    fn render(&self, placeholder: &str) -> String {
        match self.transform {
            ValueTransform::CaseFoldContains => format!(
                "{} {} LOWER({}) ESCAPE '\\'",
                self.column, self.operator, placeholder
            ),
            _ => format!("{} {} {}", self.column, self.operator, placeholder),
        }
    }
}

/// Escape `\`, `%` and `_` so they match literally in a LIKE pattern
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The filterable keys of one entity
#[derive(Debug, Clone, Copy)]
pub struct FilterRuleTable {
    rules: &'static [FilterRule],
}

impl FilterRuleTable {
    pub const fn new(rules: &'static [FilterRule]) -> Self {
        Self { rules }
    }

    pub fn get(&self, key: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    /// Recognized keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.key)
    }
}

/// Build a `WHERE` predicate from `filters`
///
/// Terms are `<column> <operator> $n` joined with `AND`, in the order of
/// `filters`. Keys whose transform skips them consume no placeholder. The
/// returned clause is empty when no term was emitted; callers must not
/// splice an empty clause after `WHERE`.
///
/// Fails with [`StoreError::InvalidFilter`] for a key with no rule or a
/// value of the wrong type.
pub fn build_filter_clause(
    filters: &Map<String, Value>,
    rules: &FilterRuleTable,
) -> Result<SqlClause> {
    let mut builder = ClauseBuilder::new();

    for (key, value) in filters {
        let rule = rules
            .get(key)
            .ok_or_else(|| StoreError::invalid_filter(format!("Unknown filter: {}", key)))?;

        if let Some(bound) = rule.bind(value)? {
            builder.push(bound, |placeholder| rule.render(placeholder));
        }
    }

    Ok(builder.finish(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::COMPANY_FILTERS;
    use crate::job::JOB_FILTERS;
    use serde_json::json;

    fn filters(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    // =========================================================================
    // Company Rules
    // =========================================================================

    #[test]
    fn test_company_name_is_case_folded_contains() {
        let clause =
            build_filter_clause(&filters(json!({"name": "NeT"})), &COMPANY_FILTERS).unwrap();

        assert_eq!(clause.sql, r"LOWER(name) LIKE LOWER($1) ESCAPE '\'");
        // folding happens in the database, so the value keeps its case
        assert_eq!(clause.params, vec![json!("%NeT%")]);
    }

    #[test]
    fn test_like_metacharacters_are_escaped() {
        let clause = build_filter_clause(
            &filters(json!({"name": r"100%_sure\"})),
            &COMPANY_FILTERS,
        )
        .unwrap();

        assert_eq!(clause.params, vec![json!(r"%100\%\_sure\\%")]);
        assert_eq!(escape_like("ΟΔΟΣ"), "ΟΔΟΣ");
        assert_eq!(escape_like(""), "");
    }

    #[test]
    fn test_company_employee_range() {
        let clause = build_filter_clause(
            &filters(json!({"minEmployees": 10, "maxEmployees": 500})),
            &COMPANY_FILTERS,
        )
        .unwrap();

        assert_eq!(clause.sql, "num_employees >= $1 AND num_employees <= $2");
        assert_eq!(clause.params, vec![json!(10), json!(500)]);
    }

    #[test]
    fn test_company_all_filters_follow_input_order() {
        let clause = build_filter_clause(
            &filters(json!({"maxEmployees": 3, "name": "c", "minEmployees": 1})),
            &COMPANY_FILTERS,
        )
        .unwrap();

        assert_eq!(
            clause.sql,
            r"num_employees <= $1 AND LOWER(name) LIKE LOWER($2) ESCAPE '\' AND num_employees >= $3"
        );
        assert_eq!(clause.params, vec![json!(3), json!("%c%"), json!(1)]);
    }

    // =========================================================================
    // Job Rules
    // =========================================================================

    #[test]
    fn test_job_all_filters() {
        let clause = build_filter_clause(
            &filters(json!({"title": "2", "minSalary": 15000, "hasEquity": true})),
            &JOB_FILTERS,
        )
        .unwrap();

        assert_eq!(
            clause.sql,
            r"LOWER(title) LIKE LOWER($1) ESCAPE '\' AND salary >= $2 AND equity > $3"
        );
        assert_eq!(clause.params, vec![json!("%2%"), json!(15000), json!(0)]);
    }

    #[test]
    fn test_has_equity_true_binds_zero() {
        let clause =
            build_filter_clause(&filters(json!({"hasEquity": true})), &JOB_FILTERS).unwrap();

        assert_eq!(clause.sql, "equity > $1");
        assert_eq!(clause.params, vec![json!(0)]);
    }

    #[test]
    fn test_has_equity_false_is_skipped() {
        let clause =
            build_filter_clause(&filters(json!({"hasEquity": false})), &JOB_FILTERS).unwrap();

        assert!(clause.is_empty());
        assert!(clause.params.is_empty());
    }

    #[test]
    fn test_skipped_key_does_not_consume_placeholder() {
        let clause = build_filter_clause(
            &filters(json!({"hasEquity": false, "title": "mgr", "minSalary": 1})),
            &JOB_FILTERS,
        )
        .unwrap();

        assert_eq!(clause.sql, r"LOWER(title) LIKE LOWER($1) ESCAPE '\' AND salary >= $2");
        assert_eq!(clause.params.len(), 2);
        assert!(!clause.sql.contains("equity"));
    }

    #[test]
    fn test_placeholder_count_matches_emitted_terms() {
        let cases = [
            json!({}),
            json!({"hasEquity": false}),
            json!({"hasEquity": true}),
            json!({"title": "a", "hasEquity": false}),
            json!({"title": "a", "minSalary": 5, "hasEquity": true}),
        ];

        for case in cases {
            let clause = build_filter_clause(&filters(case.clone()), &JOB_FILTERS).unwrap();
            let placeholders = clause.sql.matches('$').count();
            let terms = if clause.is_empty() {
                0
            } else {
                clause.sql.split(" AND ").count()
            };
            assert_eq!(placeholders, clause.params.len(), "case {}", case);
            assert_eq!(terms, clause.params.len(), "case {}", case);
        }
    }

    // =========================================================================
    // Rejections
    // =========================================================================

    #[test]
    fn test_empty_filters_produce_empty_clause() {
        let clause = build_filter_clause(&Map::new(), &COMPANY_FILTERS).unwrap();
        assert!(clause.is_empty());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = build_filter_clause(&filters(json!({"color": "red"})), &COMPANY_FILTERS);
        match result {
            Err(StoreError::InvalidFilter(msg)) => assert!(msg.contains("color")),
            other => panic!("expected invalid filter, got {:?}", other),
        }

        // a job key is not a company key
        assert!(build_filter_clause(&filters(json!({"minSalary": 1})), &COMPANY_FILTERS).is_err());
    }

    #[test]
    fn test_wrong_value_types_are_rejected() {
        assert!(build_filter_clause(&filters(json!({"name": 5})), &COMPANY_FILTERS).is_err());
        assert!(
            build_filter_clause(&filters(json!({"minEmployees": "5"})), &COMPANY_FILTERS).is_err()
        );
        assert!(build_filter_clause(&filters(json!({"hasEquity": "true"})), &JOB_FILTERS).is_err());
    }

    #[test]
    fn test_rule_table_keys() {
        let keys: Vec<&str> = JOB_FILTERS.keys().collect();
        assert_eq!(keys, vec!["title", "minSalary", "hasEquity"]);
        assert!(COMPANY_FILTERS.get("maxEmployees").is_some());
        assert!(COMPANY_FILTERS.get("hasEquity").is_none());
    }
}
