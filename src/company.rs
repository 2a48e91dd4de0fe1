//! Company types
//!
//! Includes Company, NewCompany, CompanyFilter and the company rule tables.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::job::Job;
use crate::sql::filter::{FilterRule, FilterRuleTable, ValueTransform};
use crate::types::{ColumnType, UpdatableField};

/// Filter keys accepted for companies
pub const COMPANY_FILTERS: FilterRuleTable = FilterRuleTable::new(&[
    FilterRule {
        key: "name",
        column: "LOWER(name)",
        operator: "LIKE",
        transform: ValueTransform::CaseFoldContains,
    },
    FilterRule {
        key: "minEmployees",
        column: "num_employees",
        operator: ">=",
        transform: ValueTransform::Identity,
    },
    FilterRule {
        key: "maxEmployees",
        column: "num_employees",
        operator: "<=",
        transform: ValueTransform::Identity,
    },
]);

/// Fields that can be changed with a partial update. The handle is immutable.
pub const COMPANY_UPDATE_FIELDS: &[UpdatableField] = &[
    UpdatableField::new("name", "name", ColumnType::String),
    UpdatableField::new("description", "description", ColumnType::String),
    UpdatableField::new("numEmployees", "num_employees", ColumnType::Integer),
    UpdatableField::new("logoUrl", "logo_url", ColumnType::String),
];

/// Company row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Natural key, lowercase
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
    /// Jobs posted by this company; only loaded by `get_company`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<Job>>,
}

/// Request to create a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn new(
        handle: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            description: description.into(),
            num_employees: None,
            logo_url: None,
        }
    }

    pub fn with_num_employees(mut self, num_employees: i32) -> Self {
        self.num_employees = Some(num_employees);
        self
    }

    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }
}

/// Company search criteria; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_employees: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_employees: Option<i64>,
}

impl CompanyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn min_employees(mut self, min: i64) -> Self {
        self.min_employees = Some(min);
        self
    }

    pub fn max_employees(mut self, max: i64) -> Self {
        self.max_employees = Some(max);
        self
    }

    /// Reject a range that can never match
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(StoreError::validation(format!(
                    "minEmployees ({}) cannot be greater than maxEmployees ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Keys set on this filter, as the rule table expects them
    pub fn to_filter_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::validation(format!(
                "Company filter serialized to {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::filter::build_filter_clause;
    use crate::types::field_map;
    use serde_json::json;

    #[test]
    fn test_filter_map_has_only_set_keys() {
        let map = CompanyFilter::new().name("net").max_employees(300).to_filter_map().unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["name"], json!("net"));
        assert_eq!(map["maxEmployees"], json!(300));
    }

    #[test]
    fn test_empty_filter_map() {
        assert!(CompanyFilter::new().to_filter_map().unwrap().is_empty());
    }

    #[test]
    fn test_filter_keys_are_known_rules() {
        let map = CompanyFilter::new()
            .name("a")
            .min_employees(1)
            .max_employees(2)
            .to_filter_map()
            .unwrap();

        for key in map.keys() {
            assert!(COMPANY_FILTERS.get(key).is_some(), "no rule for {}", key);
        }
        let clause = build_filter_clause(&map, &COMPANY_FILTERS).unwrap();
        assert_eq!(clause.params.len(), 3);
    }

    #[test]
    fn test_validate_range() {
        assert!(CompanyFilter::new().min_employees(10).max_employees(10).validate().is_ok());
        assert!(CompanyFilter::new().min_employees(1).validate().is_ok());

        let err = CompanyFilter::new()
            .min_employees(20)
            .max_employees(10)
            .validate()
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let parsed: std::result::Result<CompanyFilter, _> =
            serde_json::from_value(json!({"name": "a", "color": "red"}));
        assert!(parsed.is_err());

        let parsed: CompanyFilter = serde_json::from_value(json!({"minEmployees": 5})).unwrap();
        assert_eq!(parsed.min_employees, Some(5));
    }

    #[test]
    fn test_company_serializes_camel_case() {
        let company = Company {
            handle: "c1".to_string(),
            name: "C1".to_string(),
            description: "Desc1".to_string(),
            num_employees: Some(1),
            logo_url: Some("http://c1.img".to_string()),
            jobs: None,
        };

        let value = serde_json::to_value(&company).unwrap();
        assert_eq!(value["numEmployees"], json!(1));
        assert_eq!(value["logoUrl"], json!("http://c1.img"));
        assert!(value.get("jobs").is_none());
    }

    #[test]
    fn test_update_field_map() {
        let map = field_map(COMPANY_UPDATE_FIELDS);
        assert_eq!(map.resolve("numEmployees"), "num_employees");
        assert_eq!(map.resolve("logoUrl"), "logo_url");
        assert_eq!(map.resolve("description"), "description");
    }
}
