//! Job types
//!
//! Includes Job, NewJob, JobFilter and the job rule tables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::sql::filter::{FilterRule, FilterRuleTable, ValueTransform};
use crate::types::{ColumnType, UpdatableField};

/// Filter keys accepted for jobs
///
/// `hasEquity: false` means "don't filter on equity", not "no equity".
pub const JOB_FILTERS: FilterRuleTable = FilterRuleTable::new(&[
    FilterRule {
        key: "title",
        column: "LOWER(title)",
        operator: "LIKE",
        transform: ValueTransform::CaseFoldContains,
    },
    FilterRule {
        key: "minSalary",
        column: "salary",
        operator: ">=",
        transform: ValueTransform::Identity,
    },
    FilterRule {
        key: "hasEquity",
        column: "equity",
        operator: ">",
        transform: ValueTransform::WhenTrue(0),
    },
]);

/// Fields that can be changed with a partial update. A job cannot move
/// between companies.
pub const JOB_UPDATE_FIELDS: &[UpdatableField] = &[
    UpdatableField::new("title", "title", ColumnType::String),
    UpdatableField::new("salary", "salary", ColumnType::Integer),
    UpdatableField::new("equity", "equity", ColumnType::Decimal),
];

/// Job row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// Fraction of the company, serialized as a string (e.g. `"0.1"`)
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Request to create a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn new(title: impl Into<String>, company_handle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            salary: None,
            equity: None,
            company_handle: company_handle.into(),
        }
    }

    pub fn with_salary(mut self, salary: i32) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn with_equity(mut self, equity: Decimal) -> Self {
        self.equity = Some(equity);
        self
    }
}

/// Job search criteria; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_salary(mut self, min: i64) -> Self {
        self.min_salary = Some(min);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(min) = self.min_salary {
            if min < 0 {
                return Err(StoreError::validation(format!(
                    "minSalary ({}) cannot be negative",
                    min
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
                "Job filter serialized to {}",
                other
            ))),
        }
    }
}
