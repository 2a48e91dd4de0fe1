//! Store - Main entry point for company and job persistence
//!
//! Owns the connection pool and turns typed requests and the clause
//! builders' output into complete statements.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};
use tracing::{debug, info};

use crate::company::{COMPANY_FILTERS, COMPANY_UPDATE_FIELDS, Company, CompanyFilter, NewCompany};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::job::{JOB_FILTERS, JOB_UPDATE_FIELDS, Job, JobFilter, NewJob};
use crate::sql::clause::SqlClause;
use crate::sql::ddl::DdlGenerator;
use crate::sql::filter::build_filter_clause;
use crate::sql::sanitize::{quote_identifier, validate_identifier};
use crate::sql::update::{UpdateRequest, build_set_clause_with_next};
use crate::types::{ColumnType, UpdatableField, field_map, find_field};

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

const COMPANY_COLUMNS: &str =
    r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

const JOB_COLUMNS: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

/// PostgreSQL store for companies and jobs
///
/// Every operation is independent and runs its statements sequentially on
/// the shared pool. Nothing is retried.
pub struct Store {
    /// Database connection pool
    pool: PgPool,
    /// Store configuration
    config: StoreConfig,
}

impl Store {
    /// Create a new Store from configuration
    ///
    /// This will:
    /// 1. Validate the configured table names
    /// 2. Connect to the database
    /// 3. Create the companies and jobs tables if they don't exist
    pub async fn new(config: StoreConfig) -> Result<Self> {
        Self::validate_config(&config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| StoreError::Connection(format!("Database connection failed: {}", e)))?;

        let store = Self { pool, config };
        store.ensure_tables().await?;

        Ok(store)
    }

    /// Create a new Store from an existing pool
    pub async fn from_pool(pool: PgPool, config: StoreConfig) -> Result<Self> {
        Self::validate_config(&config)?;

        let store = Self { pool, config };
        store.ensure_tables().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn validate_config(config: &StoreConfig) -> Result<()> {
        validate_identifier(&config.companies_table).map_err(StoreError::Validation)?;
        validate_identifier(&config.jobs_table).map_err(StoreError::Validation)?;
        if config.companies_table == config.jobs_table {
            return Err(StoreError::validation(
                "Companies and jobs tables must have different names",
            ));
        }
        Ok(())
    }

    /// Ensures both tables exist; jobs last because it references companies
    async fn ensure_tables(&self) -> Result<()> {
        let ddl = DdlGenerator::new(&self.config);

        sqlx::query(&ddl.generate_create_companies())
            .execute(&self.pool)
            .await?;
        sqlx::query(&ddl.generate_create_jobs())
            .execute(&self.pool)
            .await?;

        info!(
            companies = %self.config.companies_table,
            jobs = %self.config.jobs_table,
            "tables ready"
        );
        Ok(())
    }

    fn companies(&self) -> String {
        quote_identifier(&self.config.companies_table)
    }

    fn jobs(&self) -> String {
        quote_identifier(&self.config.jobs_table)
    }

    // =========================================================================
    // Company Operations
    // =========================================================================

    /// Create a company
    ///
    /// Fails with [`StoreError::Duplicate`] if the handle is taken.
    pub async fn create_company(&self, company: NewCompany) -> Result<Company> {
        let check_sql = format!("SELECT handle FROM {} WHERE handle = $1", self.companies());
        log_sql("create_company", &check_sql, 1);

        let existing = sqlx::query(&check_sql)
            .bind(&company.handle)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            debug!(handle = %company.handle, "duplicate company");
            return Err(StoreError::duplicate(format!(
                "Duplicate company: {}",
                company.handle
            )));
        }

        let insert_sql = format!(
            "INSERT INTO {} (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {}",
            self.companies(),
            COMPANY_COLUMNS
        );
        log_sql("create_company", &insert_sql, 5);

        let row = sqlx::query(&insert_sql)
            .bind(&company.handle)
            .bind(&company.name)
            .bind(&company.description)
            .bind(company.num_employees)
            .bind(&company.logo_url)
            .fetch_one(&self.pool)
            .await?;

        row_to_company(&row)
    }

    /// List all companies ordered by name
    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY name",
            COMPANY_COLUMNS,
            self.companies()
        );
        log_sql("list_companies", &sql, 0);

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_company).collect()
    }

    /// Companies matching every criterion in `filter`, ordered by name
    ///
    /// A filter with no active criteria lists all companies.
    pub async fn filter_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>> {
        filter.validate()?;
        let clause = build_filter_clause(&filter.to_filter_map()?, &COMPANY_FILTERS)?;

        if clause.is_empty() {
            debug!("no active company filters, listing all");
            return self.list_companies().await;
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY name",
            COMPANY_COLUMNS,
            self.companies(),
            clause.sql
        );
        log_sql("filter_companies", &sql, clause.params.len());

        let rows = bind_filter_params(sqlx::query(&sql), &clause)?
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_company).collect()
    }

    /// Get a company by handle, with its jobs
    pub async fn get_company(&self, handle: &str) -> Result<Company> {
        let sql = format!(
            "SELECT {} FROM {} WHERE handle = $1",
            COMPANY_COLUMNS,
            self.companies()
        );
        log_sql("get_company", &sql, 1);

        let row = sqlx::query(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("No company: {}", handle)))?;

        let mut company = row_to_company(&row)?;
        company.jobs = Some(self.jobs_for_company(handle).await?);

        Ok(company)
    }

    /// Apply a partial update to a company
    ///
    /// Accepts `name`, `description`, `numEmployees` and `logoUrl`.
    pub async fn update_company(&self, handle: &str, updates: &UpdateRequest) -> Result<Company> {
        let (clause, key_idx) =
            build_set_clause_with_next(updates, &field_map(COMPANY_UPDATE_FIELDS))?;

        let sql = format!(
            "UPDATE {} SET {} WHERE handle = ${} RETURNING {}",
            self.companies(),
            clause.sql,
            key_idx,
            COMPANY_COLUMNS
        );
        log_sql("update_company", &sql, key_idx);

        let row = bind_update_params(sqlx::query(&sql), updates, &clause, COMPANY_UPDATE_FIELDS)?
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("No company: {}", handle)))?;

        row_to_company(&row)
    }

    /// Delete a company; its jobs go with it
    pub async fn remove_company(&self, handle: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE handle = $1", self.companies());
        log_sql("remove_company", &sql, 1);

        let result = sqlx::query(&sql).bind(handle).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("No company: {}", handle)));
        }

        Ok(())
    }

    async fn jobs_for_company(&self, handle: &str) -> Result<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE company_handle = $1 ORDER BY id",
            JOB_COLUMNS,
            self.jobs()
        );
        log_sql("jobs_for_company", &sql, 1);

        let rows = sqlx::query(&sql).bind(handle).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_job).collect()
    }

    // =========================================================================
    // Job Operations
    // =========================================================================

    /// Create a job
    ///
    /// Titles are not unique. An unknown company handle fails with the
    /// foreign key violation from the database.
    pub async fn create_job(&self, job: NewJob) -> Result<Job> {
        let sql = format!(
            "INSERT INTO {} (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            self.jobs(),
            JOB_COLUMNS
        );
        log_sql("create_job", &sql, 4);

        let row = sqlx::query(&sql)
            .bind(&job.title)
            .bind(job.salary)
            .bind(job.equity)
            .bind(&job.company_handle)
            .fetch_one(&self.pool)
            .await?;

        row_to_job(&row)
    }

    /// List all jobs ordered by title
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let sql = format!("SELECT {} FROM {} ORDER BY title, id", JOB_COLUMNS, self.jobs());
        log_sql("list_jobs", &sql, 0);

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_job).collect()
    }

    /// Jobs matching every criterion in `filter`, ordered by title
    ///
    /// A filter with no active criteria (including `hasEquity: false` alone)
    /// lists all jobs.
    pub async fn filter_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        filter.validate()?;
        let clause = build_filter_clause(&filter.to_filter_map()?, &JOB_FILTERS)?;

        if clause.is_empty() {
            debug!("no active job filters, listing all");
            return self.list_jobs().await;
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY title, id",
            JOB_COLUMNS,
            self.jobs(),
            clause.sql
        );
        log_sql("filter_jobs", &sql, clause.params.len());

        let rows = bind_filter_params(sqlx::query(&sql), &clause)?
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_job).collect()
    }

    /// Get a job by title; the oldest job wins when titles repeat
    pub async fn get_job(&self, title: &str) -> Result<Job> {
        let sql = format!(
            "SELECT {} FROM {} WHERE title = $1 ORDER BY id LIMIT 1",
            JOB_COLUMNS,
            self.jobs()
        );
        log_sql("get_job", &sql, 1);

        let row = sqlx::query(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("No job: {}", title)))?;

        row_to_job(&row)
    }

    /// Apply a partial update to every job with this title
    ///
    /// Accepts `title`, `salary` and `equity`. Returns the first updated row.
    pub async fn update_job(&self, title: &str, updates: &UpdateRequest) -> Result<Job> {
        let (clause, key_idx) = build_set_clause_with_next(updates, &field_map(JOB_UPDATE_FIELDS))?;

        let sql = format!(
            "UPDATE {} SET {} WHERE title = ${} RETURNING {}",
            self.jobs(),
            clause.sql,
            key_idx,
            JOB_COLUMNS
        );
        log_sql("update_job", &sql, key_idx);

        let rows = bind_update_params(sqlx::query(&sql), updates, &clause, JOB_UPDATE_FIELDS)?
            .bind(title)
            .fetch_all(&self.pool)
            .await?;

        let row = rows
            .first()
            .ok_or_else(|| StoreError::not_found(format!("No job: {}", title)))?;

        row_to_job(row)
    }

    /// Delete every job with this title
    pub async fn remove_job(&self, title: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE title = $1", self.jobs());
        log_sql("remove_job", &sql, 1);

        let result = sqlx::query(&sql).bind(title).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("No job: {}", title)));
        }

        Ok(())
    }
}

// =========================================================================
// Internal Helpers
// =========================================================================

fn log_sql(operation: &str, sql: &str, param_count: usize) {
    debug!(target: "jobly_store::sql", operation, param_count, sql = %sql, "executing");
}

fn row_to_company(row: &PgRow) -> Result<Company> {
    Ok(Company {
        handle: row.try_get("handle")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        num_employees: row.try_get("numEmployees")?,
        logo_url: row.try_get("logoUrl")?,
        jobs: None,
    })
}

fn row_to_job(row: &PgRow) -> Result<Job> {
    Ok(Job {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        salary: row.try_get("salary")?,
        equity: row.try_get("equity")?,
        company_handle: row.try_get("companyHandle")?,
    })
}

/// Bind a SET clause's params using each field's declared column type
///
/// `updates` must be the map the clause was built from, so keys and params
/// line up.
fn bind_update_params<'q>(
    mut query: PgQuery<'q>,
    updates: &UpdateRequest,
    clause: &SqlClause,
    fields: &[UpdatableField],
) -> Result<PgQuery<'q>> {
    for (name, value) in updates.keys().zip(&clause.params) {
        let field = find_field(fields, name)
            .ok_or_else(|| StoreError::validation(format!("Field '{}' cannot be updated", name)))?;

        field
            .column_type
            .validate_value(value)
            .map_err(|e| StoreError::validation(format!("Invalid value for '{}': {}", name, e)))?;

        query = bind_value(query, field.column_type, name, value)?;
    }
    Ok(query)
}

fn bind_value<'q>(
    query: PgQuery<'q>,
    column_type: ColumnType,
    field: &str,
    value: &Value,
) -> Result<PgQuery<'q>> {
    let mismatch = || StoreError::validation(format!("Invalid value for '{}': {}", field, value));

    Ok(match column_type {
        ColumnType::String => match value {
            Value::Null => query.bind(None::<String>),
            _ => query.bind(value.as_str().ok_or_else(mismatch)?.to_string()),
        },
        ColumnType::Integer => match value {
            Value::Null => query.bind(None::<i32>),
            _ => {
                let int_val = value
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(mismatch)?;
                query.bind(int_val)
            }
        },
        ColumnType::Decimal => match value {
            Value::Null => query.bind(None::<Decimal>),
            _ => query.bind(json_to_decimal(value).ok_or_else(mismatch)?),
        },
    })
}

/// Bind filter params by JSON type; the filter rules already checked them
fn bind_filter_params<'q>(mut query: PgQuery<'q>, clause: &SqlClause) -> Result<PgQuery<'q>> {
    for param in &clause.params {
        query = match param {
            Value::String(s) => query.bind(s.clone()),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(json_to_decimal(param).ok_or_else(|| {
                    StoreError::invalid_filter(format!("Unsupported number: {}", n))
                })?),
            },
            other => {
                return Err(StoreError::invalid_filter(format!(
                    "Unsupported filter value: {}",
                    other
                )));
            }
        };
    }
    Ok(query)
}

fn json_to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            n.to_string()
        }
        Value::String(s) => s.clone(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
