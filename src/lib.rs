//! # jobly-store
//!
//! PostgreSQL persistence for companies and the jobs they post.
//!
//! Besides plain create/read/delete, the crate supports two kinds of dynamic
//! statements, both built from fixed tables rather than a general query
//! language:
//!
//! - **Partial updates**: a sparse map of caller-facing field names becomes a
//!   parameterized `SET` clause, translating names such as `numEmployees` to
//!   their columns.
//! - **Filtered search**: a small set of per-entity filter keys becomes a
//!   parameterized `WHERE` clause, each key with its own column, operator and
//!   value transform.
//!
//! Values are always bound as parameters; only quoted, validated identifiers
//! are spliced into SQL text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jobly_store::{CompanyFilter, JobFilter, NewCompany, NewJob, Store, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::builder("postgres://localhost/jobly").build();
//!     let store = Store::new(config).await?;
//!
//!     store
//!         .create_company(
//!             NewCompany::new("acme", "Acme Corp", "Anvils").with_num_employees(120),
//!         )
//!         .await?;
//!     store
//!         .create_job(NewJob::new("Anvil Tester", "acme").with_salary(50000))
//!         .await?;
//!
//!     let mid_sized = store
//!         .filter_companies(&CompanyFilter::new().name("ACME").min_employees(100))
//!         .await?;
//!
//!     let updates = serde_json::json!({"numEmployees": 150, "logoUrl": null});
//!     store
//!         .update_company("acme", updates.as_object().unwrap())
//!         .await?;
//!
//!     let paid = store
//!         .filter_jobs(&JobFilter::new().min_salary(40000).has_equity(false))
//!         .await?;
//!
//!     println!("{} companies, {} jobs", mid_sized.len(), paid.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use jobly_store::StoreConfig;
//!
//! let config = StoreConfig::builder("postgres://localhost/jobly")
//!     .companies_table("companies") // default
//!     .jobs_table("jobs")           // default
//!     .max_connections(10)
//!     .build();
//! ```
//!
//! ## Logging
//!
//! Statements are reported through `tracing` at debug level under the
//! `jobly_store::sql` target. Install a subscriber in the application to see
//! them.

pub mod company;
pub mod config;
pub mod error;
pub mod job;
pub mod sql;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use company::{COMPANY_FILTERS, COMPANY_UPDATE_FIELDS, Company, CompanyFilter, NewCompany};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::{Result, StoreError};
pub use job::{JOB_FILTERS, JOB_UPDATE_FIELDS, Job, JobFilter, NewJob};
pub use store::Store;
pub use types::{ColumnType, UpdatableField};

// Re-export clause builders for advanced users
pub use sql::clause::SqlClause;
pub use sql::filter::{FilterRule, FilterRuleTable, ValueTransform, build_filter_clause};
pub use sql::update::{FieldMap, UpdateRequest, build_set_clause};
