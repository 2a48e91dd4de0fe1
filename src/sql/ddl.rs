//! DDL generation for the companies and jobs tables

use crate::config::StoreConfig;
use crate::sql::sanitize::quote_identifier;

/// DDL generator bound to the configured table names
pub struct DdlGenerator<'a> {
    config: &'a StoreConfig,
}

impl<'a> DdlGenerator<'a> {
    /// Create a new DDL generator with the given configuration
    pub fn new(config: &'a StoreConfig) -> Self {
        Self { config }
    }

    /// Generate CREATE TABLE for companies
    ///
    /// Handles are lowercase and at most 25 characters.
    pub fn generate_create_companies(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)), \
             name TEXT UNIQUE NOT NULL, \
             num_employees INTEGER CHECK (num_employees >= 0), \
             description TEXT NOT NULL, \
             logo_url TEXT)",
            quote_identifier(&self.config.companies_table)
        )
    }

    /// Generate CREATE TABLE for jobs
    ///
    /// Jobs are removed with their company.
    pub fn generate_create_jobs(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id SERIAL PRIMARY KEY, \
             title TEXT NOT NULL, \
             salary INTEGER CHECK (salary >= 0), \
             equity NUMERIC CHECK (equity <= 1.0), \
             company_handle VARCHAR(25) NOT NULL REFERENCES {}(handle) ON DELETE CASCADE)",
            quote_identifier(&self.config.jobs_table),
            quote_identifier(&self.config.companies_table)
        )
    }

    /// Generate DROP TABLE statement
    pub fn generate_drop_table(&self, table_name: &str) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", quote_identifier(table_name))
    }
}
