//! Configuration for Store
//!
//! Provides a builder pattern for configuring the store.

/// Configuration for the store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Name of the companies table (default: "companies")
    pub companies_table: String,
    /// Name of the jobs table (default: "jobs")
    pub jobs_table: String,
    /// Maximum pool size (default: 5)
    pub max_connections: u32,
}

impl StoreConfig {
    /// Create a new configuration builder
    pub fn builder(database_url: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(database_url)
    }
}

/// Builder for StoreConfig
#[derive(Debug)]
pub struct StoreConfigBuilder {
    database_url: String,
    companies_table: String,
    jobs_table: String,
    max_connections: u32,
}

impl StoreConfigBuilder {
    /// Create a new builder with the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            companies_table: "companies".to_string(),
            jobs_table: "jobs".to_string(),
            max_connections: 5,
        }
    }

    /// Set the companies table name (default: "companies")
    pub fn companies_table(mut self, name: impl Into<String>) -> Self {
        self.companies_table = name.into();
        self
    }

    /// Set the jobs table name (default: "jobs")
    pub fn jobs_table(mut self, name: impl Into<String>) -> Self {
        self.jobs_table = name.into();
        self
    }

    /// Set the maximum number of pooled connections (default: 5)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            database_url: self.database_url,
            companies_table: self.companies_table,
            jobs_table: self.jobs_table,
            max_connections: self.max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Default Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = StoreConfig::builder("postgres://localhost/jobly").build();

        assert_eq!(config.database_url, "postgres://localhost/jobly");
        assert_eq!(config.companies_table, "companies");
        assert_eq!(config.jobs_table, "jobs");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_builder_accepts_string() {
        let config = StoreConfig::builder(String::from("postgres://localhost/db")).build();
        assert_eq!(config.database_url, "postgres://localhost/db");
    }

    // =========================================================================
    // Table Name Tests
    // =========================================================================

    #[test]
    fn test_custom_table_names() {
        let config = StoreConfig::builder("postgres://localhost/test")
            .companies_table("test_ab12_companies")
            .jobs_table(String::from("test_ab12_jobs"))
            .build();

        assert_eq!(config.companies_table, "test_ab12_companies");
        assert_eq!(config.jobs_table, "test_ab12_jobs");
    }

    #[test]
    fn test_max_connections() {
        let config = StoreConfig::builder("postgres://localhost/test")
            .max_connections(1)
            .build();

        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_builder_order_independence() {
        let config1 = StoreConfig::builder("postgres://localhost/test")
            .jobs_table("j")
            .companies_table("c")
            .build();

        let config2 = StoreConfig::builder("postgres://localhost/test")
            .companies_table("c")
            .jobs_table("j")
            .build();

        assert_eq!(config1.companies_table, config2.companies_table);
        assert_eq!(config1.jobs_table, config2.jobs_table);
    }

    #[test]
    fn test_builder_debug() {
        let builder = StoreConfig::builder("postgres://localhost/test");
        let debug_str = format!("{:?}", builder);
        assert!(debug_str.contains("StoreConfigBuilder"));
    }
}
