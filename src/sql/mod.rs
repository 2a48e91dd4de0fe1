//! SQL utilities
//!
//! Clause builders, DDL and identifier sanitization.

pub mod clause;
pub mod ddl;
pub mod filter;
pub mod sanitize;
pub mod update;

pub use clause::{ClauseBuilder, SqlClause};
pub use ddl::DdlGenerator;
pub use filter::{FilterRule, FilterRuleTable, ValueTransform, build_filter_clause};
pub use sanitize::{POSTGRES_RESERVED_WORDS, quote_identifier, validate_identifier};
pub use update::{FieldMap, UpdateRequest, build_set_clause, build_set_clause_with_next};
