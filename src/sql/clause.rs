//! Parameterized clause accumulation
//!
//! [`ClauseBuilder`] appends SQL terms and their bound values together and
//! owns the only placeholder counter, so a term can never be emitted without
//! its value (or the reverse).

use serde_json::Value;

/// A SQL fragment with positional placeholders and the values bound to them
///
/// The Nth placeholder in `sql` (counting from the builder's start index)
/// binds `params[N - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlClause {
    /// Fragment text, e.g. `"name"=$1, "logo_url"=$2`
    pub sql: String,
    /// Values in placeholder order
    pub params: Vec<Value>,
}

impl SqlClause {
    /// True when no term was emitted
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Accumulates terms for a single clause
#[derive(Debug)]
pub struct ClauseBuilder {
    terms: Vec<String>,
    params: Vec<Value>,
    next_param: usize,
}

impl Default for ClauseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseBuilder {
    /// Start numbering placeholders at `$1`
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start numbering placeholders at `$start`
    pub fn starting_at(start: usize) -> Self {
        Self {
            terms: Vec::new(),
            params: Vec::new(),
            next_param: start,
        }
    }

    /// Append a term bound to `value`
    ///
    /// `render` receives the placeholder (e.g. `$3`) and returns the term text.
    pub fn push(&mut self, value: Value, render: impl FnOnce(&str) -> String) {
        let placeholder = format!("${}", self.next_param);
        self.terms.push(render(&placeholder));
        self.params.push(value);
        self.next_param += 1;
    }

    /// Number of the placeholder the next pushed term would get
    pub fn next_placeholder(&self) -> usize {
        self.next_param
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Join all terms with `separator`
    pub fn finish(self, separator: &str) -> SqlClause {
        SqlClause {
            sql: self.terms.join(separator),
            params: self.params,
        }
    }
}
