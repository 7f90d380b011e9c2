//! Validation outcomes and their sentinel-string rendering

use thiserror::Error;

/// Prefix of an error sentinel
pub const ERROR_PREFIX: &str = "-- ERROR:";

/// Prefix of an informational sentinel
pub const INFO_PREFIX: &str = "-- INFO:";

/// Why a candidate query was rejected
///
/// `Display` yields the reason text; [`Rejection::sentinel`] wraps it in the
/// `-- ERROR:` comment that crosses the string boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A write/DDL keyword was found, or a SELECT writes into a table
    #[error("Destructive queries are not permitted.")]
    Destructive { keyword: String },

    /// The query does not start with SELECT, or a statement is not a query
    #[error("Query must start with SELECT.")]
    NotSelect,

    /// The primary-dialect parser rejected the query
    ///
    /// `line` and `column` are 1-based, or 0 when the parser gave no location.
    #[error("Invalid SQL syntax.")]
    InvalidSyntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// Parsing produced no statements
    #[error("Empty query.")]
    EmptyQuery,

    /// A table reference is not in the schema
    #[error("Table '{name}' not found in schema.")]
    UnknownTable { name: String },

    /// A qualified column is missing from its (known) table
    #[error("Column '{column}' does not exist in table '{table}'.")]
    UnknownColumnInTable { column: String, table: String },

    /// An unqualified column is missing from every table
    #[error("Column '{column}' does not exist in the schema.")]
    UnknownColumn { column: String },
}

impl Rejection {
    /// Render as a `-- ERROR: <reason>` sentinel
    pub fn sentinel(&self) -> String {
        format!("{ERROR_PREFIX} {self}")
    }
}

/// Result of running the validation pipeline on one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Passed every check, including structural validation
    Accepted(String),
    /// Passed sanitization and the keyword policy only (non-primary dialect)
    PolicyOnly(String),
    /// Already a sentinel comment; returned untouched
    PassThrough(String),
    /// Rejected by the first failing check
    Rejected(Rejection),
}

impl Verdict {
    /// The string handed back to callers: the query, or a sentinel
    pub fn into_sql(self) -> String {
        match self {
            Verdict::Accepted(sql) | Verdict::PolicyOnly(sql) | Verdict::PassThrough(sql) => sql,
            Verdict::Rejected(rejection) => rejection.sentinel(),
        }
    }

    /// True when the query may be shown or executed as-is
    pub fn is_executable(&self) -> bool {
        matches!(self, Verdict::Accepted(_) | Verdict::PolicyOnly(_))
    }

    /// The rejection, if any
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// True when a string is an `-- ERROR:` sentinel
pub fn is_error_sentinel(sql: &str) -> bool {
    sql.trim_start()
        .to_uppercase()
        .starts_with(ERROR_PREFIX.trim_end_matches(':'))
}

#[cfg(test)]
#[path = "verdict_test.rs"]
mod tests;
