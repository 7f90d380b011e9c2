//! qg-sql - SQL layer for Querygate
//!
//! This crate turns DDL text into [`qg_core::SchemaMetadata`] and checks
//! candidate queries against it using sqlparser-rs, returning either the
//! query or a `-- ERROR:` sentinel comment.

pub mod ddl;
pub mod dialect;
pub mod error;
pub mod index;
pub mod parser;
pub mod policy;
pub mod validator;
pub mod verdict;

pub use ddl::{extract_schema, extract_schema_with_diagnostics, Extraction, SkipReason, SkippedClause};
pub use dialect::{PostgresDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use index::SchemaIndex;
pub use parser::SqlParser;
pub use validator::{validate_query, QueryValidator};
pub use verdict::{is_error_sentinel, Rejection, Verdict, ERROR_PREFIX, INFO_PREFIX};
