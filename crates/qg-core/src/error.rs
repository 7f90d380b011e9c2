//! Error types for qg-core

use thiserror::Error;

/// Core error type for Querygate
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Unknown SQL dialect name
    #[error("[C003] Unknown SQL dialect '{0}'. Expected one of: postgres, mysql, sqlite, duckdb")]
    UnknownDialect(String),

    /// C004: CSV input has no header row
    #[error("[C004] CSV is empty: no header row found")]
    CsvEmpty,

    /// C005: Relation string is not in `Table.column -> Table.column` form
    #[error("[C005] Malformed relation '{0}': expected 'Table.column -> Table.column'")]
    MalformedRelation(String),

    /// C006: IO error with file path context
    #[error("[C006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C007: YAML parse error
    #[error("[C007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
