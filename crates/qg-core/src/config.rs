//! Configuration types and parsing for querygate.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file names probed by [`Config::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["querygate.yml", "querygate.yaml"];

/// Project configuration from querygate.yml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dialect the generated queries are written in
    #[serde(default)]
    pub dialect: Dialect,

    /// Default DDL file used when a command is given no schema argument
    #[serde(default)]
    pub schema_path: Option<String>,

    /// Default output format for `qg extract`
    #[serde(default)]
    pub output: OutputFormat,
}

/// SQL dialect of a candidate query
///
/// Only [`Dialect::Postgres`] receives full structural validation; the others
/// get sanitization and the destructive-keyword policy only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL (primary dialect)
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    /// MySQL
    MySql,
    /// SQLite
    Sqlite,
    /// DuckDB
    DuckDb,
}

impl Dialect {
    /// Every supported dialect
    pub const ALL: [Dialect; 4] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::DuckDb,
    ];

    /// True for the dialect that gets AST-based validation
    pub fn is_primary(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            "duckdb" => Ok(Dialect::DuckDb),
            _ => Err(CoreError::UnknownDialect(s.to_string())),
        }
    }
}

/// Output format for extracted schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON `SchemaMetadata`
    #[default]
    Json,
    /// Human-readable table listing
    Pretty,
    /// Compressed prompt text
    Prompt,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    ///
    /// Looks for querygate.yml or querygate.yaml. Without either file the
    /// default configuration is returned.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No querygate config in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    /// Resolve `schema_path` against a base directory
    pub fn schema_path_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.schema_path.as_ref().map(|p| root.join(p))
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if let Some(path) = &self.schema_path {
            if path.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "schema_path cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
