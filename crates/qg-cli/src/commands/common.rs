//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use qg_core::{Config, SchemaMetadata};
use qg_sql::extract_schema;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: ExitCode only carries a status, main.rs reports nothing for it
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load configuration from `--config` or the `--dir` directory.
///
/// Returns the config together with the directory relative `schema_path`
/// values are resolved against.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<(Config, PathBuf)> {
    let root = PathBuf::from(&global.dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => Config::load_from_dir(&root)
            .with_context(|| format!("Failed to load config from {}", root.display()))?,
    };

    if global.verbose {
        eprintln!(
            "[verbose] Config: dialect={}, schema_path={}",
            config.dialect,
            config.schema_path.as_deref().unwrap_or("<none>")
        );
    }
    Ok((config, root))
}

/// Pick the DDL file from the command line, falling back to `schema_path`.
pub(crate) fn resolve_schema_path(
    arg: Option<&str>,
    config: &Config,
    root: &Path,
) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(PathBuf::from(path)),
        None => {
            let path = config.schema_path_absolute(root).context(
                "No schema file given. Pass one on the command line or set schema_path in querygate.yml",
            )?;
            log::debug!("Using schema_path from config: {}", path.display());
            Ok(path)
        }
    }
}

/// Read a text file with a path-bearing error.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read a DDL file and extract its schema.
pub(crate) fn load_schema(path: &Path, global: &GlobalArgs) -> Result<SchemaMetadata> {
    let ddl = read_file(path)?;
    let schema = extract_schema(&ddl);

    if global.verbose {
        eprintln!(
            "[verbose] Loaded {} tables and {} relations from {}",
            schema.tables.len(),
            schema.relations.len(),
            path.display()
        );
    }
    Ok(schema)
}
