//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use qg_core::{Dialect, OutputFormat};
use std::str::FromStr;

/// Querygate - extract schemas from DDL and gate generated SQL
#[derive(Parser, Debug)]
#[command(name = "qg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for querygate.yml and used to resolve `schema_path`
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract tables, columns and relations from a DDL dump
    Extract(ExtractArgs),

    /// Check a candidate query against a schema
    Validate(ValidateArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// DDL file to read (default: `schema_path` from config)
    #[arg(conflicts_with = "csv")]
    pub ddl_file: Option<String>,

    /// Build the schema from a CSV file's header row instead of DDL
    #[arg(long)]
    pub csv: Option<String>,

    /// Table name used for --csv
    #[arg(long, default_value = qg_core::schema::CSV_DEFAULT_TABLE)]
    pub table_name: String,

    /// Output format (default: `output` from config)
    #[arg(short, long, value_enum)]
    pub output: Option<ExtractOutput>,

    /// Report DDL fragments that were skipped on stderr
    #[arg(long)]
    pub diagnostics: bool,
}

/// Extract output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutput {
    /// Pretty-printed JSON
    Json,
    /// Human-readable table listing
    Pretty,
    /// Compressed text for prompt context
    Prompt,
}

impl From<ExtractOutput> for OutputFormat {
    fn from(output: ExtractOutput) -> Self {
        match output {
            ExtractOutput::Json => OutputFormat::Json,
            ExtractOutput::Pretty => OutputFormat::Pretty,
            ExtractOutput::Prompt => OutputFormat::Prompt,
        }
    }
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Candidate SQL (reads stdin when neither SQL, --file nor --batch is given)
    #[arg(conflicts_with_all = ["file", "batch"])]
    pub sql: Option<String>,

    /// DDL file describing the schema (default: `schema_path` from config)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Dialect of the candidate (postgres, mysql, sqlite, duckdb)
    #[arg(short, long, value_parser = Dialect::from_str)]
    pub dialect: Option<Dialect>,

    /// Read the candidate from a file
    #[arg(short, long, conflicts_with = "batch")]
    pub file: Option<String>,

    /// Validate every non-blank line of a file as its own candidate
    #[arg(short, long)]
    pub batch: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
