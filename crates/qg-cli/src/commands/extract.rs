//! Extract command implementation

use anyhow::{Context, Result};
use qg_core::{OutputFormat, SchemaMetadata};
use qg_sql::{extract_schema_with_diagnostics, SkippedClause};
use std::path::{Path, PathBuf};

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::commands::common::{load_config, read_file, resolve_schema_path, ExitCode};

/// Execute the extract command
pub async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_config(global)?;

    let (source, schema, skipped) = match &args.csv {
        Some(csv) => {
            let path = PathBuf::from(csv);
            let content = read_file(&path)?;
            let schema = SchemaMetadata::from_csv_header(&content, &args.table_name)
                .with_context(|| format!("Failed to read CSV header from {}", path.display()))?;
            (path, schema, Vec::new())
        }
        None => {
            let path = resolve_schema_path(args.ddl_file.as_deref(), &config, &root)?;
            let extraction = extract_schema_with_diagnostics(&read_file(&path)?);
            (path, extraction.schema, extraction.skipped)
        }
    };

    if global.verbose {
        eprintln!(
            "[verbose] {}: {} tables, {} relations, {} fragments skipped",
            source.display(),
            schema.tables.len(),
            schema.relations.len(),
            skipped.len()
        );
    }

    if args.diagnostics {
        print_skipped(&skipped);
    }

    if schema.is_empty() {
        eprintln!("Error: no tables found in {}", source.display());
        return Err(ExitCode(1).into());
    }

    let format = args.output.map(OutputFormat::from).unwrap_or(config.output);
    print_schema(&schema, format, &source)
}

fn print_schema(schema: &SchemaMetadata, format: OutputFormat, source: &Path) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(schema).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Pretty => {
            println!("Schema from {}", source.display());
            println!("{}", "=".repeat(60));
            for table in &schema.tables {
                println!("\n{} ({} columns)", table.name, table.columns.len());
                for column in &table.columns {
                    println!("  - {}", column);
                }
            }
            if !schema.relations.is_empty() {
                println!("\nRelations:");
                for relation in &schema.relations {
                    println!("  {}", relation);
                }
            }
        }
        OutputFormat::Prompt => println!("{}", schema.compress()),
    }
    Ok(())
}

fn print_skipped(skipped: &[SkippedClause]) {
    for clause in skipped {
        eprintln!(
            "skipped ({}) in {}: {}",
            clause.reason,
            clause.table.as_deref().unwrap_or("<top level>"),
            clause.text
        );
    }
}
