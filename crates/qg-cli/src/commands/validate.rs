//! Validate command implementation

use anyhow::{Context, Result};
use qg_sql::{is_error_sentinel, QueryValidator, Rejection, Verdict};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{
    load_config, load_schema, read_file, resolve_schema_path, ExitCode,
};

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_config(global)?;
    let schema_path = resolve_schema_path(args.schema.as_deref(), &config, &root)?;
    let schema = load_schema(&schema_path, global)?;
    let dialect = args.dialect.unwrap_or(config.dialect);

    if global.verbose {
        eprintln!("[verbose] Validating as {}", dialect);
    }

    let validator = Arc::new(QueryValidator::new(&schema));

    let verdicts = match &args.batch {
        Some(batch) => validate_batch(validator, Path::new(batch), dialect, global).await?,
        None => {
            let candidate = read_candidate(args).await?;
            vec![validator.check(&candidate, dialect)]
        }
    };

    let mut rejected = 0;
    for verdict in verdicts {
        if global.verbose {
            if let Some(Rejection::InvalidSyntax {
                message,
                line,
                column,
            }) = verdict.rejection()
            {
                eprintln!("[verbose] Parse error at line {line}, column {column}: {message}");
            }
        }
        let sql = verdict.into_sql();
        if is_error_sentinel(&sql) {
            rejected += 1;
        }
        println!("{}", sql);
    }

    if rejected > 0 {
        if global.verbose {
            eprintln!("[verbose] {} candidate(s) rejected", rejected);
        }
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Candidate text from the positional argument, `--file`, or stdin
async fn read_candidate(args: &ValidateArgs) -> Result<String> {
    if let Some(sql) = &args.sql {
        return Ok(sql.clone());
    }
    if let Some(file) = &args.file {
        return read_file(Path::new(file));
    }

    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("Failed to read candidate SQL from stdin")?;
    Ok(buf)
}

/// Validate each non-blank line on the blocking pool, keeping input order
async fn validate_batch(
    validator: Arc<QueryValidator>,
    path: &Path,
    dialect: qg_core::Dialect,
    global: &GlobalArgs,
) -> Result<Vec<Verdict>> {
    let content = read_file(path)?;
    let candidates: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if global.verbose {
        eprintln!(
            "[verbose] Validating {} candidates from {}",
            candidates.len(),
            path.display()
        );
    }

    let handles: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let validator = Arc::clone(&validator);
            tokio::task::spawn_blocking(move || validator.check(&candidate, dialect))
        })
        .collect();

    let mut verdicts = Vec::with_capacity(handles.len());
    for handle in handles {
        verdicts.push(handle.await.context("Validation task panicked")?);
    }
    Ok(verdicts)
}
