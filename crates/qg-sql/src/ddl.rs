//! Schema extraction from DDL text
//!
//! Turns a schema dump (`CREATE TABLE` statements plus optional
//! `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` statements) into
//! [`SchemaMetadata`]. Extraction is best-effort: anything that is not
//! recognized is skipped and recorded in [`Extraction::skipped`], never
//! reported as an error.
//!
//! Two simplifications are kept on purpose:
//! - table names lose their schema qualifier (`public.users` becomes `users`);
//! - a composite foreign key is recorded by its first column only.

use qg_core::ident::{bare_name, strip_quotes};
use qg_core::{Relation, SchemaMetadata, Table};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Leading tokens that mark a table constraint rather than a column
const RESERVED_CLAUSE_KEYWORDS: [&str; 5] = ["PRIMARY", "FOREIGN", "CONSTRAINT", "UNIQUE", "CHECK"];

/// Result of a best-effort extraction
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    /// The extracted schema (possibly empty)
    pub schema: SchemaMetadata,
    /// Input fragments that did not contribute a table, column, or relation
    pub skipped: Vec<SkippedClause>,
}

/// A fragment of DDL that extraction passed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedClause {
    /// Table whose body contained the fragment, if any
    pub table: Option<String>,
    /// The fragment, trimmed
    pub text: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Why a DDL fragment was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `PRIMARY KEY (...)`, `UNIQUE (...)`, `CHECK (...)` and similar
    TableConstraint,
    /// Mentions `FOREIGN KEY` but has no `(col) REFERENCES table (col)` shape
    MalformedForeignKey,
    /// A single token with no discernible type
    NoColumnType,
    /// `CREATE TABLE name (` with no matching close parenthesis
    UnterminatedTable,
    /// The table name was empty after quote stripping
    EmptyTableName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TableConstraint => write!(f, "table constraint"),
            SkipReason::MalformedForeignKey => write!(f, "malformed foreign key"),
            SkipReason::NoColumnType => write!(f, "no column type"),
            SkipReason::UnterminatedTable => write!(f, "unterminated table body"),
            SkipReason::EmptyTableName => write!(f, "empty table name"),
        }
    }
}

fn line_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)--.*$").expect("valid regex"))
}

fn block_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

fn create_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([^\s(]+)\s*\(")
            .expect("valid regex")
    })
}

fn foreign_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+([^(]+?)\s*\(([^)]+)\)")
            .expect("valid regex")
    })
}

fn mentions_foreign_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bFOREIGN\s+KEY\b").expect("valid regex"))
}

fn primary_key_constraint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\s*\(").expect("valid regex"))
}

fn alter_table_fk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)\bALTER\s+TABLE\s+(?:ONLY\s+)?(\S+)\s+ADD\s+(?:CONSTRAINT\s+\S+\s+)?FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+([^(]+?)\s*\(([^)]+)\)",
        )
        .expect("valid regex")
    })
}

/// Extract schema metadata from DDL text
///
/// Never fails. An empty `tables` list means nothing was recognized; callers
/// decide whether that is an error.
pub fn extract_schema(ddl: &str) -> SchemaMetadata {
    extract_schema_with_diagnostics(ddl).schema
}

/// Extract schema metadata and report every fragment that was skipped
pub fn extract_schema_with_diagnostics(ddl: &str) -> Extraction {
    let clean = strip_comments(ddl);
    let mut extraction = Extraction::default();

    extract_tables(&clean, &mut extraction);
    extract_alter_table_relations(&clean, &mut extraction.schema);

    log::debug!(
        "Extracted {} tables, {} relations ({} fragments skipped)",
        extraction.schema.tables.len(),
        extraction.schema.relations.len(),
        extraction.skipped.len()
    );
    extraction
}

/// Remove `-- ...` line comments and `/* ... */` block comments
fn strip_comments(sql: &str) -> String {
    let without_lines = line_comment_re().replace_all(sql, "");
    block_comment_re()
        .replace_all(&without_lines, "")
        .into_owned()
}

/// Scan every `CREATE TABLE name ( body )` occurrence
fn extract_tables(clean: &str, extraction: &mut Extraction) {
    for caps in create_table_re().captures_iter(clean) {
        let (Some(whole), Some(raw_name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let table_name = bare_name(raw_name.as_str());

        let body_start = whole.end();
        let Some(body_end) = find_closing_paren(clean, body_start) else {
            skip(extraction, None, whole.as_str(), SkipReason::UnterminatedTable);
            continue;
        };

        if table_name.is_empty() {
            skip(extraction, None, raw_name.as_str(), SkipReason::EmptyTableName);
            continue;
        }

        let mut columns = Vec::new();
        for clause in split_top_level(&clean[body_start..body_end]) {
            extract_clause(&table_name, clause, &mut columns, extraction);
        }

        extraction.schema.tables.push(Table::new(table_name, columns));
    }
}

/// Classify one top-level clause of a table body
fn extract_clause(
    table_name: &str,
    clause: &str,
    columns: &mut Vec<String>,
    extraction: &mut Extraction,
) {
    if mentions_foreign_key_re().is_match(clause) {
        match foreign_key_re().captures(clause) {
            Some(fk) => {
                let relation = Relation::new(
                    table_name,
                    first_ident(&fk[1]),
                    strip_quotes(&fk[2]),
                    first_ident(&fk[3]),
                );
                extraction.schema.relations.push(relation.to_string());
            }
            None => skip(
                extraction,
                Some(table_name),
                clause,
                SkipReason::MalformedForeignKey,
            ),
        }
        return;
    }

    if primary_key_constraint_re().is_match(clause) {
        skip(extraction, Some(table_name), clause, SkipReason::TableConstraint);
        return;
    }

    let mut tokens = clause.split_whitespace();
    let name = tokens.next().map(strip_quotes).unwrap_or_default();

    if RESERVED_CLAUSE_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(&name))
    {
        skip(extraction, Some(table_name), clause, SkipReason::TableConstraint);
        return;
    }

    if name.is_empty() || tokens.next().is_none() {
        skip(extraction, Some(table_name), clause, SkipReason::NoColumnType);
        return;
    }

    columns.push(name);
}

/// Scan standalone `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` statements
fn extract_alter_table_relations(clean: &str, schema: &mut SchemaMetadata) {
    for caps in alter_table_fk_re().captures_iter(clean) {
        let relation = Relation::new(
            strip_quotes(&caps[1]),
            first_ident(&caps[2]),
            strip_quotes(&caps[3]),
            first_ident(&caps[4]),
        );
        schema.relations.push(relation.to_string());
    }
}

/// First identifier of a parenthesized column list, quote-stripped
///
/// Composite keys are represented by their first column.
fn first_ident(list: &str) -> String {
    strip_quotes(list.split(',').next().unwrap_or(list))
}

fn skip(extraction: &mut Extraction, table: Option<&str>, text: &str, reason: SkipReason) {
    log::debug!(
        "Skipping DDL fragment ({reason}) in {}: {}",
        table.unwrap_or("<top level>"),
        text.trim()
    );
    extraction.skipped.push(SkippedClause {
        table: table.map(str::to_string),
        text: text.trim().to_string(),
        reason,
    });
}

/// Tracks whether the scanner is inside a quoted literal or identifier
#[derive(Default)]
struct QuoteState {
    open: Option<char>,
}

impl QuoteState {
    /// Feed one character; returns true while inside quotes (including the
    /// quote characters themselves)
    fn step(&mut self, c: char) -> bool {
        match self.open {
            Some(q) => {
                if c == q {
                    self.open = None;
                }
                true
            }
            None if matches!(c, '\'' | '"' | '`') => {
                self.open = Some(c);
                true
            }
            None => false,
        }
    }
}

/// Byte offset of the parenthesis closing the one opened just before `start`
fn find_closing_paren(text: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quotes = QuoteState::default();

    for (offset, c) in text[start..].char_indices() {
        if quotes.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a table body on commas that are not nested in parentheses or quotes
fn split_top_level(body: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();
    let mut clause_start = 0;

    for (idx, c) in body.char_indices() {
        if quotes.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                clauses.push(&body[clause_start..idx]);
                clause_start = idx + 1;
            }
            _ => {}
        }
    }
    clauses.push(&body[clause_start..]);

    clauses
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
