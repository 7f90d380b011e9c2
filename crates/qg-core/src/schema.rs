//! Schema metadata model
//!
//! [`SchemaMetadata`] is the normalized, in-memory description of an uploaded
//! schema: tables with their columns, plus foreign-key edges in the
//! `Source.col -> Target.col` display format. It is built once (by the DDL
//! extractor or from a CSV header) and treated as immutable afterwards.

use crate::error::{CoreError, CoreResult};
use crate::ident::strip_quotes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table name used when a schema is derived from a single CSV file
pub const CSV_DEFAULT_TABLE: &str = "data";

/// A table and its column names, as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name (never empty, case as written)
    pub name: String,
    /// Column names in declaration order; duplicates are passed through
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Table {
    /// Create a table from a name and its columns
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Extracted schema: tables and foreign-key relations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    /// Tables in extraction order
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Foreign-key edges, each `"SourceTable.SourceColumn -> TargetTable.TargetColumn"`
    #[serde(default)]
    pub relations: Vec<String>,
}

impl SchemaMetadata {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no tables were found
    ///
    /// Callers surface this as "no tables found"; it is not an extraction error.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Find the first table with the given name (exact match)
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Parse every relation string into a [`Relation`], skipping malformed entries
    pub fn parsed_relations(&self) -> Vec<Relation> {
        self.relations
            .iter()
            .filter_map(|r| match r.parse::<Relation>() {
                Ok(rel) => Some(rel),
                Err(e) => {
                    log::debug!("Skipping relation: {e}");
                    None
                }
            })
            .collect()
    }

    /// Build a single-table schema from the header row of a CSV file
    ///
    /// The first non-blank line is split on commas; each header is trimmed and
    /// quote-stripped and becomes a column of one table named `table_name`.
    pub fn from_csv_header(csv: &str, table_name: &str) -> CoreResult<Self> {
        let header = csv
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or(CoreError::CsvEmpty)?;

        let columns: Vec<String> = header
            .split(',')
            .map(strip_quotes)
            .filter(|h| !h.is_empty())
            .collect();

        Ok(Self {
            tables: vec![Table::new(table_name, columns)],
            relations: Vec::new(),
        })
    }

    /// Render the schema as compact text for a generation prompt
    ///
    /// ```text
    /// Table: users
    /// Columns: id, username
    ///
    /// Relations:
    /// orders.user_id -> users.id
    /// ```
    pub fn compress(&self) -> String {
        let tables = self
            .tables
            .iter()
            .map(|t| format!("Table: {}\nColumns: {}", t.name, t.columns.join(", ")))
            .collect::<Vec<_>>()
            .join("\n\n");

        let relations = if self.relations.is_empty() {
            String::new()
        } else {
            format!("Relations:\n{}", self.relations.join("\n"))
        };

        format!("{tables}\n\n{relations}").trim().to_string()
    }
}

/// A directed foreign-key edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Referencing table (may carry a schema qualifier)
    pub source_table: String,
    /// Referencing column
    pub source_column: String,
    /// Referenced table (may carry a schema qualifier)
    pub target_table: String,
    /// Referenced column
    pub target_column: String,
}

impl Relation {
    /// Create a new relation edge
    pub fn new(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source_table, self.source_column, self.target_table, self.target_column
        )
    }
}

impl FromStr for Relation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedRelation(s.to_string());
        let (source, target) = s.split_once("->").ok_or_else(malformed)?;
        let (source_table, source_column) = source.trim().rsplit_once('.').ok_or_else(malformed)?;
        let (target_table, target_column) = target.trim().rsplit_once('.').ok_or_else(malformed)?;

        if [source_table, source_column, target_table, target_column]
            .iter()
            .any(|part| part.trim().is_empty())
        {
            return Err(malformed());
        }

        Ok(Self::new(
            source_table.trim(),
            source_column.trim(),
            target_table.trim(),
            target_column.trim(),
        ))
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
