//! Case-insensitive lookup structures over [`SchemaMetadata`]

use qg_core::ident::{bare_name, normalize_ident};
use qg_core::SchemaMetadata;
use std::collections::{HashMap, HashSet};

/// Normalized table → column sets used by the validator
///
/// Keys are quote-stripped, unqualified, lowercase names. Tables that appear
/// more than once in the schema contribute the union of their columns.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    tables: HashMap<String, HashSet<String>>,
}

impl SchemaIndex {
    /// Build the index from extracted metadata
    pub fn new(schema: &SchemaMetadata) -> Self {
        let mut tables: HashMap<String, HashSet<String>> = HashMap::new();
        for table in &schema.tables {
            tables
                .entry(normalize_ident(&bare_name(&table.name)))
                .or_default()
                .extend(table.columns.iter().map(|c| normalize_ident(c)));
        }
        Self { tables }
    }

    /// True when a table with this name exists
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(&normalize_ident(name))
    }

    /// Columns of the named table, if the table exists
    pub fn columns(&self, table: &str) -> Option<&HashSet<String>> {
        self.tables.get(&normalize_ident(table))
    }

    /// True when any table has a column with this name
    pub fn column_exists_anywhere(&self, column: &str) -> bool {
        let column = normalize_ident(column);
        self.tables.values().any(|cols| cols.contains(&column))
    }

    /// Number of distinct tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the schema has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
