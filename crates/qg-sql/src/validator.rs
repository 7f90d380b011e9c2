//! Read-only query validation against extracted schema metadata
//!
//! The pipeline is strictly ordered and the first failing check wins:
//!
//! 1. sanitize (code fences, whitespace)
//! 2. destructive-keyword policy
//! 3. top-level form (`SELECT`, or an existing sentinel comment)
//! 4. parse with the primary dialect
//! 5. harvest projection aliases
//! 6. table references
//! 7. column references
//!
//! Non-primary dialects stop after step 2 (plus sentinel pass-through) and
//! are reported as [`Verdict::PolicyOnly`].

use crate::error::SqlError;
use crate::index::SchemaIndex;
use crate::parser::SqlParser;
use crate::policy::{
    find_destructive_keyword, has_sentinel_prefix, is_comment_only, sanitize, starts_with_select,
};
use crate::verdict::{Rejection, Verdict};
use qg_core::ident::normalize_ident;
use qg_core::{Dialect, SchemaMetadata};
use sqlparser::ast::{
    visit_expressions, Expr, Ident, ObjectName, ObjectNamePart, Query, SelectItem, SetExpr,
    Statement, TableFactor, Visit, Visitor,
};
use std::collections::HashSet;
use std::ops::ControlFlow;

/// Validates candidate queries against one schema snapshot
///
/// Holds no mutable state, so one validator can be shared across threads.
pub struct QueryValidator {
    index: SchemaIndex,
    parser: SqlParser,
}

impl QueryValidator {
    /// Build a validator for the given schema
    pub fn new(schema: &SchemaMetadata) -> Self {
        Self {
            index: SchemaIndex::new(schema),
            parser: SqlParser::postgres(),
        }
    }

    /// The lookup index built from the schema
    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    /// Run the pipeline and return a structured verdict
    pub fn check(&self, candidate: &str, dialect: Dialect) -> Verdict {
        self.run(candidate, dialect.is_primary())
    }

    /// Run the pipeline and return the query or a sentinel string
    pub fn validate(&self, candidate: &str, dialect: Dialect) -> String {
        self.check(candidate, dialect).into_sql()
    }

    fn run(&self, candidate: &str, structural: bool) -> Verdict {
        let sql = sanitize(candidate);

        // A comment can't execute anything, so sentinels survive re-validation
        if has_sentinel_prefix(&sql) && is_comment_only(&sql) {
            return Verdict::PassThrough(sql);
        }

        if let Some(keyword) = find_destructive_keyword(&sql) {
            log::debug!("Rejecting candidate: destructive keyword {keyword}");
            return Verdict::Rejected(Rejection::Destructive { keyword });
        }

        if !structural {
            return Verdict::PolicyOnly(sql);
        }

        if !has_sentinel_prefix(&sql) && !starts_with_select(&sql) {
            return Verdict::Rejected(Rejection::NotSelect);
        }

        match self.check_structure(&sql) {
            Ok(()) => Verdict::Accepted(sql),
            Err(rejection) => {
                log::debug!("Rejecting candidate: {rejection}");
                Verdict::Rejected(rejection)
            }
        }
    }

    /// Steps 4-7: parse, then validate every statement's references
    fn check_structure(&self, sql: &str) -> Result<(), Rejection> {
        let statements = self.parser.parse(sql).map_err(|e| match e {
            SqlError::EmptySql => Rejection::EmptyQuery,
            SqlError::ParseError {
                message,
                line,
                column,
            } => {
                log::debug!("Parse failed at line {line}, column {column}: {message}");
                Rejection::InvalidSyntax {
                    message,
                    line,
                    column,
                }
            }
        })?;

        for stmt in &statements {
            check_read_only(stmt)?;
        }

        let aliases = harvest_aliases(&statements);

        for stmt in &statements {
            self.check_tables(stmt)?;
        }
        for stmt in &statements {
            self.check_columns(stmt, &aliases)?;
        }
        Ok(())
    }

    fn check_tables(&self, stmt: &Statement) -> Result<(), Rejection> {
        let mut checker = TableRefChecker { index: &self.index };
        into_result(stmt.visit(&mut checker))
    }

    fn check_columns(&self, stmt: &Statement, aliases: &HashSet<String>) -> Result<(), Rejection> {
        into_result(visit_expressions(stmt, |expr: &Expr| match expr {
            Expr::Identifier(column) => self.check_column(None, column, aliases),
            Expr::CompoundIdentifier(idents) => match idents.split_last() {
                Some((column, qualifiers)) => {
                    self.check_column(qualifiers.last(), column, aliases)
                }
                None => ControlFlow::Continue(()),
            },
            _ => ControlFlow::Continue(()),
        }))
    }

    fn check_column(
        &self,
        qualifier: Option<&Ident>,
        column: &Ident,
        aliases: &HashSet<String>,
    ) -> ControlFlow<Rejection> {
        let key = normalize_ident(&column.value);
        if aliases.contains(&key) {
            return ControlFlow::Continue(());
        }

        match qualifier {
            Some(table) => match self.index.columns(&table.value) {
                Some(columns) if !columns.contains(&key) => {
                    ControlFlow::Break(Rejection::UnknownColumnInTable {
                        column: column.value.clone(),
                        table: table.value.clone(),
                    })
                }
                // Unknown qualifiers are table aliases; they are not resolved
                _ => ControlFlow::Continue(()),
            },
            None if !self.index.column_exists_anywhere(&key) => {
                ControlFlow::Break(Rejection::UnknownColumn {
                    column: column.value.clone(),
                })
            }
            None => ControlFlow::Continue(()),
        }
    }
}

/// Validate a candidate query string against a schema
///
/// Returns the sanitized query when it passes, otherwise a `-- ERROR:`
/// sentinel. An unrecognized dialect tag gets the non-primary treatment.
pub fn validate_query(candidate_sql: &str, schema: &SchemaMetadata, dialect: &str) -> String {
    let validator = QueryValidator::new(schema);
    let verdict = match dialect.parse::<Dialect>() {
        Ok(dialect) => validator.check(candidate_sql, dialect),
        Err(e) => {
            log::warn!("{e}; applying keyword policy only");
            validator.run(candidate_sql, false)
        }
    };
    verdict.into_sql()
}

fn into_result(flow: ControlFlow<Rejection>) -> Result<(), Rejection> {
    match flow {
        ControlFlow::Break(rejection) => Err(rejection),
        ControlFlow::Continue(()) => Ok(()),
    }
}

/// The unqualified table identifier of a relation name (`public.users` -> `users`)
fn table_ident(name: &ObjectName) -> Option<&Ident> {
    match name.0.last()? {
        ObjectNamePart::Identifier(ident) => Some(ident),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Checks every table reference in `FROM`/`JOIN` against the index
///
/// A table-valued function call (`generate_series(1, 3)`) is not a table
/// reference and is left alone.
struct TableRefChecker<'a> {
    index: &'a SchemaIndex,
}

impl Visitor for TableRefChecker<'_> {
    type Break = Rejection;

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<Self::Break> {
        let TableFactor::Table {
            name, args: None, ..
        } = factor
        else {
            return ControlFlow::Continue(());
        };
        match table_ident(name) {
            Some(ident) if !self.index.has_table(&ident.value) => {
                ControlFlow::Break(Rejection::UnknownTable {
                    name: ident.value.clone(),
                })
            }
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Only query statements are allowed, and none may `SELECT ... INTO` a table
fn check_read_only(stmt: &Statement) -> Result<(), Rejection> {
    match stmt {
        Statement::Query(query) => check_no_select_into(&query.body),
        _ => Err(Rejection::NotSelect),
    }
}

fn check_no_select_into(body: &SetExpr) -> Result<(), Rejection> {
    match body {
        SetExpr::Select(select) if select.into.is_some() => Err(Rejection::Destructive {
            keyword: "INTO".to_string(),
        }),
        SetExpr::SetOperation { left, right, .. } => {
            check_no_select_into(left)?;
            check_no_select_into(right)
        }
        SetExpr::Query(query) => check_no_select_into(&query.body),
        _ => Ok(()),
    }
}

/// Collects `expr AS alias` names from every SELECT projection in a statement
#[derive(Default)]
struct AliasCollector {
    aliases: HashSet<String>,
}

impl Visitor for AliasCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        collect_projection_aliases(&query.body, &mut self.aliases);
        ControlFlow::Continue(())
    }
}

fn collect_projection_aliases(body: &SetExpr, aliases: &mut HashSet<String>) {
    match body {
        SetExpr::Select(select) => {
            for item in &select.projection {
                if let SelectItem::ExprWithAlias { alias, .. } = item {
                    aliases.insert(normalize_ident(&alias.value));
                }
            }
        }
        SetExpr::SetOperation { left, right, .. } => {
            collect_projection_aliases(left, aliases);
            collect_projection_aliases(right, aliases);
        }
        _ => {}
    }
}

fn harvest_aliases(statements: &[Statement]) -> HashSet<String> {
    let mut collector = AliasCollector::default();
    for stmt in statements {
        let _ = stmt.visit(&mut collector);
    }
    collector.aliases
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
