//! SQL parser wrapper

use crate::dialect::{PostgresDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a new parser with the PostgreSQL dialect
    pub fn postgres() -> Self {
        Self {
            dialect: Box::new(PostgresDialect::new()),
        }
    }

    /// Parse SQL into AST statements
    ///
    /// Input that is blank, or that contains only comments and semicolons,
    /// is reported as [`SqlError::EmptySql`].
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let statements = self.dialect.parse(sql)?;
        if statements.is_empty() {
            return Err(SqlError::EmptySql);
        }
        Ok(statements)
    }

}

impl Default for SqlParser {
    fn default() -> Self {
        Self::postgres()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
