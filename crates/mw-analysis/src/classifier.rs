//! Top-level classification entry points
//!
//! A `MaskingClassifier` borrows a catalog snapshot and a default database
//! name for the duration of one request. Classification is deterministic and
//! pure: concurrent callers may share one snapshot as long as each call uses
//! its own classifier (or the same one - it holds no mutable state).

use crate::error::{AnalysisError, AnalysisResult};
use crate::scope::Scope;
use mw_core::{CatalogSnapshot, FieldList};
use mw_sql::SqlParser;
use sqlparser::ast::Statement;

/// Classifies the output columns of SQL statements against a catalog
pub struct MaskingClassifier<'a> {
    pub(crate) catalog: &'a CatalogSnapshot,
    pub(crate) default_database: &'a str,
}

impl<'a> MaskingClassifier<'a> {
    /// Create a classifier over a catalog snapshot
    pub fn new(catalog: &'a CatalogSnapshot, default_database: &'a str) -> Self {
        Self {
            catalog,
            default_database,
        }
    }

    /// Parse one statement and classify its output columns.
    ///
    /// Errors carry the offending statement text for diagnostics.
    pub fn classify_sql(&self, sql: &str) -> AnalysisResult<FieldList> {
        let parser = SqlParser::postgres();
        let statement = parser
            .parse_single(sql)
            .map_err(|e| wrap_with_statement(sql, e.into()))?;
        self.classify_statement(&statement)
            .map_err(|e| wrap_with_statement(sql, e))
    }

    /// Classify an already-parsed statement.
    ///
    /// Non-data-returning statements (EXPLAIN, DDL, control statements)
    /// yield an empty field list with no error.
    pub fn classify_statement(&self, statement: &Statement) -> AnalysisResult<FieldList> {
        match statement {
            Statement::Query(query) => self.resolve_query(query, &Scope::new()),
            _ => Ok(FieldList::new()),
        }
    }
}

fn wrap_with_statement(sql: &str, source: AnalysisError) -> AnalysisError {
    AnalysisError::Statement {
        statement: sql.trim().to_string(),
        source: Box::new(source),
    }
}

/// Classify one SQL statement's output columns against a catalog snapshot
pub fn classify_sql(
    sql: &str,
    default_database: &str,
    catalog: &CatalogSnapshot,
) -> AnalysisResult<FieldList> {
    MaskingClassifier::new(catalog, default_database).classify_sql(sql)
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
