//! Catalog resolution for table references
//!
//! Resolves qualified and unqualified table references against the catalog
//! snapshot. A bare table name is searched across every schema of the
//! default database; zero or multiple matches are resolution errors, never
//! silently resolved by precedence.

use crate::error::{AnalysisError, AnalysisResult};
use mw_core::{CatalogSnapshot, FieldList, TableCatalog};
use sqlparser::ast::ObjectName;

/// A table reference split into its qualifier parts
#[derive(Debug, Clone)]
pub(crate) struct TableRef {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl TableRef {
    /// Split an object name into (database, schema, table) parts
    pub fn from_object_name(name: &ObjectName) -> AnalysisResult<Self> {
        let parts: Vec<String> = name
            .0
            .iter()
            .filter_map(|p| p.as_ident().map(|i| i.value.clone()))
            .collect();
        let unsupported = || AnalysisError::UnsupportedConstruct {
            construct: format!("table reference `{name}`"),
        };
        match parts.len() {
            1 => Ok(Self {
                database: None,
                schema: None,
                table: parts.into_iter().next().ok_or_else(unsupported)?,
            }),
            2 => {
                let mut parts = parts.into_iter();
                Ok(Self {
                    database: None,
                    schema: parts.next(),
                    table: parts.next().ok_or_else(unsupported)?,
                })
            }
            3 => {
                let mut parts = parts.into_iter();
                Ok(Self {
                    database: parts.next(),
                    schema: parts.next(),
                    table: parts.next().ok_or_else(unsupported)?,
                })
            }
            _ => Err(unsupported()),
        }
    }

    /// Whether the reference carries no schema or database qualifier
    pub fn is_bare(&self) -> bool {
        self.database.is_none() && self.schema.is_none()
    }

    /// Dotted display form for error messages
    pub fn display(&self) -> String {
        let mut out = String::new();
        if let Some(db) = &self.database {
            out.push_str(db);
            out.push('.');
        }
        if let Some(schema) = &self.schema {
            out.push_str(schema);
            out.push('.');
        }
        out.push_str(&self.table);
        out
    }
}

/// Resolve a table reference to its catalog entry.
///
/// With an explicit schema the lookup is direct; a bare name is searched
/// across all schemas of the default database and must match exactly once.
pub(crate) fn resolve_table<'a>(
    catalog: &'a CatalogSnapshot,
    default_database: &str,
    table_ref: &TableRef,
) -> AnalysisResult<&'a TableCatalog> {
    let unknown = || AnalysisError::UnknownTable {
        table: table_ref.display(),
    };
    let database_name = table_ref.database.as_deref().unwrap_or(default_database);
    let database = catalog.database(database_name).ok_or_else(unknown)?;

    if let Some(schema_name) = &table_ref.schema {
        let schema = database.schema(schema_name).ok_or_else(unknown)?;
        return schema.table(&table_ref.table).ok_or_else(unknown);
    }

    let mut matches = database
        .schemas
        .iter()
        .filter_map(|s| s.table(&table_ref.table));
    match (matches.next(), matches.next()) {
        (Some(table), None) => Ok(table),
        (Some(_), Some(_)) => Err(AnalysisError::AmbiguousTable {
            table: table_ref.display(),
        }),
        (None, _) => Err(unknown()),
    }
}

/// Field list for a resolved table, in catalog column order
pub(crate) fn table_field_list(table: &TableCatalog) -> FieldList {
    FieldList::from_columns(&table.columns)
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
