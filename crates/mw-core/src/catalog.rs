//! Catalog snapshot types
//!
//! An immutable `database -> schema -> table -> ordered columns` mapping,
//! each column tagged with its declared masking level. The snapshot is owned
//! by the caller; the classification engine only reads it for the duration
//! of one request. Column order within a table is significant: it defines
//! wildcard-expansion order.

use crate::level::MaskingLevel;
use serde::{Deserialize, Serialize};

/// Declared sensitivity of one physical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEntry {
    /// Column name
    pub name: String,
    /// Declared masking level
    pub masking_level: MaskingLevel,
}

impl ColumnEntry {
    /// Create a new column entry
    pub fn new(name: &str, masking_level: MaskingLevel) -> Self {
        Self {
            name: name.to_string(),
            masking_level,
        }
    }
}

/// One table with its ordered column entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCatalog {
    /// Table name
    pub name: String,
    /// Columns in definition order
    pub columns: Vec<ColumnEntry>,
}

impl TableCatalog {
    /// Create a new table catalog
    pub fn new(name: &str, columns: Vec<ColumnEntry>) -> Self {
        Self {
            name: name.to_string(),
            columns,
        }
    }
}

/// One schema and its tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Schema name
    pub name: String,
    /// Tables in this schema
    pub tables: Vec<TableCatalog>,
}

impl SchemaCatalog {
    /// Create a new schema catalog
    pub fn new(name: &str, tables: Vec<TableCatalog>) -> Self {
        Self {
            name: name.to_string(),
            tables,
        }
    }

    /// Look up a table by name (identifiers compare case-insensitively)
    pub fn table(&self, name: &str) -> Option<&TableCatalog> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// One database and its schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCatalog {
    /// Database name
    pub name: String,
    /// Schemas in this database
    pub schemas: Vec<SchemaCatalog>,
}

impl DatabaseCatalog {
    /// Create a new database catalog
    pub fn new(name: &str, schemas: Vec<SchemaCatalog>) -> Self {
        Self {
            name: name.to_string(),
            schemas,
        }
    }

    /// Look up a schema by name
    pub fn schema(&self, name: &str) -> Option<&SchemaCatalog> {
        self.schemas.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Immutable snapshot of every database visible to one classification request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Databases in the snapshot
    pub databases: Vec<DatabaseCatalog>,
}

impl CatalogSnapshot {
    /// Create an empty snapshot
    pub fn new(databases: Vec<DatabaseCatalog>) -> Self {
        Self { databases }
    }

    /// Look up a database by name
    pub fn database(&self, name: &str) -> Option<&DatabaseCatalog> {
        self.databases
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
