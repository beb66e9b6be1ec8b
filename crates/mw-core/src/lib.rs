//! mw-core - shared data model for Maskwise
//!
//! This crate provides the masking level lattice, the immutable catalog
//! snapshot read during classification, and the ordered field lists that
//! every query block produces.

pub mod catalog;
pub mod field;
pub mod level;

pub use catalog::{CatalogSnapshot, ColumnEntry, DatabaseCatalog, SchemaCatalog, TableCatalog};
pub use field::{Field, FieldList, UNNAMED_COLUMN};
pub use level::{MaskingLevel, LEVEL_COUNT};
