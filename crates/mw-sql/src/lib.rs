//! mw-sql - SQL parsing layer for Maskwise
//!
//! This crate wraps sqlparser-rs behind a dialect seam and a small parser
//! type with structured errors. Classification itself lives in mw-analysis;
//! this layer only turns statement text into an AST.

pub mod dialect;
pub mod error;
pub mod parser;

pub use dialect::{PostgresDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
