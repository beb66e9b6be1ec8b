//! Error types for mw-analysis
//!
//! Every error is terminal for the classification request. Under-classifying
//! a sensitive column is a compliance failure, so the engine fails the whole
//! statement rather than guessing a masking level.

use mw_sql::SqlError;
use thiserror::Error;

/// Classification error type
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// AE001: Table reference matched nothing in the catalog or scope
    #[error("[AE001] Unknown table or alias '{table}'")]
    UnknownTable { table: String },

    /// AE002: Bare table name matched tables in more than one schema
    #[error("[AE002] Ambiguous table '{table}' matches multiple schemas")]
    AmbiguousTable { table: String },

    /// AE003: Column reference matched nothing in scope
    #[error("[AE003] Unknown column '{column}'")]
    UnknownColumn { column: String },

    /// AE004: Unqualified column name visible in more than one source
    #[error("[AE004] Ambiguous column '{column}' matches multiple sources")]
    AmbiguousColumn { column: String },

    /// AE005: Set-operation branches with different column counts
    #[error("[AE005] Set-operation branches have {left} and {right} columns")]
    SetOperationArity { left: usize, right: usize },

    /// AE006: Query nesting exceeded the engine's bound
    #[error("[AE006] Query nesting depth exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// AE007: Recursive CTE did not stabilize within its iteration bound
    #[error("[AE007] Recursive CTE '{cte}' did not reach a fixpoint within {limit} rounds")]
    FixpointDiverged { cte: String, limit: usize },

    /// AE008: SQL construct the classifier cannot resolve
    #[error("[AE008] Unsupported SQL construct: {construct}")]
    UnsupportedConstruct { construct: String },

    /// AE009: Parse-layer error propagation
    #[error("[AE009] SQL error: {0}")]
    Sql(#[from] SqlError),

    /// AE010: Entry-point wrapper attaching the offending statement text
    #[error("[AE010] Failed to classify statement `{statement}`: {source}")]
    Statement {
        statement: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

/// Result type alias for AnalysisError
pub type AnalysisResult<T> = Result<T, AnalysisError>;
