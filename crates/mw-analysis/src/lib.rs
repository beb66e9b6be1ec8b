//! mw-analysis: masking-level classification engine
//!
//! Given a catalog snapshot where every column carries a masking level and a
//! SQL statement, this crate computes the strictest masking level each output
//! column of the statement is entitled to, by tracing provenance through
//! projections, joins, set operations, and common table expressions.
//!
//! The engine is a pure, synchronous computation over an immutable AST and
//! catalog; it never touches data and holds no state across invocations.

pub(crate) mod classifier;
pub(crate) mod cte;
pub(crate) mod error;
pub(crate) mod expr;
pub(crate) mod from;
pub(crate) mod query;
pub(crate) mod resolver;
pub(crate) mod scope;

#[cfg(test)]
pub(crate) mod test_utils;

pub use classifier::{classify_sql, MaskingClassifier};
pub use error::{AnalysisError, AnalysisResult};
pub use scope::MAX_QUERY_DEPTH;
