//! Scoped symbol table for query resolution
//!
//! A `Scope` is the set of named bindings visible at one point in a query's
//! structure: a stack of FROM-clause frames (for column resolution and
//! wildcard expansion, including correlated references into enclosing
//! blocks) plus the lexically visible CTE bindings. Scopes are cloned into
//! every nested query block, so sibling blocks can never observe each
//! other's bindings.

use crate::error::{AnalysisError, AnalysisResult};
use mw_core::{FieldList, MaskingLevel};

/// Maximum query nesting depth before classification fails closed
pub const MAX_QUERY_DEPTH: usize = 32;

/// One resolved FROM source: a table, alias, CTE reference, or derived query
#[derive(Debug, Clone)]
pub(crate) struct SourceBinding {
    /// Name the source is reachable under (alias, CTE name, or table name);
    /// `None` for sources with no usable qualifier
    pub name: Option<String>,
    /// The source's own field list, unmerged
    pub fields: FieldList,
}

/// One query block's resolved FROM clause
///
/// `sources` keeps each FROM item separately for qualified lookup; `output`
/// is the join-merged list that unqualified lookup and bare `*` see.
#[derive(Debug, Clone, Default)]
pub(crate) struct Frame {
    pub sources: Vec<SourceBinding>,
    pub output: FieldList,
}

#[derive(Debug, Clone)]
struct CteBinding {
    name: String,
    fields: FieldList,
}

/// Stack of bindings visible at one point of the query structure
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    frames: Vec<Frame>,
    ctes: Vec<CteBinding>,
    depth: usize,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nesting depth of the block this scope belongs to
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Scope for a nested query block: same bindings, one level deeper
    pub fn child(&self) -> Self {
        let mut child = self.clone();
        child.depth += 1;
        child
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Bind a CTE name; later bindings shadow earlier ones
    pub fn bind_cte(&mut self, name: String, fields: FieldList) {
        self.ctes.push(CteBinding { name, fields });
    }

    /// Remove every binding for `name`. A recursive CTE shadows enclosing
    /// bindings of its own name for its whole body.
    pub fn unbind_cte(&mut self, name: &str) {
        self.ctes.retain(|b| !b.name.eq_ignore_ascii_case(name));
    }

    /// Replace the innermost binding for `name` (recursive fixpoint updates)
    pub fn rebind_cte(&mut self, name: &str, fields: FieldList) {
        if let Some(binding) = self
            .ctes
            .iter_mut()
            .rev()
            .find(|b| b.name.eq_ignore_ascii_case(name))
        {
            binding.fields = fields;
        }
    }

    /// Innermost CTE binding for `name`, if any
    pub fn resolve_cte(&self, name: &str) -> Option<&FieldList> {
        self.ctes
            .iter()
            .rev()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .map(|b| &b.fields)
    }

    /// Merged output of the current block's FROM clause (bare `*` expansion)
    pub fn current_output(&self) -> FieldList {
        self.frames
            .last()
            .map(|f| f.output.clone())
            .unwrap_or_default()
    }

    /// Fields of the source bound under `qualifier` (`alias.*` expansion)
    pub fn qualified_fields(&self, qualifier: &str) -> AnalysisResult<FieldList> {
        self.find_source(qualifier)?
            .map(|s| s.fields.clone())
            .ok_or_else(|| AnalysisError::UnknownTable {
                table: qualifier.to_string(),
            })
    }

    /// Resolve a column reference to its masking level.
    ///
    /// Qualified references bind to the innermost source with that name.
    /// Unqualified references search the innermost frame's merged output
    /// first and fall outward for correlated references; a name visible more
    /// than once within one frame is ambiguous.
    pub fn resolve_column(
        &self,
        qualifier: Option<&str>,
        name: &str,
    ) -> AnalysisResult<MaskingLevel> {
        match qualifier {
            Some(qualifier) => {
                let source =
                    self.find_source(qualifier)?
                        .ok_or_else(|| AnalysisError::UnknownTable {
                            table: qualifier.to_string(),
                        })?;
                source
                    .fields
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(name))
                    .map(|f| f.masking_level)
                    .ok_or_else(|| AnalysisError::UnknownColumn {
                        column: format!("{qualifier}.{name}"),
                    })
            }
            None => {
                for frame in self.frames.iter().rev() {
                    let mut matches = frame
                        .output
                        .iter()
                        .filter(|f| f.name.eq_ignore_ascii_case(name));
                    match (matches.next(), matches.next()) {
                        (Some(field), None) => return Ok(field.masking_level),
                        (Some(_), Some(_)) => {
                            return Err(AnalysisError::AmbiguousColumn {
                                column: name.to_string(),
                            })
                        }
                        (None, _) => {}
                    }
                }
                Err(AnalysisError::UnknownColumn {
                    column: name.to_string(),
                })
            }
        }
    }

    /// Innermost source bound under `qualifier`. Two sources with the same
    /// name within one frame make the qualifier ambiguous, as PostgreSQL
    /// rejects duplicate relation names in a FROM clause.
    fn find_source(&self, qualifier: &str) -> AnalysisResult<Option<&SourceBinding>> {
        for frame in self.frames.iter().rev() {
            let mut matches = frame.sources.iter().filter(|s| {
                s.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(qualifier))
            });
            match (matches.next(), matches.next()) {
                (Some(source), None) => return Ok(Some(source)),
                (Some(_), Some(_)) => {
                    return Err(AnalysisError::AmbiguousTable {
                        table: qualifier.to_string(),
                    })
                }
                (None, _) => {}
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
