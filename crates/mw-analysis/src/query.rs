//! Query block resolution and set-operation combination
//!
//! A query block is resolved by binding its CTEs, resolving its FROM clause
//! into a frame, and classifying each projected expression against that
//! frame. Set-operation branches are combined positionally: names come from
//! the leftmost branch, levels are the lattice combine at each position.
//! ORDER BY, LIMIT, OFFSET, and locking clauses never affect classification.

use crate::classifier::MaskingClassifier;
use crate::error::{AnalysisError, AnalysisResult};
use crate::scope::{Scope, MAX_QUERY_DEPTH};
use mw_core::{Field, FieldList};
use sqlparser::ast::{
    Query, Select, SelectItem, SelectItemQualifiedWildcardKind, SetExpr, Values,
};

impl MaskingClassifier<'_> {
    /// Resolve a query block to its output field list
    pub(crate) fn resolve_query(&self, query: &Query, scope: &Scope) -> AnalysisResult<FieldList> {
        if scope.depth() > MAX_QUERY_DEPTH {
            return Err(AnalysisError::DepthExceeded {
                limit: MAX_QUERY_DEPTH,
            });
        }
        let mut scope = scope.clone();
        if let Some(with) = &query.with {
            self.bind_ctes(with, &mut scope)?;
        }
        self.resolve_set_expr(&query.body, &scope)
    }

    /// Resolve one query body, recursing through nested set operations
    pub(crate) fn resolve_set_expr(
        &self,
        body: &SetExpr,
        scope: &Scope,
    ) -> AnalysisResult<FieldList> {
        match body {
            SetExpr::Select(select) => self.resolve_select(select, scope),
            SetExpr::Query(query) => self.resolve_query(query, &scope.child()),
            SetExpr::SetOperation { left, right, .. } => {
                // UNION/INTERSECT/EXCEPT and their ALL variants share one
                // policy: row-level dedup never affects column sensitivity.
                let left_fields = self.resolve_set_expr(left, scope)?;
                let right_fields = self.resolve_set_expr(right, scope)?;
                combine_branches(left_fields, &right_fields)
            }
            SetExpr::Values(values) => self.resolve_values(values, scope),
            other => Err(AnalysisError::UnsupportedConstruct {
                construct: format!("query body `{other}`"),
            }),
        }
    }

    fn resolve_select(&self, select: &Select, scope: &Scope) -> AnalysisResult<FieldList> {
        let mut scope = scope.clone();
        let frame = self.resolve_from(&select.from, &scope)?;
        scope.push_frame(frame);

        let mut output = FieldList::new();
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) => {
                    output.push(self.classify_expr(expr, &scope)?);
                }
                SelectItem::ExprWithAlias { expr, alias } => {
                    // the alias overrides the name, never the level
                    let field = self.classify_expr(expr, &scope)?;
                    output.push(Field::new(&alias.value, field.masking_level));
                }
                SelectItem::Wildcard(_) => {
                    output.extend(scope.current_output());
                }
                SelectItem::QualifiedWildcard(kind, _) => {
                    let qualifier = match kind {
                        SelectItemQualifiedWildcardKind::ObjectName(name) => name
                            .0
                            .last()
                            .and_then(|p| p.as_ident())
                            .map(|i| i.value.clone()),
                        SelectItemQualifiedWildcardKind::Expr(_) => None,
                    }
                    .ok_or_else(|| AnalysisError::UnsupportedConstruct {
                        construct: format!("wildcard qualifier `{item}`"),
                    })?;
                    output.extend(scope.qualified_fields(&qualifier)?);
                }
            }
        }
        Ok(output)
    }

    /// VALUES lists: positional combine across rows, PostgreSQL column names
    fn resolve_values(&self, values: &Values, scope: &Scope) -> AnalysisResult<FieldList> {
        let mut output: Option<FieldList> = None;
        for row in &values.rows {
            let mut row_fields = FieldList::new();
            for (i, expr) in row.iter().enumerate() {
                let field = self.classify_expr(expr, scope)?;
                row_fields.push(Field::new(&format!("column{}", i + 1), field.masking_level));
            }
            output = Some(match output {
                None => row_fields,
                Some(acc) => combine_branches(acc, &row_fields)?,
            });
        }
        Ok(output.unwrap_or_default())
    }
}

/// Combine two set-operation branches positionally.
///
/// Names come from the left branch; each level is the lattice combine of
/// both branches at that position. Reduction over more branches is left to
/// right, which is safe because combine is associative and commutative.
pub(crate) fn combine_branches(
    left: FieldList,
    right: &FieldList,
) -> AnalysisResult<FieldList> {
    left.combined_with(right)
        .ok_or_else(|| AnalysisError::SetOperationArity {
            left: left.len(),
            right: right.len(),
        })
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
