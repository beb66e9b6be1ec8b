//! Common table expression binding
//!
//! Binds the CTEs of one WITH clause into scope, in declaration order:
//! earlier CTEs are visible to later ones, and no CTE is visible to itself
//! unless it is recursive. A recursive CTE's defining set operation is split
//! into its anchor (classified with the CTE name unbound) and recursive
//! members, which are re-classified against the current binding until the
//! levels stop changing. Monotonicity of the lattice bounds the iteration:
//! every round either raises at least one position or terminates.

use crate::classifier::MaskingClassifier;
use crate::error::{AnalysisError, AnalysisResult};
use crate::query::combine_branches;
use crate::scope::Scope;
use mw_core::{FieldList, LEVEL_COUNT};
use sqlparser::ast::{Cte, SetExpr, With};

impl MaskingClassifier<'_> {
    /// Bind every CTE of a WITH clause into the given scope
    pub(crate) fn bind_ctes(&self, with: &With, scope: &mut Scope) -> AnalysisResult<()> {
        for cte in &with.cte_tables {
            let name = cte.alias.name.value.clone();
            let column_names: Vec<String> = cte
                .alias
                .columns
                .iter()
                .map(|c| c.name.value.clone())
                .collect();

            // The RECURSIVE keyword spans the whole WITH clause; only CTEs
            // whose body is a set operation can actually be self-referential.
            let fields =
                if with.recursive && matches!(cte.query.body.as_ref(), SetExpr::SetOperation { .. }) {
                    self.resolve_recursive_cte(&name, cte, &column_names, scope)?
                } else {
                    self.resolve_query(&cte.query, &scope.child())?
                        .renamed(&column_names)
                };
            scope.bind_cte(name, fields);
        }
        Ok(())
    }

    /// Resolve a recursive CTE to its fixpoint field list
    fn resolve_recursive_cte(
        &self,
        name: &str,
        cte: &Cte,
        column_names: &[String],
        scope: &Scope,
    ) -> AnalysisResult<FieldList> {
        let mut body_scope = scope.child();
        // The recursive name shadows any enclosing CTE binding of the same
        // name for the whole body.
        body_scope.unbind_cte(name);
        if let Some(with) = &cte.query.with {
            self.bind_ctes(with, &mut body_scope)?;
        }

        let mut branches = Vec::new();
        flatten_set_operation(&cte.query.body, &mut branches);
        let Some((anchor, members)) = branches.split_first() else {
            return Err(AnalysisError::UnsupportedConstruct {
                construct: format!("recursive CTE `{name}` with an empty body"),
            });
        };

        // Anchor: classified with the CTE name still unbound, so a
        // self-reference there surfaces as an unknown-table error instead of
        // resolving outward.
        let anchor_fields = self.resolve_set_expr(anchor, &body_scope)?;
        let mut current = anchor_fields.renamed(column_names);

        // Each position can rise at most LEVEL_COUNT - 1 times.
        let max_rounds = current.len() * (LEVEL_COUNT - 1) + 1;
        let mut rounds = 0;
        let mut member_scope = body_scope.clone();
        member_scope.bind_cte(name.to_string(), current.clone());
        loop {
            let mut candidate = current.clone();
            for member in members {
                let member_fields = self.resolve_set_expr(member, &member_scope)?;
                candidate = combine_branches(candidate, &member_fields)?;
            }

            if candidate == current {
                log::debug!("recursive CTE `{name}` reached a fixpoint after {rounds} round(s)");
                return Ok(current);
            }
            rounds += 1;
            if rounds > max_rounds {
                return Err(AnalysisError::FixpointDiverged {
                    cte: name.to_string(),
                    limit: max_rounds,
                });
            }
            current = candidate;
            member_scope.rebind_cte(name, current.clone());
        }
    }
}

/// Collect the branches of a (possibly nested) set operation, left to right
fn flatten_set_operation<'a>(body: &'a SetExpr, out: &mut Vec<&'a SetExpr>) {
    match body {
        SetExpr::SetOperation { left, right, .. } => {
            flatten_set_operation(left, out);
            flatten_set_operation(right, out);
        }
        other => out.push(other),
    }
}

#[cfg(test)]
#[path = "cte_test.rs"]
mod tests;
