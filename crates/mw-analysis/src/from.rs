//! FROM-clause resolution
//!
//! Resolves base tables, CTE references, derived subqueries, and joins into
//! one frame. Join constraints only affect how the two sides' field lists
//! merge: NATURAL and USING emit each shared column once with the combined
//! level, everything else concatenates. ON conditions gate row inclusion
//! only, which is irrelevant to static sensitivity propagation.

use crate::classifier::MaskingClassifier;
use crate::error::{AnalysisError, AnalysisResult};
use crate::resolver::{resolve_table, table_field_list, TableRef};
use crate::scope::{Frame, Scope, SourceBinding};
use mw_core::{Field, FieldList};
use sqlparser::ast::{
    Join, JoinConstraint, JoinOperator, TableAlias, TableFactor, TableWithJoins,
};

impl MaskingClassifier<'_> {
    /// Resolve a whole FROM clause. Comma-separated items are an implicit
    /// cross join: outputs concatenate and every binding stays visible.
    pub(crate) fn resolve_from(
        &self,
        from: &[TableWithJoins],
        scope: &Scope,
    ) -> AnalysisResult<Frame> {
        let mut frame = Frame::default();
        for table_with_joins in from {
            let item = self.resolve_table_with_joins(table_with_joins, scope)?;
            frame.sources.extend(item.sources);
            frame.output.extend(item.output);
        }
        Ok(frame)
    }

    fn resolve_table_with_joins(
        &self,
        table_with_joins: &TableWithJoins,
        scope: &Scope,
    ) -> AnalysisResult<Frame> {
        let mut frame = self.resolve_table_factor(&table_with_joins.relation, scope)?;
        for join in &table_with_joins.joins {
            let right = self.resolve_table_factor(&join.relation, scope)?;
            frame = merge_join(frame, right, join)?;
        }
        Ok(frame)
    }

    fn resolve_table_factor(
        &self,
        factor: &TableFactor,
        scope: &Scope,
    ) -> AnalysisResult<Frame> {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let table_ref = TableRef::from_object_name(name)?;
                // CTE bindings shadow catalog tables, but only for bare names
                let cte_fields = if table_ref.is_bare() {
                    scope.resolve_cte(&table_ref.table).cloned()
                } else {
                    None
                };
                let fields = match cte_fields {
                    Some(fields) => fields,
                    None => table_field_list(resolve_table(
                        self.catalog,
                        self.default_database,
                        &table_ref,
                    )?),
                };
                match alias {
                    Some(alias) => Ok(single_source(
                        Some(alias.name.value.clone()),
                        rename_per_alias(alias, fields),
                    )),
                    None => Ok(single_source(Some(table_ref.table), fields)),
                }
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                let fields = self.resolve_query(subquery, &scope.child())?;
                match alias {
                    Some(alias) => Ok(single_source(
                        Some(alias.name.value.clone()),
                        rename_per_alias(alias, fields),
                    )),
                    None => Ok(single_source(None, fields)),
                }
            }
            TableFactor::NestedJoin {
                table_with_joins,
                alias,
            } => {
                let frame = self.resolve_table_with_joins(table_with_joins, scope)?;
                match alias {
                    // an alias collapses the join tree into a single source
                    Some(alias) => Ok(single_source(
                        Some(alias.name.value.clone()),
                        rename_per_alias(alias, frame.output),
                    )),
                    None => Ok(frame),
                }
            }
            other => Err(AnalysisError::UnsupportedConstruct {
                construct: format!("FROM item `{other}`"),
            }),
        }
    }
}

fn single_source(name: Option<String>, fields: FieldList) -> Frame {
    Frame {
        output: fields.clone(),
        sources: vec![SourceBinding { name, fields }],
    }
}

fn rename_per_alias(alias: &TableAlias, fields: FieldList) -> FieldList {
    if alias.columns.is_empty() {
        return fields;
    }
    let names: Vec<String> = alias.columns.iter().map(|c| c.name.value.clone()).collect();
    fields.renamed(&names)
}

fn merge_join(left: Frame, right: Frame, join: &Join) -> AnalysisResult<Frame> {
    let constraint = match &join.join_operator {
        JoinOperator::Join(c)
        | JoinOperator::Inner(c)
        | JoinOperator::Left(c)
        | JoinOperator::LeftOuter(c)
        | JoinOperator::Right(c)
        | JoinOperator::RightOuter(c)
        | JoinOperator::FullOuter(c) => Some(c),
        JoinOperator::CrossJoin(_) => None,
        other => {
            log::warn!("unrecognized join operator {other:?}, merging as cross join");
            None
        }
    };

    let output = match constraint {
        Some(JoinConstraint::Natural) => {
            let shared = shared_names(&left.output, &right.output);
            merge_on_columns(&left.output, &right.output, &shared)?
        }
        Some(JoinConstraint::Using(columns)) => {
            let names: Vec<String> = columns
                .iter()
                .filter_map(|c| c.0.last().and_then(|p| p.as_ident()))
                .map(|i| i.value.clone())
                .collect();
            merge_on_columns(&left.output, &right.output, &names)?
        }
        // ON conditions and unconstrained joins: plain concatenation
        _ => {
            let mut output = left.output.clone();
            output.extend(right.output.clone());
            output
        }
    };

    let mut sources = left.sources;
    sources.extend(right.sources);
    Ok(Frame { sources, output })
}

/// Column names present on both sides, in left-side order, each once
fn shared_names(left: &FieldList, right: &FieldList) -> Vec<String> {
    let mut shared: Vec<String> = Vec::new();
    for field in left.iter() {
        let seen = shared.iter().any(|n| n.eq_ignore_ascii_case(&field.name));
        if !seen
            && right
                .iter()
                .any(|r| r.name.eq_ignore_ascii_case(&field.name))
        {
            shared.push(field.name.clone());
        }
    }
    shared
}

/// NATURAL/USING merge: one field per shared name carrying the combine of
/// both sides' levels (idempotent for same-table self-joins), then the
/// remaining left fields, then the remaining right fields.
fn merge_on_columns(
    left: &FieldList,
    right: &FieldList,
    shared: &[String],
) -> AnalysisResult<FieldList> {
    let find = |list: &FieldList, name: &str| -> AnalysisResult<Field> {
        list.iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| AnalysisError::UnknownColumn {
                column: name.to_string(),
            })
    };
    let is_shared =
        |name: &str| -> bool { shared.iter().any(|n| n.eq_ignore_ascii_case(name)) };

    let mut output = FieldList::new();
    for name in shared {
        let left_field = find(left, name)?;
        let right_field = find(right, name)?;
        output.push(Field::new(
            &left_field.name,
            left_field.masking_level.combine(right_field.masking_level),
        ));
    }
    for field in left.iter().chain(right.iter()) {
        if !is_shared(&field.name) {
            output.push(field.clone());
        }
    }
    Ok(output)
}

#[cfg(test)]
#[path = "from_test.rs"]
mod tests;
