//! Expression classification
//!
//! Computes the name and masking level of one projected expression. The
//! level is the lattice fold over every column reference reachable within
//! the expression tree, including nested subqueries; literals contribute
//! NONE. Default names follow PostgreSQL: the bare lowercase function name
//! for an unaliased call, a scalar subquery's single output name, and the
//! `?column?` placeholder for any other compound expression. Constructs the
//! classifier cannot resolve fail explicitly - guessing a level would risk
//! under-classifying a sensitive column.

use crate::classifier::MaskingClassifier;
use crate::error::{AnalysisError, AnalysisResult};
use crate::scope::Scope;
use mw_core::{Field, MaskingLevel, UNNAMED_COLUMN};
use sqlparser::ast::{
    Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments, Ident, Query, WindowType,
};

impl MaskingClassifier<'_> {
    /// Classify one expression to a named, leveled field
    pub(crate) fn classify_expr(&self, expr: &Expr, scope: &Scope) -> AnalysisResult<Field> {
        match expr {
            Expr::Identifier(ident) => self.classify_column_ref(std::slice::from_ref(ident), scope),
            Expr::CompoundIdentifier(idents) => self.classify_column_ref(idents, scope),
            Expr::Function(func) => self.classify_function(func, scope),
            Expr::Subquery(query) => self.classify_scalar_subquery(query, scope),
            Expr::Nested(inner) => self.classify_expr(inner, scope),
            other => Ok(Field::unnamed(self.expr_level(other, scope)?)),
        }
    }

    /// Bare or qualified column reference. The qualifier for scope matching
    /// is the table/alias part; schema and database parts are tolerated and
    /// skipped (`public.t.c` binds through `t`).
    fn classify_column_ref(&self, idents: &[Ident], scope: &Scope) -> AnalysisResult<Field> {
        let column = match idents.last() {
            Some(ident) => ident.value.as_str(),
            None => {
                return Err(AnalysisError::UnsupportedConstruct {
                    construct: "empty column reference".to_string(),
                })
            }
        };
        let qualifier = idents
            .len()
            .checked_sub(2)
            .map(|i| idents[i].value.as_str());
        Ok(Field::new(column, scope.resolve_column(qualifier, column)?))
    }

    /// Function call: level folds every argument plus the FILTER, WITHIN
    /// GROUP, and OVER clauses; name is the bare function name lowercased
    /// (`SELECT max(a)` projects a column named `max`)
    fn classify_function(&self, func: &Function, scope: &Scope) -> AnalysisResult<Field> {
        let name = func
            .name
            .0
            .last()
            .and_then(|p| p.as_ident())
            .map(|i| i.value.to_lowercase())
            .unwrap_or_else(|| UNNAMED_COLUMN.to_string());
        let mut level = self.function_args_level(&func.args, scope)?;
        if let Some(filter) = &func.filter {
            level = level.combine(self.expr_level(filter, scope)?);
        }
        for order in &func.within_group {
            level = level.combine(self.expr_level(&order.expr, scope)?);
        }
        if let Some(window) = &func.over {
            level = level.combine(self.window_level(window, scope)?);
        }
        Ok(Field::new(&name, level))
    }

    /// OVER clause: a window function's output is derived from the rows the
    /// window selects, so PARTITION BY and ORDER BY expressions feed the
    /// level like arguments do. Frame offsets cannot reference columns in
    /// PostgreSQL and contribute nothing.
    fn window_level(&self, window: &WindowType, scope: &Scope) -> AnalysisResult<MaskingLevel> {
        let spec = match window {
            WindowType::WindowSpec(spec) => spec,
            WindowType::NamedWindow(name) => {
                return Err(AnalysisError::UnsupportedConstruct {
                    construct: format!("named window `{name}`"),
                })
            }
        };
        let mut level = MaskingLevel::None;
        for expr in &spec.partition_by {
            level = level.combine(self.expr_level(expr, scope)?);
        }
        for order in &spec.order_by {
            level = level.combine(self.expr_level(&order.expr, scope)?);
        }
        Ok(level)
    }

    /// Scalar subquery: its own nested query block. The name is the single
    /// output's name when the block projects exactly one column, as
    /// PostgreSQL names it; the level folds every projected column, and any
    /// correlated outer references resolve through the chained scope.
    fn classify_scalar_subquery(&self, query: &Query, scope: &Scope) -> AnalysisResult<Field> {
        let inner = self.resolve_query(query, &scope.child())?;
        let name = match inner.fields() {
            [only] => only.name.clone(),
            _ => UNNAMED_COLUMN.to_string(),
        };
        Ok(Field::new(&name, inner.combined_level()))
    }

    /// Masking level of an arbitrary expression: the fold over every
    /// reachable column reference
    pub(crate) fn expr_level(&self, expr: &Expr, scope: &Scope) -> AnalysisResult<MaskingLevel> {
        let fold = |exprs: &[&Expr]| -> AnalysisResult<MaskingLevel> {
            let mut level = MaskingLevel::None;
            for expr in exprs {
                level = level.combine(self.expr_level(expr, scope)?);
            }
            Ok(level)
        };

        match expr {
            Expr::Identifier(_)
            | Expr::CompoundIdentifier(_)
            | Expr::Function(_)
            | Expr::Subquery(_)
            | Expr::Nested(_) => Ok(self.classify_expr(expr, scope)?.masking_level),

            Expr::Value(_) | Expr::TypedString { .. } => Ok(MaskingLevel::None),

            Expr::BinaryOp { left, right, .. } => fold(&[left, right]),
            Expr::UnaryOp { expr, .. } => self.expr_level(expr, scope),
            Expr::IsNull(expr)
            | Expr::IsNotNull(expr)
            | Expr::IsTrue(expr)
            | Expr::IsNotTrue(expr)
            | Expr::IsFalse(expr)
            | Expr::IsNotFalse(expr)
            | Expr::IsUnknown(expr)
            | Expr::IsNotUnknown(expr) => self.expr_level(expr, scope),
            Expr::IsDistinctFrom(left, right) | Expr::IsNotDistinctFrom(left, right) => {
                fold(&[left, right])
            }
            Expr::Between {
                expr, low, high, ..
            } => fold(&[expr, low, high]),
            Expr::InList { expr, list, .. } => {
                let mut level = self.expr_level(expr, scope)?;
                for item in list {
                    level = level.combine(self.expr_level(item, scope)?);
                }
                Ok(level)
            }
            Expr::InSubquery {
                expr, subquery, ..
            } => Ok(self
                .expr_level(expr, scope)?
                .combine(self.query_level(subquery, scope)?)),
            Expr::Exists { subquery, .. } => self.query_level(subquery, scope),
            Expr::Like { expr, pattern, .. }
            | Expr::ILike { expr, pattern, .. }
            | Expr::SimilarTo { expr, pattern, .. } => fold(&[expr, pattern]),
            Expr::AnyOp { left, right, .. } | Expr::AllOp { left, right, .. } => {
                fold(&[left, right])
            }
            Expr::Case {
                operand,
                conditions,
                else_result,
                ..
            } => {
                let mut level = MaskingLevel::None;
                if let Some(operand) = operand {
                    level = level.combine(self.expr_level(operand, scope)?);
                }
                for case_when in conditions {
                    level = level.combine(self.expr_level(&case_when.condition, scope)?);
                    level = level.combine(self.expr_level(&case_when.result, scope)?);
                }
                if let Some(else_result) = else_result {
                    level = level.combine(self.expr_level(else_result, scope)?);
                }
                Ok(level)
            }
            Expr::Cast { expr, .. }
            | Expr::Extract { expr, .. }
            | Expr::Collate { expr, .. } => self.expr_level(expr, scope),
            Expr::Substring {
                expr,
                substring_from,
                substring_for,
                ..
            } => {
                let mut level = self.expr_level(expr, scope)?;
                if let Some(from) = substring_from {
                    level = level.combine(self.expr_level(from, scope)?);
                }
                if let Some(length) = substring_for {
                    level = level.combine(self.expr_level(length, scope)?);
                }
                Ok(level)
            }
            Expr::Trim {
                expr, trim_what, ..
            } => {
                let mut level = self.expr_level(expr, scope)?;
                if let Some(what) = trim_what {
                    level = level.combine(self.expr_level(what, scope)?);
                }
                Ok(level)
            }
            Expr::Position { expr, r#in } => fold(&[expr, r#in]),
            Expr::Tuple(exprs) => {
                let mut level = MaskingLevel::None;
                for expr in exprs {
                    level = level.combine(self.expr_level(expr, scope)?);
                }
                Ok(level)
            }
            Expr::Interval(interval) => self.expr_level(&interval.value, scope),

            other => Err(AnalysisError::UnsupportedConstruct {
                construct: format!("expression `{other}`"),
            }),
        }
    }

    /// Fold of every output level of a nested query (IN/EXISTS subqueries)
    fn query_level(&self, query: &Query, scope: &Scope) -> AnalysisResult<MaskingLevel> {
        let fields = self.resolve_query(query, &scope.child())?;
        Ok(fields.combined_level())
    }

    fn function_args_level(
        &self,
        args: &FunctionArguments,
        scope: &Scope,
    ) -> AnalysisResult<MaskingLevel> {
        match args {
            FunctionArguments::None => Ok(MaskingLevel::None),
            FunctionArguments::Subquery(query) => self.query_level(query, scope),
            FunctionArguments::List(list) => {
                let mut level = MaskingLevel::None;
                for arg in &list.args {
                    let arg_expr = match arg {
                        FunctionArg::Unnamed(e)
                        | FunctionArg::Named { arg: e, .. }
                        | FunctionArg::ExprNamed { arg: e, .. } => e,
                    };
                    level = level.combine(self.function_arg_level(arg_expr, scope)?);
                }
                Ok(level)
            }
        }
    }

    /// Wildcard arguments (`count(*)`, `count(t.*)`) fold the referenced
    /// source's whole output
    fn function_arg_level(
        &self,
        arg: &FunctionArgExpr,
        scope: &Scope,
    ) -> AnalysisResult<MaskingLevel> {
        match arg {
            FunctionArgExpr::Expr(expr) => self.expr_level(expr, scope),
            FunctionArgExpr::Wildcard => Ok(scope.current_output().combined_level()),
            FunctionArgExpr::QualifiedWildcard(name) => {
                let qualifier = name
                    .0
                    .last()
                    .and_then(|p| p.as_ident())
                    .map(|i| i.value.clone())
                    .ok_or_else(|| AnalysisError::UnsupportedConstruct {
                        construct: format!("wildcard qualifier `{name}`"),
                    })?;
                Ok(scope.qualified_fields(&qualifier)?.combined_level())
            }
        }
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
