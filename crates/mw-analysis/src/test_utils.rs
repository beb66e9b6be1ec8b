//! Shared test fixtures

use crate::classifier::MaskingClassifier;
use crate::error::{AnalysisError, AnalysisResult};
use mw_core::{
    CatalogSnapshot, ColumnEntry, DatabaseCatalog, FieldList, MaskingLevel, SchemaCatalog,
    TableCatalog,
};

pub(crate) const DEFAULT_DATABASE: &str = "db";

/// Catalog with one table `public.t(a full, b none, c none, d partial)`
pub(crate) fn sample_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(vec![DatabaseCatalog::new(
        DEFAULT_DATABASE,
        vec![SchemaCatalog::new(
            "public",
            vec![TableCatalog::new(
                "t",
                vec![
                    ColumnEntry::new("a", MaskingLevel::Full),
                    ColumnEntry::new("b", MaskingLevel::None),
                    ColumnEntry::new("c", MaskingLevel::None),
                    ColumnEntry::new("d", MaskingLevel::Partial),
                ],
            )],
        )],
    )])
}

/// Classify one statement against the sample catalog
pub(crate) fn classify(sql: &str) -> AnalysisResult<FieldList> {
    let catalog = sample_catalog();
    MaskingClassifier::new(&catalog, DEFAULT_DATABASE).classify_sql(sql)
}

/// Classify and unwrap the statement-context wrapper around the real error
pub(crate) fn classify_err(sql: &str) -> AnalysisError {
    match classify(sql) {
        Err(AnalysisError::Statement { source, .. }) => *source,
        Err(other) => other,
        Ok(fields) => panic!("expected error for `{sql}`, got {fields:?}"),
    }
}

/// Assert a field list's names and levels, in order
pub(crate) fn assert_fields(fields: &FieldList, expected: &[(&str, MaskingLevel)]) {
    let actual: Vec<(&str, MaskingLevel)> = fields
        .iter()
        .map(|f| (f.name.as_str(), f.masking_level))
        .collect();
    assert_eq!(actual, expected.to_vec());
}
