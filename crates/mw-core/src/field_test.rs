use super::*;

fn sample() -> FieldList {
    FieldList::from(vec![
        Field::new("a", MaskingLevel::Full),
        Field::new("b", MaskingLevel::None),
        Field::new("c", MaskingLevel::Partial),
    ])
}

#[test]
fn test_from_columns_preserves_order_and_levels() {
    let columns = vec![
        ColumnEntry::new("id", MaskingLevel::None),
        ColumnEntry::new("ssn", MaskingLevel::Full),
    ];
    let fields = FieldList::from_columns(&columns);
    assert_eq!(fields.len(), 2);
    assert_eq!(fields.get(0).unwrap().name, "id");
    assert_eq!(fields.get(1).unwrap().masking_level, MaskingLevel::Full);
}

#[test]
fn test_renamed_positionally() {
    let renamed = sample().renamed(&["x".to_string(), "y".to_string()]);
    let names: Vec<&str> = renamed.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "c"]);
    // levels untouched
    assert_eq!(renamed.get(0).unwrap().masking_level, MaskingLevel::Full);
}

#[test]
fn test_renamed_with_no_names_is_identity() {
    assert_eq!(sample().renamed(&[]), sample());
}

#[test]
fn test_combined_with_takes_left_names_and_max_levels() {
    let right = FieldList::from(vec![
        Field::new("x", MaskingLevel::None),
        Field::new("y", MaskingLevel::Partial),
        Field::new("z", MaskingLevel::None),
    ]);
    let combined = sample().combined_with(&right).unwrap();
    for (i, field) in combined.iter().enumerate() {
        assert_eq!(field.name, sample().get(i).unwrap().name);
        assert_eq!(
            field.masking_level,
            sample()
                .get(i)
                .unwrap()
                .masking_level
                .combine(right.get(i).unwrap().masking_level)
        );
    }
}

#[test]
fn test_combined_with_arity_mismatch() {
    let short = FieldList::from(vec![Field::new("x", MaskingLevel::None)]);
    assert!(sample().combined_with(&short).is_none());
}

#[test]
fn test_combined_level_is_strictest() {
    assert_eq!(sample().combined_level(), MaskingLevel::Full);
    assert_eq!(FieldList::new().combined_level(), MaskingLevel::None);
}

#[test]
fn test_unnamed_field_uses_placeholder() {
    assert_eq!(Field::unnamed(MaskingLevel::None).name, UNNAMED_COLUMN);
}
