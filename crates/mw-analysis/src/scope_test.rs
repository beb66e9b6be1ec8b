use super::*;
use mw_core::Field;

fn fields(entries: &[(&str, MaskingLevel)]) -> FieldList {
    FieldList::from(
        entries
            .iter()
            .map(|(name, level)| Field::new(name, *level))
            .collect::<Vec<_>>(),
    )
}

fn frame_with(sources: Vec<(&str, FieldList)>) -> Frame {
    let mut frame = Frame::default();
    for (name, list) in sources {
        frame.output.extend(list.clone());
        frame.sources.push(SourceBinding {
            name: Some(name.to_string()),
            fields: list,
        });
    }
    frame
}

#[test]
fn test_unqualified_lookup() {
    let mut scope = Scope::new();
    scope.push_frame(frame_with(vec![(
        "t",
        fields(&[("a", MaskingLevel::Full), ("b", MaskingLevel::None)]),
    )]));

    assert_eq!(
        scope.resolve_column(None, "a").unwrap(),
        MaskingLevel::Full
    );
    assert!(matches!(
        scope.resolve_column(None, "missing"),
        Err(AnalysisError::UnknownColumn { .. })
    ));
}

#[test]
fn test_unqualified_ambiguity_within_frame() {
    let mut scope = Scope::new();
    scope.push_frame(frame_with(vec![
        ("t1", fields(&[("a", MaskingLevel::Full)])),
        ("t2", fields(&[("a", MaskingLevel::None)])),
    ]));

    assert!(matches!(
        scope.resolve_column(None, "a"),
        Err(AnalysisError::AmbiguousColumn { .. })
    ));
    // qualified lookup still works
    assert_eq!(
        scope.resolve_column(Some("t2"), "a").unwrap(),
        MaskingLevel::None
    );
}

#[test]
fn test_correlated_lookup_falls_outward() {
    let mut scope = Scope::new();
    scope.push_frame(frame_with(vec![(
        "y",
        fields(&[("a", MaskingLevel::Full)]),
    )]));
    scope.push_frame(frame_with(vec![(
        "x",
        fields(&[("b", MaskingLevel::None)]),
    )]));

    // inner frame wins for its own names, outer frame serves the rest
    assert_eq!(
        scope.resolve_column(None, "b").unwrap(),
        MaskingLevel::None
    );
    assert_eq!(
        scope.resolve_column(None, "a").unwrap(),
        MaskingLevel::Full
    );
    assert_eq!(
        scope.resolve_column(Some("y"), "a").unwrap(),
        MaskingLevel::Full
    );
}

#[test]
fn test_duplicate_source_names_within_frame_are_ambiguous() {
    let mut scope = Scope::new();
    scope.push_frame(frame_with(vec![
        ("t", fields(&[("a", MaskingLevel::Full)])),
        ("t", fields(&[("a", MaskingLevel::None)])),
    ]));

    assert!(matches!(
        scope.resolve_column(Some("t"), "a"),
        Err(AnalysisError::AmbiguousTable { .. })
    ));
    assert!(matches!(
        scope.qualified_fields("t"),
        Err(AnalysisError::AmbiguousTable { .. })
    ));
}

#[test]
fn test_qualified_unknown_table() {
    let scope = Scope::new();
    assert!(matches!(
        scope.resolve_column(Some("nope"), "a"),
        Err(AnalysisError::UnknownTable { .. })
    ));
}

#[test]
fn test_cte_shadowing_and_rebind() {
    let mut scope = Scope::new();
    scope.bind_cte("r".to_string(), fields(&[("x", MaskingLevel::None)]));
    scope.bind_cte("r".to_string(), fields(&[("x", MaskingLevel::Partial)]));

    assert_eq!(
        scope.resolve_cte("R").unwrap().get(0).unwrap().masking_level,
        MaskingLevel::Partial
    );

    scope.rebind_cte("r", fields(&[("x", MaskingLevel::Full)]));
    assert_eq!(
        scope.resolve_cte("r").unwrap().get(0).unwrap().masking_level,
        MaskingLevel::Full
    );
}

#[test]
fn test_child_bindings_do_not_leak() {
    let scope = Scope::new();
    let mut child = scope.child();
    child.bind_cte("c".to_string(), fields(&[("x", MaskingLevel::None)]));

    assert_eq!(child.depth(), 1);
    assert!(scope.resolve_cte("c").is_none());
}

#[test]
fn test_current_output_is_innermost_frame() {
    let mut scope = Scope::new();
    scope.push_frame(frame_with(vec![(
        "outer",
        fields(&[("a", MaskingLevel::Full)]),
    )]));
    scope.push_frame(frame_with(vec![(
        "inner",
        fields(&[("b", MaskingLevel::None)]),
    )]));

    let output = scope.current_output();
    assert_eq!(output.len(), 1);
    assert_eq!(output.get(0).unwrap().name, "b");
}
