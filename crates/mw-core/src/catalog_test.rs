use super::*;

fn snapshot() -> CatalogSnapshot {
    CatalogSnapshot::new(vec![DatabaseCatalog::new(
        "db",
        vec![SchemaCatalog::new(
            "public",
            vec![TableCatalog::new(
                "users",
                vec![
                    ColumnEntry::new("id", MaskingLevel::None),
                    ColumnEntry::new("email", MaskingLevel::Full),
                ],
            )],
        )],
    )])
}

#[test]
fn test_nested_lookup() {
    let catalog = snapshot();
    let table = catalog
        .database("db")
        .and_then(|d| d.schema("public"))
        .and_then(|s| s.table("users"))
        .unwrap();
    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[1].masking_level, MaskingLevel::Full);
}

#[test]
fn test_lookup_is_case_insensitive() {
    let catalog = snapshot();
    assert!(catalog.database("DB").is_some());
    let db = catalog.database("db").unwrap();
    assert!(db.schema("PUBLIC").unwrap().table("Users").is_some());
}

#[test]
fn test_unknown_names() {
    let catalog = snapshot();
    assert!(catalog.database("other").is_none());
    let schema = catalog.database("db").unwrap().schema("public").unwrap();
    assert!(schema.table("orders").is_none());
}

#[test]
fn test_column_order_is_preserved() {
    let catalog = snapshot();
    let table = catalog.database("db").unwrap().schemas[0].table("users").unwrap();
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email"]);
}
