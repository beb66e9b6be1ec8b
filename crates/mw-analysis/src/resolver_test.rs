use super::*;
use mw_core::{ColumnEntry, DatabaseCatalog, MaskingLevel, SchemaCatalog};
use mw_sql::SqlParser;
use sqlparser::ast::{Statement, TableFactor};

fn catalog() -> CatalogSnapshot {
    let users = TableCatalog::new(
        "users",
        vec![
            ColumnEntry::new("id", MaskingLevel::None),
            ColumnEntry::new("email", MaskingLevel::Full),
        ],
    );
    let audit_users = TableCatalog::new("users", vec![ColumnEntry::new("id", MaskingLevel::None)]);
    let orders = TableCatalog::new("orders", vec![ColumnEntry::new("id", MaskingLevel::None)]);
    CatalogSnapshot::new(vec![DatabaseCatalog::new(
        "db",
        vec![
            SchemaCatalog::new("public", vec![users, orders]),
            SchemaCatalog::new("audit", vec![audit_users]),
        ],
    )])
}

fn table_ref(sql_name: &str) -> TableRef {
    let stmt = SqlParser::postgres()
        .parse_single(&format!("SELECT * FROM {sql_name}"))
        .unwrap();
    let Statement::Query(query) = stmt else {
        panic!("expected query");
    };
    let sqlparser::ast::SetExpr::Select(select) = query.body.as_ref() else {
        panic!("expected select");
    };
    let TableFactor::Table { name, .. } = &select.from[0].relation else {
        panic!("expected table factor");
    };
    TableRef::from_object_name(name).unwrap()
}

#[test]
fn test_schema_qualified_lookup() {
    let catalog = catalog();
    let table = resolve_table(&catalog, "db", &table_ref("audit.users")).unwrap();
    assert_eq!(table.columns.len(), 1);
}

#[test]
fn test_fully_qualified_lookup() {
    let catalog = catalog();
    let table = resolve_table(&catalog, "elsewhere", &table_ref("db.public.users")).unwrap();
    assert_eq!(table.columns.len(), 2);
}

#[test]
fn test_bare_lookup_searches_default_database() {
    let catalog = catalog();
    let table = resolve_table(&catalog, "db", &table_ref("orders")).unwrap();
    assert_eq!(table.name, "orders");
}

#[test]
fn test_bare_lookup_ambiguous_across_schemas() {
    let catalog = catalog();
    assert!(matches!(
        resolve_table(&catalog, "db", &table_ref("users")),
        Err(AnalysisError::AmbiguousTable { .. })
    ));
}

#[test]
fn test_unknown_table_and_database() {
    let catalog = catalog();
    assert!(matches!(
        resolve_table(&catalog, "db", &table_ref("missing")),
        Err(AnalysisError::UnknownTable { .. })
    ));
    assert!(matches!(
        resolve_table(&catalog, "nope", &table_ref("orders")),
        Err(AnalysisError::UnknownTable { .. })
    ));
}

#[test]
fn test_table_ref_parts() {
    let bare = table_ref("users");
    assert!(bare.is_bare());

    let qualified = table_ref("db.public.users");
    assert_eq!(qualified.database.as_deref(), Some("db"));
    assert_eq!(qualified.schema.as_deref(), Some("public"));
    assert_eq!(qualified.table, "users");
    assert_eq!(qualified.display(), "db.public.users");
}

#[test]
fn test_field_list_order() {
    let catalog = catalog();
    let table = resolve_table(&catalog, "db", &table_ref("public.users")).unwrap();
    let fields = table_field_list(table);
    assert_eq!(fields.get(0).unwrap().name, "id");
    assert_eq!(fields.get(1).unwrap().masking_level, MaskingLevel::Full);
}
