//! File-driven render/compare/migrate entry points and the binary

use std::process::Command;

use pretty_assertions::assert_eq;

use schemabridge::compare::report::render_report;
use schemabridge::{
    compare_schemas, migrate_schemas, render_schema, CompareOptions, ComparisonPolicy,
    DialectKind, RenderOptions,
};

use crate::common::{fixture_path, TestContext};

#[test]
fn test_render_oracle_schema_for_postgres() {
    let (_ctx, path) = TestContext::with_fixture("oracle_shop");
    let sql = render_schema(RenderOptions {
        files: vec![path],
        dialect: DialectKind::Oracle,
        target: Some(DialectKind::Postgres),
        emit_comments: true,
    })
    .unwrap();

    assert_eq!(
        sql,
        "CREATE TABLE products (\n    id bigint NOT NULL,\n    sku varchar(40) NOT NULL,\n    \
         price numeric(10,2),\n    in_stock boolean DEFAULT true,\n    description text,\n    \
         PRIMARY KEY (id)\n);\n\n\
         COMMENT ON TABLE products IS 'Catalog products';\n\n\
         COMMENT ON COLUMN products.sku IS 'Stock keeping unit';\n\n\
         CREATE OR REPLACE VIEW active_products AS\nSELECT id, sku, price FROM products;\n"
    );
}

#[test]
fn test_render_without_comments_for_sqlserver() {
    let (_ctx, path) = TestContext::with_fixture("oracle_shop");
    let sql = render_schema(RenderOptions {
        files: vec![path],
        dialect: DialectKind::Oracle,
        target: Some(DialectKind::SqlServer),
        emit_comments: false,
    })
    .unwrap();

    assert!(sql.starts_with("CREATE TABLE PRODUCTS (\n    ID BIGINT NOT NULL,"));
    assert!(sql.contains("    DESCRIPTION VARCHAR(MAX),\n"));
    assert!(!sql.contains("COMMENT ON"));
}

#[test]
fn test_compare_fixture_versions() {
    let (_a, v1) = TestContext::with_fixture("orders_v1");
    let (_b, v2) = TestContext::with_fixture("orders_v2");

    let results = compare_schemas(CompareOptions {
        source: vec![v2],
        target: vec![v1],
        dialect: DialectKind::Postgres,
        policy: ComparisonPolicy::table(),
    })
    .unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.table_name()).collect();
    assert_eq!(names, vec!["customers", "orders", "invoices"]);
    assert!(results[0].passed());
    assert!(!results[1].passed());
    assert!(results[2].is_missing());

    let report = render_report(&results);
    assert!(report.ends_with("Summary: 3 tables, 2 failed (1 missing), 2 add, 0 alter, 0 drop\n"));
}

#[test]
fn test_migrate_fixture_versions() {
    let script = migrate_schemas(
        &[fixture_path("orders_v2").join("schema.sql")],
        &[fixture_path("orders_v1").join("schema.sql")],
        DialectKind::Postgres,
    )
    .unwrap();

    assert_eq!(
        script,
        "ALTER TABLE orders ADD COLUMN shipped_at timestamp, ADD COLUMN note text;\n\n\
         CREATE TABLE invoices (\n    id bigint NOT NULL,\n    order_id bigint NOT NULL,\n    \
         total numeric(12,2) NOT NULL,\n    PRIMARY KEY (id)\n);\n\n\
         COMMENT ON TABLE invoices IS 'Issued invoices';\n"
    );
}

#[test]
fn test_missing_file_is_reported() {
    let ctx = TestContext::new();
    let err = render_schema(RenderOptions {
        files: vec![ctx.dir.join("absent.sql")],
        dialect: DialectKind::Sqlite,
        target: None,
        emit_comments: true,
    })
    .unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_invalid_ddl_is_reported() {
    let ctx = TestContext::new();
    let path = ctx.write_sql("broken.sql", "CREATE TABLE (");
    let err = render_schema(RenderOptions {
        files: vec![path],
        dialect: DialectKind::Sqlite,
        target: None,
        emit_comments: true,
    })
    .unwrap_err();
    assert!(err.to_string().contains("Failed to load"));
}

// ============================================================================
// Binary
// ============================================================================

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_schemabridge"))
}

#[test]
fn test_binary_compare_exit_codes() {
    let v1 = fixture_path("orders_v1").join("schema.sql");
    let v2 = fixture_path("orders_v2").join("schema.sql");

    let same = binary()
        .args(["compare", "--dialect", "postgres", "--source"])
        .arg(&v1)
        .arg("--target")
        .arg(&v1)
        .output()
        .unwrap();
    assert!(same.status.success());
    assert!(String::from_utf8_lossy(&same.stdout).contains("OK (identical)"));

    let changed = binary()
        .args(["compare", "--dialect", "postgres", "--source"])
        .arg(&v2)
        .arg("--target")
        .arg(&v1)
        .output()
        .unwrap();
    assert!(!changed.status.success());
    assert!(String::from_utf8_lossy(&changed.stdout).contains("Table missing in target"));
}

#[test]
fn test_binary_rejects_unknown_dialect() {
    let output = binary()
        .args(["render", "--dialect", "db2"])
        .arg(fixture_path("orders_v1").join("schema.sql"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown dialect"));
}
