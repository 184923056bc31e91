//! Comparison-driven migration scripts applied to a catalog

use pretty_assertions::assert_eq;

use schemabridge::migration::generate_migration_sql;
use schemabridge::{ComparisonPolicy, DiffAction, DialectKind, SchemaAdapter, MemoryCatalog};

use crate::common::seeded_adapter;

const V1: &str = "
CREATE TABLE orders (
    id bigint NOT NULL,
    code varchar(20) NOT NULL,
    PRIMARY KEY (id)
);
";

const V2: &str = "
CREATE TABLE orders (
    id bigint NOT NULL,
    code varchar(20) NOT NULL,
    shipped_at timestamp,
    note text,
    PRIMARY KEY (id)
);
CREATE TABLE invoices (
    id bigint NOT NULL,
    total numeric(12,2) NOT NULL,
    PRIMARY KEY (id)
);
";

/// Migrate `target` towards `source`, returning the applied script
fn migrate(source: &mut SchemaAdapter<MemoryCatalog>, target: &mut SchemaAdapter<MemoryCatalog>) -> String {
    let mut models = Vec::new();
    for name in source.list_tables(schemabridge::TableKind::Table).unwrap() {
        models.push(source.discover_table(&name, false).unwrap().unwrap());
    }
    let results = target.compare_schema(&models, &ComparisonPolicy::table()).unwrap();

    let mut scripts = Vec::new();
    for (model, result) in models.iter().zip(&results) {
        let sql = generate_migration_sql(target.dialect(), model, result).unwrap();
        if !sql.is_empty() {
            scripts.push(sql);
        }
    }
    let script = scripts.join("\n\n");
    target.apply(&script).unwrap();
    script
}

fn assert_converges(kind: DialectKind) -> String {
    let mut source = seeded_adapter(kind, V2);
    let mut target = seeded_adapter(kind, V1);

    let script = migrate(&mut source, &mut target);

    let models = vec![
        source.discover_table("orders", false).unwrap().unwrap(),
        source.discover_table("invoices", false).unwrap().unwrap(),
    ];
    let results = target.compare_schema(&models, &ComparisonPolicy::table()).unwrap();
    for result in &results {
        assert!(result.passed(), "{} after migration:\n{}", kind, result);
    }
    script
}

#[test]
fn test_postgres_migration_converges() {
    let script = assert_converges(DialectKind::Postgres);
    assert_eq!(
        script,
        "ALTER TABLE orders ADD COLUMN shipped_at timestamp, ADD COLUMN note text;\n\n\
         CREATE TABLE invoices (\n    id bigint NOT NULL,\n    total numeric(12,2) NOT NULL,\n    PRIMARY KEY (id)\n);"
    );
}

#[test]
fn test_sqlite_migration_converges() {
    let script = assert_converges(DialectKind::Sqlite);
    assert!(script.starts_with(
        "ALTER TABLE orders ADD COLUMN shipped_at timestamp;\n\nALTER TABLE orders ADD COLUMN note text;"
    ));
}

#[test]
fn test_missing_table_is_flagged() {
    let mut source = seeded_adapter(DialectKind::Postgres, V2);
    let mut target = seeded_adapter(DialectKind::Postgres, V1);
    let invoices = source.discover_table("invoices", false).unwrap().unwrap();

    let results = target
        .compare_schema(std::slice::from_ref(&invoices), &ComparisonPolicy::table())
        .unwrap();
    assert!(results[0].is_missing());
    assert!(!results[0].passed());
}

#[test]
fn test_reverse_direction_only_reports_drops() {
    let mut source = seeded_adapter(DialectKind::Postgres, V1);
    let mut target = seeded_adapter(DialectKind::Postgres, V2);
    let orders = source.discover_table("orders", false).unwrap().unwrap();

    let results = target
        .compare_schema(std::slice::from_ref(&orders), &ComparisonPolicy::table())
        .unwrap();
    let dropped: Vec<&str> = results[0]
        .diffs_of(DiffAction::Drop)
        .map(|d| d.source_column().name())
        .collect();
    assert_eq!(dropped, vec!["shipped_at", "note"]);

    let sql = generate_migration_sql(target.dialect(), &orders, &results[0]).unwrap();
    assert_eq!(
        sql,
        "-- manual: DROP shipped_at on orders\n-- manual: DROP note on orders"
    );
}

#[test]
fn test_incompatible_change_needs_review() {
    let mut source = seeded_adapter(
        DialectKind::Oracle,
        "CREATE TABLE t (id NUMBER(19) NOT NULL, code NVARCHAR2(40) NOT NULL, PRIMARY KEY (id))",
    );
    let mut target = seeded_adapter(
        DialectKind::Oracle,
        "CREATE TABLE t (id NUMBER(19) NOT NULL, code VARCHAR2(20), PRIMARY KEY (id))",
    );
    let model = source.discover_table("t", false).unwrap().unwrap();
    let results = target
        .compare_schema(std::slice::from_ref(&model), &ComparisonPolicy::table())
        .unwrap();
    let result = &results[0];

    let diffs: Vec<String> = result.diffs().iter().map(|d| d.to_string()).collect();
    assert_eq!(diffs, vec!["ALTER CODE (NULLABLE)", "ALTER CODE (DATA_TYPE)"]);

    let relaxed = target
        .compare_schema(std::slice::from_ref(&model), &ComparisonPolicy::view())
        .unwrap();
    assert!(relaxed[0].passed(), "{}", relaxed[0]);
}

#[test]
fn test_key_change_is_listed_not_skipped() {
    let mut source = seeded_adapter(
        DialectKind::Postgres,
        "CREATE TABLE t (id bigint NOT NULL, PRIMARY KEY (id))",
    );
    let mut target = seeded_adapter(DialectKind::Postgres, "CREATE TABLE t (id bigint NOT NULL)");
    let model = source.discover_table("t", false).unwrap().unwrap();
    let results = target
        .compare_schema(std::slice::from_ref(&model), &ComparisonPolicy::table())
        .unwrap();
    assert!(!results[0].passed());
    assert!(results[0].diffs().is_empty());

    let sql = generate_migration_sql(target.dialect(), &model, &results[0]).unwrap();
    assert_eq!(
        sql,
        "-- manual: column id: primary key in source but not a primary key in target on t"
    );
    assert_eq!(target.apply(&sql).unwrap(), 0);
}
