//! Discovery, rendering and migration against a real SQLite database

use pretty_assertions::assert_eq;

use schemabridge::migration::generate_migration_sql;
use schemabridge::{
    compare_tables, AdapterConfig, ComparisonPolicy, DataType, DialectKind, SchemaAdapter,
    SqliteCatalog, TableKind, TableModel,
};

use crate::common::{seeded_adapter, TestContext};

const ORDERS: &str = "
CREATE TABLE orders (
    id bigint NOT NULL PRIMARY KEY,
    code varchar(20) NOT NULL,
    title nvarchar(100),
    amount numeric(12, 2) DEFAULT 0,
    quantity integer,
    active boolean DEFAULT 1,
    ratio double,
    ordered_on date,
    created_at timestamp DEFAULT CURRENT_TIMESTAMP,
    note text,
    payload blob
);
CREATE VIEW recent_orders AS SELECT id, code, created_at FROM orders;
";

fn sqlite_adapter() -> SchemaAdapter<SqliteCatalog> {
    SchemaAdapter::connect(
        |_: &AdapterConfig| SqliteCatalog::open_in_memory(),
        DialectKind::Sqlite.dialect(),
        AdapterConfig::default(),
    )
    .unwrap()
}

fn seeded(ddl: &str) -> SchemaAdapter<SqliteCatalog> {
    let mut adapter = sqlite_adapter();
    adapter.apply(ddl).unwrap();
    adapter
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_sqlite_round_trip_through_the_driver() {
    let mut adapter = seeded(ORDERS);
    let original = adapter.discover_table("orders", false).unwrap().unwrap();
    assert_eq!(original.columns().len(), 11);
    assert!(original.column("id").unwrap().is_pk());
    assert_eq!(original.column("title").unwrap().data_type(), DataType::Nvarchar);
    assert_eq!(original.column("note").unwrap().data_type(), DataType::Clob);
    assert_eq!(original.column("active").unwrap().default_value(), Some("1"));

    let create = adapter.generate_create_table_sql(&original).unwrap();
    assert!(create.contains("    active boolean DEFAULT true,\n"), "{}", create);
    assert!(create.contains("    created_at timestamp DEFAULT CURRENT_TIMESTAMP,\n"), "{}", create);

    adapter.apply("DROP VIEW recent_orders").unwrap();
    let drop = adapter.generate_drop_table_sql("orders");
    adapter.apply(&drop).unwrap();
    assert!(!adapter.table_exists("orders").unwrap());
    adapter
        .apply(&create)
        .unwrap_or_else(|e| panic!("sqlite rejected its own DDL: {}\n{}", e, create));

    let rediscovered = adapter.discover_table("orders", false).unwrap().unwrap();
    let result = compare_tables(&original, Some(&rediscovered), &ComparisonPolicy::table());
    assert!(result.passed(), "{}", result);
    assert!(result.diffs().is_empty());
}

#[test]
fn test_quoted_names_through_the_driver() {
    let mut adapter = seeded(
        r#"CREATE TABLE "Order Lines" ("LineNo" integer NOT NULL, "order" integer, PRIMARY KEY ("LineNo"))"#,
    );
    let original = adapter.discover_table("Order Lines", false).unwrap().unwrap();
    let create = adapter.generate_create_table_sql(&original).unwrap();
    assert_eq!(
        create,
        "CREATE TABLE \"Order Lines\" (\n    \"LineNo\" integer NOT NULL,\n    \"order\" integer,\n    \
         PRIMARY KEY (\"LineNo\")\n);"
    );

    let drop = adapter.generate_drop_table_sql("Order Lines");
    adapter.apply(&drop).unwrap();
    adapter.apply(&create).unwrap();
    let rediscovered = adapter.discover_table("Order Lines", false).unwrap().unwrap();
    assert!(compare_tables(&original, Some(&rediscovered), &ComparisonPolicy::table()).passed());
}

// ============================================================================
// Views and listing
// ============================================================================

#[test]
fn test_views_through_the_driver() {
    let mut adapter = seeded(ORDERS);
    assert_eq!(adapter.list_tables(TableKind::Table).unwrap(), vec!["orders"]);
    assert_eq!(adapter.list_tables(TableKind::View).unwrap(), vec!["recent_orders"]);

    let body = adapter.select_view_script("recent_orders").unwrap().unwrap();
    assert_eq!(body, "SELECT id, code, created_at FROM orders");
    assert_eq!(adapter.select_view_script("missing").unwrap(), None);

    let view = adapter.discover_view("recent_orders").unwrap().unwrap();
    assert!(view.is_view());
    let names: Vec<&str> = view.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["id", "code", "created_at"]);
    assert!(view.columns().iter().all(|c| !c.is_pk()));
}

#[test]
fn test_postgres_model_lands_in_sqlite() {
    let mut postgres = seeded_adapter(
        DialectKind::Postgres,
        "CREATE TABLE accounts (id bigint NOT NULL, owner varchar(80) NOT NULL, balance numeric(18,4), PRIMARY KEY (id))",
    );
    let source = postgres.discover_table("accounts", false).unwrap().unwrap();

    let mut sqlite = sqlite_adapter();
    let ddl = sqlite.generate_create_table_sql(&source).unwrap();
    sqlite.apply(&ddl).unwrap();
    let target = sqlite.discover_table("accounts", false).unwrap().unwrap();
    let result = compare_tables(&source, Some(&target), &ComparisonPolicy::table());
    assert!(result.passed(), "{}", result);
}

// ============================================================================
// Migration and persistence
// ============================================================================

#[test]
fn test_migration_converges_on_a_database_file() {
    let ctx = TestContext::new();
    let path = ctx.dir.join("shop.db");

    let mut target = SchemaAdapter::new(
        SqliteCatalog::open(&path).unwrap(),
        DialectKind::Sqlite.dialect(),
        AdapterConfig::default(),
    );
    target
        .apply("CREATE TABLE orders (id bigint NOT NULL PRIMARY KEY, code varchar(20) NOT NULL)")
        .unwrap();

    let mut source = seeded(
        "CREATE TABLE orders (id bigint NOT NULL PRIMARY KEY, code varchar(20) NOT NULL, shipped_at timestamp, note text)",
    );
    let model = source.discover_table("orders", false).unwrap().unwrap();
    let results = target
        .compare_schema(std::slice::from_ref(&model), &ComparisonPolicy::table())
        .unwrap();
    let script = generate_migration_sql(target.dialect(), &model, &results[0]).unwrap();
    assert_eq!(
        script,
        "ALTER TABLE orders ADD COLUMN shipped_at timestamp;\n\nALTER TABLE orders ADD COLUMN note text;"
    );
    assert_eq!(target.apply(&script).unwrap(), 2);
    drop(target);

    let mut reopened = SchemaAdapter::new(
        SqliteCatalog::open(&path).unwrap(),
        DialectKind::Sqlite.dialect(),
        AdapterConfig::default(),
    );
    let migrated: TableModel = reopened.discover_table("orders", false).unwrap().unwrap();
    let result = compare_tables(&model, Some(&migrated), &ComparisonPolicy::table());
    assert!(result.passed(), "{}", result);
}

#[test]
fn test_driver_errors_carry_the_statement() {
    let mut adapter = sqlite_adapter();
    let err = adapter.apply("CREATE TABLE broken (").unwrap_err();
    assert!(err.is_driver_failure());
    assert!(err.to_string().starts_with("database operation failed"));
}
