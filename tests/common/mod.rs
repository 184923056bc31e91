//! Common test utilities for schemabridge tests

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use schemabridge::{AdapterConfig, DialectKind, MemoryCatalog, SchemaAdapter};

/// Test context with a temporary directory holding DDL files
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    /// Create a context holding a copy of a fixture's `schema.sql`
    pub fn with_fixture(fixture_name: &str) -> (Self, PathBuf) {
        let ctx = Self::new();
        let sql = fs::read_to_string(fixture_path(fixture_name).join("schema.sql"))
            .expect("Failed to read fixture");
        let path = ctx.write_sql(&format!("{}.sql", fixture_name), &sql);
        (ctx, path)
    }

    /// Write a DDL file into the context directory
    pub fn write_sql(&self, name: &str, sql: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, sql).expect("Failed to write SQL file");
        path
    }
}

/// Get the path to a test fixture directory
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// An adapter over an empty in-memory catalog for `kind`
pub fn memory_adapter(kind: DialectKind) -> SchemaAdapter<MemoryCatalog> {
    let dialect = kind.dialect();
    let catalog = MemoryCatalog::emulating(dialect.as_ref());
    SchemaAdapter::new(catalog, dialect, AdapterConfig::default())
}

/// An adapter whose catalog already ran `ddl`
pub fn seeded_adapter(kind: DialectKind, ddl: &str) -> SchemaAdapter<MemoryCatalog> {
    let mut adapter = memory_adapter(kind);
    adapter
        .apply(ddl)
        .unwrap_or_else(|e| panic!("seed DDL failed for {}: {}", kind, e));
    adapter
}
