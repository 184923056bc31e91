//! schemabridge: portable table/view schemas across database engines
//!
//! This library models table and view schemas independently of any engine,
//! discovers that model from a database catalog, compares two models under a
//! configurable strictness policy and renders dialect-correct DDL for
//! Oracle, PostgreSQL, SAP HANA, SQLite and SQL Server.

pub mod adapter;
pub mod catalog;
pub mod compare;
pub mod dialect;
pub mod error;
pub mod migration;
pub mod model;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

pub use adapter::{AdapterConfig, SchemaAdapter};
pub use catalog::{CatalogConnection, MemoryCatalog};
#[cfg(feature = "sqlite")]
pub use catalog::SqliteCatalog;
pub use compare::{compare_tables, ComparisonPolicy, ComparisonResult, Diff, DiffAction};
pub use dialect::{Dialect, DialectKind};
pub use error::{DriverError, SchemaError};
pub use model::{ColumnModel, DataType, TableKind, TableModel};

/// Load DDL files into a fresh in-memory catalog for `dialect`
pub fn load_catalog(
    dialect: DialectKind,
    files: &[PathBuf],
    config: AdapterConfig,
) -> Result<SchemaAdapter<MemoryCatalog>> {
    let dialect = dialect.dialect();
    let mut catalog = MemoryCatalog::emulating(dialect.as_ref());
    for file in files {
        let sql = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let executed = catalog
            .execute(&sql)
            .with_context(|| format!("Failed to load {}", file.display()))?;
        info!(file = %file.display(), statements = executed, "loaded");
    }
    Ok(SchemaAdapter::new(catalog, dialect, config))
}

/// Every table, then every view, of a catalog
pub fn discover_all<C: CatalogConnection>(adapter: &mut SchemaAdapter<C>) -> Result<Vec<TableModel>> {
    let mut models = Vec::new();
    for name in adapter.list_tables(TableKind::Table)? {
        if let Some(table) = adapter.discover_table(&name, false)? {
            models.push(table);
        }
    }
    for name in adapter.list_tables(TableKind::View)? {
        if let Some(view) = adapter.discover_view(&name)? {
            models.push(view);
        }
    }
    Ok(models)
}

/// Options for re-rendering a schema in another dialect
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// DDL files describing the schema
    pub files: Vec<PathBuf>,
    /// Dialect the files are written in
    pub dialect: DialectKind,
    /// Dialect to render; defaults to `dialect`
    pub target: Option<DialectKind>,
    /// Emit remark comments
    pub emit_comments: bool,
}

/// Render CREATE TABLE and CREATE VIEW statements for every object in the
/// files.
pub fn render_schema(options: RenderOptions) -> Result<String> {
    let config = AdapterConfig::default().with_comments(options.emit_comments);
    let mut source = load_catalog(options.dialect, &options.files, config.clone())?;
    let target = options.target.unwrap_or(options.dialect).dialect();

    let mut statements = Vec::new();
    for name in source.list_tables(TableKind::Table)? {
        if let Some(table) = source.discover_table(&name, false)? {
            statements.push(target.generate_create_table_sql(&table, config.emit_comments)?);
        }
    }
    for name in source.list_tables(TableKind::View)? {
        if let Some(body) = source.select_view_script(&name)? {
            statements.push(target.generate_create_view_sql(&name, &body));
        }
    }

    let mut out = statements.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Options for comparing two schemas
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub source: Vec<PathBuf>,
    pub target: Vec<PathBuf>,
    /// Dialect both file sets are written in
    pub dialect: DialectKind,
    pub policy: ComparisonPolicy,
}

/// Compare every table and view of the source files against the target files
pub fn compare_schemas(options: CompareOptions) -> Result<Vec<ComparisonResult>> {
    let mut source = load_catalog(options.dialect, &options.source, AdapterConfig::default())?;
    let models = discover_all(&mut source)?;
    let mut target = load_catalog(options.dialect, &options.target, AdapterConfig::default())?;
    Ok(target.compare_schema(&models, &options.policy)?)
}

/// Script bringing the target files' schema in line with the source files,
/// compared under the table preset.
pub fn migrate_schemas(source: &[PathBuf], target: &[PathBuf], dialect: DialectKind) -> Result<String> {
    let mut source_adapter = load_catalog(dialect, source, AdapterConfig::default())?;
    let mut sources = Vec::new();
    for name in source_adapter.list_tables(TableKind::Table)? {
        if let Some(table) = source_adapter.discover_table(&name, false)? {
            sources.push(table);
        }
    }

    let mut target_adapter = load_catalog(dialect, target, AdapterConfig::default())?;
    let results = target_adapter.compare_schema(&sources, &ComparisonPolicy::table())?;

    let mut scripts = Vec::new();
    for (table, result) in sources.iter().zip(&results) {
        let sql = migration::generate_migration_sql(target_adapter.dialect(), table, result)?;
        if !sql.is_empty() {
            scripts.push(sql);
        }
    }

    let mut out = scripts.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}
