//! Dialect adapter over a catalog connection
//!
//! [`SchemaAdapter`] pairs one open [`CatalogConnection`] with one
//! [`Dialect`]: it discovers [`TableModel`]s from the catalog, renders DDL in
//! the dialect and executes scripts. It owns the connection and is meant to
//! be used for one unit of work from one thread.

use std::collections::HashSet;

use tracing::{debug, debug_span, info};

use crate::catalog::CatalogConnection;
use crate::compare::{compare_tables, ComparisonPolicy, ComparisonResult};
use crate::dialect::Dialect;
use crate::error::{DriverError, Result, SchemaError};
use crate::model::{ColumnModel, TableKind, TableModel};

/// Adapter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Schema to introspect; `None` uses the connection default
    pub schema: Option<String>,
    /// Emit `COMMENT ON` statements for remarks where the dialect has them
    pub emit_comments: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            schema: None,
            emit_comments: true,
        }
    }
}

impl AdapterConfig {
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_comments(mut self, emit_comments: bool) -> Self {
        self.emit_comments = emit_comments;
        self
    }
}

/// Discovery and DDL rendering for one connection in one dialect
pub struct SchemaAdapter<C> {
    conn: C,
    dialect: Box<dyn Dialect>,
    config: AdapterConfig,
}

impl<C: CatalogConnection> SchemaAdapter<C> {
    pub fn new(conn: C, dialect: Box<dyn Dialect>, config: AdapterConfig) -> Self {
        Self {
            conn,
            dialect,
            config,
        }
    }

    /// Open a connection through `factory` and wrap it
    pub fn connect<F>(factory: F, dialect: Box<dyn Dialect>, config: AdapterConfig) -> Result<Self>
    where
        F: FnOnce(&AdapterConfig) -> std::result::Result<C, DriverError>,
    {
        let conn = factory(&config)?;
        info!(dialect = dialect.name(), schema = ?config.schema, "connected");
        Ok(Self::new(conn, dialect, config))
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_connection(self) -> C {
        self.conn
    }

    /// Columns of a table or view in catalog order, mapped to canonical
    /// types.
    ///
    /// With `first_column_as_pk_fallback`, a table without a declared
    /// primary key gets its first column as the key. Returns an empty list
    /// when the table does not exist.
    pub fn discover_columns(
        &mut self,
        table_name: &str,
        first_column_as_pk_fallback: bool,
    ) -> Result<Vec<ColumnModel>> {
        let name = self.dialect.catalog_name(table_name);
        let schema = self.config.schema.as_deref();
        let span = debug_span!(
            "catalog.columns",
            table = %name,
            columns = tracing::field::Empty
        );
        let _enter = span.enter();

        let mut keys: Vec<_> = self
            .conn
            .primary_keys(schema, &name)?
            .into_iter()
            .filter(|k| k.table_name == name)
            .collect();
        keys.sort_by_key(|k| k.key_seq);
        let pk_names: HashSet<String> = keys.into_iter().map(|k| k.column_name).collect();

        let mut rows: Vec<_> = self
            .conn
            .columns(schema, &name)?
            .into_iter()
            .filter(|c| c.table_name == name)
            .collect();
        rows.sort_by_key(|c| c.ordinal);

        let mut columns: Vec<ColumnModel> = rows
            .into_iter()
            .map(|row| {
                let data_type = self.dialect.data_type_for(row.type_code, &row.type_name);
                let column = ColumnModel::builder(row.name.as_str(), data_type)
                    .set_pk(pk_names.contains(&row.name))
                    .size(row.size)
                    .decimal_digits(row.decimal_digits)
                    .nullable(row.nullable)
                    .remark(row.remark)
                    .default_value(row.default_value)
                    .type_info(row.type_code, row.type_name)
                    .build();
                self.dialect.refine_discovered(column)
            })
            .collect();

        if pk_names.is_empty() && first_column_as_pk_fallback {
            if let Some(first) = columns.first_mut() {
                debug!(column = first.name(), "no primary key, using first column");
                *first = first.rebuild().pk().build();
            }
        }

        span.record("columns", columns.len());
        Ok(columns)
    }

    /// A base table, or `None` when absent or column-less
    pub fn discover_table(
        &mut self,
        name: &str,
        first_column_as_pk_fallback: bool,
    ) -> Result<Option<TableModel>> {
        self.discover(name, TableKind::Table, first_column_as_pk_fallback)
    }

    /// A view, or `None` when absent
    pub fn discover_view(&mut self, name: &str) -> Result<Option<TableModel>> {
        self.discover(name, TableKind::View, false)
    }

    fn discover(
        &mut self,
        name: &str,
        kind: TableKind,
        first_column_as_pk_fallback: bool,
    ) -> Result<Option<TableModel>> {
        let stored = self.dialect.catalog_name(name);
        let schema = self.config.schema.as_deref();
        let Some(entry) = self
            .conn
            .tables(schema, &stored, &[kind])?
            .into_iter()
            .find(|t| t.name == stored)
        else {
            debug!(name = %stored, kind = kind.as_str(), "not found in catalog");
            return Ok(None);
        };

        let columns = self.discover_columns(&stored, first_column_as_pk_fallback)?;
        if columns.is_empty() {
            debug!(name = %stored, "no columns, treating as not found");
            return Ok(None);
        }
        let table = TableModel::new(entry.name, kind, columns)
            .map_err(|err| match err {
                SchemaError::DuplicateColumn { table, column } => {
                    SchemaError::Driver(DriverError::new(format!(
                        "{} has columns that differ only in case: {}",
                        table, column
                    )))
                }
                other => other,
            })?
            .with_remark(entry.remark);
        Ok(Some(table))
    }

    pub fn table_exists(&mut self, name: &str) -> Result<bool> {
        let stored = self.dialect.catalog_name(name);
        let schema = self.config.schema.as_deref();
        Ok(self
            .conn
            .tables(schema, &stored, &[TableKind::Table])?
            .iter()
            .any(|t| t.name == stored))
    }

    /// Names of every table (or view) in the schema, in catalog order
    pub fn list_tables(&mut self, kind: TableKind) -> Result<Vec<String>> {
        let schema = self.config.schema.as_deref();
        let _enter = debug_span!("catalog.tables", kind = kind.as_str()).entered();
        Ok(self
            .conn
            .tables(schema, "%", &[kind])?
            .into_iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.name)
            .collect())
    }

    /// Compare each source model against its counterpart in this catalog
    pub fn compare_schema(
        &mut self,
        sources: &[TableModel],
        policy: &ComparisonPolicy,
    ) -> Result<Vec<ComparisonResult>> {
        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            let target = match source.kind() {
                TableKind::Table => self.discover_table(source.name(), false)?,
                TableKind::View => self.discover_view(source.name())?,
            };
            results.push(compare_tables(source, target.as_ref(), policy));
        }
        let failed = results.iter().filter(|r| !r.passed()).count();
        info!(tables = results.len(), failed, "schema compared");
        Ok(results)
    }

    pub fn generate_create_table_sql(&self, table: &TableModel) -> Result<String> {
        self.dialect
            .generate_create_table_sql(table, self.config.emit_comments)
    }

    pub fn generate_alter_table_sql(&self, table_name: &str, added: &[ColumnModel]) -> Result<String> {
        self.dialect.generate_alter_table_sql(table_name, added)
    }

    pub fn generate_create_view_sql(&self, view_name: &str, body: &str) -> String {
        self.dialect.generate_create_view_sql(view_name, body)
    }

    pub fn generate_drop_table_sql(&self, table_name: &str) -> String {
        self.dialect.generate_drop_table_sql(table_name)
    }

    pub fn generate_drop_view_sql(&self, view_name: &str) -> String {
        self.dialect.generate_drop_view_sql(view_name)
    }

    /// The reusable body of a stored view, without this dialect's
    /// `CREATE VIEW ... AS` preamble. `None` when the view does not exist.
    pub fn select_view_script(&mut self, view_name: &str) -> Result<Option<String>> {
        let name = self.dialect.catalog_name(view_name);
        let sql = self.dialect.view_definition_query();
        let _enter = debug_span!("catalog.view_definition", view = %name).entered();
        let definition = self.conn.query_text(sql, &[name.as_str()])?;
        Ok(definition
            .map(|d| self.dialect.strip_view_preamble(&d).to_string())
            .filter(|body| !body.is_empty()))
    }

    /// Execute a generated script. An empty script is a no-op.
    pub fn apply(&mut self, sql: &str) -> Result<u64> {
        if sql.trim().is_empty() {
            return Ok(0);
        }
        let span = debug_span!(
            "db.execute",
            sql = %sql,
            statements = tracing::field::Empty
        );
        let _enter = span.enter();
        let executed = self.conn.execute(sql)?;
        span.record("statements", executed);
        info!(statements = executed, "script applied");
        Ok(executed)
    }
}
