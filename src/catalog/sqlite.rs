//! SQLite catalog over a live connection
//!
//! [`SqliteCatalog`] answers the metadata calls from `sqlite_master` and
//! `pragma_table_info`. SQLite keeps only the declared type of a column, so
//! types are reported the way the in-memory catalog reports them. SQLite has
//! no comments; remarks are always `None`.

use std::path::Path;

use rusqlite::{params_from_iter, Batch, Connection, OptionalExtension};
use tracing::{debug, trace};

use super::native::native_type_info;
use super::{CatalogColumn, CatalogConnection, CatalogPrimaryKey, CatalogTable};
use crate::error::DriverError;
use crate::model::TableKind;

const TABLES_SQL: &str = r"SELECT name, type FROM sqlite_master
WHERE type IN ('table', 'view') AND name LIKE ?1 AND name NOT LIKE 'sqlite\_%' ESCAPE '\'";

const COLUMNS_SQL: &str =
    r#"SELECT cid, name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#;

impl From<rusqlite::Error> for DriverError {
    fn from(err: rusqlite::Error) -> Self {
        DriverError::new(err.to_string())
    }
}

/// One `pragma_table_info` row
struct PragmaColumn {
    cid: i64,
    name: String,
    declared: String,
    not_null: bool,
    default_value: Option<String>,
    pk: i64,
}

/// A [`CatalogConnection`] over a SQLite database. Schema arguments are
/// ignored; only the `main` database is introspected.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| DriverError::new(format!("cannot open {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "sqlite catalog opened");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, DriverError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn list(&self, pattern: &str, kinds: &[TableKind]) -> Result<Vec<CatalogTable>, DriverError> {
        let mut stmt = self.conn.prepare(TABLES_SQL)?;
        let rows = stmt.query_map([pattern], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut tables = Vec::new();
        for row in rows {
            let (name, kind) = row?;
            let kind = if kind == "view" {
                TableKind::View
            } else {
                TableKind::Table
            };
            if kinds.contains(&kind) {
                tables.push(CatalogTable {
                    name,
                    kind,
                    remark: None,
                });
            }
        }
        Ok(tables)
    }

    fn pragma_columns(&self, table: &str) -> Result<Vec<PragmaColumn>, DriverError> {
        let mut stmt = self.conn.prepare(COLUMNS_SQL)?;
        let rows = stmt.query_map([table], |row| {
            Ok(PragmaColumn {
                cid: row.get(0)?,
                name: row.get(1)?,
                declared: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                pk: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl CatalogConnection for SqliteCatalog {
    fn tables(
        &mut self,
        _schema: Option<&str>,
        pattern: &str,
        kinds: &[TableKind],
    ) -> Result<Vec<CatalogTable>, DriverError> {
        self.list(pattern, kinds)
    }

    fn columns(
        &mut self,
        _schema: Option<&str>,
        table_pattern: &str,
    ) -> Result<Vec<CatalogColumn>, DriverError> {
        let mut columns = Vec::new();
        for table in self.list(table_pattern, &[TableKind::Table, TableKind::View])? {
            for column in self.pragma_columns(&table.name)? {
                let info = native_type_info(&column.declared);
                columns.push(CatalogColumn {
                    table_name: table.name.clone(),
                    name: column.name,
                    type_code: info.code,
                    type_name: info.name,
                    size: info.size,
                    decimal_digits: info.decimal_digits,
                    nullable: !column.not_null && column.pk == 0,
                    remark: None,
                    default_value: column.default_value,
                    ordinal: column.cid as u32 + 1,
                });
            }
        }
        Ok(columns)
    }

    fn primary_keys(
        &mut self,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<CatalogPrimaryKey>, DriverError> {
        let mut keys = Vec::new();
        for entry in self.list(table, &[TableKind::Table])? {
            for column in self.pragma_columns(&entry.name)? {
                if column.pk > 0 {
                    keys.push(CatalogPrimaryKey {
                        table_name: entry.name.clone(),
                        column_name: column.name,
                        key_seq: column.pk as u32,
                    });
                }
            }
        }
        keys.sort_by_key(|k| k.key_seq);
        Ok(keys)
    }

    fn query_text(&mut self, sql: &str, params: &[&str]) -> Result<Option<String>, DriverError> {
        trace!(sql, ?params, "sqlite lookup");
        let value = self
            .conn
            .query_row(sql, params_from_iter(params.iter()), |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()
            .map_err(|e| DriverError::from(e).with_sql(sql))?;
        Ok(value.flatten())
    }

    fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut count = 0;
        while let Some(mut stmt) = batch.next().map_err(|e| DriverError::from(e).with_sql(sql))? {
            stmt.execute([])
                .map_err(|e| DriverError::from(e).with_sql(sql))?;
            count += 1;
        }
        Ok(count)
    }
}
