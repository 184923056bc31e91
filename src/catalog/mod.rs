//! Catalog introspection surface
//!
//! [`CatalogConnection`] is the generic metadata interface a database driver
//! exposes: list tables/views, list columns, list primary keys, run a
//! single-value lookup and execute DDL. Name arguments are LIKE patterns
//! evaluated by the server; they may over-select (`_` matches any character,
//! and some drivers prefix-match), so callers re-filter rows by exact name.

pub mod memory;
mod native;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::error::DriverError;
use crate::model::{TableKind, TypeCode};

pub use memory::MemoryCatalog;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCatalog;

/// A table or view row from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
    pub name: String,
    pub kind: TableKind,
    pub remark: Option<String>,
}

/// A column row from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub table_name: String,
    pub name: String,
    pub type_code: TypeCode,
    pub type_name: String,
    pub size: u32,
    pub decimal_digits: u32,
    pub nullable: bool,
    pub remark: Option<String>,
    pub default_value: Option<String>,
    /// 1-based position within the table
    pub ordinal: u32,
}

/// A primary-key row from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPrimaryKey {
    pub table_name: String,
    pub column_name: String,
    /// 1-based position within the key
    pub key_seq: u32,
}

/// The driver-level metadata and execution interface.
///
/// Implementations wrap one open connection and are not expected to be
/// shared between threads.
pub trait CatalogConnection {
    /// Tables and/or views whose names match `pattern`
    fn tables(
        &mut self,
        schema: Option<&str>,
        pattern: &str,
        kinds: &[TableKind],
    ) -> Result<Vec<CatalogTable>, DriverError>;

    /// Columns of every table whose name matches `table_pattern`, in
    /// catalog order
    fn columns(
        &mut self,
        schema: Option<&str>,
        table_pattern: &str,
    ) -> Result<Vec<CatalogColumn>, DriverError>;

    /// Primary-key columns of one table
    fn primary_keys(
        &mut self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<CatalogPrimaryKey>, DriverError>;

    /// Run a query returning the first column of the first row, if any
    fn query_text(&mut self, sql: &str, params: &[&str]) -> Result<Option<String>, DriverError>;

    /// Execute one or more statements, returning the number executed
    fn execute(&mut self, sql: &str) -> Result<u64, DriverError>;
}

/// SQL LIKE matching with `%` and `_` wildcards, case-insensitive.
pub fn like_matches(pattern: &str, value: &str) -> bool {
    fn matches(p: &[char], v: &[char]) -> bool {
        match p.split_first() {
            None => v.is_empty(),
            Some(('%', rest)) => (0..=v.len()).any(|i| matches(rest, &v[i..])),
            Some(('_', rest)) => !v.is_empty() && matches(rest, &v[1..]),
            Some((c, rest)) => v
                .first()
                .is_some_and(|x| x.eq_ignore_ascii_case(c) && matches(rest, &v[1..])),
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let v: Vec<char> = value.chars().collect();
    matches(&p, &v)
}
