//! In-memory catalog executing DDL
//!
//! [`MemoryCatalog`] keeps a single-schema table/view store and answers the
//! [`CatalogConnection`] metadata calls the way a JDBC-style driver would:
//! native types are reported as driver type codes plus a base type name,
//! with length/precision and scale split out. DDL is parsed with
//! `sqlparser`'s generic dialect; the supported statements are CREATE
//! TABLE, CREATE VIEW over a single table, DROP TABLE/VIEW, COMMENT ON
//! TABLE/COLUMN and ALTER TABLE ADD COLUMN.

use std::borrow::Cow;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sqlparser::ast::{
    AlterTableOperation, ColumnDef, ColumnOption, CommentObject, CreateTable, Expr, Ident,
    ObjectName, ObjectType, Query, SelectItem, SetExpr, Statement, TableConstraint, TableFactor,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::trace;

use super::native::{native_type_info, NativeTypeInfo, MAX_LENGTH};
use super::{like_matches, CatalogColumn, CatalogConnection, CatalogPrimaryKey, CatalogTable};
use crate::dialect::{Dialect, IdentifierCase};
use crate::error::DriverError;
use crate::model::{TableKind, TypeCode};

/// `(MAX)` length specifiers, which the generic parser rejects for binary types
static MAX_SENTINEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(\s*MAX\s*\)").unwrap());

/// String literals (kept) and `[bracketed]` identifiers (rewritten to
/// double quotes, which the generic parser understands)
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:[^']|'')*'|\[((?:[^\]]|\]\])*)\]").unwrap());

fn unbracket(sql: &str) -> Cow<'_, str> {
    BRACKETED.replace_all(sql, |caps: &Captures<'_>| match caps.get(1) {
        Some(ident) => format!("\"{}\"", ident.as_str().replace("]]", "]").replace('"', "\"\"")),
        None => caps[0].to_string(),
    })
}

#[derive(Debug, Clone)]
struct StoredColumn {
    name: String,
    info: NativeTypeInfo,
    nullable: bool,
    remark: Option<String>,
    default_value: Option<String>,
    key_seq: Option<u32>,
}

#[derive(Debug, Clone)]
struct StoredTable {
    name: String,
    kind: TableKind,
    remark: Option<String>,
    columns: Vec<StoredColumn>,
    /// Full `CREATE VIEW` text for views
    definition: Option<String>,
}

/// A [`CatalogConnection`] over an in-memory store.
///
/// Unquoted identifiers fold per the configured [`IdentifierCase`]; quoted
/// and bracketed identifiers keep their case. Schema arguments are ignored.
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    case: IdentifierCase,
    /// Length reported for VARCHAR/NVARCHAR declared without one
    unsized_varchar_length: u32,
    tables: IndexMap<String, StoredTable>,
}

impl MemoryCatalog {
    pub fn new(case: IdentifierCase) -> Self {
        Self {
            case,
            unsized_varchar_length: 0,
            tables: IndexMap::new(),
        }
    }

    /// A catalog folding names and sizing unsized columns like `dialect`'s
    /// engine
    pub fn emulating(dialect: &dyn Dialect) -> Self {
        Self {
            unsized_varchar_length: dialect.unsized_varchar_length(),
            ..Self::new(dialect.identifier_case())
        }
    }

    /// Create a catalog and run a DDL script against it
    pub fn with_ddl(case: IdentifierCase, sql: &str) -> Result<Self, DriverError> {
        let mut catalog = Self::new(case);
        catalog.execute(sql)?;
        Ok(catalog)
    }

    pub fn identifier_case(&self) -> IdentifierCase {
        self.case
    }

    /// Stored names in creation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.values().map(|t| t.name.as_str())
    }

    fn ident(&self, ident: &Ident) -> String {
        if ident.quote_style.is_some() {
            ident.value.clone()
        } else {
            self.case.fold(&ident.value)
        }
    }

    /// Folded last part of a possibly qualified name
    fn object_name(&self, name: &ObjectName) -> Result<String, DriverError> {
        name.0
            .last()
            .map(|i| self.ident(i))
            .ok_or_else(|| DriverError::new("empty object name"))
    }

    fn apply(&mut self, statement: Statement) -> Result<(), DriverError> {
        let text = statement.to_string();
        trace!(statement = %text, "memory catalog");
        match statement {
            Statement::CreateTable(create) => self.create_table(create),
            Statement::CreateView {
                or_replace,
                name,
                columns,
                query,
                if_not_exists,
                ..
            } => {
                let name = self.object_name(&name)?;
                if self.tables.contains_key(&name) {
                    if if_not_exists {
                        return Ok(());
                    }
                    if !or_replace {
                        return Err(DriverError::new(format!("object {} already exists", name)));
                    }
                }
                let aliases: Vec<String> = columns.iter().map(|c| self.ident(&c.name)).collect();
                let mut view_columns = self.project(&query)?;
                if !aliases.is_empty() {
                    if aliases.len() != view_columns.len() {
                        return Err(DriverError::new(format!(
                            "view {} names {} columns but selects {}",
                            name,
                            aliases.len(),
                            view_columns.len()
                        )));
                    }
                    for (col, alias) in view_columns.iter_mut().zip(aliases) {
                        col.name = alias;
                    }
                }
                self.tables.insert(
                    name.clone(),
                    StoredTable {
                        name,
                        kind: TableKind::View,
                        remark: None,
                        columns: view_columns,
                        definition: Some(text),
                    },
                );
                Ok(())
            }
            Statement::Drop {
                object_type,
                if_exists,
                names,
                ..
            } => {
                let kind = match object_type {
                    ObjectType::Table => TableKind::Table,
                    ObjectType::View => TableKind::View,
                    other => {
                        return Err(DriverError::new(format!("unsupported DROP {}", other)))
                    }
                };
                for name in &names {
                    let name = self.object_name(name)?;
                    match self.tables.get(&name) {
                        Some(t) if t.kind == kind => {
                            self.tables.shift_remove(&name);
                        }
                        Some(_) => {
                            return Err(DriverError::new(format!(
                                "{} is not a {}",
                                name,
                                kind.as_str().to_lowercase()
                            )))
                        }
                        None if if_exists => {}
                        None => {
                            return Err(DriverError::new(format!("{} does not exist", name)))
                        }
                    }
                }
                Ok(())
            }
            Statement::Comment {
                object_type,
                object_name,
                comment,
                ..
            } => self.comment(object_type, &object_name, comment),
            Statement::AlterTable {
                name, operations, ..
            } => {
                let name = self.object_name(&name)?;
                for operation in operations {
                    match operation {
                        AlterTableOperation::AddColumn {
                            column_def,
                            if_not_exists,
                            ..
                        } => {
                            let column = self.column(column_def);
                            let table = self.table_mut(&name, TableKind::Table)?;
                            if table.columns.iter().any(|c| c.name == column.name) {
                                if if_not_exists {
                                    continue;
                                }
                                return Err(DriverError::new(format!(
                                    "column {} already exists in {}",
                                    column.name, name
                                )));
                            }
                            table.columns.push(column);
                        }
                        other => {
                            return Err(DriverError::new(format!(
                                "unsupported ALTER TABLE operation: {}",
                                other
                            )))
                        }
                    }
                }
                Ok(())
            }
            _ => Err(DriverError::new("unsupported statement")),
        }
    }

    fn table_mut(&mut self, name: &str, kind: TableKind) -> Result<&mut StoredTable, DriverError> {
        match self.tables.get_mut(name) {
            Some(t) if t.kind == kind => Ok(t),
            _ => Err(DriverError::new(format!(
                "{} {} does not exist",
                kind.as_str().to_lowercase(),
                name
            ))),
        }
    }

    fn column(&self, def: ColumnDef) -> StoredColumn {
        let mut info = native_type_info(&def.data_type.to_string());
        if info.size == 0 && matches!(info.code, TypeCode::VARCHAR | TypeCode::NVARCHAR) {
            info.size = self.unsized_varchar_length;
        }
        let mut column = StoredColumn {
            name: self.ident(&def.name),
            info,
            nullable: true,
            remark: None,
            default_value: None,
            key_seq: None,
        };
        for option in def.options {
            match option.option {
                ColumnOption::NotNull => column.nullable = false,
                ColumnOption::Null => column.nullable = true,
                ColumnOption::Default(expr) => column.default_value = Some(expr.to_string()),
                ColumnOption::Comment(text) => column.remark = Some(text),
                ColumnOption::Unique {
                    is_primary: true, ..
                } => {
                    column.key_seq = Some(1);
                    column.nullable = false;
                }
                _ => {}
            }
        }
        column
    }

    fn create_table(&mut self, create: CreateTable) -> Result<(), DriverError> {
        let name = self.object_name(&create.name)?;
        if self.tables.contains_key(&name) {
            if create.if_not_exists {
                return Ok(());
            }
            return Err(DriverError::new(format!("object {} already exists", name)));
        }

        let mut columns: Vec<StoredColumn> = Vec::with_capacity(create.columns.len());
        for def in create.columns {
            let column = self.column(def);
            if columns.iter().any(|c| c.name == column.name) {
                return Err(DriverError::new(format!(
                    "duplicate column {} in {}",
                    column.name, name
                )));
            }
            columns.push(column);
        }

        for constraint in &create.constraints {
            if let TableConstraint::PrimaryKey {
                columns: key_columns,
                ..
            } = constraint
            {
                for (seq, key) in key_columns.iter().enumerate() {
                    let key = self.ident(key);
                    let column = columns
                        .iter_mut()
                        .find(|c| c.name == key)
                        .ok_or_else(|| {
                            DriverError::new(format!("primary key column {} not in {}", key, name))
                        })?;
                    column.key_seq = Some(seq as u32 + 1);
                    column.nullable = false;
                }
            }
        }

        self.tables.insert(
            name.clone(),
            StoredTable {
                name,
                kind: TableKind::Table,
                remark: None,
                columns,
                definition: None,
            },
        );
        Ok(())
    }

    /// Columns selected by a single-table view query
    fn project(&self, query: &Query) -> Result<Vec<StoredColumn>, DriverError> {
        let unsupported = || DriverError::new("view query must select columns from one table");
        let SetExpr::Select(select) = query.body.as_ref() else {
            return Err(unsupported());
        };
        let [from] = select.from.as_slice() else {
            return Err(unsupported());
        };
        if !from.joins.is_empty() {
            return Err(unsupported());
        }
        let TableFactor::Table { name, .. } = &from.relation else {
            return Err(unsupported());
        };
        let source_name = self.object_name(name)?;
        let source = self
            .tables
            .get(&source_name)
            .ok_or_else(|| DriverError::new(format!("{} does not exist", source_name)))?;

        let lookup = |expr: &Expr| -> Result<StoredColumn, DriverError> {
            let ident = match expr {
                Expr::Identifier(ident) => ident,
                Expr::CompoundIdentifier(parts) => parts.last().ok_or_else(unsupported)?,
                _ => return Err(unsupported()),
            };
            let wanted = self.ident(ident);
            source
                .columns
                .iter()
                .find(|c| c.name == wanted)
                .map(|c| StoredColumn {
                    key_seq: None,
                    ..c.clone()
                })
                .ok_or_else(|| DriverError::new(format!("{} has no column {}", source_name, wanted)))
        };

        let mut columns = Vec::new();
        for item in &select.projection {
            match item {
                SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => {
                    columns.extend(source.columns.iter().map(|c| StoredColumn {
                        key_seq: None,
                        ..c.clone()
                    }))
                }
                SelectItem::UnnamedExpr(expr) => columns.push(lookup(expr)?),
                SelectItem::ExprWithAlias { expr, alias } => {
                    let mut column = lookup(expr)?;
                    column.name = self.ident(alias);
                    columns.push(column);
                }
            }
        }
        Ok(columns)
    }

    fn comment(
        &mut self,
        object_type: CommentObject,
        object_name: &ObjectName,
        comment: Option<String>,
    ) -> Result<(), DriverError> {
        match object_type {
            CommentObject::Table => {
                let name = self.object_name(object_name)?;
                let table = self
                    .tables
                    .get_mut(&name)
                    .ok_or_else(|| DriverError::new(format!("{} does not exist", name)))?;
                table.remark = comment;
                Ok(())
            }
            CommentObject::Column => {
                let parts: Vec<String> = object_name.0.iter().map(|i| self.ident(i)).collect();
                let [.., table_name, column_name] = parts.as_slice() else {
                    return Err(DriverError::new("COMMENT ON COLUMN needs table.column"));
                };
                let column = self
                    .tables
                    .get_mut(table_name)
                    .and_then(|t| t.columns.iter_mut().find(|c| &c.name == column_name))
                    .ok_or_else(|| {
                        DriverError::new(format!("column {}.{} does not exist", table_name, column_name))
                    })?;
                column.remark = comment;
                Ok(())
            }
            other => Err(DriverError::new(format!("unsupported COMMENT ON {}", other))),
        }
    }
}

impl CatalogConnection for MemoryCatalog {
    fn tables(
        &mut self,
        _schema: Option<&str>,
        pattern: &str,
        kinds: &[TableKind],
    ) -> Result<Vec<CatalogTable>, DriverError> {
        Ok(self
            .tables
            .values()
            .filter(|t| kinds.contains(&t.kind) && like_matches(pattern, &t.name))
            .map(|t| CatalogTable {
                name: t.name.clone(),
                kind: t.kind,
                remark: t.remark.clone(),
            })
            .collect())
    }

    fn columns(
        &mut self,
        _schema: Option<&str>,
        table_pattern: &str,
    ) -> Result<Vec<CatalogColumn>, DriverError> {
        let mut rows = Vec::new();
        for table in self
            .tables
            .values()
            .filter(|t| like_matches(table_pattern, &t.name))
        {
            for (i, column) in table.columns.iter().enumerate() {
                rows.push(CatalogColumn {
                    table_name: table.name.clone(),
                    name: column.name.clone(),
                    type_code: column.info.code,
                    type_name: column.info.name.clone(),
                    size: column.info.size,
                    decimal_digits: column.info.decimal_digits,
                    nullable: column.nullable,
                    remark: column.remark.clone(),
                    default_value: column.default_value.clone(),
                    ordinal: i as u32 + 1,
                });
            }
        }
        Ok(rows)
    }

    fn primary_keys(
        &mut self,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<CatalogPrimaryKey>, DriverError> {
        let mut rows: Vec<CatalogPrimaryKey> = self
            .tables
            .values()
            .filter(|t| t.kind == TableKind::Table && like_matches(table, &t.name))
            .flat_map(|t| {
                t.columns.iter().filter_map(move |c| {
                    c.key_seq.map(|key_seq| CatalogPrimaryKey {
                        table_name: t.name.clone(),
                        column_name: c.name.clone(),
                        key_seq,
                    })
                })
            })
            .collect();
        rows.sort_by_key(|r| r.key_seq);
        Ok(rows)
    }

    /// Any single-value query is answered with the stored definition of the
    /// view named by the last parameter.
    fn query_text(&mut self, sql: &str, params: &[&str]) -> Result<Option<String>, DriverError> {
        trace!(sql, ?params, "memory catalog lookup");
        let Some(name) = params.last() else {
            return Err(DriverError::new("view lookup needs a name parameter").with_sql(sql));
        };
        Ok(self
            .tables
            .get(*name)
            .and_then(|t| t.definition.clone()))
    }

    fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
        let prepared = unbracket(sql);
        let prepared = MAX_SENTINEL.replace_all(&prepared, format!("({})", MAX_LENGTH).as_str());
        let statements = Parser::parse_sql(&GenericDialect {}, &prepared)
            .map_err(|e| DriverError::new(e.to_string()).with_sql(sql))?;
        let count = statements.len() as u64;
        for statement in statements {
            self.apply(statement).map_err(|e| match e.sql {
                Some(_) => e,
                None => e.with_sql(sql),
            })?;
        }
        Ok(count)
    }
}
