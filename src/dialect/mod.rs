//! Per-engine translation between the canonical model and native DDL
//!
//! A [`Dialect`] is pure: it owns the engine's data tables (driver type code
//! → canonical type, canonical type → native syntax), its identifier folding
//! and quoting and its statement shapes. Catalog access lives in
//! [`SchemaAdapter`](crate::adapter::SchemaAdapter).
//!
//! Names in the model are spelled as the source catalog stores them. A name
//! in a single case made of letters, digits and underscores is written
//! unquoted and folds to the target engine's case, so `ORDERS` from Oracle
//! becomes `orders` in PostgreSQL. Mixed-case names and names that need
//! quoting keep their exact spelling, and reserved words are quoted after
//! folding.

pub mod defaults;
mod hana;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;
pub mod type_map;

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::model::{ColumnModel, DataType, TableModel, TypeCode};

use defaults::DefaultValue;

pub use hana::HanaDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;
pub use type_map::{NativeType, TypeCodeRule, TypeMapping};

/// Which way an engine folds unquoted identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    Upper,
    Lower,
}

impl IdentifierCase {
    pub fn fold(&self, ident: &str) -> String {
        match self {
            IdentifierCase::Upper => ident.to_uppercase(),
            IdentifierCase::Lower => ident.to_lowercase(),
        }
    }
}

/// Shape of `ALTER TABLE ... ADD` for several columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterAddStyle {
    /// `ALTER TABLE t ADD (a INT, b INT)`
    Parenthesized,
    /// `ALTER TABLE t ADD COLUMN a INT, ADD COLUMN b INT`
    AddColumnEach,
    /// `ALTER TABLE t ADD a INT, b INT`
    AddList,
    /// One `ALTER TABLE t ADD COLUMN a INT` statement per column
    StatementPerColumn,
}

/// The supported engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Oracle,
    Postgres,
    Hana,
    Sqlite,
    SqlServer,
}

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Oracle,
        DialectKind::Postgres,
        DialectKind::Hana,
        DialectKind::Sqlite,
        DialectKind::SqlServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DialectKind::Oracle => "oracle",
            DialectKind::Postgres => "postgres",
            DialectKind::Hana => "hana",
            DialectKind::Sqlite => "sqlite",
            DialectKind::SqlServer => "sqlserver",
        }
    }

    /// Construct the dialect implementation
    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            DialectKind::Oracle => Box::new(OracleDialect),
            DialectKind::Postgres => Box::new(PostgresDialect),
            DialectKind::Hana => Box::new(HanaDialect),
            DialectKind::Sqlite => Box::new(SqliteDialect),
            DialectKind::SqlServer => Box::new(SqlServerDialect),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oracle" => Ok(DialectKind::Oracle),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            "hana" | "saphana" | "sap-hana" => Ok(DialectKind::Hana),
            "sqlite" => Ok(DialectKind::Sqlite),
            "sqlserver" | "mssql" | "sql-server" => Ok(DialectKind::SqlServer),
            _ => Err(SchemaError::UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}

static PLAIN_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Words reserved by at least one supported engine
const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "BY", "CHECK", "COLUMN", "CONSTRAINT", "CREATE", "DEFAULT", "DELETE",
    "DISTINCT", "DROP", "FROM", "GRANT", "GROUP", "HAVING", "IN", "INSERT", "INTO", "IS", "JOIN",
    "NOT", "NULL", "ON", "OR", "ORDER", "PRIMARY", "REFERENCES", "SELECT", "TABLE", "TO", "UNION",
    "UNIQUE", "UPDATE", "USER", "VALUES", "VIEW", "WHERE", "WITH",
];

/// Whether a name must be written quoted with its exact spelling
fn keeps_case(name: &str) -> bool {
    !PLAIN_IDENT.is_match(name)
        || (name.bytes().any(|b| b.is_ascii_uppercase())
            && name.bytes().any(|b| b.is_ascii_lowercase()))
}

/// Identifier pattern shared by the view-preamble regexes: bare, quoted or
/// bracketed parts joined by dots.
pub(crate) const QUALIFIED_NAME: &str =
    r#"(?:\[[^\]]+\]|"[^"]+"|[\w$#]+)(?:\s*\.\s*(?:\[[^\]]+\]|"[^"]+"|[\w$#]+))*"#;

/// Engine-specific DDL rendering and discovery tables.
///
/// Implementors supply the data tables and statement shapes; the provided
/// methods build every statement from them.
pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    fn identifier_case(&self) -> IdentifierCase;

    /// Driver type code → canonical type
    fn type_code_rules(&self) -> &'static [TypeCodeRule];

    /// Canonical type → native syntax
    fn type_mappings(&self) -> &'static [TypeMapping];

    fn alter_add_style(&self) -> AlterAddStyle;

    /// Query returning the stored definition of the view named by its
    /// single parameter
    fn view_definition_query(&self) -> &'static str;

    /// Matches this engine's own `CREATE VIEW ... AS` preamble
    fn view_preamble(&self) -> &'static Regex;

    /// Whether `COMMENT ON` statements are available for remarks
    fn supports_comments(&self) -> bool {
        false
    }

    /// Adjust a discovered column for catalog quirks
    fn refine_discovered(&self, column: ColumnModel) -> ColumnModel {
        column
    }

    fn create_view_keyword(&self) -> &'static str {
        "CREATE VIEW"
    }

    /// Whether DROP statements carry `IF EXISTS`
    fn drop_if_exists(&self) -> bool {
        false
    }

    /// Length the engine gives VARCHAR declared without one; zero when such
    /// a column is unbounded
    fn unsized_varchar_length(&self) -> u32 {
        0
    }

    /// A delimited identifier with its exact spelling
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "true"
        } else {
            "false"
        }
    }

    /// Current-time expression for a default on a column of `data_type`
    fn current_time(&self, data_type: DataType) -> &'static str {
        match data_type {
            DataType::Date => "CURRENT_DATE",
            DataType::Time => "CURRENT_TIME",
            _ => "CURRENT_TIMESTAMP",
        }
    }

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Fold an identifier the way the engine folds unquoted names
    fn fold(&self, ident: &str) -> String {
        self.identifier_case().fold(ident)
    }

    /// The name the engine stores for a model name rendered by
    /// [`render_ident`](Dialect::render_ident)
    fn catalog_name(&self, name: &str) -> String {
        if keeps_case(name) {
            name.to_string()
        } else {
            self.fold(name)
        }
    }

    /// A model name as written in generated DDL
    fn render_ident(&self, name: &str) -> String {
        let stored = self.catalog_name(name);
        if keeps_case(name) || RESERVED.contains(&stored.to_ascii_uppercase().as_str()) {
            self.quote_ident(&stored)
        } else {
            stored
        }
    }

    /// The column default in this engine's spelling. Expressions with no
    /// portable meaning are dropped.
    fn render_default(&self, column: &ColumnModel) -> Option<String> {
        let raw = column.default_value()?;
        match defaults::classify(raw, column.data_type()) {
            DefaultValue::Null => None,
            DefaultValue::Boolean(value) => Some(self.boolean_literal(value).to_string()),
            DefaultValue::CurrentTime => Some(self.current_time(column.data_type()).to_string()),
            DefaultValue::Literal(text) => Some(text.to_string()),
            DefaultValue::Expression(text) => {
                warn!(
                    dialect = self.name(),
                    column = column.name(),
                    default = text,
                    "default expression dropped"
                );
                None
            }
        }
    }

    /// Canonical type for a driver-reported code and native name
    fn data_type_for(&self, code: TypeCode, type_name: &str) -> DataType {
        type_map::lookup_data_type(self.type_code_rules(), code, type_name)
    }

    /// Native column type, e.g. `NUMBER(10,2)`
    fn native_type(&self, column: &ColumnModel) -> Result<String> {
        type_map::render_native_type(self.name(), self.type_mappings(), column)
    }

    /// `name type [DEFAULT x] [NOT NULL]`
    fn column_definition(&self, column: &ColumnModel) -> Result<String> {
        let mut def = format!(
            "{} {}",
            self.render_ident(column.name()),
            self.native_type(column)?
        );
        if let Some(default) = self.render_default(column) {
            def.push_str(&format!(" DEFAULT {}", default));
        }
        if !column.is_nullable() {
            def.push_str(" NOT NULL");
        }
        Ok(def)
    }

    /// `CREATE TABLE` with inline nullability and a primary-key constraint,
    /// followed by remark comments when requested and supported.
    fn generate_create_table_sql(&self, table: &TableModel, emit_comments: bool) -> Result<String> {
        let mut parts = table
            .columns()
            .iter()
            .map(|c| Ok(format!("    {}", self.column_definition(c)?)))
            .collect::<Result<Vec<_>>>()?;

        let pk: Vec<String> = table.pk_columns().map(|c| self.render_ident(c.name())).collect();
        if !pk.is_empty() {
            parts.push(format!("    PRIMARY KEY ({})", pk.join(", ")));
        }

        let mut sql = format!(
            "CREATE TABLE {} (\n{}\n);",
            self.render_ident(table.name()),
            parts.join(",\n")
        );

        if emit_comments {
            for comment in self.generate_comment_sql(table) {
                sql.push_str("\n\n");
                sql.push_str(&comment);
            }
        }
        Ok(sql)
    }

    /// `COMMENT ON` statements for the table and column remarks. Empty when
    /// the engine has no comment statement.
    fn generate_comment_sql(&self, table: &TableModel) -> Vec<String> {
        if !self.supports_comments() {
            return Vec::new();
        }
        let table_name = self.render_ident(table.name());
        let object = if table.is_view() { "VIEW" } else { "TABLE" };
        let mut statements = Vec::new();
        if let Some(remark) = table.remark() {
            statements.push(format!(
                "COMMENT ON {} {} IS {};",
                object,
                table_name,
                quote_literal(remark)
            ));
        }
        for column in table.columns() {
            if let Some(remark) = column.remark() {
                statements.push(format!(
                    "COMMENT ON COLUMN {}.{} IS {};",
                    table_name,
                    self.render_ident(column.name()),
                    quote_literal(remark)
                ));
            }
        }
        statements
    }

    /// `ALTER TABLE ... ADD` for new columns only. Altering or dropping
    /// existing columns is never generated.
    fn generate_alter_table_sql(&self, table_name: &str, added: &[ColumnModel]) -> Result<String> {
        if added.is_empty() {
            return Ok(String::new());
        }
        let table_name = self.render_ident(table_name);
        let defs = added
            .iter()
            .map(|c| self.column_definition(c))
            .collect::<Result<Vec<_>>>()?;

        let sql = match self.alter_add_style() {
            AlterAddStyle::Parenthesized => {
                format!("ALTER TABLE {} ADD ({});", table_name, defs.join(", "))
            }
            AlterAddStyle::AddColumnEach => {
                let adds: Vec<String> = defs.iter().map(|d| format!("ADD COLUMN {}", d)).collect();
                format!("ALTER TABLE {} {};", table_name, adds.join(", "))
            }
            AlterAddStyle::AddList => {
                format!("ALTER TABLE {} ADD {};", table_name, defs.join(", "))
            }
            AlterAddStyle::StatementPerColumn => defs
                .iter()
                .map(|d| format!("ALTER TABLE {} ADD COLUMN {};", table_name, d))
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        Ok(sql)
    }

    fn generate_create_view_sql(&self, view_name: &str, body: &str) -> String {
        let body = body.trim().trim_end_matches(';').trim_end();
        format!(
            "{} {} AS\n{};",
            self.create_view_keyword(),
            self.render_ident(view_name),
            body
        )
    }

    fn generate_drop_table_sql(&self, table_name: &str) -> String {
        drop_sql("TABLE", &self.render_ident(table_name), self.drop_if_exists())
    }

    fn generate_drop_view_sql(&self, view_name: &str) -> String {
        drop_sql("VIEW", &self.render_ident(view_name), self.drop_if_exists())
    }

    /// Remove this engine's `CREATE VIEW ... AS` preamble from a stored view
    /// definition, leaving the reusable query body.
    fn strip_view_preamble<'a>(&self, definition: &'a str) -> &'a str {
        let body = match self.view_preamble().find(definition) {
            Some(m) => &definition[m.end()..],
            None => definition,
        };
        body.trim().trim_end_matches(';').trim_end()
    }
}

fn drop_sql(object: &str, name: &str, if_exists: bool) -> String {
    if if_exists {
        format!("DROP {} IF EXISTS {};", object, name)
    } else {
        format!("DROP {} {};", object, name)
    }
}

/// Single-quoted SQL string literal
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
