//! SQLite
//!
//! SQLite stores declared types verbatim and applies type affinity, so the
//! rendering table keeps the portable names (`varchar(n)`, `numeric(p,s)`)
//! that round-trip through the catalog.

use once_cell::sync::Lazy;
use regex::Regex;

use super::type_map::{TypeCodeRule, TypeMapping};
use super::{AlterAddStyle, Dialect, DialectKind, IdentifierCase, QUALIFIED_NAME};
use crate::model::{DataType, TypeCode};

static TYPE_CODES: &[TypeCodeRule] = &[
    TypeCodeRule::code(TypeCode::BOOLEAN, DataType::Boolean),
    TypeCodeRule::code(TypeCode::BIT, DataType::Boolean),
    TypeCodeRule::code(TypeCode::TINYINT, DataType::Integer),
    TypeCodeRule::code(TypeCode::SMALLINT, DataType::Integer),
    TypeCodeRule::code(TypeCode::INTEGER, DataType::Integer),
    TypeCodeRule::code(TypeCode::BIGINT, DataType::Long),
    TypeCodeRule::code(TypeCode::NUMERIC, DataType::Numeric),
    TypeCodeRule::code(TypeCode::DECIMAL, DataType::Numeric),
    TypeCodeRule::code(TypeCode::FLOAT, DataType::Float),
    // REAL is an 8-byte float in SQLite
    TypeCodeRule::code(TypeCode::REAL, DataType::Double),
    TypeCodeRule::code(TypeCode::DOUBLE, DataType::Double),
    TypeCodeRule::code(TypeCode::VARCHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::CHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::NVARCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::NCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::LONGVARCHAR, DataType::Clob),
    TypeCodeRule::code(TypeCode::CLOB, DataType::Clob),
    TypeCodeRule::code(TypeCode::NCLOB, DataType::Nclob),
    TypeCodeRule::code(TypeCode::DATE, DataType::Date),
    TypeCodeRule::code(TypeCode::TIME, DataType::Time),
    TypeCodeRule::code(TypeCode::TIMESTAMP, DataType::Timestamp),
    TypeCodeRule::code(TypeCode::TIMESTAMP_WITH_TIMEZONE, DataType::TimestampZ),
    TypeCodeRule::code(TypeCode::BLOB, DataType::Blob),
    TypeCodeRule::code(TypeCode::BINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::VARBINARY, DataType::Blob),
];

// NCLOB and JSON are stored as text
static TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping::fixed(DataType::Boolean, "boolean"),
    TypeMapping::sized(DataType::Varchar, "varchar", u32::MAX),
    TypeMapping::sized(DataType::Nvarchar, "nvarchar", u32::MAX),
    TypeMapping::fixed(DataType::Integer, "integer"),
    TypeMapping::fixed(DataType::Long, "bigint"),
    TypeMapping::precision(DataType::Numeric, "numeric", 38),
    TypeMapping::fixed(DataType::Float, "float"),
    TypeMapping::fixed(DataType::Double, "double"),
    TypeMapping::fixed(DataType::Timestamp, "timestamp"),
    TypeMapping::fixed(DataType::TimestampZ, "timestamp with time zone"),
    TypeMapping::fixed(DataType::Date, "date"),
    TypeMapping::fixed(DataType::Time, "time"),
    TypeMapping::fixed(DataType::Blob, "blob"),
    TypeMapping::fixed(DataType::Clob, "text"),
    TypeMapping::fixed(DataType::Nclob, "text"),
    TypeMapping::fixed(DataType::Json, "text"),
];

static VIEW_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(?:TEMP\s+|TEMPORARY\s+)?VIEW\s+(?:IF\s+NOT\s+EXISTS\s+)?{}\s*(?:\([^)]*\)\s*)?AS\s+",
        QUALIFIED_NAME
    ))
    .unwrap()
});

pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Lower
    }

    fn type_code_rules(&self) -> &'static [TypeCodeRule] {
        TYPE_CODES
    }

    fn type_mappings(&self) -> &'static [TypeMapping] {
        TYPE_MAPPINGS
    }

    /// SQLite adds one column per ALTER TABLE
    fn alter_add_style(&self) -> AlterAddStyle {
        AlterAddStyle::StatementPerColumn
    }

    fn view_definition_query(&self) -> &'static str {
        "SELECT sql FROM sqlite_master WHERE type = 'view' AND name = ?"
    }

    fn view_preamble(&self) -> &'static Regex {
        &VIEW_PREAMBLE
    }

    fn drop_if_exists(&self) -> bool {
        true
    }
}
