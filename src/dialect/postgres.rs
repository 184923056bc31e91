//! PostgreSQL

use once_cell::sync::Lazy;
use regex::Regex;

use super::type_map::{TypeCodeRule, TypeMapping};
use super::{AlterAddStyle, Dialect, DialectKind, IdentifierCase, QUALIFIED_NAME};
use crate::model::{DataType, TypeCode};

static TYPE_CODES: &[TypeCodeRule] = &[
    TypeCodeRule::code(TypeCode::BIT, DataType::Boolean),
    TypeCodeRule::code(TypeCode::BOOLEAN, DataType::Boolean),
    TypeCodeRule::code(TypeCode::SMALLINT, DataType::Integer),
    TypeCodeRule::code(TypeCode::INTEGER, DataType::Integer),
    TypeCodeRule::code(TypeCode::BIGINT, DataType::Long),
    TypeCodeRule::code(TypeCode::NUMERIC, DataType::Numeric),
    TypeCodeRule::code(TypeCode::DECIMAL, DataType::Numeric),
    TypeCodeRule::code(TypeCode::REAL, DataType::Float),
    TypeCodeRule::code(TypeCode::FLOAT, DataType::Double),
    TypeCodeRule::code(TypeCode::DOUBLE, DataType::Double),
    TypeCodeRule::code(TypeCode::VARCHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::CHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::NVARCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::LONGVARCHAR, DataType::Clob),
    TypeCodeRule::code(TypeCode::CLOB, DataType::Clob),
    TypeCodeRule::code(TypeCode::DATE, DataType::Date),
    TypeCodeRule::code(TypeCode::TIME, DataType::Time),
    TypeCodeRule::code(TypeCode::TIMESTAMP, DataType::Timestamp),
    // pgjdbc reports timestamptz under the plain TIMESTAMP code
    TypeCodeRule::named(TypeCode::TIMESTAMP, "timestamptz", DataType::TimestampZ),
    TypeCodeRule::code(TypeCode::TIMESTAMP_WITH_TIMEZONE, DataType::TimestampZ),
    TypeCodeRule::code(TypeCode::BINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::VARBINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::BLOB, DataType::Blob),
    TypeCodeRule::named(TypeCode::OTHER, "jsonb", DataType::Json),
    TypeCodeRule::named(TypeCode::OTHER, "json", DataType::Json),
];

// No national character types: NVARCHAR and NCLOB share varchar and text.
static TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping::fixed(DataType::Boolean, "boolean"),
    TypeMapping::sized(DataType::Varchar, "varchar", 10_485_760),
    TypeMapping::sized(DataType::Nvarchar, "varchar", 10_485_760),
    TypeMapping::fixed(DataType::Integer, "integer"),
    TypeMapping::fixed(DataType::Long, "bigint"),
    TypeMapping::precision(DataType::Numeric, "numeric", 1000),
    TypeMapping::fixed(DataType::Float, "real"),
    TypeMapping::fixed(DataType::Double, "double precision"),
    TypeMapping::fixed(DataType::Timestamp, "timestamp"),
    TypeMapping::fixed(DataType::TimestampZ, "timestamp with time zone"),
    TypeMapping::fixed(DataType::Date, "date"),
    TypeMapping::fixed(DataType::Time, "time"),
    TypeMapping::fixed(DataType::Blob, "bytea"),
    TypeMapping::fixed(DataType::Clob, "text"),
    TypeMapping::fixed(DataType::Nclob, "text"),
    TypeMapping::fixed(DataType::Json, "jsonb"),
];

static VIEW_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:TEMP\s+|TEMPORARY\s+)?(?:RECURSIVE\s+)?VIEW\s+{}\s*(?:\([^)]*\)\s*)?(?:WITH\s*\([^)]*\)\s*)?AS\s+",
        QUALIFIED_NAME
    ))
    .unwrap()
});

pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
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

    fn alter_add_style(&self) -> AlterAddStyle {
        AlterAddStyle::AddColumnEach
    }

    fn view_definition_query(&self) -> &'static str {
        "SELECT definition FROM pg_views WHERE viewname = $1"
    }

    fn view_preamble(&self) -> &'static Regex {
        &VIEW_PREAMBLE
    }

    fn supports_comments(&self) -> bool {
        true
    }

    fn create_view_keyword(&self) -> &'static str {
        "CREATE OR REPLACE VIEW"
    }

    fn drop_if_exists(&self) -> bool {
        true
    }
}
