//! SAP HANA

use once_cell::sync::Lazy;
use regex::Regex;

use super::type_map::{TypeCodeRule, TypeMapping};
use super::{AlterAddStyle, Dialect, DialectKind, IdentifierCase, QUALIFIED_NAME};
use crate::model::{DataType, TypeCode};

static TYPE_CODES: &[TypeCodeRule] = &[
    TypeCodeRule::code(TypeCode::BOOLEAN, DataType::Boolean),
    TypeCodeRule::code(TypeCode::TINYINT, DataType::Integer),
    TypeCodeRule::code(TypeCode::SMALLINT, DataType::Integer),
    TypeCodeRule::code(TypeCode::INTEGER, DataType::Integer),
    TypeCodeRule::code(TypeCode::BIGINT, DataType::Long),
    TypeCodeRule::code(TypeCode::DECIMAL, DataType::Numeric),
    TypeCodeRule::code(TypeCode::NUMERIC, DataType::Numeric),
    TypeCodeRule::code(TypeCode::REAL, DataType::Float),
    TypeCodeRule::code(TypeCode::FLOAT, DataType::Double),
    TypeCodeRule::code(TypeCode::DOUBLE, DataType::Double),
    TypeCodeRule::code(TypeCode::VARCHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::CHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::NVARCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::NCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::DATE, DataType::Date),
    TypeCodeRule::code(TypeCode::TIME, DataType::Time),
    TypeCodeRule::code(TypeCode::TIMESTAMP, DataType::Timestamp),
    TypeCodeRule::code(TypeCode::BLOB, DataType::Blob),
    TypeCodeRule::code(TypeCode::VARBINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::CLOB, DataType::Clob),
    TypeCodeRule::code(TypeCode::LONGVARCHAR, DataType::Clob),
    TypeCodeRule::code(TypeCode::NCLOB, DataType::Nclob),
    TypeCodeRule::code(TypeCode::LONGNVARCHAR, DataType::Nclob),
];

// HANA timestamps carry no zone and JSON documents live in NCLOB.
static TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping::fixed(DataType::Boolean, "BOOLEAN"),
    TypeMapping::sized_or(DataType::Varchar, "VARCHAR", 5000, "CLOB"),
    TypeMapping::sized_or(DataType::Nvarchar, "NVARCHAR", 5000, "NCLOB"),
    TypeMapping::fixed(DataType::Integer, "INTEGER"),
    TypeMapping::fixed(DataType::Long, "BIGINT"),
    TypeMapping::precision(DataType::Numeric, "DECIMAL", 38),
    TypeMapping::fixed(DataType::Float, "REAL"),
    TypeMapping::fixed(DataType::Double, "DOUBLE"),
    TypeMapping::fixed(DataType::Timestamp, "TIMESTAMP"),
    TypeMapping::fixed(DataType::TimestampZ, "TIMESTAMP"),
    TypeMapping::fixed(DataType::Date, "DATE"),
    TypeMapping::fixed(DataType::Time, "TIME"),
    TypeMapping::fixed(DataType::Blob, "BLOB"),
    TypeMapping::fixed(DataType::Clob, "CLOB"),
    TypeMapping::fixed(DataType::Nclob, "NCLOB"),
    TypeMapping::fixed(DataType::Json, "NCLOB"),
];

static VIEW_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+VIEW\s+{}\s*(?:\([^)]*\)\s*)?AS\s+",
        QUALIFIED_NAME
    ))
    .unwrap()
});

pub struct HanaDialect;

impl Dialect for HanaDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Hana
    }

    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Upper
    }

    fn type_code_rules(&self) -> &'static [TypeCodeRule] {
        TYPE_CODES
    }

    fn type_mappings(&self) -> &'static [TypeMapping] {
        TYPE_MAPPINGS
    }

    fn alter_add_style(&self) -> AlterAddStyle {
        AlterAddStyle::Parenthesized
    }

    fn view_definition_query(&self) -> &'static str {
        "SELECT DEFINITION FROM SYS.VIEWS WHERE VIEW_NAME = ?"
    }

    fn view_preamble(&self) -> &'static Regex {
        &VIEW_PREAMBLE
    }

    fn supports_comments(&self) -> bool {
        true
    }

    fn unsized_varchar_length(&self) -> u32 {
        1
    }
}
