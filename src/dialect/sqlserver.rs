//! SQL Server
//!
//! `(MAX)` character and binary types are reported with the 2^31-1 length
//! sentinel; [`refine_discovered`](Dialect::refine_discovered) turns them
//! back into LOB types.

use once_cell::sync::Lazy;
use regex::Regex;

use super::type_map::{TypeCodeRule, TypeMapping};
use super::{AlterAddStyle, Dialect, DialectKind, IdentifierCase, QUALIFIED_NAME};
use crate::model::{ColumnModel, DataType, TypeCode};

/// Length the driver reports for `(MAX)` columns
pub const MAX_LENGTH: u32 = 2_147_483_647;

/// mssql-jdbc code for DATETIMEOFFSET
const DATETIMEOFFSET: TypeCode = TypeCode(-155);

static TYPE_CODES: &[TypeCodeRule] = &[
    TypeCodeRule::code(TypeCode::BIT, DataType::Boolean),
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
    TypeCodeRule::code(TypeCode::LONGVARCHAR, DataType::Clob),
    TypeCodeRule::code(TypeCode::LONGNVARCHAR, DataType::Nclob),
    TypeCodeRule::code(TypeCode::DATE, DataType::Date),
    TypeCodeRule::code(TypeCode::TIME, DataType::Time),
    TypeCodeRule::code(TypeCode::TIMESTAMP, DataType::Timestamp),
    TypeCodeRule::code(TypeCode::TIMESTAMP_WITH_TIMEZONE, DataType::TimestampZ),
    TypeCodeRule::code(DATETIMEOFFSET, DataType::TimestampZ),
    TypeCodeRule::code(TypeCode::BINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::VARBINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::LONGVARBINARY, DataType::Blob),
];

// JSON is stored as NVARCHAR(MAX) text
static TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping::fixed(DataType::Boolean, "BIT"),
    TypeMapping::sized_or(DataType::Varchar, "VARCHAR", 8000, "VARCHAR(MAX)"),
    TypeMapping::sized_or(DataType::Nvarchar, "NVARCHAR", 4000, "NVARCHAR(MAX)"),
    TypeMapping::fixed(DataType::Integer, "INT"),
    TypeMapping::fixed(DataType::Long, "BIGINT"),
    TypeMapping::precision(DataType::Numeric, "DECIMAL", 38),
    TypeMapping::fixed(DataType::Float, "REAL"),
    TypeMapping::fixed(DataType::Double, "FLOAT"),
    TypeMapping::fixed(DataType::Timestamp, "DATETIME2"),
    TypeMapping::fixed(DataType::TimestampZ, "DATETIMEOFFSET"),
    TypeMapping::fixed(DataType::Date, "DATE"),
    TypeMapping::fixed(DataType::Time, "TIME"),
    TypeMapping::fixed(DataType::Blob, "VARBINARY(MAX)"),
    TypeMapping::fixed(DataType::Clob, "VARCHAR(MAX)"),
    TypeMapping::fixed(DataType::Nclob, "NVARCHAR(MAX)"),
    TypeMapping::fixed(DataType::Json, "NVARCHAR(MAX)"),
];

static VIEW_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(?:OR\s+ALTER\s+)?VIEW\s+{}\s*(?:\([^)]*\)\s*)?(?:WITH\s+[\w\s,]+?\s+)?AS\s+",
        QUALIFIED_NAME
    ))
    .unwrap()
});

pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
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
        AlterAddStyle::AddList
    }

    fn view_definition_query(&self) -> &'static str {
        "SELECT m.definition FROM sys.sql_modules m \
         JOIN sys.views v ON v.object_id = m.object_id WHERE v.name = ?"
    }

    fn view_preamble(&self) -> &'static Regex {
        &VIEW_PREAMBLE
    }

    fn drop_if_exists(&self) -> bool {
        true
    }

    fn unsized_varchar_length(&self) -> u32 {
        1
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn current_time(&self, data_type: DataType) -> &'static str {
        match data_type {
            DataType::Timestamp => "SYSDATETIME()",
            DataType::TimestampZ => "SYSDATETIMEOFFSET()",
            _ => "GETDATE()",
        }
    }

    fn refine_discovered(&self, column: ColumnModel) -> ColumnModel {
        if column.size() != MAX_LENGTH {
            return column;
        }
        let refined = match column.data_type() {
            DataType::Varchar => DataType::Clob,
            DataType::Nvarchar => DataType::Nclob,
            _ => return column,
        };
        column.rebuild().data_type(refined).build()
    }
}
