//! Oracle
//!
//! The Oracle catalog reports every `NUMBER` column under the NUMERIC type
//! code, so integer and boolean columns are recovered from precision and
//! scale in [`refine_discovered`](Dialect::refine_discovered).

use once_cell::sync::Lazy;
use regex::Regex;

use super::type_map::{TypeCodeRule, TypeMapping};
use super::{AlterAddStyle, Dialect, DialectKind, IdentifierCase, QUALIFIED_NAME};
use crate::model::{ColumnModel, DataType, TypeCode};

static TYPE_CODES: &[TypeCodeRule] = &[
    TypeCodeRule::code(TypeCode::NUMERIC, DataType::Numeric),
    TypeCodeRule::code(TypeCode::DECIMAL, DataType::Numeric),
    TypeCodeRule::code(TypeCode::INTEGER, DataType::Integer),
    TypeCodeRule::code(TypeCode::SMALLINT, DataType::Integer),
    TypeCodeRule::code(TypeCode::BIGINT, DataType::Long),
    TypeCodeRule::code(TypeCode::BIT, DataType::Boolean),
    TypeCodeRule::code(TypeCode::BOOLEAN, DataType::Boolean),
    TypeCodeRule::code(TypeCode::VARCHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::CHAR, DataType::Varchar),
    TypeCodeRule::code(TypeCode::NVARCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::NCHAR, DataType::Nvarchar),
    TypeCodeRule::code(TypeCode::REAL, DataType::Float),
    TypeCodeRule::code(TypeCode::FLOAT, DataType::Double),
    TypeCodeRule::code(TypeCode::DOUBLE, DataType::Double),
    TypeCodeRule::code(TypeCode::DATE, DataType::Date),
    TypeCodeRule::code(TypeCode::TIMESTAMP, DataType::Timestamp),
    TypeCodeRule::code(TypeCode::TIMESTAMP_WITH_TIMEZONE, DataType::TimestampZ),
    // ojdbc reports TIMESTAMP WITH TIME ZONE under its own code
    TypeCodeRule::code(TypeCode(-101), DataType::TimestampZ),
    TypeCodeRule::code(TypeCode::BLOB, DataType::Blob),
    TypeCodeRule::code(TypeCode::LONGVARBINARY, DataType::Blob),
    TypeCodeRule::code(TypeCode::CLOB, DataType::Clob),
    TypeCodeRule::code(TypeCode::LONGVARCHAR, DataType::Clob),
    TypeCodeRule::code(TypeCode::NCLOB, DataType::Nclob),
];

// TIME has no Oracle counterpart and is stored as TIMESTAMP; JSON is kept in
// a CLOB. Both come back as their storage types.
static TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping::fixed(DataType::Boolean, "NUMBER(1)"),
    TypeMapping::sized_or(DataType::Varchar, "VARCHAR2", 4000, "CLOB"),
    TypeMapping::sized_or(DataType::Nvarchar, "NVARCHAR2", 2000, "NCLOB"),
    TypeMapping::fixed(DataType::Integer, "NUMBER(10)"),
    TypeMapping::fixed(DataType::Long, "NUMBER(19)"),
    TypeMapping::precision(DataType::Numeric, "NUMBER", 38),
    TypeMapping::fixed(DataType::Float, "BINARY_FLOAT"),
    TypeMapping::fixed(DataType::Double, "BINARY_DOUBLE"),
    TypeMapping::fixed(DataType::Timestamp, "TIMESTAMP"),
    TypeMapping::fixed(DataType::TimestampZ, "TIMESTAMP WITH TIME ZONE"),
    TypeMapping::fixed(DataType::Date, "DATE"),
    TypeMapping::fixed(DataType::Time, "TIMESTAMP"),
    TypeMapping::fixed(DataType::Blob, "BLOB"),
    TypeMapping::fixed(DataType::Clob, "CLOB"),
    TypeMapping::fixed(DataType::Nclob, "NCLOB"),
    TypeMapping::fixed(DataType::Json, "CLOB"),
];

static VIEW_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:NO\s+)?(?:FORCE\s+)?(?:EDITIONABLE\s+|NONEDITIONABLE\s+)?VIEW\s+{}\s*(?:\([^)]*\)\s*)?AS\s+",
        QUALIFIED_NAME
    ))
    .unwrap()
});

pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
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
        "SELECT TEXT FROM USER_VIEWS WHERE VIEW_NAME = ?"
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

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn current_time(&self, data_type: DataType) -> &'static str {
        match data_type {
            DataType::Date => "SYSDATE",
            _ => "SYSTIMESTAMP",
        }
    }

    /// `NUMBER(1)` is a flag, `NUMBER(p<=10)` an int, `NUMBER(p<=19)` a long
    fn refine_discovered(&self, column: ColumnModel) -> ColumnModel {
        if column.data_type() != DataType::Numeric || column.decimal_digits() != 0 {
            return column;
        }
        let refined = match column.size() {
            0 => return column,
            1 => DataType::Boolean,
            2..=10 => DataType::Integer,
            11..=19 => DataType::Long,
            _ => return column,
        };
        column.rebuild().data_type(refined).build()
    }
}
