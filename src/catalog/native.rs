//! Declared column types as a driver reports them
//!
//! Catalogs built on DDL text (the in-memory store, SQLite) only know the
//! declared type of a column. [`native_type_info`] splits it the way a
//! JDBC-style driver reports metadata: a type code, the base type name, and
//! length/precision and scale as separate numbers.

use crate::model::TypeCode;

/// Length reported for `(MAX)` and LOB columns
pub(crate) const MAX_LENGTH: u32 = 2_147_483_647;

/// Native base type name → driver type code
static NATIVE_CODES: &[(&str, TypeCode)] = &[
    ("BIT", TypeCode::BIT),
    ("BOOLEAN", TypeCode::BOOLEAN),
    ("BOOL", TypeCode::BOOLEAN),
    ("TINYINT", TypeCode::TINYINT),
    ("SMALLINT", TypeCode::SMALLINT),
    ("INT2", TypeCode::SMALLINT),
    ("INT", TypeCode::INTEGER),
    ("INTEGER", TypeCode::INTEGER),
    ("INT4", TypeCode::INTEGER),
    ("BIGINT", TypeCode::BIGINT),
    ("INT8", TypeCode::BIGINT),
    ("NUMBER", TypeCode::NUMERIC),
    ("NUMERIC", TypeCode::NUMERIC),
    ("DECIMAL", TypeCode::DECIMAL),
    ("DEC", TypeCode::DECIMAL),
    ("SMALLDECIMAL", TypeCode::DECIMAL),
    ("REAL", TypeCode::REAL),
    ("FLOAT4", TypeCode::REAL),
    ("BINARY_FLOAT", TypeCode::REAL),
    ("FLOAT", TypeCode::FLOAT),
    ("DOUBLE", TypeCode::DOUBLE),
    ("DOUBLE PRECISION", TypeCode::DOUBLE),
    ("FLOAT8", TypeCode::DOUBLE),
    ("BINARY_DOUBLE", TypeCode::DOUBLE),
    ("CHAR", TypeCode::CHAR),
    ("CHARACTER", TypeCode::CHAR),
    ("BPCHAR", TypeCode::CHAR),
    ("VARCHAR", TypeCode::VARCHAR),
    ("VARCHAR2", TypeCode::VARCHAR),
    ("CHARACTER VARYING", TypeCode::VARCHAR),
    ("NCHAR", TypeCode::NCHAR),
    ("NVARCHAR", TypeCode::NVARCHAR),
    ("NVARCHAR2", TypeCode::NVARCHAR),
    ("TEXT", TypeCode::LONGVARCHAR),
    ("NTEXT", TypeCode::LONGNVARCHAR),
    ("CLOB", TypeCode::CLOB),
    ("NCLOB", TypeCode::NCLOB),
    ("BLOB", TypeCode::BLOB),
    ("BYTEA", TypeCode::BINARY),
    ("BINARY", TypeCode::BINARY),
    ("VARBINARY", TypeCode::VARBINARY),
    ("RAW", TypeCode::VARBINARY),
    ("IMAGE", TypeCode::LONGVARBINARY),
    ("DATE", TypeCode::DATE),
    ("TIME", TypeCode::TIME),
    ("TIMESTAMP", TypeCode::TIMESTAMP),
    ("DATETIME", TypeCode::TIMESTAMP),
    ("DATETIME2", TypeCode::TIMESTAMP),
    ("SMALLDATETIME", TypeCode::TIMESTAMP),
    ("SECONDDATE", TypeCode::TIMESTAMP),
    ("TIMESTAMP WITH TIME ZONE", TypeCode::TIMESTAMP_WITH_TIMEZONE),
    ("TIMESTAMPTZ", TypeCode::TIMESTAMP_WITH_TIMEZONE),
    ("DATETIMEOFFSET", TypeCode::TIMESTAMP_WITH_TIMEZONE),
];

/// Catalog size for a type declared without a length or precision
fn default_size(code: TypeCode) -> u32 {
    match code {
        TypeCode::BIT | TypeCode::BOOLEAN | TypeCode::CHAR | TypeCode::NCHAR => 1,
        TypeCode::TINYINT => 3,
        TypeCode::SMALLINT => 5,
        TypeCode::INTEGER => 10,
        TypeCode::BIGINT => 19,
        TypeCode::REAL => 7,
        TypeCode::FLOAT | TypeCode::DOUBLE => 17,
        TypeCode::DATE => 10,
        TypeCode::TIME => 8,
        TypeCode::TIMESTAMP => 29,
        TypeCode::TIMESTAMP_WITH_TIMEZONE => 35,
        TypeCode::LONGVARCHAR
        | TypeCode::LONGNVARCHAR
        | TypeCode::LONGVARBINARY
        | TypeCode::CLOB
        | TypeCode::NCLOB
        | TypeCode::BLOB
        | TypeCode::BINARY => MAX_LENGTH,
        _ => 0,
    }
}

fn is_temporal(code: TypeCode) -> bool {
    matches!(
        code,
        TypeCode::DATE | TypeCode::TIME | TypeCode::TIMESTAMP | TypeCode::TIMESTAMP_WITH_TIMEZONE
    )
}

/// Driver view of a declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NativeTypeInfo {
    pub code: TypeCode,
    pub name: String,
    pub size: u32,
    pub decimal_digits: u32,
}

/// Split a declared type such as `NUMBER(10, 2)` or `TIMESTAMP(6) WITH TIME
/// ZONE` into its driver code, base name, size and scale.
pub(crate) fn native_type_info(declared: &str) -> NativeTypeInfo {
    let (name, params) = match (declared.find('('), declared.find(')')) {
        (Some(open), Some(close)) if close > open => (
            format!("{} {}", &declared[..open], &declared[close + 1..]),
            &declared[open + 1..close],
        ),
        _ => (declared.to_string(), ""),
    };
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    let params: Vec<u32> = params
        .split(',')
        .filter_map(|p| p.trim().parse().ok())
        .collect();

    let code = NATIVE_CODES
        .iter()
        .find(|(native, _)| *native == name)
        .map(|(_, code)| *code)
        .unwrap_or(TypeCode::OTHER);

    let (size, decimal_digits) = if is_temporal(code) {
        (default_size(code), params.first().copied().unwrap_or(0))
    } else {
        (
            params.first().copied().unwrap_or_else(|| default_size(code)),
            params.get(1).copied().unwrap_or(0),
        )
    };

    NativeTypeInfo {
        code,
        name,
        size,
        decimal_digits,
    }
}
