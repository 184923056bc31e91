//! Raw driver type codes
//!
//! Catalogs report column types as a numeric code plus a native type name.
//! The codes follow the generic SQL type numbering most drivers share
//! (`VARCHAR` = 12, `NUMERIC` = 2, ...). They are kept on the model for
//! diagnostics only; comparison works on the canonical [`DataType`].
//!
//! [`DataType`]: super::DataType

use std::fmt;

/// A driver-reported SQL type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeCode(pub i32);

impl TypeCode {
    pub const BIT: TypeCode = TypeCode(-7);
    pub const TINYINT: TypeCode = TypeCode(-6);
    pub const SMALLINT: TypeCode = TypeCode(5);
    pub const INTEGER: TypeCode = TypeCode(4);
    pub const BIGINT: TypeCode = TypeCode(-5);
    pub const FLOAT: TypeCode = TypeCode(6);
    pub const REAL: TypeCode = TypeCode(7);
    pub const DOUBLE: TypeCode = TypeCode(8);
    pub const NUMERIC: TypeCode = TypeCode(2);
    pub const DECIMAL: TypeCode = TypeCode(3);
    pub const CHAR: TypeCode = TypeCode(1);
    pub const VARCHAR: TypeCode = TypeCode(12);
    pub const LONGVARCHAR: TypeCode = TypeCode(-1);
    pub const DATE: TypeCode = TypeCode(91);
    pub const TIME: TypeCode = TypeCode(92);
    pub const TIMESTAMP: TypeCode = TypeCode(93);
    pub const BINARY: TypeCode = TypeCode(-2);
    pub const VARBINARY: TypeCode = TypeCode(-3);
    pub const LONGVARBINARY: TypeCode = TypeCode(-4);
    pub const NULL: TypeCode = TypeCode(0);
    pub const OTHER: TypeCode = TypeCode(1111);
    pub const BLOB: TypeCode = TypeCode(2004);
    pub const CLOB: TypeCode = TypeCode(2005);
    pub const BOOLEAN: TypeCode = TypeCode(16);
    pub const NCHAR: TypeCode = TypeCode(-15);
    pub const NVARCHAR: TypeCode = TypeCode(-9);
    pub const LONGNVARCHAR: TypeCode = TypeCode(-16);
    pub const NCLOB: TypeCode = TypeCode(2011);
    pub const SQLXML: TypeCode = TypeCode(2009);
    pub const TIME_WITH_TIMEZONE: TypeCode = TypeCode(2013);
    pub const TIMESTAMP_WITH_TIMEZONE: TypeCode = TypeCode(2014);

    /// Symbolic name of well-known codes
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            TypeCode::BIT => "BIT",
            TypeCode::TINYINT => "TINYINT",
            TypeCode::SMALLINT => "SMALLINT",
            TypeCode::INTEGER => "INTEGER",
            TypeCode::BIGINT => "BIGINT",
            TypeCode::FLOAT => "FLOAT",
            TypeCode::REAL => "REAL",
            TypeCode::DOUBLE => "DOUBLE",
            TypeCode::NUMERIC => "NUMERIC",
            TypeCode::DECIMAL => "DECIMAL",
            TypeCode::CHAR => "CHAR",
            TypeCode::VARCHAR => "VARCHAR",
            TypeCode::LONGVARCHAR => "LONGVARCHAR",
            TypeCode::DATE => "DATE",
            TypeCode::TIME => "TIME",
            TypeCode::TIMESTAMP => "TIMESTAMP",
            TypeCode::BINARY => "BINARY",
            TypeCode::VARBINARY => "VARBINARY",
            TypeCode::LONGVARBINARY => "LONGVARBINARY",
            TypeCode::NULL => "NULL",
            TypeCode::OTHER => "OTHER",
            TypeCode::BLOB => "BLOB",
            TypeCode::CLOB => "CLOB",
            TypeCode::BOOLEAN => "BOOLEAN",
            TypeCode::NCHAR => "NCHAR",
            TypeCode::NVARCHAR => "NVARCHAR",
            TypeCode::LONGNVARCHAR => "LONGNVARCHAR",
            TypeCode::NCLOB => "NCLOB",
            TypeCode::SQLXML => "SQLXML",
            TypeCode::TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
            TypeCode::TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
