//! Canonical column data types

use std::fmt;
use std::str::FromStr;

/// Engine-independent column data kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Varchar,
    Nvarchar,
    Integer,
    Long,
    Numeric,
    Float,
    Double,
    Timestamp,
    /// Timestamp with time zone
    TimestampZ,
    Date,
    Time,
    Blob,
    Clob,
    Nclob,
    Json,
    Undefined,
}

/// Families of interchangeable types used by the comparison rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    String,
    Numeric,
    DateTime,
}

impl DataType {
    pub const ALL: [DataType; 17] = [
        DataType::Boolean,
        DataType::Varchar,
        DataType::Nvarchar,
        DataType::Integer,
        DataType::Long,
        DataType::Numeric,
        DataType::Float,
        DataType::Double,
        DataType::Timestamp,
        DataType::TimestampZ,
        DataType::Date,
        DataType::Time,
        DataType::Blob,
        DataType::Clob,
        DataType::Nclob,
        DataType::Json,
        DataType::Undefined,
    ];

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Varchar => "VARCHAR",
            DataType::Nvarchar => "NVARCHAR",
            DataType::Integer => "INTEGER",
            DataType::Long => "LONG",
            DataType::Numeric => "NUMERIC",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimestampZ => "TIMESTAMPZ",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Blob => "BLOB",
            DataType::Clob => "CLOB",
            DataType::Nclob => "NCLOB",
            DataType::Json => "JSON",
            DataType::Undefined => "UNDEFINED",
        }
    }

    /// The interchangeable family this type belongs to, if any.
    ///
    /// `TIMESTAMPZ` is deliberately outside the date/time family: zone
    /// handling must match exactly.
    pub fn family(&self) -> Option<TypeFamily> {
        match self {
            DataType::Varchar | DataType::Nvarchar => Some(TypeFamily::String),
            DataType::Integer
            | DataType::Long
            | DataType::Numeric
            | DataType::Float
            | DataType::Double => Some(TypeFamily::Numeric),
            DataType::Date | DataType::Time | DataType::Timestamp => Some(TypeFamily::DateTime),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.family() == Some(TypeFamily::String)
    }

    pub fn is_numeric(&self) -> bool {
        self.family() == Some(TypeFamily::Numeric)
    }

    pub fn is_date_time(&self) -> bool {
        self.family() == Some(TypeFamily::DateTime)
    }

    /// INTEGER or LONG. Declared sizes of these are not compared.
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Long)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown data type: {}", s))
    }
}
