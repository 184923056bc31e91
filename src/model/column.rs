//! Canonical column representation

use std::fmt;

use super::{DataType, TypeCode};

/// One column of a table or view.
///
/// Built through [`ColumnModel::builder`]; read-only afterwards. A primary-key
/// column is never nullable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnModel {
    pk: bool,
    name: String,
    data_type: DataType,
    type_code: TypeCode,
    type_name: String,
    size: u32,
    decimal_digits: u32,
    nullable: bool,
    remark: Option<String>,
    default_value: Option<String>,
}

impl ColumnModel {
    /// Start building a column. Columns are nullable unless told otherwise.
    pub fn builder(name: impl Into<String>, data_type: DataType) -> ColumnBuilder {
        ColumnBuilder {
            column: ColumnModel {
                pk: false,
                name: name.into(),
                data_type,
                type_code: TypeCode::default(),
                type_name: String::new(),
                size: 0,
                decimal_digits: 0,
                nullable: true,
                remark: None,
                default_value: None,
            },
        }
    }

    /// A builder seeded with this column's values
    pub fn rebuild(&self) -> ColumnBuilder {
        ColumnBuilder {
            column: self.clone(),
        }
    }

    pub fn is_pk(&self) -> bool {
        self.pk
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Driver type code as reported by the catalog (diagnostic only)
    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Native type name as reported by the catalog (diagnostic only)
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Maximum length for character types, precision for numerics
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Scale
    pub fn decimal_digits(&self) -> u32 {
        self.decimal_digits
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Case-insensitive name match
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for ColumnModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.size > 0 {
            if self.decimal_digits > 0 {
                write!(f, "({},{})", self.size, self.decimal_digits)?;
            } else {
                write!(f, "({})", self.size)?;
            }
        }
        if self.pk {
            write!(f, " PK")?;
        }
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Builder for [`ColumnModel`]
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    column: ColumnModel,
}

impl ColumnBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.column.name = name.into();
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.column.data_type = data_type;
        self
    }

    /// Mark as (part of) the primary key
    pub fn pk(mut self) -> Self {
        self.column.pk = true;
        self
    }

    pub fn set_pk(mut self, pk: bool) -> Self {
        self.column.pk = pk;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.column.size = size;
        self
    }

    pub fn decimal_digits(mut self, decimal_digits: u32) -> Self {
        self.column.decimal_digits = decimal_digits;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.column.nullable = nullable;
        self
    }

    pub fn not_null(self) -> Self {
        self.nullable(false)
    }

    pub fn remark(mut self, remark: Option<impl Into<String>>) -> Self {
        self.column.remark = remark.map(Into::into);
        self
    }

    pub fn default_value(mut self, default_value: Option<impl Into<String>>) -> Self {
        self.column.default_value = default_value.map(Into::into);
        self
    }

    /// Raw driver type information
    pub fn type_info(mut self, code: TypeCode, name: impl Into<String>) -> Self {
        self.column.type_code = code;
        self.column.type_name = name.into();
        self
    }

    pub fn build(mut self) -> ColumnModel {
        if self.column.pk {
            self.column.nullable = false;
        }
        self.column
    }
}
