//! Data tables translating between driver type codes, canonical types and
//! native column type syntax

use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::model::{ColumnModel, DataType, TypeCode};

/// One row of a dialect's discovery table: a driver code (optionally
/// narrowed by native type name) and the canonical type it means.
#[derive(Debug, Clone, Copy)]
pub struct TypeCodeRule {
    pub code: TypeCode,
    /// Case-insensitive native type name; `None` matches any name
    pub type_name: Option<&'static str>,
    pub data_type: DataType,
}

impl TypeCodeRule {
    pub const fn code(code: TypeCode, data_type: DataType) -> Self {
        Self {
            code,
            type_name: None,
            data_type,
        }
    }

    pub const fn named(code: TypeCode, type_name: &'static str, data_type: DataType) -> Self {
        Self {
            code,
            type_name: Some(type_name),
            data_type,
        }
    }
}

/// Resolve a driver code to a canonical type. Name-qualified rows win over
/// code-only rows; anything unknown is `UNDEFINED`.
pub fn lookup_data_type(rules: &[TypeCodeRule], code: TypeCode, type_name: &str) -> DataType {
    let base = base_type_name(type_name);
    rules
        .iter()
        .find(|r| {
            r.code == code
                && r
                    .type_name
                    .is_some_and(|name| name.eq_ignore_ascii_case(base))
        })
        .or_else(|| {
            rules
                .iter()
                .find(|r| r.code == code && r.type_name.is_none())
        })
        .map(|r| r.data_type)
        .unwrap_or(DataType::Undefined)
}

/// The native type name without any `(length)` suffix
pub fn base_type_name(type_name: &str) -> &str {
    type_name
        .split('(')
        .next()
        .unwrap_or(type_name)
        .trim()
}

/// How a canonical type is spelled in a dialect
#[derive(Debug, Clone, Copy)]
pub enum NativeType {
    /// A type without parameters
    Fixed(&'static str),
    /// A length-parameterised type. Sizes above `max`, and columns without a
    /// size, render as `overflow` when given. Without an overflow type an
    /// unsized column renders the bare name and larger sizes clamp to `max`.
    Sized {
        name: &'static str,
        max: u32,
        overflow: Option<&'static str>,
    },
    /// A precision/scale type; precision clamps to `max_precision`, a zero
    /// precision renders the bare name.
    Precision {
        name: &'static str,
        max_precision: u32,
    },
}

/// One row of a dialect's rendering table
#[derive(Debug, Clone, Copy)]
pub struct TypeMapping {
    pub data_type: DataType,
    pub native: NativeType,
}

impl TypeMapping {
    pub const fn fixed(data_type: DataType, name: &'static str) -> Self {
        Self {
            data_type,
            native: NativeType::Fixed(name),
        }
    }

    pub const fn sized(data_type: DataType, name: &'static str, max: u32) -> Self {
        Self {
            data_type,
            native: NativeType::Sized {
                name,
                max,
                overflow: None,
            },
        }
    }

    /// A sized type that widens to a LOB type past `max` or without a size
    pub const fn sized_or(
        data_type: DataType,
        name: &'static str,
        max: u32,
        overflow: &'static str,
    ) -> Self {
        Self {
            data_type,
            native: NativeType::Sized {
                name,
                max,
                overflow: Some(overflow),
            },
        }
    }

    pub const fn precision(data_type: DataType, name: &'static str, max_precision: u32) -> Self {
        Self {
            data_type,
            native: NativeType::Precision {
                name,
                max_precision,
            },
        }
    }
}

impl NativeType {
    /// Render the native syntax for a column
    pub fn render(&self, column: &ColumnModel) -> String {
        match *self {
            NativeType::Fixed(name) => name.to_string(),
            NativeType::Sized {
                name,
                max,
                overflow,
            } => {
                let size = column.size();
                if size == 0 || size > max {
                    if let Some(overflow) = overflow {
                        return overflow.to_string();
                    }
                }
                if size == 0 {
                    name.to_string()
                } else if size > max {
                    warn!(column = column.name(), size, max, "length clamped");
                    format!("{}({})", name, max)
                } else {
                    format!("{}({})", name, size)
                }
            }
            NativeType::Precision {
                name,
                max_precision,
            } => {
                if column.size() == 0 {
                    return name.to_string();
                }
                let precision = column.size().min(max_precision);
                let scale = column.decimal_digits().min(precision);
                if scale > 0 {
                    format!("{}({},{})", name, precision, scale)
                } else {
                    format!("{}({})", name, precision)
                }
            }
        }
    }
}

/// Render a column's native type from a dialect table, failing for
/// canonical types the dialect has no rule for.
pub fn render_native_type(
    dialect: &'static str,
    mappings: &[TypeMapping],
    column: &ColumnModel,
) -> Result<String> {
    mappings
        .iter()
        .find(|m| m.data_type == column.data_type())
        .map(|m| m.native.render(column))
        .ok_or(SchemaError::UnmappedType {
            dialect,
            data_type: column.data_type(),
        })
}
