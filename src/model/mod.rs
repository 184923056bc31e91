//! Engine-independent schema model

mod column;
mod data_type;
mod table;
mod type_code;

pub use column::{ColumnBuilder, ColumnModel};
pub use data_type::{DataType, TypeFamily};
pub use table::{TableKind, TableModel};
pub use type_code::TypeCode;
