//! Error types for schemabridge

use thiserror::Error;

use crate::model::DataType;

/// Result type for schemabridge operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// A failure reported by the database driver during catalog introspection
/// or DDL execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("database operation failed: {message}")]
pub struct DriverError {
    pub message: String,
    /// The statement being executed, if any
    pub sql: Option<String>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql: None,
        }
    }

    /// Attach the offending statement
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }
}

/// Errors that can occur while building, discovering or rendering schemas
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("data type {data_type} has no rendering rule in dialect {dialect}")]
    UnmappedType {
        dialect: &'static str,
        data_type: DataType,
    },

    #[error("duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("table {table} has no columns")]
    EmptyTable { table: String },

    #[error("unknown dialect: {name}")]
    UnknownDialect { name: String },
}

impl SchemaError {
    /// Whether this error came from the driver rather than from the model
    pub fn is_driver_failure(&self) -> bool {
        matches!(self, SchemaError::Driver(_))
    }
}
