//! Errors raised by the data model: schemas, tuples and relations.

use crate::types::{ColumnType, Value};
use thiserror::Error;

/// A specialized error type for schema, tuple and relation operations.
///
/// All of these are programmer errors detected at the point of misuse. None of
/// them are retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A tuple or column reference does not line up with the schema it was checked against.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The same column name would appear twice in one schema or tuple.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A value was rejected by its column's acceptance predicate.
    #[error("type mismatch: column '{column}' of type {column_type} does not accept {value:?}")]
    TypeMismatch {
        column: String,
        column_type: ColumnType,
        value: Value,
    },

    /// Raw text could not be parsed into the column type's native value.
    #[error("cannot parse {text:?} as {column_type}")]
    Parse { column_type: ColumnType, text: String },
}

pub type Result<T> = std::result::Result<T, DataError>;
