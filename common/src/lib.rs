//! Data model shared by the relalg crates: column types, schemas, tuples and relations.

pub mod error;
pub mod relation;
pub mod schema;
pub mod tuple;
pub mod types;

pub use error::{DataError, Result};
pub use relation::Relation;
pub use schema::{ProjectItem, Schema};
pub use tuple::{Field, Tuple};
pub use types::{Column, ColumnType, Value};
