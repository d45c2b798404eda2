//! Pull-based relational algebra over in-memory relations.
//!
//! Operators implement the Volcano iterator protocol (`open`, `next`,
//! `close`) and compose into trees that never materialize intermediate
//! results. A [`Timeline`] adds backward stepping on top of any iterator.
//!
//! # Example
//!
//! ```
//! use relalg_common::{ColumnType, Relation, Schema};
//! use relalg_engine::executor::{collect, CrossJoin};
//!
//! let mut r = Relation::empty(Schema::from_pairs([("flag", ColumnType::Boolean)])?);
//! r.add_row(&[("flag", "true")])?;
//! let mut s = Relation::empty(Schema::from_pairs([("label", ColumnType::String)])?);
//! s.add_row(&[("label", "a")])?;
//! s.add_row(&[("label", "b")])?;
//!
//! let mut join = CrossJoin::new(&r, &s)?;
//! assert_eq!(collect(&mut join)?.len(), 2);
//! # Ok::<(), relalg_engine::QueryError>(())
//! ```

pub mod executor;
pub mod expression;
pub mod timeline;
mod types;

pub use executor::{BoxedExecutor, Executor, IteratorState, VolcanoIterator};
pub use expression::{col, lit, Expression};
pub use timeline::Timeline;

use relalg_common::DataError;
use thiserror::Error;

/// A specialized error type for query engine operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An iterator protocol method was called outside its allowed state.
    #[error("invalid state: cannot call {operation}() on {operator} while {state:?}")]
    InvalidState {
        operator: &'static str,
        operation: &'static str,
        state: IteratorState,
    },
    /// Column not found in schema
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    /// Type mismatch in expression
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Execution error
    #[error("execution error: {0}")]
    ExecutionError(String),
    /// Schema, tuple or relation error
    #[error(transparent)]
    Data(#[from] DataError),
}

pub type Result<T> = std::result::Result<T, QueryError>;
