//! Execution engine using the Volcano iterator model.
//!
//! Every operator implements [`VolcanoIterator`] and can be composed to form
//! query plans. The lifecycle is
//!
//! ```text
//! Unopened --open--> Open --next*--> Exhausted
//!     \               |  ^--open-------/ |
//!      \--close--> Closed <--close-------/
//! ```
//!
//! `open` may be called from any state and restarts iteration. `next` fails
//! with [`QueryError::InvalidState`] before `open` or after `close`, and keeps
//! returning `None` once exhausted. `close` never fails and is idempotent.

use crate::{QueryError, Result};
use relalg_common::{Schema, Tuple};
use tracing::warn;

pub mod cross_join;
pub mod hash_join;
pub mod join;
mod nested_loop;
pub mod projection;
pub mod scan;
pub mod theta_join;

pub use cross_join::CrossJoin;
pub use hash_join::HashJoin;
pub use join::{build_join, JoinKind};
pub use projection::ProjectionExecutor;
pub use scan::RelationScan;
pub use theta_join::ThetaJoin;

/// The pull protocol shared by scans, joins and wrappers.
pub trait VolcanoIterator {
    type Item;

    /// (Re-)initializes cursors; restarts iteration from the beginning.
    fn open(&mut self) -> Result<()>;

    /// Get the next item, or None if exhausted.
    fn next(&mut self) -> Result<Option<Self::Item>>;

    /// Releases held state. Safe to call any number of times.
    fn close(&mut self);
}

/// The core executor trait: a Volcano iterator producing tuples.
///
/// Executors are pull-based: parents call next() on children to retrieve tuples.
pub trait Executor: VolcanoIterator<Item = Tuple> {
    /// Returns the schema of tuples produced by this executor.
    ///
    /// Available before `open`, for static type inference.
    fn schema(&self) -> &Schema;
}

/// A boxed executor for dynamic dispatch.
pub type BoxedExecutor<'a> = Box<dyn Executor + 'a>;

impl<I: VolcanoIterator + ?Sized> VolcanoIterator for Box<I> {
    type Item = I::Item;

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn next(&mut self) -> Result<Option<Self::Item>> {
        (**self).next()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }
}

/// Protocol state tracked by every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IteratorState {
    /// Operator has not been opened yet.
    #[default]
    Unopened,
    /// Operator is open and ready to produce output.
    Open,
    /// Operator has finished producing output.
    Exhausted,
    /// Operator has been closed.
    Closed,
}

impl IteratorState {
    /// Gatekeeper for `next`: `Ok(true)` to produce, `Ok(false)` when exhausted.
    pub fn check_next(self, operator: &'static str) -> Result<bool> {
        match self {
            IteratorState::Open => Ok(true),
            IteratorState::Exhausted => Ok(false),
            IteratorState::Unopened | IteratorState::Closed => {
                warn!(operator, state = ?self, "next() called outside of open state");
                Err(QueryError::InvalidState {
                    operator,
                    operation: "next",
                    state: self,
                })
            }
        }
    }
}

/// Opens `iter`, drains it, and closes it.
pub fn collect<I: VolcanoIterator + ?Sized>(iter: &mut I) -> Result<Vec<I::Item>> {
    iter.open()?;
    let mut results = Vec::new();
    loop {
        match iter.next() {
            Ok(Some(item)) => results.push(item),
            Ok(None) => break,
            Err(err) => {
                iter.close();
                return Err(err);
            }
        }
    }
    iter.close();
    Ok(results)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_next() {
        assert!(IteratorState::Open.check_next("test").unwrap());
        assert!(!IteratorState::Exhausted.check_next("test").unwrap());
        for state in [IteratorState::Unopened, IteratorState::Closed] {
            match state.check_next("test") {
                Err(QueryError::InvalidState {
                    operator,
                    operation,
                    state: reported,
                }) => {
                    assert_eq!(operator, "test");
                    assert_eq!(operation, "next");
                    assert_eq!(reported, state);
                }
                other => panic!("expected InvalidState, got {:?}", other),
            }
        }
    }
}
