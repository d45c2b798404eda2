//! Nested-loop Cartesian product.

use super::nested_loop::PairCursor;
use super::{Executor, IteratorState, VolcanoIterator};
use crate::Result;
use relalg_common::{Relation, Schema, Tuple};
use tracing::{debug, trace};

/// Pairs every tuple of `r` with every tuple of `s`.
///
/// Output has exactly `r.row_count() * s.row_count()` tuples in row-major
/// order: all pairings of `r[0]` precede any pairing of `r[1]`.
pub struct CrossJoin<'a> {
    r: &'a Relation,
    s: &'a Relation,
    schema: Schema,
    cursor: PairCursor,
    state: IteratorState,
}

impl<'a> CrossJoin<'a> {
    /// Fails when `r` and `s` share a column name.
    pub fn new(r: &'a Relation, s: &'a Relation) -> Result<Self> {
        let schema = r.schema().join(s.schema())?;
        Ok(Self {
            r,
            s,
            schema,
            cursor: PairCursor::default(),
            state: IteratorState::Unopened,
        })
    }
}

impl VolcanoIterator for CrossJoin<'_> {
    type Item = Tuple;

    fn open(&mut self) -> Result<()> {
        self.cursor.reset();
        self.state = IteratorState::Open;
        debug!(
            left_rows = self.r.row_count(),
            right_rows = self.s.row_count(),
            "opened cross join"
        );
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        if !self.state.check_next("CrossJoin")? {
            return Ok(None);
        }
        let Some((i, j)) = self.cursor.advance(self.r.row_count(), self.s.row_count()) else {
            self.state = IteratorState::Exhausted;
            return Ok(None);
        };
        trace!(i, j, "cross join pair");
        let tuple = self.r.tuples()[i].join(&self.s.tuples()[j])?;
        Ok(Some(tuple))
    }

    fn close(&mut self) {
        self.cursor.reset();
        self.state = IteratorState::Closed;
    }
}

impl Executor for CrossJoin<'_> {
    fn schema(&self) -> &Schema {
        &self.schema
    }
}
