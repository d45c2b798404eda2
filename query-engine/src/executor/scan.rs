//! Sequential scan executor.
//!
//! Iterates through all tuples of a relation in insertion order.

use super::{Executor, IteratorState, VolcanoIterator};
use crate::Result;
use relalg_common::{Relation, Schema, Tuple};
use tracing::debug;

/// Sequential scan executor over a borrowed relation.
pub struct RelationScan<'a> {
    relation: &'a Relation,
    cursor: usize,
    state: IteratorState,
}

impl<'a> RelationScan<'a> {
    /// Creates a new sequential scan executor.
    pub fn new(relation: &'a Relation) -> Self {
        Self {
            relation,
            cursor: 0,
            state: IteratorState::Unopened,
        }
    }
}

impl VolcanoIterator for RelationScan<'_> {
    type Item = Tuple;

    fn open(&mut self) -> Result<()> {
        self.cursor = 0;
        self.state = IteratorState::Open;
        debug!(rows = self.relation.row_count(), "opened relation scan");
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        if !self.state.check_next("RelationScan")? {
            return Ok(None);
        }
        match self.relation.get(self.cursor) {
            Some(tuple) => {
                self.cursor += 1;
                Ok(Some(tuple.clone()))
            }
            None => {
                self.state = IteratorState::Exhausted;
                Ok(None)
            }
        }
    }

    fn close(&mut self) {
        self.cursor = 0;
        self.state = IteratorState::Closed;
    }
}

impl Executor for RelationScan<'_> {
    fn schema(&self) -> &Schema {
        self.relation.schema()
    }
}
