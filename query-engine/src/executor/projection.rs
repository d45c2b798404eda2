//! Projection executor for column lists.
//!
//! Selects and renames columns of the child's tuples without changing their types.

use super::{BoxedExecutor, Executor, IteratorState, VolcanoIterator};
use crate::Result;
use relalg_common::{ProjectItem, Schema, Tuple};

/// Projection executor that selects (and optionally renames) child columns.
pub struct ProjectionExecutor<'a> {
    child: BoxedExecutor<'a>,
    items: Vec<ProjectItem>,
    output_schema: Schema,
    state: IteratorState,
}

impl<'a> ProjectionExecutor<'a> {
    /// Creates a new projection executor.
    ///
    /// # Arguments
    /// * `child` - The child executor to pull tuples from
    /// * `items` - Columns of the child schema to keep, in output order, with optional aliases
    pub fn new(child: BoxedExecutor<'a>, items: Vec<ProjectItem>) -> Result<Self> {
        let output_schema = child.schema().project(&items)?;
        Ok(Self {
            child,
            items,
            output_schema,
            state: IteratorState::Unopened,
        })
    }
}

impl VolcanoIterator for ProjectionExecutor<'_> {
    type Item = Tuple;

    fn open(&mut self) -> Result<()> {
        self.child.open()?;
        self.state = IteratorState::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        if !self.state.check_next("ProjectionExecutor")? {
            return Ok(None);
        }
        match self.child.next()? {
            None => {
                self.state = IteratorState::Exhausted;
                Ok(None)
            }
            Some(tuple) => Ok(Some(tuple.project(&self.items)?)),
        }
    }

    fn close(&mut self) {
        self.child.close();
        self.state = IteratorState::Closed;
    }
}

impl Executor for ProjectionExecutor<'_> {
    fn schema(&self) -> &Schema {
        &self.output_schema
    }
}
