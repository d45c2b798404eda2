//! Bidirectional replay over a forward-only iterator.
//!
//! A [`Timeline`] logs every item its inner iterator produces so a consumer
//! can step backwards and forwards again without re-running the pipeline.
//! Memory grows with the number of distinct items produced; each step costs
//! O(1) amortized.

use crate::executor::{Executor, IteratorState, VolcanoIterator};
use crate::{QueryError, Result};
use relalg_common::Schema;
use tracing::{debug, trace};

/// Caching wrapper that adds [`Timeline::previous`] to any [`VolcanoIterator`].
pub struct Timeline<I: VolcanoIterator> {
    inner: I,
    log: Vec<I::Item>,
    /// Index into `log` of the item returned last; `None` before the first.
    cursor: Option<usize>,
    state: IteratorState,
}

impl<I> Timeline<I>
where
    I: VolcanoIterator,
    I::Item: Clone,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            log: Vec::new(),
            cursor: None,
            state: IteratorState::Unopened,
        }
    }

    /// Steps back one entry and returns the cached item there.
    ///
    /// Fails when there is no earlier entry to return.
    pub fn previous(&mut self) -> Result<I::Item> {
        match (self.state, self.cursor) {
            (IteratorState::Open, Some(position)) if position > 0 => {
                self.cursor = Some(position - 1);
                trace!(position = position - 1, "timeline stepped back");
                Ok(self.log[position - 1].clone())
            }
            (state, _) => Err(QueryError::InvalidState {
                operator: "Timeline",
                operation: "previous",
                state,
            }),
        }
    }

    /// Index of the entry returned last.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of items produced by the inner iterator so far.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I> VolcanoIterator for Timeline<I>
where
    I: VolcanoIterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn open(&mut self) -> Result<()> {
        self.inner.open()?;
        self.log.clear();
        self.cursor = None;
        self.state = IteratorState::Open;
        debug!("opened timeline");
        Ok(())
    }

    /// Replays from the log while behind its end, then pulls from the inner iterator.
    fn next(&mut self) -> Result<Option<I::Item>> {
        // The timeline never becomes Exhausted itself: stepping back and
        // forward again stays possible after the inner iterator runs dry.
        self.state.check_next("Timeline")?;

        let next_position = self.cursor.map_or(0, |position| position + 1);
        if let Some(item) = self.log.get(next_position) {
            self.cursor = Some(next_position);
            trace!(position = next_position, "timeline replayed cached item");
            return Ok(Some(item.clone()));
        }

        match self.inner.next()? {
            Some(item) => {
                self.log.push(item.clone());
                self.cursor = Some(self.log.len() - 1);
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.inner.close();
        self.state = IteratorState::Closed;
    }
}

/// A timeline over an executor still produces that executor's schema.
impl<I: Executor> Executor for Timeline<I> {
    fn schema(&self) -> &Schema {
        self.inner.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields a fixed list of numbers and counts how often it is pulled.
    struct Counting {
        items: Vec<i64>,
        position: usize,
        pulls: usize,
        state: IteratorState,
    }

    impl Counting {
        fn new(items: Vec<i64>) -> Self {
            Self {
                items,
                position: 0,
                pulls: 0,
                state: IteratorState::Unopened,
            }
        }
    }

    impl VolcanoIterator for Counting {
        type Item = i64;

        fn open(&mut self) -> Result<()> {
            self.position = 0;
            self.state = IteratorState::Open;
            Ok(())
        }

        fn next(&mut self) -> Result<Option<i64>> {
            if !self.state.check_next("Counting")? {
                return Ok(None);
            }
            self.pulls += 1;
            match self.items.get(self.position) {
                Some(&item) => {
                    self.position += 1;
                    Ok(Some(item))
                }
                None => {
                    self.state = IteratorState::Exhausted;
                    Ok(None)
                }
            }
        }

        fn close(&mut self) {
            self.state = IteratorState::Closed;
        }
    }

    #[test]
    fn test_replay_without_reaching_inner() {
        let mut timeline = Timeline::new(Counting::new(vec![1, 2, 3]));
        timeline.open().unwrap();

        assert_eq!(timeline.next().unwrap(), Some(1));
        assert_eq!(timeline.next().unwrap(), Some(2));
        assert_eq!(timeline.next().unwrap(), Some(3));
        assert_eq!(timeline.inner().pulls, 3);

        assert_eq!(timeline.previous().unwrap(), 2);
        assert_eq!(timeline.previous().unwrap(), 1);
        assert_eq!(timeline.inner().pulls, 3);

        // Forward again: 2 and 3 come from the log.
        assert_eq!(timeline.next().unwrap(), Some(2));
        assert_eq!(timeline.next().unwrap(), Some(3));
        assert_eq!(timeline.inner().pulls, 3);

        // Past the log the inner iterator is consulted and is exhausted.
        assert_eq!(timeline.next().unwrap(), None);
        assert_eq!(timeline.next().unwrap(), None);
        assert_eq!(timeline.inner().pulls, 4);
        assert_eq!(timeline.position(), Some(2));
        assert_eq!(timeline.len(), 3);

        // Exhaustion does not stop backward stepping.
        assert_eq!(timeline.previous().unwrap(), 2);
    }

    #[test]
    fn test_previous_without_predecessor() {
        let mut timeline = Timeline::new(Counting::new(vec![1, 2]));
        assert!(matches!(
            timeline.previous(),
            Err(QueryError::InvalidState { .. })
        ));

        timeline.open().unwrap();
        assert!(timeline.previous().is_err());

        assert_eq!(timeline.next().unwrap(), Some(1));
        assert!(matches!(
            timeline.previous(),
            Err(QueryError::InvalidState {
                operation: "previous",
                ..
            })
        ));
        // A failed step leaves the cursor where it was.
        assert_eq!(timeline.position(), Some(0));
        assert_eq!(timeline.next().unwrap(), Some(2));
    }

    #[test]
    fn test_open_clears_log() {
        let mut timeline = Timeline::new(Counting::new(vec![7, 8]));
        timeline.open().unwrap();
        timeline.next().unwrap();
        timeline.next().unwrap();
        assert_eq!(timeline.len(), 2);

        timeline.open().unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.position(), None);
        assert_eq!(timeline.next().unwrap(), Some(7));
    }

    #[test]
    fn test_close_closes_inner() {
        let mut timeline = Timeline::new(Counting::new(vec![1]));
        assert!(timeline.next().is_err());

        timeline.open().unwrap();
        timeline.close();
        timeline.close();
        assert_eq!(timeline.inner().state, IteratorState::Closed);
        assert!(matches!(
            timeline.next(),
            Err(QueryError::InvalidState {
                state: IteratorState::Closed,
                ..
            })
        ));
    }
}
