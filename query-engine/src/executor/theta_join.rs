//! Nested-loop join filtered by an arbitrary predicate.

use super::nested_loop::PairCursor;
use super::{Executor, IteratorState, VolcanoIterator};
use crate::expression::Expression;
use crate::Result;
use relalg_common::{Relation, Schema, Tuple};
use tracing::debug;

/// Same traversal as [`CrossJoin`](super::CrossJoin), emitting only combined
/// tuples for which the predicate evaluates to true.
pub struct ThetaJoin<'a> {
    r: &'a Relation,
    s: &'a Relation,
    schema: Schema,
    predicate: Expression,
    cursor: PairCursor,
    state: IteratorState,
}

impl<'a> ThetaJoin<'a> {
    /// `predicate` is bound against the joined schema here, so unknown columns fail early.
    pub fn new(r: &'a Relation, s: &'a Relation, predicate: Expression) -> Result<Self> {
        let schema = r.schema().join(s.schema())?;
        let predicate = predicate.bind(&schema)?;
        Ok(Self {
            r,
            s,
            schema,
            predicate,
            cursor: PairCursor::default(),
            state: IteratorState::Unopened,
        })
    }
}

impl VolcanoIterator for ThetaJoin<'_> {
    type Item = Tuple;

    fn open(&mut self) -> Result<()> {
        self.cursor.reset();
        self.state = IteratorState::Open;
        debug!(
            left_rows = self.r.row_count(),
            right_rows = self.s.row_count(),
            "opened theta join"
        );
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        if !self.state.check_next("ThetaJoin")? {
            return Ok(None);
        }
        while let Some((i, j)) = self.cursor.advance(self.r.row_count(), self.s.row_count()) {
            let tuple = self.r.tuples()[i].join(&self.s.tuples()[j])?;
            if self.predicate.evaluate_predicate(&tuple)? {
                return Ok(Some(tuple));
            }
        }
        self.state = IteratorState::Exhausted;
        Ok(None)
    }

    fn close(&mut self) {
        self.cursor.reset();
        self.state = IteratorState::Closed;
    }
}

impl Executor for ThetaJoin<'_> {
    fn schema(&self) -> &Schema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::test_util::{relation, values};
    use crate::executor::{collect, CrossJoin};
    use crate::expression::{col, lit};
    use crate::QueryError;
    use relalg_common::{ColumnType, Value};

    #[test]
    fn test_theta_join_less_than() {
        let r = relation(&[("a", ColumnType::Integer)], &[&["1"], &["2"], &["3"]]);
        let s = relation(&[("b", ColumnType::Integer)], &[&["2"], &["3"]]);
        let mut join = ThetaJoin::new(&r, &s, col("a").lt(col("b"))).unwrap();

        let rows: Vec<Vec<Value>> = collect(&mut join).unwrap().iter().map(values).collect();
        assert_eq!(
            rows,
            vec![
                vec![Value::Integer(1), Value::Integer(2)],
                vec![Value::Integer(1), Value::Integer(3)],
                vec![Value::Integer(2), Value::Integer(3)],
            ]
        );
    }

    #[test]
    fn test_always_true_matches_cross_join() {
        let r = relation(&[("a", ColumnType::Integer)], &[&["1"], &["2"]]);
        let s = relation(&[("b", ColumnType::String)], &[&["x"], &["y"], &["z"]]);

        let mut theta = ThetaJoin::new(&r, &s, lit(true)).unwrap();
        let mut cross = CrossJoin::new(&r, &s).unwrap();
        assert_eq!(collect(&mut theta).unwrap(), collect(&mut cross).unwrap());
    }

    #[test]
    fn test_no_matches_is_exhausted() {
        let r = relation(&[("a", ColumnType::Integer)], &[&["5"]]);
        let s = relation(&[("b", ColumnType::Integer)], &[&["1"]]);
        let mut join = ThetaJoin::new(&r, &s, col("a").eq(col("b"))).unwrap();

        join.open().unwrap();
        assert!(join.next().unwrap().is_none());
        assert!(join.next().unwrap().is_none());
    }

    #[test]
    fn test_predicate_errors() {
        let r = relation(&[("a", ColumnType::Integer)], &[&["5"]]);
        let s = relation(&[("b", ColumnType::String)], &[&["x"]]);

        assert!(matches!(
            ThetaJoin::new(&r, &s, col("missing").eq(lit(1_i64))),
            Err(QueryError::ColumnNotFound(_))
        ));

        let mut join = ThetaJoin::new(&r, &s, col("a").eq(col("b"))).unwrap();
        join.open().unwrap();
        assert!(matches!(join.next(), Err(QueryError::TypeMismatch(_))));
    }
}
