//! Defines the Relation structure which owns an ordered collection of tuples sharing one schema.

use crate::error::{DataError, Result};
use crate::schema::Schema;
use crate::tuple::{Field, Tuple};
use std::sync::Arc;
use tracing::{debug, trace};

/// An append-only, in-memory table.
///
/// Every stored tuple structurally matches the relation's schema, every value
/// has been accepted by its column, and fields are laid out in schema order.
#[derive(Debug, Clone)]
pub struct Relation {
    schema: Arc<Schema>,
    tuples: Vec<Tuple>,
}

impl Relation {
    /// Creates a relation, validating each initial tuple against `schema`.
    pub fn new(schema: impl Into<Arc<Schema>>, tuples: Vec<Tuple>) -> Result<Self> {
        let schema = schema.into();
        let tuples = tuples
            .into_iter()
            .map(|tuple| tuple.conform(&schema))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            columns = schema.column_count(),
            rows = tuples.len(),
            "created relation"
        );
        Ok(Self { schema, tuples })
    }

    pub fn empty(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
            tuples: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn get(&self, index: usize) -> Option<&Tuple> {
        self.tuples.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Appends an already built tuple.
    pub fn push(&mut self, tuple: Tuple) -> Result<()> {
        let tuple = tuple.conform(&self.schema)?;
        self.tuples.push(tuple);
        Ok(())
    }

    /// Parses `(column, raw text)` pairs through the schema's columns and appends the row.
    ///
    /// Every column of the schema must be supplied exactly once; unknown
    /// columns, unparseable text and values rejected by their column all fail
    /// without modifying the relation.
    pub fn add_row(&mut self, data: &[(&str, &str)]) -> Result<()> {
        let fields = data
            .iter()
            .map(|(name, text)| {
                let column = self.schema.column(name).ok_or_else(|| {
                    DataError::SchemaMismatch(format!("relation has no column '{}'", name))
                })?;
                let value = column.parse(text)?;
                Ok(Field::new(column.clone(), value))
            })
            .collect::<Result<Vec<_>>>()?;

        let tuple = Tuple::try_new(fields)?;
        self.push(tuple)?;
        trace!(rows = self.tuples.len(), "appended row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, ColumnType, Value};

    fn flag_count_schema() -> Schema {
        Schema::from_pairs([("flag", ColumnType::Boolean), ("count", ColumnType::Integer)])
            .unwrap()
    }

    fn flag_count(flag: bool, count: i64) -> Tuple {
        Tuple::try_new(vec![
            Field::new(Column::new("flag", ColumnType::Boolean), flag),
            Field::new(Column::new("count", ColumnType::Integer), count),
        ])
        .unwrap()
    }

    #[test]
    fn test_relation_row_count_after_init() {
        let relation = Relation::new(flag_count_schema(), vec![flag_count(true, 4)]).unwrap();
        assert_eq!(relation.row_count(), 1);
    }

    #[test]
    fn test_relation_rejects_mismatching_tuple() {
        let partial =
            Tuple::try_new(vec![Field::new(Column::new("flag", ColumnType::Boolean), true)])
                .unwrap();
        let err = Relation::new(flag_count_schema(), vec![partial.clone()]).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch(_)));

        let mut relation = Relation::empty(flag_count_schema());
        assert!(relation.push(partial).is_err());
        assert_eq!(relation.row_count(), 0);
    }

    #[test]
    fn test_add_row() {
        let mut relation = Relation::new(flag_count_schema(), vec![flag_count(true, 4)]).unwrap();
        relation
            .add_row(&[("flag", "false"), ("count", "2")])
            .unwrap();

        assert_eq!(relation.row_count(), 2);
        let added = relation.get(1).unwrap();
        assert_eq!(added.get("flag"), Some(&Value::Boolean(false)));
        assert_eq!(added.get("count"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_add_row_any_column_order() {
        let mut relation = Relation::empty(flag_count_schema());
        relation
            .add_row(&[("count", "7"), ("flag", "true")])
            .unwrap();
        assert_eq!(relation.row_count(), 1);
        assert!(relation.tuples()[0].matches(relation.schema()));
        assert_eq!(
            relation.tuples()[0].values().next(),
            Some(&Value::Boolean(true)),
            "fields are stored in schema order"
        );
    }

    #[test]
    fn test_add_row_rejects_non_finite_float_text() {
        let mut relation =
            Relation::empty(Schema::from_pairs([("ratio", ColumnType::Float)]).unwrap());
        for text in ["inf", "1e400"] {
            let err = relation.add_row(&[("ratio", text)]).unwrap_err();
            assert_eq!(
                err,
                DataError::Parse {
                    column_type: ColumnType::Float,
                    text: text.to_string()
                }
            );
        }
        assert!(relation.is_empty());
    }

    #[test]
    fn test_add_row_failures_leave_relation_untouched() {
        let mut relation = Relation::empty(flag_count_schema());

        let unknown = relation.add_row(&[("flag", "true"), ("nope", "1")]);
        assert!(matches!(unknown, Err(DataError::SchemaMismatch(_))));

        let unparseable = relation.add_row(&[("flag", "true"), ("count", "four")]);
        assert!(matches!(unparseable, Err(DataError::Parse { .. })));

        let missing = relation.add_row(&[("flag", "true")]);
        assert!(matches!(missing, Err(DataError::SchemaMismatch(_))));

        let repeated = relation.add_row(&[("flag", "true"), ("flag", "false"), ("count", "1")]);
        assert!(matches!(repeated, Err(DataError::DuplicateColumn(_))));

        assert_eq!(relation.row_count(), 0);
    }
}
