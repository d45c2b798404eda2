//! Ordered, name-unique collections of typed columns.

use crate::error::{DataError, Result};
use crate::types::{Column, ColumnType};
use std::collections::HashMap;

/// One entry of a projection list: a column of the input, optionally renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub column: String,
    pub alias: Option<String>,
}

impl ProjectItem {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: None,
        }
    }

    pub fn aliased(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: Some(alias.into()),
        }
    }

    /// The name the column takes in the projected output.
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column)
    }
}

/// An ordered set of uniquely named columns.
///
/// Equality is structural: two schemas are equal when they have the same
/// number of columns and every column name maps to the same type in both.
/// Column order does not participate.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema, rejecting duplicate column names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if index.insert(column.name().to_string(), i).is_some() {
                return Err(DataError::DuplicateColumn(column.name().to_string()));
            }
        }
        Ok(Self { columns, index })
    }

    /// Convenience constructor from `(name, type)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, ColumnType)>) -> Result<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, column_type)| Column::new(name, column_type))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index_of(name).map(|i| &self.columns[i])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_column_of_type(&self, name: &str, column_type: ColumnType) -> bool {
        self.column(name)
            .is_some_and(|column| column.column_type() == column_type)
    }

    /// Concatenates `self`'s columns with `other`'s.
    ///
    /// A name present in both inputs is rejected with
    /// [`DataError::DuplicateColumn`]; rename one side with [`Schema::project`]
    /// first.
    pub fn join(&self, other: &Schema) -> Result<Schema> {
        let columns = self
            .columns
            .iter()
            .chain(other.columns.iter())
            .cloned()
            .collect();
        Schema::new(columns)
    }

    /// Selects `items` in order, renaming aliased columns and keeping their types.
    pub fn project(&self, items: &[ProjectItem]) -> Result<Schema> {
        let columns = items
            .iter()
            .map(|item| {
                self.column(&item.column)
                    .map(|column| column.renamed(item.output_name()))
                    .ok_or_else(|| {
                        DataError::SchemaMismatch(format!(
                            "cannot project unknown column '{}'",
                            item.column
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Schema::new(columns)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.column_count() == other.column_count()
            && self
                .columns
                .iter()
                .all(|column| other.has_column_of_type(column.name(), column.column_type()))
    }
}

impl Eq for Schema {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ColumnType::*;

    fn schema(pairs: &[(&str, ColumnType)]) -> Schema {
        Schema::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_schema_equality() {
        let s1 = schema(&[("x", Integer), ("y", Boolean)]);
        let s2 = schema(&[("y", Boolean), ("x", Integer)]);
        let s3 = schema(&[("x", Integer), ("z", Boolean)]);
        let s4 = schema(&[("x", Integer), ("y", String)]);
        let s5 = schema(&[("x", Integer)]);
        let s6 = schema(&[("x", Integer), ("y", Boolean), ("w", Integer)]);

        assert_eq!(s1, s2, "order should not matter");
        assert_eq!(s2, s1);
        assert_ne!(s1, s3, "different column name");
        assert_ne!(s1, s4, "different column type");
        assert_ne!(s1, s5, "missing column");
        assert_ne!(s5, s1);
        assert_ne!(s1, s6, "additional column");
        assert_ne!(s6, s1);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Schema::from_pairs([("x", Integer), ("x", Boolean)]);
        assert_eq!(result.unwrap_err(), DataError::DuplicateColumn("x".to_string()));
    }

    #[test]
    fn test_lookups() {
        let s = schema(&[("x", Integer), ("y", Boolean)]);
        assert!(s.has_column("x"));
        assert!(!s.has_column("z"));
        assert!(s.has_column_of_type("y", Boolean));
        assert!(!s.has_column_of_type("y", Integer));
        assert_eq!(s.index_of("y"), Some(1));
        assert_eq!(s.column_names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_join() {
        let s1 = schema(&[("x", Integer)]);
        let s2 = schema(&[("y", Boolean)]);
        let joined = s1.join(&s2).unwrap();

        assert_eq!(joined, schema(&[("x", Integer), ("y", Boolean)]));
        assert_eq!(joined.column_names().collect::<Vec<_>>(), vec!["x", "y"]);
        // Inputs are untouched.
        assert_eq!(s1.column_count(), 1);
        assert_eq!(s2.column_count(), 1);
    }

    #[test]
    fn test_join_collision_rejected() {
        let s1 = schema(&[("x", Integer), ("y", Boolean)]);
        let s2 = schema(&[("y", String)]);
        assert_eq!(
            s1.join(&s2).unwrap_err(),
            DataError::DuplicateColumn("y".to_string())
        );

        let renamed = s2.project(&[ProjectItem::aliased("y", "label")]).unwrap();
        assert_eq!(s1.join(&renamed).unwrap().column_count(), 3);
    }

    #[test]
    fn test_project_with_alias() {
        let s = schema(&[("x", Integer), ("y", Boolean)]);
        let projected = s.project(&[ProjectItem::aliased("x", "z")]).unwrap();

        assert_eq!(projected.column_count(), 1);
        assert!(projected.has_column_of_type("z", Integer));
        assert!(!projected.has_column("x"));
    }

    #[test]
    fn test_project_reorders_and_keeps_types() {
        let s = schema(&[("x", Integer), ("y", Boolean), ("w", Float)]);
        let projected = s
            .project(&[ProjectItem::new("w"), ProjectItem::new("x")])
            .unwrap();
        assert_eq!(projected.column_names().collect::<Vec<_>>(), vec!["w", "x"]);
        assert!(projected.has_column_of_type("w", Float));
    }

    #[test]
    fn test_project_unknown_column() {
        let s = schema(&[("x", Integer)]);
        let err = s.project(&[ProjectItem::new("nope")]).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch(_)));
    }

    #[test]
    fn test_project_alias_collision() {
        let s = schema(&[("x", Integer), ("y", Integer)]);
        let err = s
            .project(&[ProjectItem::new("x"), ProjectItem::aliased("y", "x")])
            .unwrap_err();
        assert_eq!(err, DataError::DuplicateColumn("x".to_string()));
    }

    fn arb_column_type() -> impl Strategy<Value = ColumnType> {
        prop_oneof![Just(Boolean), Just(String), Just(Integer), Just(Float)]
    }

    /// Schemas with unique names drawn from a prefix, so that several of them
    /// can be joined without collisions.
    fn arb_schema(prefix: &'static str) -> impl Strategy<Value = Schema> {
        prop::collection::btree_map("[a-z]{1,6}", arb_column_type(), 0..6).prop_map(move |cols| {
            Schema::new(
                cols.into_iter()
                    .map(|(name, ty)| Column::new(format!("{}_{}", prefix, name), ty))
                    .collect(),
            )
            .unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_equality_is_order_independent(s in arb_schema("a"), seed in any::<u64>()) {
            let mut columns = s.columns().to_vec();
            let len = columns.len().max(1);
            columns.rotate_left((seed as usize) % len);
            let shuffled = Schema::new(columns).unwrap();
            prop_assert_eq!(&s, &shuffled);
            prop_assert_eq!(&shuffled, &s);
        }

        #[test]
        fn prop_equality_is_symmetric(a in arb_schema("a"), b in arb_schema("a")) {
            prop_assert_eq!(a == b, b == a);
        }

        #[test]
        fn prop_join_adds_column_counts(a in arb_schema("a"), b in arb_schema("b")) {
            let joined = a.join(&b).unwrap();
            prop_assert_eq!(joined.column_count(), a.column_count() + b.column_count());
        }

        #[test]
        fn prop_join_is_associative(
            a in arb_schema("a"),
            b in arb_schema("b"),
            c in arb_schema("c"),
        ) {
            let left = a.join(&b).unwrap().join(&c).unwrap();
            let right = a.join(&b.join(&c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }
    }
}
