//! Immutable rows.

use crate::error::{DataError, Result};
use crate::schema::{ProjectItem, Schema};
use crate::types::{Column, Value};
use std::sync::OnceLock;

/// A column together with the value a tuple holds for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub column: Column,
    pub value: Value,
}

impl Field {
    pub fn new(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// An immutable row of `(column, value)` pairs keyed by column name.
///
/// The tuple's schema is derived from its own columns the first time it is
/// asked for and cached afterwards. Fields never change after construction so
/// the cache never needs invalidating.
#[derive(Debug, Clone)]
pub struct Tuple {
    fields: Vec<Field>,
    schema: OnceLock<Schema>,
}

impl Tuple {
    /// Builds a tuple, checking every value against its column's predicate.
    ///
    /// Accepted values are stored in their column type's native
    /// representation, so `Float(42.0)` in an Integer column is kept as
    /// `Integer(42)`.
    pub fn try_new(mut fields: Vec<Field>) -> Result<Self> {
        for i in 0..fields.len() {
            let (prior, rest) = fields.split_at_mut(i);
            let field = &mut rest[0];
            let native = field.column.to_native(&field.value).ok_or_else(|| {
                DataError::TypeMismatch {
                    column: field.column.name().to_string(),
                    column_type: field.column.column_type(),
                    value: field.value.clone(),
                }
            })?;
            if prior
                .iter()
                .any(|other| other.column.name() == field.column.name())
            {
                return Err(DataError::DuplicateColumn(field.column.name().to_string()));
            }
            field.value = native;
        }
        Ok(Self {
            fields,
            schema: OnceLock::new(),
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|field| &field.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema derived from this tuple's columns.
    pub fn schema(&self) -> &Schema {
        self.schema.get_or_init(|| {
            Schema::new(self.fields.iter().map(|field| field.column.clone()).collect())
                .expect("tuple column names are unique")
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema()
            .index_of(name)
            .map(|index| &self.fields[index].value)
    }

    pub fn matches(&self, schema: &Schema) -> bool {
        self.schema() == schema
    }

    /// Checks the tuple against `schema` and lays its fields out in schema order.
    pub fn conform(self, schema: &Schema) -> Result<Tuple> {
        if !self.matches(schema) {
            return Err(DataError::SchemaMismatch(format!(
                "tuple columns [{}] do not match [{}]",
                self.schema().column_names().collect::<Vec<_>>().join(", "),
                schema.column_names().collect::<Vec<_>>().join(", "),
            )));
        }
        let in_order = self
            .fields
            .iter()
            .zip(schema.column_names())
            .all(|(field, name)| field.column.name() == name);
        if in_order {
            return Ok(self);
        }

        let mut slots: Vec<Option<Field>> = vec![None; self.fields.len()];
        for field in self.fields {
            // Present: the schemas are equal.
            if let Some(index) = schema.index_of(field.column.name()) {
                slots[index] = Some(field);
            }
        }
        Ok(Tuple {
            fields: slots.into_iter().flatten().collect(),
            schema: OnceLock::new(),
        })
    }

    /// Concatenates this tuple's fields with `other`'s.
    pub fn join(&self, other: &Tuple) -> Result<Tuple> {
        let fields = self
            .fields
            .iter()
            .chain(other.fields.iter())
            .cloned()
            .collect();
        Tuple::try_new(fields)
    }

    /// Selects and renames fields the same way [`Schema::project`] does.
    pub fn project(&self, items: &[ProjectItem]) -> Result<Tuple> {
        let fields = items
            .iter()
            .map(|item| {
                let index = self.schema().index_of(&item.column).ok_or_else(|| {
                    DataError::SchemaMismatch(format!(
                        "cannot project unknown column '{}'",
                        item.column
                    ))
                })?;
                let field = &self.fields[index];
                Ok(Field {
                    column: field.column.renamed(item.output_name()),
                    value: field.value.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Tuple::try_new(fields)
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}
