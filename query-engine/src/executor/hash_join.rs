//! Equi-join through an in-memory hash table.
//!
//! `open` hashes the smaller input on its key columns; `next` walks the other
//! input one tuple at a time and emits every build-side match for it.

use super::{Executor, IteratorState, VolcanoIterator};
use crate::{QueryError, Result};
use relalg_common::{Relation, Schema, Tuple, Value};
use std::collections::HashMap;
use tracing::debug;

/// Hashable form of a key value.
///
/// Tuples store values in their column type's native representation and key
/// columns are required to share a type, so both sides of one key part always
/// hold the same variant. Floats hash by bit pattern with `-0.0` folded into
/// `0.0`, matching numeric equality; stored floats are never NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Boolean(bool),
    String(String),
    Integer(i64),
    Float(u64),
}

impl From<&Value> for KeyPart {
    fn from(value: &Value) -> Self {
        match value {
            Value::Boolean(b) => KeyPart::Boolean(*b),
            Value::String(s) => KeyPart::String(s.clone()),
            Value::Integer(i) => KeyPart::Integer(*i),
            Value::Float(f) if *f == 0.0 => KeyPart::Float(0.0_f64.to_bits()),
            Value::Float(f) => KeyPart::Float(f.to_bits()),
        }
    }
}

fn key_of(tuple: &Tuple, key_columns: &[usize]) -> Vec<KeyPart> {
    key_columns
        .iter()
        .map(|&index| KeyPart::from(&tuple.fields()[index].value))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Probe {
    row: usize,
    bucket: usize,
    position: usize,
}

/// Equi-join of `r` and `s` on `(r column, s column)` key pairs.
///
/// Output columns are always `r`'s followed by `s`'s. Output order follows
/// the probe side, with matches for one probe tuple in build-side order.
pub struct HashJoin<'a> {
    r: &'a Relation,
    s: &'a Relation,
    schema: Schema,
    left_keys: Vec<usize>,
    right_keys: Vec<usize>,
    build_side: BuildSide,
    table: HashMap<Vec<KeyPart>, usize>,
    buckets: Vec<Vec<usize>>,
    next_probe_row: usize,
    current: Option<Probe>,
    state: IteratorState,
}

impl<'a> HashJoin<'a> {
    /// Key columns must exist on their side and have the same type.
    pub fn new(r: &'a Relation, s: &'a Relation, on: &[(&str, &str)]) -> Result<Self> {
        if on.is_empty() {
            return Err(QueryError::ExecutionError(
                "hash join needs at least one key pair".to_string(),
            ));
        }
        let schema = r.schema().join(s.schema())?;

        let mut left_keys = Vec::with_capacity(on.len());
        let mut right_keys = Vec::with_capacity(on.len());
        for (left, right) in on {
            let left_index = r
                .schema()
                .index_of(left)
                .ok_or_else(|| QueryError::ColumnNotFound(left.to_string()))?;
            let right_index = s
                .schema()
                .index_of(right)
                .ok_or_else(|| QueryError::ColumnNotFound(right.to_string()))?;
            let left_type = r.schema().columns()[left_index].column_type();
            let right_type = s.schema().columns()[right_index].column_type();
            if left_type != right_type {
                return Err(QueryError::TypeMismatch(format!(
                    "cannot join {} ({}) with {} ({})",
                    left, left_type, right, right_type
                )));
            }
            left_keys.push(left_index);
            right_keys.push(right_index);
        }

        let build_side = if r.row_count() < s.row_count() {
            BuildSide::Left
        } else {
            BuildSide::Right
        };

        Ok(Self {
            r,
            s,
            schema,
            left_keys,
            right_keys,
            build_side,
            table: HashMap::new(),
            buckets: Vec::new(),
            next_probe_row: 0,
            current: None,
            state: IteratorState::Unopened,
        })
    }

    fn build_input(&self) -> (&'a Relation, &[usize]) {
        match self.build_side {
            BuildSide::Left => (self.r, &self.left_keys),
            BuildSide::Right => (self.s, &self.right_keys),
        }
    }

    fn probe_input(&self) -> (&'a Relation, &[usize]) {
        match self.build_side {
            BuildSide::Left => (self.s, &self.right_keys),
            BuildSide::Right => (self.r, &self.left_keys),
        }
    }

    fn emit(&self, probe_row: usize, build_row: usize) -> Result<Tuple> {
        let (build, _) = self.build_input();
        let (probe, _) = self.probe_input();
        let probe_tuple = &probe.tuples()[probe_row];
        let build_tuple = &build.tuples()[build_row];
        let tuple = match self.build_side {
            BuildSide::Left => build_tuple.join(probe_tuple)?,
            BuildSide::Right => probe_tuple.join(build_tuple)?,
        };
        Ok(tuple)
    }
}

impl VolcanoIterator for HashJoin<'_> {
    type Item = Tuple;

    fn open(&mut self) -> Result<()> {
        let (build, build_keys) = self.build_input();
        let mut table: HashMap<Vec<KeyPart>, usize> = HashMap::new();
        let mut buckets: Vec<Vec<usize>> = Vec::new();
        for (row, tuple) in build.tuples().iter().enumerate() {
            let bucket = *table.entry(key_of(tuple, build_keys)).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[bucket].push(row);
        }
        debug!(
            build_side = ?self.build_side,
            build_rows = build.row_count(),
            distinct_keys = buckets.len(),
            "built hash join table"
        );

        self.table = table;
        self.buckets = buckets;
        self.next_probe_row = 0;
        self.current = None;
        self.state = IteratorState::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        if !self.state.check_next("HashJoin")? {
            return Ok(None);
        }
        loop {
            if let Some(probe) = self.current {
                if let Some(&build_row) = self.buckets[probe.bucket].get(probe.position) {
                    self.current = Some(Probe {
                        position: probe.position + 1,
                        ..probe
                    });
                    return self.emit(probe.row, build_row).map(Some);
                }
                self.current = None;
            }

            let (probe_input, probe_keys) = self.probe_input();
            let Some(tuple) = probe_input.get(self.next_probe_row) else {
                self.state = IteratorState::Exhausted;
                return Ok(None);
            };
            let key = key_of(tuple, probe_keys);
            let row = self.next_probe_row;
            self.next_probe_row += 1;
            if let Some(&bucket) = self.table.get(&key) {
                self.current = Some(Probe {
                    row,
                    bucket,
                    position: 0,
                });
            }
        }
    }

    fn close(&mut self) {
        self.table = HashMap::new();
        self.buckets = Vec::new();
        self.current = None;
        self.state = IteratorState::Closed;
    }
}

impl Executor for HashJoin<'_> {
    fn schema(&self) -> &Schema {
        &self.schema
    }
}
