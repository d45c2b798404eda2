//! Comparison and arithmetic over data model values.
//!
//! Integers and floats compare and combine numerically; every other pairing
//! of different types is a mismatch.

use relalg_common::Value;
use std::cmp::Ordering;

pub(crate) trait ValueOps {
    fn compare(&self, other: &Value) -> Option<Ordering>;
    fn add(&self, other: &Value) -> Option<Value>;
    fn subtract(&self, other: &Value) -> Option<Value>;
    fn multiply(&self, other: &Value) -> Option<Value>;
    fn divide(&self, other: &Value) -> Option<Value>;
}

enum Numeric {
    Int(i64, i64),
    Float(f64, f64),
}

fn numeric(a: &Value, b: &Value) -> Option<Numeric> {
    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => Some(Numeric::Int(*a, *b)),
        (Value::Integer(a), Value::Float(b)) => Some(Numeric::Float(*a as f64, *b)),
        (Value::Float(a), Value::Integer(b)) => Some(Numeric::Float(*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some(Numeric::Float(*a, *b)),
        _ => None,
    }
}

fn arithmetic(
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Value> {
    match numeric(a, b)? {
        Numeric::Int(a, b) => int_op(a, b).map(Value::Integer),
        Numeric::Float(a, b) => {
            let result = float_op(a, b);
            result.is_finite().then_some(Value::Float(result))
        }
    }
}

impl ValueOps for Value {
    /// Returns None for incomparable types.
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => match numeric(self, other)? {
                Numeric::Int(a, b) => Some(a.cmp(&b)),
                Numeric::Float(a, b) => a.partial_cmp(&b),
            },
        }
    }

    fn add(&self, other: &Value) -> Option<Value> {
        arithmetic(self, other, i64::checked_add, |a, b| a + b)
    }

    fn subtract(&self, other: &Value) -> Option<Value> {
        arithmetic(self, other, i64::checked_sub, |a, b| a - b)
    }

    fn multiply(&self, other: &Value) -> Option<Value> {
        arithmetic(self, other, i64::checked_mul, |a, b| a * b)
    }

    /// Division by zero yields None.
    fn divide(&self, other: &Value) -> Option<Value> {
        arithmetic(self, other, i64::checked_div, |a, b| a / b)
    }
}
