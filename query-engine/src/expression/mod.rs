//! Expression system for building join predicates.
//!
//! Provides a fluent API for building expressions like `col("r_id").eq(col("s_id"))`.

use crate::types::ValueOps;
use crate::{QueryError, Result};
use relalg_common::{Schema, Tuple, Value};
use std::cmp::Ordering;

/// An expression that can be evaluated against a tuple.
#[derive(Debug, Clone)]
pub enum Expression {
    /// Reference to a column by name
    Column(String),
    /// Reference to a column by index (after binding)
    BoundColumn(usize),
    /// Literal value
    Literal(Value),
    /// Binary operation (e.g., a + b, a > b)
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    /// Unary operation (NOT)
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

impl Expression {
    /// Binds column names to column indices based on a schema.
    pub fn bind(&self, schema: &Schema) -> Result<Expression> {
        match self {
            Expression::Column(name) => {
                let index = schema
                    .index_of(name)
                    .ok_or_else(|| QueryError::ColumnNotFound(name.clone()))?;
                Ok(Expression::BoundColumn(index))
            }
            Expression::BoundColumn(_) => Ok(self.clone()),
            Expression::Literal(_) => Ok(self.clone()),
            Expression::BinaryOp { left, op, right } => Ok(Expression::BinaryOp {
                left: Box::new(left.bind(schema)?),
                op: *op,
                right: Box::new(right.bind(schema)?),
            }),
            Expression::UnaryOp { op, expr } => Ok(Expression::UnaryOp {
                op: *op,
                expr: Box::new(expr.bind(schema)?),
            }),
        }
    }

    /// Evaluates the expression against a tuple whose fields are in bound schema order.
    pub fn evaluate(&self, tuple: &Tuple) -> Result<Value> {
        match self {
            Expression::Column(name) => Err(QueryError::ExecutionError(format!(
                "Unbound column: {}. Call bind() first.",
                name
            ))),
            Expression::BoundColumn(index) => tuple
                .fields()
                .get(*index)
                .map(|field| field.value.clone())
                .ok_or_else(|| {
                    QueryError::ExecutionError(format!("Column index {} out of bounds", index))
                }),
            Expression::Literal(val) => Ok(val.clone()),
            Expression::BinaryOp { left, op, right } => {
                let left_val = left.evaluate(tuple)?;
                let right_val = right.evaluate(tuple)?;
                self.evaluate_binary_op(&left_val, *op, &right_val)
            }
            Expression::UnaryOp { op, expr } => {
                let val = expr.evaluate(tuple)?;
                self.evaluate_unary_op(*op, &val)
            }
        }
    }

    /// Evaluates the expression and requires a boolean result.
    pub fn evaluate_predicate(&self, tuple: &Tuple) -> Result<bool> {
        match self.evaluate(tuple)? {
            Value::Boolean(b) => Ok(b),
            other => Err(QueryError::TypeMismatch(format!(
                "Predicate produced {:?}, expected a boolean",
                other
            ))),
        }
    }

    fn evaluate_binary_op(
        &self,
        left: &Value,
        op: BinaryOperator,
        right: &Value,
    ) -> Result<Value> {
        use BinaryOperator::*;
        match op {
            Add => left.add(right).ok_or_else(|| {
                QueryError::TypeMismatch(format!("Cannot add {:?} and {:?}", left, right))
            }),
            Subtract => left.subtract(right).ok_or_else(|| {
                QueryError::TypeMismatch(format!("Cannot subtract {:?} and {:?}", left, right))
            }),
            Multiply => left.multiply(right).ok_or_else(|| {
                QueryError::TypeMismatch(format!("Cannot multiply {:?} and {:?}", left, right))
            }),
            Divide => left.divide(right).ok_or_else(|| {
                QueryError::TypeMismatch(format!("Cannot divide {:?} by {:?}", left, right))
            }),
            Eq => self.comparison(left, right, |o| o == Ordering::Equal),
            NotEq => self.comparison(left, right, |o| o != Ordering::Equal),
            Lt => self.comparison(left, right, |o| o == Ordering::Less),
            LtEq => self.comparison(left, right, |o| o != Ordering::Greater),
            Gt => self.comparison(left, right, |o| o == Ordering::Greater),
            GtEq => self.comparison(left, right, |o| o != Ordering::Less),
            And | Or => match (left, right) {
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(if op == And {
                    *a && *b
                } else {
                    *a || *b
                })),
                _ => Err(QueryError::TypeMismatch(format!(
                    "Cannot apply {:?} to {:?} and {:?}",
                    op, left, right
                ))),
            },
        }
    }

    fn comparison(
        &self,
        left: &Value,
        right: &Value,
        test: impl Fn(Ordering) -> bool,
    ) -> Result<Value> {
        left.compare(right)
            .map(|ordering| Value::Boolean(test(ordering)))
            .ok_or_else(|| {
                QueryError::TypeMismatch(format!("Cannot compare {:?} and {:?}", left, right))
            })
    }

    fn evaluate_unary_op(&self, op: UnaryOperator, val: &Value) -> Result<Value> {
        match op {
            UnaryOperator::Not => match val {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                _ => Err(QueryError::TypeMismatch(format!(
                    "Cannot apply NOT to {:?}",
                    val
                ))),
            },
        }
    }

    // ===== Builder Methods for Fluent API =====

    fn binary(self, op: BinaryOperator, other: Expression) -> Expression {
        Expression::BinaryOp {
            left: Box::new(self),
            op,
            right: Box::new(other),
        }
    }

    /// Creates an equality comparison: `self == other`
    pub fn eq(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Eq, other)
    }

    /// Creates an inequality comparison: `self != other`
    pub fn not_eq(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::NotEq, other)
    }

    /// Creates a less-than comparison: `self < other`
    pub fn lt(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Lt, other)
    }

    /// Creates a less-than-or-equal comparison: `self <= other`
    pub fn lt_eq(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::LtEq, other)
    }

    /// Creates a greater-than comparison: `self > other`
    pub fn gt(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Gt, other)
    }

    /// Creates a greater-than-or-equal comparison: `self >= other`
    pub fn gt_eq(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::GtEq, other)
    }

    /// Creates an AND logical operation: `self AND other`
    pub fn and(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::And, other)
    }

    /// Creates an OR logical operation: `self OR other`
    pub fn or(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Or, other)
    }

    /// Creates an addition operation: `self + other`
    pub fn add(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Add, other)
    }

    pub fn subtract(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Subtract, other)
    }

    pub fn multiply(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Multiply, other)
    }

    pub fn divide(self, other: Expression) -> Expression {
        self.binary(BinaryOperator::Divide, other)
    }

    /// Negates a boolean expression.
    pub fn not(self) -> Expression {
        Expression::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self),
        }
    }
}

// ===== Helper Functions for Building Expressions =====

/// Creates a column reference expression.
pub fn col(name: &str) -> Expression {
    Expression::Column(name.to_string())
}

/// Creates a literal expression.
pub fn lit(value: impl Into<Value>) -> Expression {
    Expression::Literal(value.into())
}
