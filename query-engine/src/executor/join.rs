//! Join strategy selection.
//!
//! Every join kind is its own executor type; [`build_join`] picks one at
//! construction time and hands it back behind the common [`Executor`] interface.

use super::{BoxedExecutor, CrossJoin, HashJoin, ThetaJoin};
use crate::expression::Expression;
use crate::Result;
use relalg_common::Relation;
use tracing::debug;

/// Which join algorithm to run.
#[derive(Debug, Clone)]
pub enum JoinKind {
    /// Cartesian product.
    Cross,
    /// Nested loop filtered by a boolean predicate over the joined schema.
    Theta(Expression),
    /// Equi-join on `(r column, s column)` pairs.
    Hash { on: Vec<(String, String)> },
}

impl JoinKind {
    pub fn name(&self) -> &'static str {
        match self {
            JoinKind::Cross => "cross",
            JoinKind::Theta(_) => "theta",
            JoinKind::Hash { .. } => "hash",
        }
    }
}

/// Builds the executor for `kind` over `r` and `s`.
pub fn build_join<'a>(kind: JoinKind, r: &'a Relation, s: &'a Relation) -> Result<BoxedExecutor<'a>> {
    debug!(kind = kind.name(), "building join");
    let join: BoxedExecutor<'a> = match kind {
        JoinKind::Cross => Box::new(CrossJoin::new(r, s)?),
        JoinKind::Theta(predicate) => Box::new(ThetaJoin::new(r, s, predicate)?),
        JoinKind::Hash { on } => {
            let on: Vec<(&str, &str)> = on.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
            Box::new(HashJoin::new(r, s, &on)?)
        }
    };
    Ok(join)
}
