//! Error types for AD graph construction, evaluation and differentiation.

use symgrad_core::CoreError;
use thiserror::Error;

use crate::check::GradCheckError;

/// Errors raised by [`AdGraph`](crate::graph::AdGraph) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiffError {
    /// Operand shapes are incompatible.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Both operands were bare constants, so there is no node to record.
    #[error("Operation `{op}` needs at least one graph node operand")]
    UnsupportedOperands { op: &'static str },

    /// A node index that does not belong to this graph.
    #[error("Node {index} is not part of this graph")]
    UnknownNode { index: usize },

    /// The graph is not a DAG.
    #[error("Graph contains a cycle through node {index}")]
    CyclicGraph { index: usize },

    /// An operation was evaluated with too few operand values.
    #[error("Operation `{op}` is missing operand {port}")]
    MissingOperand { op: &'static str, port: usize },

    /// A call to a function with no array implementation.
    #[error("Unknown function `{name}`")]
    UnknownFunction { name: String },

    /// A subscript by loop variable, which has no concrete value.
    #[error("Symbolic index `{name}` cannot be evaluated")]
    SymbolicIndex { name: String },

    /// A variable with no input node bound to it.
    #[error("Variable `{name}` has no bound input")]
    UnboundVariable { name: String },

    /// Analytic and numerical gradients disagree.
    #[error(transparent)]
    GradientMismatch(#[from] GradCheckError),
}
