//! # Diff - Reverse-Mode Differentiation of Array Expressions
//!
//! An eager, array-valued computation graph with exact gradients.
//!
//! ## Core Concepts
//!
//! - **Eager values**: every node holds its forward value from the moment
//!   it is created
//! - **Named leaves**: gradients are reported per input name
//! - **Reverse accumulation**: one backward sweep sums the contributions of
//!   every path from the root to each leaf
//! - **Broadcasting**: operands combine under trailing-axis broadcasting and
//!   gradients are summed back to each operand's shape
//!
//! ## Modules
//!
//! - [`array`] - Broadcasting kernels and gradient reduction
//! - [`ops`] - Recorded operations with forward and VJP rules
//! - [`graph`] - The node arena and its builder methods
//! - [`backward`] - The gradient walker
//! - [`check`] - Finite-difference gradient checking
//! - [`lower`] - Evaluating a symbolic expression on the graph
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use symgrad_diff::{grad_check, AdGraph, GradCheckConfig};
//!
//! let mut graph = AdGraph::new();
//! let t = graph.input("T", array![300.0].into_dyn());
//!
//! // exp(-8590 / T)
//! let q = graph.div(-8590.0, t).unwrap();
//! let k = graph.exp(q).unwrap();
//!
//! let grads = graph.gradient(k).unwrap();
//! let expected = (-8590.0_f64 / 300.0).exp() * 8590.0 / (300.0 * 300.0);
//! assert!((grads.get("T").unwrap().sum() - expected).abs() < 1e-20);
//!
//! grad_check(&graph, k, GradCheckConfig::default()).unwrap();
//! ```

pub mod array;
pub mod backward;
pub mod check;
pub mod error;
pub mod graph;
pub mod lower;
pub mod ops;

pub use array::Array;
pub use backward::Gradients;
pub use check::{grad_check, numerical_gradient, GradCheckConfig, GradCheckError};
pub use error::DiffError;
pub use graph::{AdGraph, AdNode, Operand};
pub use lower::lower;
pub use ops::AdOp;
