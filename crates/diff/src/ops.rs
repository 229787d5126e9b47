//! # Differentiable Operations
//!
//! [`AdOp`] is the set of operations an AD graph records. Each operation
//! knows how to:
//!
//! - Execute forward (compute its value from operand values)
//! - Compute its VJP (distribute an upstream seed to each operand)
//!
//! ## Operations
//!
//! | Op | Forward | VJP |
//! |----|---------|-----|
//! | Input | x | seed |
//! | Add | a + b | seed, seed |
//! | AddScalar | x + c | seed |
//! | Mul | a * b | seed * b, seed * a |
//! | MulScalar | c * x | seed * c |
//! | Div | a / b | seed / b, -seed * a / b² |
//! | ScalarDiv | c / x | -seed * c / x² |
//! | Exp | exp(x) | seed * exp(x) |
//! | Log | ln(x) | seed / x |
//! | Subscript | x[i] | seed scattered into zeros at row i |
//!
//! Contributions have the shape of the node's value; the walker reduces
//! them to each operand's shape afterwards.

use std::fmt;

use ndarray::Axis;

use crate::array::{broadcast_with, shape_of, Array};
use crate::error::DiffError;

/// An operation recorded in an AD graph.
#[derive(Debug, Clone, PartialEq)]
pub enum AdOp {
    /// Named leaf
    Input { name: String },
    Add,
    AddScalar { value: f64 },
    Mul,
    MulScalar { value: f64 },
    /// Node divided by node
    Div,
    /// Constant divided by node
    ScalarDiv { numerator: f64 },
    Exp,
    Log,
    /// Selection along the leading axis
    Subscript { index: usize },
}

impl AdOp {
    /// Short operation name.
    pub fn name(&self) -> &'static str {
        match self {
            AdOp::Input { .. } => "input",
            AdOp::Add | AdOp::AddScalar { .. } => "add",
            AdOp::Mul | AdOp::MulScalar { .. } => "mul",
            AdOp::Div | AdOp::ScalarDiv { .. } => "div",
            AdOp::Exp => "exp",
            AdOp::Log => "log",
            AdOp::Subscript { .. } => "subscript",
        }
    }

    /// Number of graph operands.
    pub fn arity(&self) -> usize {
        match self {
            AdOp::Add | AdOp::Mul | AdOp::Div => 2,
            _ => 1,
        }
    }

    /// Compute the value of this operation.
    ///
    /// An `Input` passes its single operand (the leaf's current value)
    /// through unchanged.
    pub fn forward(&self, operands: &[&Array]) -> Result<Array, DiffError> {
        let x = self.operand(operands, 0)?;
        match self {
            AdOp::Input { .. } => Ok(x.clone()),
            AdOp::Add => broadcast_with(x, self.operand(operands, 1)?, |a, b| a + b),
            AdOp::AddScalar { value } => Ok(x.mapv(|a| a + value)),
            AdOp::Mul => broadcast_with(x, self.operand(operands, 1)?, |a, b| a * b),
            AdOp::MulScalar { value } => Ok(x.mapv(|a| value * a)),
            AdOp::Div => broadcast_with(x, self.operand(operands, 1)?, |a, b| a / b),
            AdOp::ScalarDiv { numerator } => Ok(x.mapv(|a| numerator / a)),
            AdOp::Exp => Ok(x.mapv(f64::exp)),
            AdOp::Log => Ok(x.mapv(f64::ln)),
            AdOp::Subscript { index } => {
                shape_of(x).subscript(*index)?;
                Ok(x.index_axis(Axis(0), *index).to_owned())
            }
        }
    }

    /// Vector-Jacobian product: one contribution per operand, in port order.
    pub fn vjp(&self, operands: &[&Array], seed: &Array) -> Result<Vec<Array>, DiffError> {
        let x = self.operand(operands, 0)?;
        let grads = match self {
            AdOp::Input { .. } | AdOp::AddScalar { .. } => vec![seed.clone()],
            AdOp::Add => vec![seed.clone(), seed.clone()],
            AdOp::Mul => {
                let y = self.operand(operands, 1)?;
                vec![
                    broadcast_with(seed, y, |s, b| s * b)?,
                    broadcast_with(seed, x, |s, a| s * a)?,
                ]
            }
            AdOp::MulScalar { value } => vec![seed.mapv(|s| s * value)],
            AdOp::Div => {
                let y = self.operand(operands, 1)?;
                let seed_times_a = broadcast_with(seed, x, |s, a| s * a)?;
                vec![
                    broadcast_with(seed, y, |s, b| s / b)?,
                    broadcast_with(&seed_times_a, y, |sa, b| -sa / (b * b))?,
                ]
            }
            AdOp::ScalarDiv { numerator } => {
                vec![broadcast_with(seed, x, |s, a| -s * numerator / (a * a))?]
            }
            AdOp::Exp => vec![broadcast_with(seed, x, |s, a| s * a.exp())?],
            AdOp::Log => vec![broadcast_with(seed, x, |s, a| s / a)?],
            AdOp::Subscript { index } => {
                shape_of(x).subscript(*index)?;
                let mut full = Array::zeros(x.raw_dim());
                full.index_axis_mut(Axis(0), *index).assign(seed);
                vec![full]
            }
        };
        Ok(grads)
    }

    fn operand<'a>(&self, operands: &[&'a Array], port: usize) -> Result<&'a Array, DiffError> {
        operands
            .get(port)
            .copied()
            .ok_or(DiffError::MissingOperand {
                op: self.name(),
                port,
            })
    }
}

impl fmt::Display for AdOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdOp::Input { name } => write!(f, "{}", name),
            AdOp::Add => write!(f, "+"),
            AdOp::AddScalar { value } => write!(f, "+ {}", value),
            AdOp::Mul => write!(f, "*"),
            AdOp::MulScalar { value } => write!(f, "* {}", value),
            AdOp::Div => write!(f, "/"),
            AdOp::ScalarDiv { numerator } => write!(f, "{} /", numerator),
            AdOp::Exp => write!(f, "exp"),
            AdOp::Log => write!(f, "log"),
            AdOp::Subscript { index } => write!(f, "[{}]", index),
        }
    }
}
