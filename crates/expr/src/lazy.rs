//! # Lazy Array Expressions
//!
//! A [`LazyArray`] pairs an expression tree with the shape its value would
//! have, plus the shape of every placeholder it reads. Arithmetic checks
//! broadcasting eagerly and builds the tree, but nothing is evaluated: the
//! result is handed to a [`KernelBuilder`](crate::kernel::KernelBuilder) to
//! become a loop kernel.
//!
//! ```rust
//! use symgrad_core::Shape;
//! use symgrad_expr::lazy::LazyArray;
//!
//! let t = LazyArray::placeholder("temperature", Shape::vector(1));
//! let c = LazyArray::placeholder("concentration", Shape::matrix(2, 1));
//!
//! let rate = t.rdiv_scalar(-8590.0).exp()
//!     .mul(&c.subscript(0).unwrap()).unwrap()
//!     .mul(&c.subscript(1).unwrap()).unwrap();
//!
//! assert_eq!(rate.shape(), &Shape::vector(1));
//! assert_eq!(rate.inputs().len(), 2);
//! ```

use std::collections::BTreeMap;

use symgrad_core::{CoreError, Shape};

use crate::error::CodegenError;
use crate::node::{self, var, Expr};

/// A shape-tracked, unevaluated array expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyArray {
    expr: Expr,
    shape: Shape,
    inputs: BTreeMap<String, Shape>,
}

impl LazyArray {
    /// A named input array of the given shape.
    pub fn placeholder(name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        let name = name.into();
        let shape = shape.into();
        let mut inputs = BTreeMap::new();
        inputs.insert(name.clone(), shape.clone());
        Self {
            expr: var(name),
            shape,
            inputs,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Shape of the value this expression denotes.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Every placeholder referenced, with its full shape.
    pub fn inputs(&self) -> &BTreeMap<String, Shape> {
        &self.inputs
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    /// Elementwise `self + other`.
    pub fn add(&self, other: &LazyArray) -> Result<LazyArray, CodegenError> {
        self.combine(other, |a, b| node::add(a, b))
    }

    /// Elementwise `self * other`.
    pub fn mul(&self, other: &LazyArray) -> Result<LazyArray, CodegenError> {
        self.combine(other, |a, b| node::mul(a, b))
    }

    /// Elementwise `self / other`.
    pub fn div(&self, other: &LazyArray) -> Result<LazyArray, CodegenError> {
        self.combine(other, |a, b| node::div(a, b))
    }

    /// `value + self`.
    pub fn add_scalar(&self, value: f64) -> LazyArray {
        self.map(|e| node::add(value, e))
    }

    /// `value * self`.
    pub fn mul_scalar(&self, value: f64) -> LazyArray {
        self.map(|e| node::mul(value, e))
    }

    /// `value / self`.
    pub fn rdiv_scalar(&self, value: f64) -> LazyArray {
        self.map(|e| node::div(value, e))
    }

    pub fn exp(&self) -> LazyArray {
        self.map(|e| var("exp").call(e))
    }

    pub fn log(&self) -> LazyArray {
        self.map(|e| var("log").call(e))
    }

    /// Select element `index` along the leading axis of a placeholder.
    pub fn subscript(&self, index: usize) -> Result<LazyArray, CodegenError> {
        if !matches!(self.expr, Expr::Variable(_)) {
            return Err(CodegenError::SubscriptOfExpression);
        }
        let shape = self.shape.subscript(index)?;
        Ok(LazyArray {
            expr: self.expr.clone().at(index),
            shape,
            inputs: self.inputs.clone(),
        })
    }

    fn map(&self, build: impl FnOnce(Expr) -> Expr) -> LazyArray {
        LazyArray {
            expr: build(self.expr.clone()),
            shape: self.shape.clone(),
            inputs: self.inputs.clone(),
        }
    }

    fn combine(
        &self,
        other: &LazyArray,
        build: fn(Expr, Expr) -> Expr,
    ) -> Result<LazyArray, CodegenError> {
        let shape = self.shape.broadcast(&other.shape)?;

        let mut inputs = self.inputs.clone();
        for (name, shape) in &other.inputs {
            match inputs.get(name) {
                Some(bound) if bound != shape => {
                    return Err(CoreError::ShapeMismatch {
                        lhs: bound.clone(),
                        rhs: shape.clone(),
                    }
                    .into())
                }
                Some(_) => {}
                None => {
                    inputs.insert(name.clone(), shape.clone());
                }
            }
        }

        Ok(LazyArray {
            expr: build(self.expr.clone(), other.expr.clone()),
            shape,
            inputs,
        })
    }
}
