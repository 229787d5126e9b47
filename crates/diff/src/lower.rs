//! # Lowering Expressions onto an AD Graph
//!
//! Interprets a symbolic [`Expr`] with concrete arrays, so one formula can
//! be both rendered by a code-generation mapper and differentiated.
//!
//! | Expr | Lowered to |
//! |------|------------|
//! | `Constant(v)` | `Operand::Scalar(v)` |
//! | `Variable(name)` | the node bound to `name` |
//! | `Sum` / `Product` | left fold of `add` / `mul` |
//! | `Quotient` | `div` |
//! | `Call(exp \| log, x)` | `exp` / `log` |
//! | `Subscript(x, k)` | `subscript(x, k)` |
//!
//! Operations whose operands are all constants are folded, so the result
//! is a node whenever the expression references at least one variable.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use symgrad_core::{CoreError, Shape};
use symgrad_expr::{Expr, Index};

use crate::error::DiffError;
use crate::graph::{AdGraph, Operand};

type Build = fn(&mut AdGraph, Operand, Operand) -> Result<NodeIndex, DiffError>;

/// Record `expr` on `graph`, reading variables from `bindings`.
pub fn lower(
    graph: &mut AdGraph,
    expr: &Expr,
    bindings: &BTreeMap<String, NodeIndex>,
) -> Result<Operand, DiffError> {
    match expr {
        Expr::Constant(value) => Ok(Operand::Scalar(*value)),
        Expr::Variable(name) => bindings
            .get(name)
            .copied()
            .map(Operand::Node)
            .ok_or_else(|| DiffError::UnboundVariable { name: name.clone() }),
        Expr::Sum(children) => {
            fold(graph, children, bindings, 0.0, |g, a, b| g.add(a, b), |a, b| a + b)
        }
        Expr::Product(children) => {
            fold(graph, children, bindings, 1.0, |g, a, b| g.mul(a, b), |a, b| a * b)
        }
        Expr::Quotient {
            numerator,
            denominator,
        } => {
            let a = lower(graph, numerator, bindings)?;
            let b = lower(graph, denominator, bindings)?;
            combine(graph, a, b, |g, a, b| g.div(a, b), |a, b| a / b)
        }
        Expr::Call { function, argument } => {
            let name = match function.name() {
                Some(name) => name,
                None => {
                    return Err(DiffError::UnknownFunction {
                        name: function.to_string(),
                    })
                }
            };
            match (name, lower(graph, argument, bindings)?) {
                ("exp", Operand::Node(x)) => graph.exp(x).map(Operand::Node),
                ("exp", Operand::Scalar(v)) => Ok(Operand::Scalar(v.exp())),
                ("log", Operand::Node(x)) => graph.log(x).map(Operand::Node),
                ("log", Operand::Scalar(v)) => Ok(Operand::Scalar(v.ln())),
                (other, _) => Err(DiffError::UnknownFunction {
                    name: other.to_string(),
                }),
            }
        }
        Expr::Subscript { base, index } => {
            let k = match index {
                Index::Integer(k) => *k,
                Index::Variable(name) => return Err(DiffError::SymbolicIndex { name: name.clone() }),
            };
            match lower(graph, base, bindings)? {
                Operand::Node(x) => graph.subscript(x, k).map(Operand::Node),
                Operand::Scalar(_) => Err(CoreError::NotSubscriptable {
                    shape: Shape::scalar(),
                }
                .into()),
            }
        }
    }
}

fn fold(
    graph: &mut AdGraph,
    children: &[Expr],
    bindings: &BTreeMap<String, NodeIndex>,
    identity: f64,
    build: Build,
    eval: fn(f64, f64) -> f64,
) -> Result<Operand, DiffError> {
    let mut acc: Option<Operand> = None;
    for child in children {
        let next = lower(graph, child, bindings)?;
        acc = Some(match acc {
            None => next,
            Some(prev) => combine(graph, prev, next, build, eval)?,
        });
    }
    Ok(acc.unwrap_or(Operand::Scalar(identity)))
}

fn combine(
    graph: &mut AdGraph,
    a: Operand,
    b: Operand,
    build: Build,
    eval: fn(f64, f64) -> f64,
) -> Result<Operand, DiffError> {
    match (a, b) {
        (Operand::Scalar(x), Operand::Scalar(y)) => Ok(Operand::Scalar(eval(x, y))),
        (a, b) => build(graph, a, b).map(Operand::Node),
    }
}
