//! # AD Graph
//!
//! An append-only arena of array-valued nodes. Every builder method
//! computes its node's value immediately, so the graph records *how* each
//! value was obtained rather than deferring the computation.
//!
//! Nodes are stored in a petgraph `DiGraph`; an edge runs from an operand
//! to the node that consumes it and carries the operand's port. A node may
//! feed any number of consumers, and because nodes only ever reference
//! earlier nodes the graph stays acyclic.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use symgrad_diff::graph::AdGraph;
//!
//! let mut graph = AdGraph::new();
//! let x = graph.input("x", array![1.0, 2.0, 3.0].into_dyn());
//!
//! // y = x * x + x
//! let xx = graph.mul(x, x).unwrap();
//! let y = graph.add(xx, x).unwrap();
//!
//! let grads = graph.gradient(y).unwrap();
//! assert_eq!(grads.get("x").unwrap(), &array![3.0, 5.0, 7.0].into_dyn());
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use log::trace;
use petgraph::algo::toposort;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef, Reversed};
use petgraph::Direction;
use symgrad_core::CoreError;

use crate::array::{shape_of, Array};
use crate::error::DiffError;
use crate::ops::AdOp;

/// A recorded operation together with its forward value.
#[derive(Debug, Clone)]
pub struct AdNode {
    pub op: AdOp,
    pub values: Array,
}

impl AdNode {
    /// The input name, for named leaves.
    pub fn name(&self) -> Option<&str> {
        match &self.op {
            AdOp::Input { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for AdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, shape_of(&self.values))
    }
}

/// Operand slot of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub port: usize,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.port)
    }
}

/// Either a graph node or a bare constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Node(NodeIndex),
    Scalar(f64),
}

impl From<NodeIndex> for Operand {
    fn from(index: NodeIndex) -> Self {
        Operand::Node(index)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

/// Array-valued computation graph for reverse-mode differentiation.
#[derive(Debug, Clone, Default)]
pub struct AdGraph {
    pub(crate) graph: DiGraph<AdNode, Edge>,
}

impl AdGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named leaf holding `values`.
    pub fn input(&mut self, name: impl Into<String>, values: Array) -> NodeIndex {
        let name = name.into();
        trace!("input {} {}", name, shape_of(&values));
        self.graph.add_node(AdNode {
            op: AdOp::Input { name },
            values,
        })
    }

    /// `a + b`, broadcasting.
    pub fn add(
        &mut self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
    ) -> Result<NodeIndex, DiffError> {
        match (a.into(), b.into()) {
            (Operand::Node(a), Operand::Node(b)) => self.push(AdOp::Add, &[a, b]),
            (Operand::Node(x), Operand::Scalar(value)) | (Operand::Scalar(value), Operand::Node(x)) => {
                self.push(AdOp::AddScalar { value }, &[x])
            }
            (Operand::Scalar(_), Operand::Scalar(_)) => {
                Err(DiffError::UnsupportedOperands { op: "add" })
            }
        }
    }

    /// `a * b`, broadcasting.
    pub fn mul(
        &mut self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
    ) -> Result<NodeIndex, DiffError> {
        match (a.into(), b.into()) {
            (Operand::Node(a), Operand::Node(b)) => self.push(AdOp::Mul, &[a, b]),
            (Operand::Node(x), Operand::Scalar(value)) | (Operand::Scalar(value), Operand::Node(x)) => {
                self.push(AdOp::MulScalar { value }, &[x])
            }
            (Operand::Scalar(_), Operand::Scalar(_)) => {
                Err(DiffError::UnsupportedOperands { op: "mul" })
            }
        }
    }

    /// `a / b`, broadcasting. Division by a constant is recorded as
    /// multiplication by its reciprocal.
    pub fn div(
        &mut self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
    ) -> Result<NodeIndex, DiffError> {
        match (a.into(), b.into()) {
            (Operand::Node(a), Operand::Node(b)) => self.push(AdOp::Div, &[a, b]),
            (Operand::Node(x), Operand::Scalar(c)) => {
                self.push(AdOp::MulScalar { value: 1.0 / c }, &[x])
            }
            (Operand::Scalar(numerator), Operand::Node(x)) => {
                self.push(AdOp::ScalarDiv { numerator }, &[x])
            }
            (Operand::Scalar(_), Operand::Scalar(_)) => {
                Err(DiffError::UnsupportedOperands { op: "div" })
            }
        }
    }

    pub fn exp(&mut self, x: NodeIndex) -> Result<NodeIndex, DiffError> {
        self.push(AdOp::Exp, &[x])
    }

    pub fn log(&mut self, x: NodeIndex) -> Result<NodeIndex, DiffError> {
        self.push(AdOp::Log, &[x])
    }

    /// Select row `index` along the leading axis of `x`.
    pub fn subscript(&mut self, x: NodeIndex, index: usize) -> Result<NodeIndex, DiffError> {
        self.push(AdOp::Subscript { index }, &[x])
    }

    fn push(&mut self, op: AdOp, operands: &[NodeIndex]) -> Result<NodeIndex, DiffError> {
        let values = {
            let inputs = operands
                .iter()
                .map(|&o| self.values(o))
                .collect::<Result<Vec<_>, _>>()?;
            op.forward(&inputs)?
        };
        trace!("{} -> {}", op, shape_of(&values));

        let idx = self.graph.add_node(AdNode { op, values });
        for (port, &operand) in operands.iter().enumerate() {
            self.graph.add_edge(operand, idx, Edge { port });
        }
        Ok(idx)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn node(&self, idx: NodeIndex) -> Result<&AdNode, DiffError> {
        self.graph
            .node_weight(idx)
            .ok_or(DiffError::UnknownNode { index: idx.index() })
    }

    /// Forward value of a node.
    pub fn values(&self, idx: NodeIndex) -> Result<&Array, DiffError> {
        self.node(idx).map(|n| &n.values)
    }

    /// Input name of a node, `None` for computed nodes.
    pub fn name(&self, idx: NodeIndex) -> Result<Option<&str>, DiffError> {
        self.node(idx).map(AdNode::name)
    }

    /// Operands of a node in port order.
    pub fn operands(&self, idx: NodeIndex) -> Result<Vec<NodeIndex>, DiffError> {
        self.node(idx)?;
        let mut edges: Vec<(usize, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.weight().port, e.source()))
            .collect();
        edges.sort_by_key(|&(port, _)| port);
        Ok(edges.into_iter().map(|(_, source)| source).collect())
    }

    /// Every input node named `name`, in insertion order.
    pub fn inputs_named(&self, name: &str) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].name() == Some(name))
            .collect()
    }

    /// Current value of the first input named `name`.
    pub fn input_values(&self, name: &str) -> Option<&Array> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .find(|n| n.name() == Some(name))
            .map(|n| &n.values)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graphviz rendering for debugging.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Every node `root` depends on, including `root`, operands first.
    pub(crate) fn ancestors_in_order(&self, root: NodeIndex) -> Result<Vec<NodeIndex>, DiffError> {
        self.node(root)?;

        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, root);
        let mut ancestors = HashSet::new();
        while let Some(n) = dfs.next(reversed) {
            ancestors.insert(n);
        }

        let order = toposort(&self.graph, None).map_err(|cycle| DiffError::CyclicGraph {
            index: cycle.node_id().index(),
        })?;
        Ok(order.into_iter().filter(|n| ancestors.contains(n)).collect())
    }

    /// Recompute `root` with some named inputs replaced.
    ///
    /// Every input carrying an overridden name takes the replacement.
    /// Inputs missing from `overrides` keep their recorded values. A
    /// replacement must have the same shape as the value it replaces.
    pub fn evaluate(
        &self,
        root: NodeIndex,
        overrides: &BTreeMap<String, Array>,
    ) -> Result<Array, DiffError> {
        self.evaluate_with(root, |_, name| overrides.get(name))
    }

    /// Recompute `root` with individual input nodes replaced.
    pub fn evaluate_nodes(
        &self,
        root: NodeIndex,
        overrides: &HashMap<NodeIndex, Array>,
    ) -> Result<Array, DiffError> {
        self.evaluate_with(root, |idx, _| overrides.get(&idx))
    }

    fn evaluate_with<'o>(
        &self,
        root: NodeIndex,
        lookup: impl Fn(NodeIndex, &str) -> Option<&'o Array>,
    ) -> Result<Array, DiffError> {
        let mut cache: HashMap<NodeIndex, Array> = HashMap::new();

        for idx in self.ancestors_in_order(root)? {
            let node = &self.graph[idx];
            let value = match &node.op {
                AdOp::Input { name } => {
                    let source = match lookup(idx, name) {
                        Some(v) if v.shape() != node.values.shape() => {
                            return Err(CoreError::ShapeMismatch {
                                lhs: shape_of(&node.values),
                                rhs: shape_of(v),
                            }
                            .into())
                        }
                        Some(v) => v,
                        None => &node.values,
                    };
                    node.op.forward(&[source])?
                }
                op => {
                    let inputs = self
                        .operands(idx)?
                        .iter()
                        .map(|o| cache.get(o).ok_or(DiffError::UnknownNode { index: o.index() }))
                        .collect::<Result<Vec<_>, _>>()?;
                    op.forward(&inputs)?
                }
            };
            cache.insert(idx, value);
        }

        cache
            .remove(&root)
            .ok_or(DiffError::UnknownNode { index: root.index() })
    }
}
