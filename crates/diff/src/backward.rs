//! # Backward Pass
//!
//! Reverse-mode accumulation over an [`AdGraph`]. The root is seeded with
//! ones shaped like its value; nodes are then visited in reverse
//! topological order so that every consumer of a node has contributed to
//! its seed before the node passes that seed on.
//!
//! - A named input adds its seed into the gradient for its name and stops.
//! - Any other node applies its VJP, reduces each contribution to the
//!   operand's shape, and adds it to the operand's seed.
//!
//! A leaf reached along several paths therefore receives the sum of every
//! path's contribution.

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};
use petgraph::graph::NodeIndex;
use symgrad_core::CoreError;

use crate::array::{reduce_to_shape, shape_of, Array};
use crate::error::DiffError;
use crate::graph::AdGraph;
use crate::ops::AdOp;

/// Gradients of one root, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gradients {
    by_name: BTreeMap<String, Array>,
}

impl Gradients {
    pub fn get(&self, name: &str) -> Option<&Array> {
        self.by_name.get(name)
    }

    /// Gradients in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array)> {
        self.by_name.iter().map(|(name, grad)| (name.as_str(), grad))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, Array> {
        self.by_name
    }

    fn accumulate(&mut self, name: &str, grad: Array) -> Result<(), DiffError> {
        match self.by_name.get_mut(name) {
            Some(existing) if existing.shape() != grad.shape() => Err(CoreError::ShapeMismatch {
                lhs: shape_of(existing),
                rhs: shape_of(&grad),
            }
            .into()),
            Some(existing) => {
                *existing += &grad;
                Ok(())
            }
            None => {
                self.by_name.insert(name.to_string(), grad);
                Ok(())
            }
        }
    }
}

impl AdGraph {
    /// Gradient of `sum(root)` with respect to every named input `root`
    /// depends on.
    pub fn gradient(&self, root: NodeIndex) -> Result<Gradients, DiffError> {
        let order = self.ancestors_in_order(root)?;

        let mut seeds: HashMap<NodeIndex, Array> = HashMap::new();
        seeds.insert(root, Array::ones(self.values(root)?.raw_dim()));
        let mut grads = Gradients::default();

        for idx in order.into_iter().rev() {
            let seed = match seeds.remove(&idx) {
                Some(seed) => seed,
                None => continue,
            };
            let node = &self.graph[idx];
            trace!("backward through node {} ({})", idx.index(), node.op);

            if let AdOp::Input { name } = &node.op {
                debug!("accumulating gradient for input {} {}", name, shape_of(&seed));
                grads.accumulate(name, seed)?;
                continue;
            }

            let operands = self.operands(idx)?;
            let values = operands
                .iter()
                .map(|&o| self.values(o))
                .collect::<Result<Vec<_>, _>>()?;
            let contributions = node.op.vjp(&values, &seed)?;

            for ((&operand, value), contribution) in operands.iter().zip(values).zip(contributions) {
                let reduced = reduce_to_shape(contribution, value.shape());
                match seeds.get_mut(&operand) {
                    Some(existing) => *existing += &reduced,
                    None => {
                        seeds.insert(operand, reduced);
                    }
                }
            }
        }

        Ok(grads)
    }
}
