//! # Gradient Checking
//!
//! Compares the walker's analytic gradients with central differences
//!
//! ```text
//! ∂f/∂x[i] ≈ (f(x + h·eᵢ) - f(x - h·eᵢ)) / 2h,    f = sum(root)
//! ```
//!
//! where `h = step · max(|x[i]|, 1)` so that large inputs get a step
//! proportional to their magnitude.

use std::collections::HashMap;

use log::debug;
use petgraph::graph::NodeIndex;
use symgrad_core::CoreError;
use thiserror::Error;

use crate::error::DiffError;
use crate::graph::AdGraph;

/// Step size and tolerances for [`grad_check`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Relative finite-difference step
    pub step: f64,
    /// Relative tolerance
    pub rtol: f64,
    /// Absolute tolerance
    pub atol: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        Self {
            step: 1e-6,
            rtol: 1e-6,
            atol: 1e-9,
        }
    }
}

impl GradCheckConfig {
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_rtol(mut self, rtol: f64) -> Self {
        self.rtol = rtol;
        self
    }

    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }
}

/// The first element whose gradients disagree.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Gradient mismatch at {name}[{elem_idx}]: analytical={analytical}, numerical={numerical}, diff={diff}"
)]
pub struct GradCheckError {
    pub name: String,
    pub elem_idx: usize,
    pub analytical: f64,
    pub numerical: f64,
    pub diff: f64,
}

/// Central-difference estimate of `∂ sum(root) / ∂ name[elem_idx]`.
///
/// `elem_idx` counts elements in logical (row-major) order. When several
/// inputs share `name`, each is perturbed on its own and the estimates are
/// summed, matching how the walker accumulates per name.
pub fn numerical_gradient(
    graph: &AdGraph,
    root: NodeIndex,
    name: &str,
    elem_idx: usize,
    h: f64,
) -> Result<f64, DiffError> {
    let inputs = graph.inputs_named(name);
    if inputs.is_empty() {
        return Err(DiffError::UnboundVariable {
            name: name.to_string(),
        });
    }

    let mut total = 0.0;
    for idx in inputs {
        let base = graph.values(idx)?;
        if elem_idx >= base.len() {
            return Err(CoreError::IndexOutOfBounds {
                index: elem_idx,
                len: base.len(),
            }
            .into());
        }

        let shifted = |delta: f64| -> Result<f64, DiffError> {
            let mut values = base.clone();
            if let Some(x) = values.iter_mut().nth(elem_idx) {
                *x += delta;
            }
            let mut overrides = HashMap::new();
            overrides.insert(idx, values);
            Ok(graph.evaluate_nodes(root, &overrides)?.sum())
        };

        total += (shifted(h)? - shifted(-h)?) / (2.0 * h);
    }

    Ok(total)
}

/// Check every element of every input gradient of `root`.
pub fn grad_check(
    graph: &AdGraph,
    root: NodeIndex,
    config: GradCheckConfig,
) -> Result<(), DiffError> {
    let grads = graph.gradient(root)?;

    for (name, analytical) in grads.iter() {
        let base = graph
            .input_values(name)
            .ok_or_else(|| DiffError::UnboundVariable {
                name: name.to_string(),
            })?;

        for (elem_idx, (&a, &x)) in analytical.iter().zip(base.iter()).enumerate() {
            let h = config.step * x.abs().max(1.0);
            let n = numerical_gradient(graph, root, name, elem_idx, h)?;
            let diff = (a - n).abs();

            if diff > config.rtol * a.abs().max(n.abs()) + config.atol {
                return Err(GradCheckError {
                    name: name.to_string(),
                    elem_idx,
                    analytical: a,
                    numerical: n,
                    diff,
                }
                .into());
            }
        }
        debug!("gradient check passed for {} ({} elements)", name, analytical.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_numerical_gradient_of_square() {
        let mut g = AdGraph::new();
        let x = g.input("x", array![3.0].into_dyn());
        let y = g.mul(x, x).unwrap();

        let n = numerical_gradient(&g, y, "x", 0, 1e-5).unwrap();
        assert!((n - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_grad_check_passes() {
        let mut g = AdGraph::new();
        let x = g.input("x", array![0.5, 1.5, 2.5].into_dyn());
        let y = g.input("y", array![2.0, 3.0, 4.0].into_dyn());
        let q = g.div(x, y).unwrap();
        let e = g.exp(q).unwrap();
        let l = g.log(y).unwrap();
        let root = g.mul(e, l).unwrap();

        grad_check(&g, root, GradCheckConfig::default()).unwrap();
    }

    #[test]
    fn test_unknown_input_name() {
        let mut g = AdGraph::new();
        let x = g.input("x", array![1.0].into_dyn());
        let err = numerical_gradient(&g, x, "missing", 0, 1e-6).unwrap_err();
        assert_eq!(
            err,
            DiffError::UnboundVariable {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_element_out_of_range() {
        let mut g = AdGraph::new();
        let x = g.input("x", array![1.0].into_dyn());
        let y = g.mul(x, x).unwrap();
        let err = numerical_gradient(&g, y, "x", 5, 1e-6).unwrap_err();
        assert_eq!(err, DiffError::Core(CoreError::IndexOutOfBounds { index: 5, len: 1 }));
    }

    #[test]
    fn test_shared_name_sums_estimates() {
        let mut g = AdGraph::new();
        let a = g.input("x", array![2.0].into_dyn());
        let b = g.input("x", array![3.0].into_dyn());
        let p = g.mul(a, b).unwrap();

        let n = numerical_gradient(&g, p, "x", 0, 1e-5).unwrap();
        assert!((n - 5.0).abs() < 1e-6);
        grad_check(&g, p, GradCheckConfig::default()).unwrap();
    }

    #[test]
    fn test_error_message() {
        let err = GradCheckError {
            name: "T".to_string(),
            elem_idx: 0,
            analytical: 1.0,
            numerical: 2.0,
            diff: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Gradient mismatch at T[0]: analytical=1, numerical=2, diff=1"
        );
    }
}
