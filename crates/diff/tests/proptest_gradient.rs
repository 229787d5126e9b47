//! Randomized comparison of analytic and finite-difference gradients.

use ndarray::{Array1, Array2};
use proptest::prelude::*;
use petgraph::graph::NodeIndex;
use symgrad_diff::{grad_check, AdGraph, GradCheckConfig};

fn positive() -> impl Strategy<Value = f64> {
    0.5f64..2.0
}

fn inputs() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>, f64)> {
    (1usize..5).prop_flat_map(|n| {
        (
            prop::collection::vec(positive(), n),
            prop::collection::vec(positive(), n),
            prop::collection::vec(positive(), 2 * n),
            positive(),
        )
    })
}

/// exp(x*y) / (x + y) + log(x) * y + m[0] / m[1], scaled by a broadcast b
fn build(xs: Vec<f64>, ys: Vec<f64>, ms: Vec<f64>, b: f64) -> (AdGraph, NodeIndex) {
    let n = xs.len();
    let mut g = AdGraph::new();
    let x = g.input("x", Array1::from(xs).into_dyn());
    let y = g.input("y", Array1::from(ys).into_dyn());
    let m = g.input("m", Array2::from_shape_vec((2, n), ms).unwrap().into_dyn());
    let b = g.input("b", Array1::from(vec![b]).into_dyn());

    let xy = g.mul(x, y).unwrap();
    let e = g.exp(xy).unwrap();
    let s = g.add(x, y).unwrap();
    let q = g.div(e, s).unwrap();

    let lx = g.log(x).unwrap();
    let p = g.mul(lx, y).unwrap();

    let m0 = g.subscript(m, 0).unwrap();
    let m1 = g.subscript(m, 1).unwrap();
    let r = g.div(m0, m1).unwrap();

    let t = g.add(q, p).unwrap();
    let t = g.add(t, r).unwrap();
    let root = g.mul(t, b).unwrap();
    (g, root)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every elementary rule agrees with central differences
    #[test]
    fn analytic_matches_finite_differences((xs, ys, ms, b) in inputs()) {
        let (graph, root) = build(xs, ys, ms, b);
        let config = GradCheckConfig::default().with_rtol(1e-5).with_atol(1e-6);
        let result = grad_check(&graph, root, config);
        prop_assert!(result.is_ok(), "{:?}", result);
    }

    /// x*x + x accumulates both paths: 2x + 1
    #[test]
    fn multi_path_sum(xs in prop::collection::vec(-10.0f64..10.0, 1..8)) {
        let mut g = AdGraph::new();
        let x = g.input("x", Array1::from(xs.clone()).into_dyn());
        let xx = g.mul(x, x).unwrap();
        let y = g.add(xx, x).unwrap();

        let grads = g.gradient(y).unwrap();
        let grad = grads.get("x").unwrap();
        for (d, x) in grad.iter().zip(xs) {
            prop_assert!((d - (2.0 * x + 1.0)).abs() < 1e-12);
        }
    }
}
