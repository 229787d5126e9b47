//! Gradient walker behaviour and graph errors.

use ndarray::array;
use petgraph::graph::NodeIndex;
use rstest::rstest;
use symgrad_core::CoreError;
use symgrad_diff::{AdGraph, DiffError};

#[rstest]
#[case("exp", 0.5, 0.5_f64.exp())]
#[case("log", 2.0, 0.5)]
#[case("reciprocal", 2.0, -0.25)]
#[case("square", 3.0, 6.0)]
#[case("halve", 3.0, 0.5)]
#[case("shift", 3.0, 1.0)]
fn test_elementary_derivative(#[case] op: &str, #[case] x0: f64, #[case] expected: f64) {
    let mut g = AdGraph::new();
    let x = g.input("x", array![x0].into_dyn());
    let y = match op {
        "exp" => g.exp(x),
        "log" => g.log(x),
        "reciprocal" => g.div(1.0, x),
        "square" => g.mul(x, x),
        "halve" => g.div(x, 2.0),
        "shift" => g.add(x, -1.5),
        other => panic!("unknown case {}", other),
    }
    .unwrap();

    let d = g.gradient(y).unwrap().get("x").unwrap().sum();
    assert!((d - expected).abs() < 1e-12, "{}: {} != {}", op, d, expected);
}

#[test]
fn test_multi_path_accumulation() {
    let mut g = AdGraph::new();
    let x = g.input("x", array![-1.0, 0.5, 2.0, 4.0].into_dyn());

    // y = x*x + x, so dy/dx = 2x + 1
    let xx = g.mul(x, x).unwrap();
    let y = g.add(xx, x).unwrap();

    let grad = g.gradient(y).unwrap();
    let grad = grad.get("x").unwrap();
    let expected = [-1.0, 2.0, 5.0, 9.0];
    for (g, e) in grad.iter().zip(expected) {
        assert!((g - e).abs() < 1e-12, "{} != {}", g, e);
    }
}

#[test]
fn test_diamond_accumulation() {
    let mut g = AdGraph::new();
    let x = g.input("x", array![2.0].into_dyn());

    // e = exp(x) feeds two branches that are multiplied back together
    let e = g.exp(x).unwrap();
    let a = g.mul(3.0, e).unwrap();
    let b = g.add(e, 1.0).unwrap();
    let y = g.mul(a, b).unwrap();

    // y = 3e(e + 1), dy/dx = (6e + 3) e
    let ex = 2.0_f64.exp();
    let expected = (6.0 * ex + 3.0) * ex;
    let grad = g.gradient(y).unwrap().get("x").unwrap().sum();
    assert!((grad - expected).abs() < 1e-10 * expected);
}

#[test]
fn test_division_gradients() {
    let mut g = AdGraph::new();
    let a = g.input("a", array![3.0, 1.0].into_dyn());
    let b = g.input("b", array![2.0, 4.0].into_dyn());
    let q = g.div(a, b).unwrap();

    let grads = g.gradient(q).unwrap();
    assert_eq!(grads.get("a").unwrap(), &array![0.5, 0.25].into_dyn());
    assert_eq!(grads.get("b").unwrap(), &array![-0.75, -0.0625].into_dyn());
}

#[test]
fn test_gradient_of_input_is_ones() {
    let mut g = AdGraph::new();
    let x = g.input("x", array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
    let grads = g.gradient(x).unwrap();
    assert_eq!(grads.get("x").unwrap(), &array![[1.0, 1.0], [1.0, 1.0]].into_dyn());
}

#[test]
fn test_shape_mismatch() {
    let mut g = AdGraph::new();
    let a = g.input("a", array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn());
    let b = g.input("b", array![1.0, 2.0].into_dyn());

    let err = g.add(a, b).unwrap_err();
    assert!(matches!(err, DiffError::Core(CoreError::ShapeMismatch { .. })));
    assert_eq!(
        err.to_string(),
        "Shape mismatch: (2, 3) and (2) cannot be broadcast together"
    );
    assert_eq!(g.node_count(), 2);
}

#[test]
fn test_subscript_errors() {
    let mut g = AdGraph::new();
    let c = g.input("c", array![[0.5], [0.5]].into_dyn());
    let err = g.subscript(c, 2).unwrap_err();
    assert_eq!(err, DiffError::Core(CoreError::IndexOutOfBounds { index: 2, len: 2 }));

    let s = g.input("s", ndarray::arr0(1.0).into_dyn());
    let err = g.subscript(s, 0).unwrap_err();
    assert!(matches!(err, DiffError::Core(CoreError::NotSubscriptable { .. })));
}

#[test]
fn test_unknown_root() {
    let g = AdGraph::new();
    let err = g.gradient(NodeIndex::new(3)).unwrap_err();
    assert_eq!(err, DiffError::UnknownNode { index: 3 });
}

#[test]
fn test_scalar_operands_rejected() {
    let mut g = AdGraph::new();
    assert_eq!(
        g.mul(2.0, 3.0).unwrap_err(),
        DiffError::UnsupportedOperands { op: "mul" }
    );
    assert_eq!(
        g.div(2.0, 3.0).unwrap_err(),
        DiffError::UnsupportedOperands { op: "div" }
    );
}
