//! Arrhenius Rate: Values and Sensitivities
//!
//! Run with: cargo run -p symgrad-diff --example arrhenius_gradient
//!
//! Builds the same modified-Arrhenius rate as the code-generation demo,
//! lowers it onto an AD graph over concrete temperature and concentration
//! arrays, and reports
//!
//! - the rate itself
//! - ∂rate/∂T and ∂rate/∂C from one backward sweep
//! - a finite-difference check of both gradients

use std::collections::BTreeMap;
use std::error::Error;

use ndarray::array;
use symgrad_diff::{grad_check, lower, AdGraph, GradCheckConfig, Operand};
use symgrad_expr::{var, CodeGenerationMapper, PythonMapper};

const PRE_EXPONENTIAL: f64 = 35127309770106.477;
const TEMPERATURE_EXPONENT: f64 = -0.7;
const ACTIVATION_TEMPERATURE: f64 = 8590.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Arrhenius Rate Sensitivities ===\n");

    let t = var("T");
    let c = var("C");
    let rate = var("exp").call(
        PRE_EXPONENTIAL.ln()
            + TEMPERATURE_EXPONENT * var("log").call(t.clone())
            + -ACTIVATION_TEMPERATURE / t,
    ) * (c.clone().at(0) * c.at(1));

    println!("rate = {}\n", PythonMapper::bare().render(&rate));

    // -------------------------------------------------------------------------
    // 1. Evaluate over three temperatures
    // -------------------------------------------------------------------------
    let mut graph = AdGraph::new();
    let mut bindings = BTreeMap::new();
    bindings.insert(
        "T".to_string(),
        graph.input("T", array![300.0, 600.0, 1200.0].into_dyn()),
    );
    bindings.insert(
        "C".to_string(),
        graph.input("C", array![[0.5], [0.5]].into_dyn()),
    );

    let root = match lower(&mut graph, &rate, &bindings)? {
        Operand::Node(root) => root,
        Operand::Scalar(value) => {
            println!("rate folded to a constant: {}", value);
            return Ok(());
        }
    };

    println!("1. Forward values");
    println!("   T    = [300, 600, 1200]");
    println!("   rate = {}\n", graph.values(root)?);

    // -------------------------------------------------------------------------
    // 2. One backward sweep
    // -------------------------------------------------------------------------
    let grads = graph.gradient(root)?;
    println!("2. Gradients of sum(rate)");
    for (name, grad) in grads.iter() {
        println!("   d/d{} = {}", name, grad);
    }
    println!();

    // -------------------------------------------------------------------------
    // 3. Finite-difference check
    // -------------------------------------------------------------------------
    grad_check(&graph, root, GradCheckConfig::default())?;
    println!("3. Central differences agree with the backward sweep");
    println!("   ({} nodes, {} edges)", graph.node_count(), graph.edge_count());

    Ok(())
}
