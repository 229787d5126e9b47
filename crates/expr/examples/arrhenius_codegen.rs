//! Arrhenius Rate: One Formula, Three Targets
//!
//! Run with: cargo run -p symgrad-expr --example arrhenius_codegen
//!
//! Builds the modified-Arrhenius rate of a bimolecular reaction
//!
//!   k(T) = A T^b exp(-Ea / RT)
//!   rate = k(T) [C0] [C1]
//!
//! once, in log form, and renders it as Python, as Fortran and as a loop
//! kernel over an array of temperatures.

use std::error::Error;

use symgrad_core::Shape;
use symgrad_expr::{var, CodeGenerationMapper, FortranMapper, KernelBuilder, LazyArray, PythonMapper};

const PRE_EXPONENTIAL: f64 = 35127309770106.477;
const TEMPERATURE_EXPONENT: f64 = -0.7;
const ACTIVATION_TEMPERATURE: f64 = 8590.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Arrhenius Rate Code Generation ===\n");

    // -------------------------------------------------------------------------
    // 1. Symbolic expression
    // -------------------------------------------------------------------------
    let t = var("T");
    let c = var("C");
    let rate = var("exp").call(
        PRE_EXPONENTIAL.ln()
            + TEMPERATURE_EXPONENT * var("log").call(t.clone())
            + -ACTIVATION_TEMPERATURE / t,
    ) * (c.clone().at(0) * c.at(1));

    println!("1. Python (zero-origin, namespaced calls)");
    println!("   {}\n", PythonMapper::new().render(&rate));

    println!("2. Fortran (one-origin, double literals)");
    println!("   {}\n", FortranMapper::new().render(&rate));

    // -------------------------------------------------------------------------
    // 2. Loop kernel over 16 temperatures
    // -------------------------------------------------------------------------
    let temperature = LazyArray::placeholder("temperature", Shape::vector(16));
    let concentration = LazyArray::placeholder("concentration", Shape::matrix(2, 16));

    let log_k = temperature
        .log()
        .mul_scalar(TEMPERATURE_EXPONENT)
        .add_scalar(PRE_EXPONENTIAL.ln())
        .add(&temperature.rdiv_scalar(-ACTIVATION_TEMPERATURE))?;
    let lazy_rate = log_k
        .exp()
        .mul(&concentration.subscript(0)?)?
        .mul(&concentration.subscript(1)?)?;

    let kernel = KernelBuilder::new()
        .name("arrhenius_rate")
        .output("rate")
        .build(&lazy_rate)?;

    println!("3. Loop kernel `{}`", kernel.name);
    println!("   domain:      {}", kernel.domain);
    println!("   instruction: {}", kernel.instruction);
    println!("   arguments:");
    for arg in &kernel.arguments {
        let role = if arg.is_output { "out" } else { "in" };
        println!("     {:<14} {:<8} {}", arg.name, arg.shape.to_string(), role);
    }

    Ok(())
}
