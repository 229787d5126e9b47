//! Loop kernels assembled from lazy array expressions.

use symgrad_core::Shape;
use symgrad_expr::{CodegenError, KernelBuilder, LazyArray};

fn arrhenius() -> LazyArray {
    let t = LazyArray::placeholder("temperature", Shape::vector(1));
    let c = LazyArray::placeholder("concentration", Shape::matrix(2, 1));

    t.log()
        .mul_scalar(-0.7)
        .add_scalar(31.0)
        .add(&t.rdiv_scalar(-8590.0))
        .and_then(|arg| arg.exp().mul(&c.subscript(0)?))
        .and_then(|rate| rate.mul(&c.subscript(1)?))
        .unwrap()
}

#[test]
fn test_arrhenius_kernel() {
    let _ = env_logger::builder().is_test(true).try_init();

    let rate = arrhenius();
    assert_eq!(rate.shape(), &Shape::vector(1));

    let kernel = KernelBuilder::new()
        .name("arrhenius")
        .output("rate")
        .build(&rate)
        .unwrap();

    assert_eq!(kernel.name, "arrhenius");
    assert_eq!(kernel.domain, "{[i0] : 0 <= i0 <= 0}");
    assert_eq!(
        kernel.instruction,
        "rate[i0] = exp(31.0 + -0.7 * log(temperature[i0]) + -8590.0 / temperature[i0]) \
         * concentration[0, i0] * concentration[1, i0]"
    );

    let names: Vec<&str> = kernel.arguments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["concentration", "temperature", "rate"]);
    assert_eq!(kernel.arguments[0].shape, Shape::matrix(2, 1));
}

#[test]
fn test_builder_without_output_fails() {
    let err = KernelBuilder::new().name("arrhenius").build(&arrhenius()).unwrap_err();
    assert!(matches!(err, CodegenError::MissingParameter { parameter: "output" }));
    assert_eq!(
        err.to_string(),
        "Kernel parameter `output` was not set before build"
    );
}

#[test]
fn test_broadcast_kernel_over_matrix() {
    let row = LazyArray::placeholder("row", Shape::new(vec![1, 3]));
    let col = LazyArray::placeholder("col", Shape::new(vec![2, 1]));
    let kernel = KernelBuilder::new()
        .name("outer")
        .output("out")
        .build(&row.mul(&col).unwrap())
        .unwrap();

    assert_eq!(kernel.domain, "{[i0, i1] : 0 <= i0 <= 1 and 0 <= i1 <= 2}");
    assert_eq!(kernel.instruction, "out[i0, i1] = row[0, i1] * col[i0, 0]");
}
