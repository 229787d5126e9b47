//! Rendering expectations for the Python and Fortran backends.

use rstest::rstest;
use symgrad_expr::{constant, var, CodeGenerationMapper, Expr, FortranMapper, PythonMapper};

fn a() -> Expr {
    var("a")
}

fn b() -> Expr {
    var("b")
}

fn c() -> Expr {
    var("c")
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[rstest]
// Infix operators
#[case(a() + b(), "a + b")]
#[case(a() * b() + c(), "a * b + c")]
#[case((a() + b()) * c(), "(a + b) * c")]
#[case(a() * (b() * c()), "a * b * c")]
#[case(Expr::Sum(vec![a() + b(), c()]), "a + b + c")]
// Division
#[case((a() + b()) / c(), "(a + b) / c")]
#[case(a() / (b() * c()), "a / (b * c)")]
#[case(a() / (b() / c()), "a / (b / c)")]
#[case((a() / b()) / c(), "a / b / c")]
#[case(a() * b() / c(), "a * b / c")]
#[case(a() / b() + c(), "a / b + c")]
// Calls and subscripts
#[case(var("exp").call(a() + b()), "self.pyro_np.exp(a + b)")]
#[case(a() / var("exp").call(b()), "a / self.pyro_np.exp(b)")]
#[case(c().at(1), "c[1]")]
#[case(c().at("i"), "c[i]")]
#[case((a() + b()).at(0), "(a + b)[0]")]
// Literals
#[case(2.0 * var("x"), "2.0 * x")]
#[case(constant(1e-7), "1e-7")]
#[case(Expr::Sum(vec![]), "0.0")]
#[case(Expr::Product(vec![]), "1.0")]
fn test_python_render(#[case] input: Expr, #[case] expected: &str) {
    init_logger();
    assert_eq!(PythonMapper::new().render(&input), expected);
}

#[rstest]
#[case(c().at(1), "c(2)")]
#[case(c().at(0), "c(1)")]
#[case(c().at("i"), "c(i)")]
#[case((a() + b()) * c(), "(a + b) * c")]
#[case(a() / (b() * c()), "a / (b * c)")]
#[case(var("exp").call(var("x")), "exp(x)")]
#[case(0.5 * var("x"), "0.5d0 * x")]
#[case(constant(1e-7), "1d-7")]
#[case(-0.7 * var("log").call(var("T")), "(-0.7d0) * log(T)")]
fn test_fortran_render(#[case] input: Expr, #[case] expected: &str) {
    init_logger();
    assert_eq!(FortranMapper::new().render(&input), expected);
}

#[test]
fn test_index_origin_differs_by_backend() {
    let e = var("c").at(1);
    assert_eq!(PythonMapper::new().render(&e), "c[1]");
    assert_eq!(FortranMapper::new().render(&e), "c(2)");
}

#[test]
fn test_arrhenius_rate_renders_in_both_backends() {
    init_logger();
    let t = var("T");
    let rate = var("exp").call(31.0 + -0.7 * var("log").call(t.clone()) + -8590.0 / t)
        * (var("C").at(0) * var("C").at(1));

    assert_eq!(
        PythonMapper::new().render(&rate),
        "self.pyro_np.exp(31.0 + -0.7 * self.pyro_np.log(T) + -8590.0 / T) * C[0] * C[1]"
    );
    assert_eq!(
        PythonMapper::bare().render(&rate),
        "exp(31.0 + -0.7 * log(T) + -8590.0 / T) * C[0] * C[1]"
    );
    assert_eq!(
        FortranMapper::new().render(&rate),
        "exp(31.0d0 + (-0.7d0) * log(T) + (-8590.0d0) / T) * C(1) * C(2)"
    );
}

#[test]
fn test_rendering_is_repeatable() {
    let e = (a() + b()) * c().at(2);
    let mapper = PythonMapper::new().with_namespace("np");
    assert_eq!(mapper.render(&e), mapper.render(&e));
    assert_eq!(e.to_string(), "(a + b) * c[2]");
}
