//! # Python Mapper
//!
//! Renders expressions as Python/NumPy source. Function calls are
//! qualified with a runtime array namespace so that generated code can be
//! pointed at a different array implementation without regenerating it:
//!
//! ```text
//! exp(log(T))  →  self.pyro_np.exp(self.pyro_np.log(T))
//! c[1]         →  c[1]
//! ```

use crate::mapper::CodeGenerationMapper;
use crate::node::Expr;
use crate::precedence::Precedence;

/// Default array namespace of generated Python code.
pub const DEFAULT_NAMESPACE: &str = "self.pyro_np";

/// Zero-origin Python backend.
#[derive(Debug, Clone)]
pub struct PythonMapper {
    namespace: Option<String>,
}

impl Default for PythonMapper {
    fn default() -> Self {
        Self {
            namespace: Some(DEFAULT_NAMESPACE.to_string()),
        }
    }
}

impl PythonMapper {
    /// A mapper qualifying calls with [`DEFAULT_NAMESPACE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper emitting unqualified calls (`exp(x)`).
    pub fn bare() -> Self {
        Self { namespace: None }
    }

    /// Qualify calls with `namespace` instead.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl CodeGenerationMapper for PythonMapper {
    fn target_name(&self) -> &'static str {
        "python"
    }

    fn map_constant(&self, value: f64, _enclosing: Precedence) -> String {
        if value.is_nan() {
            "float('nan')".to_string()
        } else if value.is_infinite() {
            if value.is_sign_negative() {
                "float('-inf')".to_string()
            } else {
                "float('inf')".to_string()
            }
        } else {
            format!("{:?}", value)
        }
    }

    fn map_call(&self, function: &Expr, argument: &Expr, _enclosing: Precedence) -> String {
        let function = self.rec(function, Precedence::Call);
        let argument = self.rec(argument, Precedence::Call);
        match &self.namespace {
            Some(ns) => format!("{}.{}({})", ns, function, argument),
            None => format!("{}({})", function, argument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::var;

    #[test]
    fn test_namespace_prefix() {
        let e = var("exp").call(var("x"));
        assert_eq!(PythonMapper::new().render(&e), "self.pyro_np.exp(x)");
        assert_eq!(
            PythonMapper::new().with_namespace("np").render(&e),
            "np.exp(x)"
        );
        assert_eq!(PythonMapper::bare().render(&e), "exp(x)");
    }

    #[test]
    fn test_zero_origin_subscript() {
        let e = var("c").at(1);
        assert_eq!(PythonMapper::new().render(&e), "c[1]");
    }

    #[test]
    fn test_literals() {
        let m = PythonMapper::new();
        assert_eq!(m.render(&Expr::Constant(0.5)), "0.5");
        assert_eq!(m.render(&Expr::Constant(300.0)), "300.0");
        assert_eq!(m.render(&Expr::Constant(-0.7)), "-0.7");
        assert_eq!(m.render(&Expr::Constant(f64::INFINITY)), "float('inf')");
    }
}
