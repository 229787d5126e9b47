//! # Fortran Mapper
//!
//! Renders expressions for the body of a fixed-form Fortran subroutine.
//! Arrays are one-origin, so integer subscripts are shifted by one; symbolic
//! subscripts are loop variables that already count from one and are left
//! alone.
//!
//! ```text
//! c[1]      →  c(2)
//! c[i]      →  c(i)
//! 0.5       →  0.5d0
//! -0.7 * x  →  (-0.7d0) * x
//! ```

use crate::mapper::{CodeGenerationMapper, IndexOrigin};
use crate::node::{Expr, Index};
use crate::precedence::Precedence;

/// One-origin Fortran backend.
#[derive(Debug, Clone, Default)]
pub struct FortranMapper;

impl FortranMapper {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerationMapper for FortranMapper {
    fn target_name(&self) -> &'static str {
        "fortran"
    }

    fn index_origin(&self) -> IndexOrigin {
        IndexOrigin::One
    }

    fn map_constant(&self, value: f64, enclosing: Precedence) -> String {
        let literal = if value.is_nan() {
            "ieee_value(0.0d0, ieee_quiet_nan)".to_string()
        } else if value.is_infinite() {
            if value.is_sign_negative() {
                "ieee_value(0.0d0, ieee_negative_inf)".to_string()
            } else {
                "ieee_value(0.0d0, ieee_positive_inf)".to_string()
            }
        } else {
            double_literal(value)
        };

        // Fortran rejects an operator directly followed by a unary minus.
        if value.is_sign_negative() && !value.is_nan() && enclosing > Precedence::Call {
            format!("({})", literal)
        } else {
            literal
        }
    }

    fn map_subscript(&self, base: &Expr, index: &Index, _enclosing: Precedence) -> String {
        format!(
            "{}({})",
            self.rec(base, Precedence::Subscript),
            self.render_index(index)
        )
    }
}

/// Double-precision literal: `0.5` → `0.5d0`, `1e-7` → `1d-7`.
fn double_literal(value: f64) -> String {
    let text = format!("{:?}", value);
    if text.contains('e') {
        text.replace('e', "d")
    } else {
        format!("{}d0", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::var;

    #[test]
    fn test_one_origin_subscript() {
        let m = FortranMapper::new();
        assert_eq!(m.render(&var("c").at(1)), "c(2)");
        assert_eq!(m.render(&var("c").at(0)), "c(1)");
    }

    #[test]
    fn test_largest_index_does_not_overflow() {
        let m = FortranMapper::new();
        assert_eq!(
            m.render(&var("c").at(usize::MAX)),
            format!("c({})", usize::MAX as u128 + 1)
        );
    }

    #[test]
    fn test_symbolic_subscript_unchanged() {
        let m = FortranMapper::new();
        assert_eq!(m.render(&var("c").at("i")), "c(i)");
    }

    #[test]
    fn test_double_literals() {
        assert_eq!(double_literal(0.5), "0.5d0");
        assert_eq!(double_literal(300.0), "300.0d0");
        assert_eq!(double_literal(1e-7), "1d-7");
    }

    #[test]
    fn test_negative_operand_wrapped() {
        let m = FortranMapper::new();
        let e = -0.7 * var("x");
        assert_eq!(m.render(&e), "(-0.7d0) * x");
        assert_eq!(m.render(&Expr::Constant(-2.0)), "-2.0d0");
    }

    #[test]
    fn test_bare_call() {
        let m = FortranMapper::new();
        let e = var("exp").call(var("x") + var("y"));
        assert_eq!(m.render(&e), "exp(x + y)");
    }
}
