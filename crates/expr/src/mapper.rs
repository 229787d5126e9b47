//! # Code-Generation Mappers
//!
//! A mapper turns an [`Expr`] tree into source text for one target syntax.
//! Every backend implements [`CodeGenerationMapper`]; the trait's default
//! methods carry the shared rendering rules and a backend overrides only
//! the pieces its syntax changes.
//!
//! ## Dispatch
//!
//! [`CodeGenerationMapper::rec`] matches on the closed [`Expr`] enum, so a
//! backend cannot be missing a rule for a node kind: the dispatcher is
//! checked for exhaustiveness at compile time.
//!
//! ## Shared Rules
//!
//! - Sum and product children are rendered at the operator's own level and
//!   joined with `" + "` / `" * "`.
//! - A quotient renders its numerator at product level and its denominator
//!   one level above division.
//! - Calls render as `<function>(<argument>)`.
//! - Integer subscripts are shifted by the backend's [`IndexOrigin`];
//!   symbolic subscripts render the index name unchanged.

use log::debug;

use crate::node::{Expr, Index};
use crate::precedence::{parenthesize, Precedence};

/// Where a target language starts counting array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// `c[0]` is the first element
    Zero,
    /// `c(1)` is the first element
    One,
}

impl IndexOrigin {
    /// Amount added to a zero-based index.
    pub fn offset(self) -> usize {
        match self {
            IndexOrigin::Zero => 0,
            IndexOrigin::One => 1,
        }
    }
}

/// A renderer from the expression IR to one target syntax.
pub trait CodeGenerationMapper {
    /// Short name of the target, used in log output.
    fn target_name(&self) -> &'static str;

    /// Indexing origin applied to integer subscripts.
    fn index_origin(&self) -> IndexOrigin {
        IndexOrigin::Zero
    }

    /// Render a whole expression.
    fn render(&self, expr: &Expr) -> String {
        let code = self.rec(expr, Precedence::Atom);
        debug!("rendered {} expression: {}", self.target_name(), code);
        code
    }

    /// Render `expr` where its parent demands `enclosing`.
    fn rec(&self, expr: &Expr, enclosing: Precedence) -> String {
        match expr {
            Expr::Constant(value) => self.map_constant(*value, enclosing),
            Expr::Variable(name) => self.map_variable(name, enclosing),
            Expr::Sum(children) => self.map_sum(children, enclosing),
            Expr::Product(children) => self.map_product(children, enclosing),
            Expr::Quotient {
                numerator,
                denominator,
            } => self.map_quotient(numerator, denominator, enclosing),
            Expr::Call { function, argument } => self.map_call(function, argument, enclosing),
            Expr::Subscript { base, index } => self.map_subscript(base, index, enclosing),
        }
    }

    /// Render each child at `own` and join them with `glue`.
    fn join_rec(
        &self,
        children: &[Expr],
        glue: &str,
        own: Precedence,
        enclosing: Precedence,
    ) -> String {
        let text = children
            .iter()
            .map(|child| self.rec(child, own))
            .collect::<Vec<_>>()
            .join(glue);
        parenthesize(text, own, enclosing)
    }

    fn map_constant(&self, value: f64, _enclosing: Precedence) -> String {
        format!("{:?}", value)
    }

    fn map_variable(&self, name: &str, _enclosing: Precedence) -> String {
        name.to_string()
    }

    fn map_sum(&self, children: &[Expr], enclosing: Precedence) -> String {
        if children.is_empty() {
            return self.map_constant(0.0, enclosing);
        }
        self.join_rec(children, " + ", Precedence::Sum, enclosing)
    }

    fn map_product(&self, children: &[Expr], enclosing: Precedence) -> String {
        if children.is_empty() {
            return self.map_constant(1.0, enclosing);
        }
        self.join_rec(children, " * ", Precedence::Product, enclosing)
    }

    fn map_quotient(&self, numerator: &Expr, denominator: &Expr, enclosing: Precedence) -> String {
        let text = format!(
            "{} / {}",
            self.rec(numerator, Precedence::Product),
            self.rec(denominator, Precedence::Quotient.tighter())
        );
        parenthesize(text, Precedence::Quotient, enclosing)
    }

    fn map_call(&self, function: &Expr, argument: &Expr, _enclosing: Precedence) -> String {
        format!(
            "{}({})",
            self.rec(function, Precedence::Call),
            self.rec(argument, Precedence::Call)
        )
    }

    fn map_subscript(&self, base: &Expr, index: &Index, _enclosing: Precedence) -> String {
        format!(
            "{}[{}]",
            self.rec(base, Precedence::Subscript),
            self.render_index(index)
        )
    }

    /// Render a subscript index in this backend's origin.
    fn render_index(&self, index: &Index) -> String {
        match index {
            Index::Variable(name) => name.clone(),
            Index::Integer(k) => match k.checked_add(self.index_origin().offset()) {
                Some(shifted) => shifted.to_string(),
                None => (*k as u128 + self.index_origin().offset() as u128).to_string(),
            },
        }
    }
}
