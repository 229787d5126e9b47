//! # Precedence
//!
//! The ranking every backend uses to decide when a rendered child needs
//! parentheses. Lowest to highest:
//!
//! | Rank | Level | Nodes |
//! |------|-------|-------|
//! | 0 | Atom | constants, variables |
//! | 1 | Call | function application |
//! | 2 | Sum | `a + b` |
//! | 3 | Product | `a * b` |
//! | 4 | Quotient | `a / b` |
//! | 5 | Subscript | `a[i]` |
//! | 6 | Power | `a ** b` |
//!
//! A child is wrapped iff its own level is strictly below the level its
//! parent demands. Atoms and calls are never wrapped: a call is
//! self-delimiting even though it ranks below the infix operators.

/// Operator binding strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Atom = 0,
    Call = 1,
    Sum = 2,
    Product = 3,
    Quotient = 4,
    Subscript = 5,
    Power = 6,
}

impl Precedence {
    /// Numeric rank in the table.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The next stronger level, saturating at `Power`.
    ///
    /// Used for the right operand of a non-associative operator, so that
    /// `a / (b / c)` keeps its parentheses.
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Atom => Precedence::Call,
            Precedence::Call => Precedence::Sum,
            Precedence::Sum => Precedence::Product,
            Precedence::Product => Precedence::Quotient,
            Precedence::Quotient => Precedence::Subscript,
            Precedence::Subscript | Precedence::Power => Precedence::Power,
        }
    }
}

/// Wrap `text` in parentheses when a node of level `own` appears where
/// `enclosing` is demanded.
pub fn parenthesize(text: String, own: Precedence, enclosing: Precedence) -> String {
    match own {
        Precedence::Atom | Precedence::Call => text,
        _ if own < enclosing => format!("({})", text),
        _ => text,
    }
}
