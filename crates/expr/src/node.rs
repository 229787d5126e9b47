//! # Expression Nodes
//!
//! The symbolic IR: an immutable arithmetic tree built bottom-up and then
//! handed to a [`CodeGenerationMapper`](crate::mapper::CodeGenerationMapper).
//!
//! ## Node Kinds
//!
//! | Kind | Shape | Built by |
//! |------|-------|----------|
//! | Constant | leaf `f64` | `constant(v)`, `Expr::from(v)` |
//! | Variable | leaf name | `var(name)` |
//! | Sum | n-ary, flattened | `add(a, b)`, `a + b` |
//! | Product | n-ary, flattened | `mul(a, b)`, `a * b` |
//! | Quotient | binary | `div(a, b)`, `a / b` |
//! | Call | function applied to one argument | `call(f, x)`, `f.call(x)` |
//! | Subscript | base indexed by name or integer | `subscript(a, i)`, `a.at(i)` |
//!
//! ## Flattening
//!
//! `add` and `mul` splice the children of a same-kind operand into the new
//! node, so `(a + b) + c` and `a + (b + c)` are both `Sum[a, b, c]`. Nested
//! same-kind nodes only exist when built directly from the enum variants.
//!
//! ## Example
//!
//! ```rust
//! use symgrad_expr::node::{var, Expr};
//!
//! let exp = var("exp");
//! let t = var("T");
//! let c = var("C");
//!
//! let rate = exp.call(-0.7 * var("log").call(t.clone()) + -8590.0 / t)
//!     * (c.clone().at(0) * c.at(1));
//!
//! // The call and both subscripts share one flattened product.
//! assert_eq!(rate.children().len(), 3);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul};

use crate::mapper::CodeGenerationMapper;
use crate::precedence::Precedence;
use crate::python::PythonMapper;

/// A node of the expression tree.
///
/// Each parent owns its children; trees are never shared or mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal leaf
    Constant(f64),

    /// Named leaf
    Variable(String),

    /// n-ary associative sum
    Sum(Vec<Expr>),

    /// n-ary associative product
    Product(Vec<Expr>),

    /// Non-commutative binary division
    Quotient {
        numerator: Box<Expr>,
        denominator: Box<Expr>,
    },

    /// Function application; `function` is usually a `Variable` naming a
    /// primitive such as `exp` or `log`
    Call {
        function: Box<Expr>,
        argument: Box<Expr>,
    },

    /// Indexing along the leading axis
    Subscript { base: Box<Expr>, index: Index },
}

/// The index component of a [`Expr::Subscript`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Index {
    /// Symbolic index, typically a loop variable in generated code
    Variable(String),
    /// Concrete zero-based element index
    Integer(usize),
}

impl Index {
    pub fn variable(name: impl Into<String>) -> Self {
        Index::Variable(name.into())
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index::Integer(value)
    }
}

impl From<&str> for Index {
    fn from(name: &str) -> Self {
        Index::Variable(name.to_string())
    }
}

/// Tag identifying which mapper method renders a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Constant,
    Variable,
    Sum,
    Product,
    Quotient,
    Call,
    Subscript,
}

impl Expr {
    /// The kind tag of this node.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Constant(_) => ExprKind::Constant,
            Expr::Variable(_) => ExprKind::Variable,
            Expr::Sum(_) => ExprKind::Sum,
            Expr::Product(_) => ExprKind::Product,
            Expr::Quotient { .. } => ExprKind::Quotient,
            Expr::Call { .. } => ExprKind::Call,
            Expr::Subscript { .. } => ExprKind::Subscript,
        }
    }

    /// The binding strength of this node's own operator.
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Constant(_) | Expr::Variable(_) => Precedence::Atom,
            Expr::Call { .. } => Precedence::Call,
            Expr::Sum(_) => Precedence::Sum,
            Expr::Product(_) => Precedence::Product,
            Expr::Quotient { .. } => Precedence::Quotient,
            Expr::Subscript { .. } => Precedence::Subscript,
        }
    }

    /// Children of an n-ary node; empty for every other kind.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Sum(children) | Expr::Product(children) => children,
            _ => &[],
        }
    }

    /// The name of a `Variable` leaf.
    pub fn name(&self) -> Option<&str> {
        match self {
            Expr::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Apply `self`, acting as a function name, to `argument`.
    pub fn call(self, argument: impl Into<Expr>) -> Expr {
        call(self, argument)
    }

    /// Index `self` along its leading axis.
    pub fn at(self, index: impl Into<Index>) -> Expr {
        subscript(self, index)
    }
}

// ============================================================================
// Builders
// ============================================================================

/// A named leaf.
pub fn var(name: impl Into<String>) -> Expr {
    Expr::Variable(name.into())
}

/// A numeric literal leaf.
pub fn constant(value: f64) -> Expr {
    Expr::Constant(value)
}

/// `a + b`, flattening same-kind operands into one `Sum`.
pub fn add(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    let mut children = Vec::new();
    splice(ExprKind::Sum, a.into(), &mut children);
    splice(ExprKind::Sum, b.into(), &mut children);
    Expr::Sum(children)
}

/// `a * b`, flattening same-kind operands into one `Product`.
pub fn mul(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    let mut children = Vec::new();
    splice(ExprKind::Product, a.into(), &mut children);
    splice(ExprKind::Product, b.into(), &mut children);
    Expr::Product(children)
}

/// `a / b`. Never flattened.
pub fn div(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    Expr::Quotient {
        numerator: Box::new(a.into()),
        denominator: Box::new(b.into()),
    }
}

/// `f(x)`.
pub fn call(function: impl Into<Expr>, argument: impl Into<Expr>) -> Expr {
    Expr::Call {
        function: Box::new(function.into()),
        argument: Box::new(argument.into()),
    }
}

/// `a[i]`.
pub fn subscript(base: impl Into<Expr>, index: impl Into<Index>) -> Expr {
    Expr::Subscript {
        base: Box::new(base.into()),
        index: index.into(),
    }
}

fn splice(kind: ExprKind, operand: Expr, out: &mut Vec<Expr>) {
    match operand {
        Expr::Sum(children) if kind == ExprKind::Sum => out.extend(children),
        Expr::Product(children) if kind == ExprKind::Product => out.extend(children),
        other => out.push(other),
    }
}

// ============================================================================
// Conversions and operator sugar
// ============================================================================

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $builder:ident) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                $builder(self, rhs)
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $builder(self, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add);
impl_binary_op!(Mul, mul, mul);
impl_binary_op!(Div, div, div);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PythonMapper::bare().rec(self, Precedence::Atom))
    }
}
