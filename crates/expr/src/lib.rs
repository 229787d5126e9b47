//! # Expr - Symbolic Expressions and Code Generation
//!
//! A small arithmetic IR that is built once and rendered into several
//! target syntaxes.
//!
//! ## Modules
//!
//! - [`node`] - The expression tree and its flattening builders
//! - [`precedence`] - Precedence table and the parenthesization rule
//! - [`mapper`] - The [`CodeGenerationMapper`] trait shared by all backends
//! - [`python`] - Zero-origin Python/NumPy backend
//! - [`fortran`] - One-origin Fortran backend
//! - [`lazy`] - Shape-tracked array expressions
//! - [`kernel`] - Loop-kernel assembly from lazy expressions
//!
//! ## Example
//!
//! ```rust
//! use symgrad_expr::{var, CodeGenerationMapper, FortranMapper, PythonMapper};
//!
//! let e = (var("a") + var("b")) * var("c").at(1);
//!
//! assert_eq!(PythonMapper::new().render(&e), "(a + b) * c[1]");
//! assert_eq!(FortranMapper::new().render(&e), "(a + b) * c(2)");
//! ```

pub mod error;
pub mod fortran;
pub mod kernel;
pub mod lazy;
pub mod mapper;
pub mod node;
pub mod precedence;
pub mod python;

pub use error::CodegenError;
pub use fortran::FortranMapper;
pub use kernel::{Kernel, KernelArgument, KernelBuilder, KernelMapper};
pub use lazy::LazyArray;
pub use mapper::{CodeGenerationMapper, IndexOrigin};
pub use node::{add, call, constant, div, mul, subscript, var, Expr, ExprKind, Index};
pub use precedence::{parenthesize, Precedence};
pub use python::PythonMapper;
