//! # Core - Shared Foundations
//!
//! This crate holds what the expression and differentiation crates agree on:
//!
//! - **Shapes**: array extents and the broadcasting rule
//! - **Errors**: shape-level failures surfaced by every arithmetic builder
//!
//! Both `symgrad-expr` (lazy array expressions) and `symgrad-diff` (eager
//! AD graphs) infer result shapes through [`Shape::broadcast`], so the two
//! halves of the system accept and reject exactly the same operand shapes.

pub mod error;
pub mod shape;

pub use error::CoreError;
pub use shape::Shape;
