//! # Error Types
//!
//! Failures shared by every crate in the workspace. They all describe an
//! operation applied to arrays whose shapes do not permit it.

use thiserror::Error;

use crate::shape::Shape;

/// Shape-level errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Two operand shapes cannot be broadcast together.
    #[error("Shape mismatch: {lhs} and {rhs} cannot be broadcast together")]
    ShapeMismatch { lhs: Shape, rhs: Shape },

    /// Subscript applied to a 0-dimensional array.
    #[error("Cannot subscript an array of shape {shape}")]
    NotSubscriptable { shape: Shape },

    /// Subscript index beyond the leading axis.
    #[error("Index {index} out of bounds for axis of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
