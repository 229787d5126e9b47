//! # Shapes
//!
//! Array shapes and the broadcasting rule shared by the lazy array
//! expressions in `symgrad-expr` and the AD graph in `symgrad-diff`.
//!
//! ## Broadcasting
//!
//! Shapes are aligned on their trailing axes. Two extents are compatible
//! when they are equal or when one of them is 1; a missing leading axis
//! behaves like an extent of 1.
//!
//! ```text
//!   (2, 1)  ⊕  (1,)   →  (2, 1)
//!   (2, 3)  ⊕  (3,)   →  (2, 3)
//!   (4, 1)  ⊕  (1, 5) →  (4, 5)
//!   (2, 3)  ⊕  (2,)   →  error
//! ```

use std::fmt;

use crate::error::CoreError;

/// The extents of an n-dimensional array.
///
/// An empty `dims` is a 0-dimensional (scalar) array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    /// Extent of each axis, outermost first
    pub dims: Vec<usize>,
}

impl Shape {
    /// Create a shape from its extents.
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// A 0-dimensional shape.
    pub fn scalar() -> Self {
        Self { dims: vec![] }
    }

    /// A 1-dimensional shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// A 2-dimensional shape.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.dims
    }

    /// The shape produced by combining `self` and `other` elementwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use symgrad_core::Shape;
    ///
    /// let a = Shape::new(vec![2, 1]);
    /// let b = Shape::vector(3);
    /// assert_eq!(a.broadcast(&b).unwrap(), Shape::new(vec![2, 3]));
    /// ```
    pub fn broadcast(&self, other: &Shape) -> Result<Shape, CoreError> {
        let rank = self.rank().max(other.rank());
        let mut dims = vec![0; rank];

        for (axis, out) in dims.iter_mut().enumerate() {
            let lhs = extent_from_right(&self.dims, rank - axis);
            let rhs = extent_from_right(&other.dims, rank - axis);
            *out = match (lhs, rhs) {
                (l, r) if l == r => l,
                (1, r) => r,
                (l, 1) => l,
                _ => {
                    return Err(CoreError::ShapeMismatch {
                        lhs: self.clone(),
                        rhs: other.clone(),
                    })
                }
            };
        }

        Ok(Shape { dims })
    }

    /// Whether `self` and `other` can be combined elementwise.
    pub fn is_compatible(&self, other: &Shape) -> bool {
        self.broadcast(other).is_ok()
    }

    /// The shape left after selecting `index` along the leading axis.
    pub fn subscript(&self, index: usize) -> Result<Shape, CoreError> {
        match self.dims.split_first() {
            None => Err(CoreError::NotSubscriptable {
                shape: self.clone(),
            }),
            Some((&len, _)) if index >= len => Err(CoreError::IndexOutOfBounds { index, len }),
            Some((_, rest)) => Ok(Shape::new(rest.to_vec())),
        }
    }
}

/// Extent of the `n`-th axis counted from the right (1-based), or 1 when
/// the shape has fewer axes.
fn extent_from_right(dims: &[usize], n: usize) -> usize {
    if n > dims.len() {
        1
    } else {
        dims[dims.len() - n]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self { dims }
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})",
            self.dims
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
