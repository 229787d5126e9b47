//! # Array Helpers
//!
//! Broadcasting binary kernels and the inverse reduction used to route a
//! gradient back to an operand that was broadcast in the forward pass.

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use symgrad_core::{CoreError, Shape};

use crate::error::DiffError;

/// Dynamic-rank `f64` array carried by every graph node.
pub type Array = ArrayD<f64>;

/// The shape of `array` as a core [`Shape`].
pub fn shape_of(array: &Array) -> Shape {
    Shape::from(array.shape())
}

/// Apply `f` elementwise after broadcasting `a` and `b` to a common shape.
pub fn broadcast_with(
    a: &Array,
    b: &Array,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Array, DiffError> {
    let shape = shape_of(a).broadcast(&shape_of(b))?;
    let mismatch = || CoreError::ShapeMismatch {
        lhs: shape_of(a),
        rhs: shape_of(b),
    };

    let dim = IxDyn(shape.as_slice());
    let va = a.broadcast(dim.clone()).ok_or_else(mismatch)?;
    let vb = b.broadcast(dim).ok_or_else(mismatch)?;

    Ok(Zip::from(&va).and(&vb).map_collect(|&x, &y| f(x, y)))
}

/// Sum `grad` over the axes along which an array of extents `dims` was
/// broadcast, so the result has exactly `dims`.
pub fn reduce_to_shape(grad: Array, dims: &[usize]) -> Array {
    let mut grad = grad;

    while grad.ndim() > dims.len() {
        grad = grad.sum_axis(Axis(0));
    }

    for (axis, &extent) in dims.iter().enumerate() {
        if extent == 1 && grad.shape()[axis] != 1 {
            grad = grad.sum_axis(Axis(axis)).insert_axis(Axis(axis));
        }
    }

    grad
}
