use std::fmt::Debug;

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

/// Floating point element type accepted by the biplot computations.
pub trait FloatOps: Float + FromPrimitive + ToPrimitive + Debug + Send + Sync + 'static {}

impl<T> FloatOps for T where T: Float + FromPrimitive + ToPrimitive + Debug + Send + Sync + 'static {}

/// Largest absolute value in the view, zero for an empty view.
pub fn max_abs<T: FloatOps>(values: ArrayView2<T>) -> T {
    values
        .iter()
        .fold(T::zero(), |acc, &v| if v.abs() > acc { v.abs() } else { acc })
}

/// Rounds half away from zero to `digits` decimal places.
pub fn round_to<T: FloatOps>(value: T, digits: i32) -> T {
    let factor = T::from_f64(10f64.powi(digits)).unwrap_or_else(T::one);
    (value * factor).round() / factor
}
