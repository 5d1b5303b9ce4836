//! Sequential (reference) reduction.
//!
//! This is the baseline for correctness and performance comparison. The same
//! kernel computes every worker's partial sum in the parallel reducer.

use crate::error::{check_inputs, Result};
use crate::registry::Reducer;

/// Index-ordered accumulation starting from `+0.0`.
#[inline]
pub(crate) fn dot_kernel(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// Compute `Σ a[i] * b[i]` for `i < n` in a single pass.
///
/// # Errors
/// [`EmptyInput`](crate::error::ReduceError::EmptyInput) when `n == 0`,
/// [`Bounds`](crate::error::ReduceError::Bounds) when either vector is
/// shorter than `n`.
///
/// # Example
/// ```
/// use parallel_dot::reduce_sequential;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// assert_eq!(reduce_sequential(&a, &b, 3).unwrap(), 32.0);
/// ```
pub fn reduce_sequential(a: &[f64], b: &[f64], n: usize) -> Result<f64> {
    check_inputs(a, b, n)?;
    Ok(dot_kernel(&a[..n], &b[..n]))
}

/// [`reduce_sequential`] as a registry strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialReducer;

impl Reducer for SequentialReducer {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn description(&self) -> &'static str {
        "Single-threaded index-ordered reference"
    }

    fn reduce(&self, a: &[f64], b: &[f64], n: usize) -> Result<f64> {
        reduce_sequential(a, b, n)
    }
}
