//! Numerical kernels: interpolation and bounded scalar optimization.

pub mod interpolation;
pub mod optimize;

pub use interpolation::{ExtrapolationMode, InterpKind, Interpolant, InterpolationError};
pub use optimize::{BrentOptions, Minimum, OptimizeError, minimize_scalar, minimize_scalar_full};

/// Evenly spaced grid of `n` points over `[lower, upper]` (inclusive).
///
/// `n == 1` collapses to `[lower]`; `n == 0` is empty.
pub fn linspace(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lower],
        _ => (0..n)
            .map(|i| lower + (upper - lower) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}
