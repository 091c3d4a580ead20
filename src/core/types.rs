//! Library-wide error taxonomy.

use crate::math::{InterpolationError, OptimizeError};

/// Errors surfaced by the solver API.
///
/// Numerical errors raised inside an inner optimization or interpolation are
/// wrapped rather than swallowed, so callers can tell a misconfigured model
/// (`Domain`, `InvalidParameter`) apart from a fixed point that simply did
/// not settle (`Convergence`).
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Structural or numerical-control parameter outside its admissible range.
    InvalidParameter(String),
    /// Undefined arithmetic for the model (non-positive wage, zero divisor).
    Domain(String),
    /// Strict-mode fixed-point iteration exhausted its cap.
    Convergence {
        /// Iterations performed before giving up.
        iterations: usize,
        /// Final sup-norm error magnitude.
        error: f64,
    },
    /// Malformed interpolant construction or combination.
    Interpolation(InterpolationError),
    /// Inner scalar optimization failure (invalid bounds, NaN objective).
    Optimization(OptimizeError),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::Domain(msg) => write!(f, "domain error: {msg}"),
            Self::Convergence { iterations, error } => write!(
                f,
                "no convergence after {iterations} iterations (sup-norm error {error:.3e})"
            ),
            Self::Interpolation(e) => write!(f, "{e}"),
            Self::Optimization(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Interpolation(e) => Some(e),
            Self::Optimization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InterpolationError> for SolveError {
    fn from(e: InterpolationError) -> Self {
        Self::Interpolation(e)
    }
}

impl From<OptimizeError> for SolveError {
    fn from(e: OptimizeError) -> Self {
        Self::Optimization(e)
    }
}
