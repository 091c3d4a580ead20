//! Bounded scalar minimization.
//!
//! A derivative-free Brent search (golden-section steps with successive
//! parabolic interpolation) over a closed interval. This is the inner
//! routine of every Bellman cell update, so it is called hundreds of
//! thousands of times per solve: it never fails on non-convergence, only on
//! invalid bounds or an objective that is undefined (NaN) at a probe point.
//!
//! Reference: Brent (1973), *Algorithms for Minimization without
//! Derivatives*, Ch. 5.

/// Tuning knobs for the bounded Brent search.
#[derive(Debug, Clone, Copy)]
pub struct BrentOptions {
    /// Absolute tolerance on the minimizer location.
    pub tolerance: f64,
    /// Hard cap on objective evaluations.
    pub max_iterations: usize,
}

impl Default for BrentOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 500,
        }
    }
}

/// Outcome of a bounded scalar minimization.
#[derive(Debug, Clone, Copy)]
pub struct Minimum {
    /// Approximate minimizer location.
    pub x: f64,
    /// Objective value at [`Minimum::x`].
    pub objective: f64,
    /// Objective evaluations performed.
    pub iterations: usize,
    /// False when the evaluation cap was hit first; the best point found so
    /// far is still returned.
    pub converged: bool,
}

/// Errors raised by the scalar optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeError {
    /// `lower > upper` or a non-finite bound.
    InvalidBounds { lower: f64, upper: f64 },
    /// The objective returned NaN at a probe point. Propagated so callers
    /// can tell "did not converge" apart from "undefined on the interval".
    ObjectiveUndefined { at: f64 },
}

impl std::fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBounds { lower, upper } => {
                write!(f, "invalid bounds: lower={lower}, upper={upper}")
            }
            Self::ObjectiveUndefined { at } => {
                write!(f, "objective undefined (NaN) at x={at}")
            }
        }
    }
}

impl std::error::Error for OptimizeError {}

const GOLDEN_STEP: f64 = 0.381_966_011_250_105_1; // (3 - sqrt(5)) / 2

#[inline]
fn probe<F: Fn(f64) -> f64>(f: &F, x: f64) -> Result<f64, OptimizeError> {
    let fx = f(x);
    if fx.is_nan() {
        return Err(OptimizeError::ObjectiveUndefined { at: x });
    }
    Ok(fx)
}

/// Returns the approximate minimizer of `f` on `[lower, upper]` with default
/// options (tolerance 1e-5, cap 500 evaluations).
pub fn minimize_scalar<F: Fn(f64) -> f64>(
    f: F,
    lower: f64,
    upper: f64,
) -> Result<f64, OptimizeError> {
    minimize_scalar_full(f, lower, upper, BrentOptions::default()).map(|m| m.x)
}

/// Bounded Brent minimization with full diagnostics.
///
/// Interior probes never touch the bounds, so an objective undefined only at
/// the endpoints (e.g. period utility at zero wage) is searchable with a
/// zero lower bound. The one exception is a degenerate interval
/// `lower == upper`, where the single feasible point is evaluated directly.
pub fn minimize_scalar_full<F: Fn(f64) -> f64>(
    f: F,
    lower: f64,
    upper: f64,
    options: BrentOptions,
) -> Result<Minimum, OptimizeError> {
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return Err(OptimizeError::InvalidBounds { lower, upper });
    }
    if lower == upper {
        let fx = probe(&f, lower)?;
        return Ok(Minimum {
            x: lower,
            objective: fx,
            iterations: 1,
            converged: true,
        });
    }

    let sqrt_eps = f64::EPSILON.sqrt();
    let xatol = options.tolerance;

    let (mut a, mut b) = (lower, upper);
    let mut xf = a + GOLDEN_STEP * (b - a);
    let mut fx = probe(&f, xf)?;
    let mut evaluations = 1usize;

    // Second- and third-best points tracked for the parabolic fit.
    let (mut nfc, mut fulc) = (xf, xf);
    let (mut fnfc, mut ffulc) = (fx, fx);

    let mut rat = 0.0_f64;
    let mut step = 0.0_f64;

    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + xatol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut converged = true;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        // Parabolic interpolation through the three best points.
        if step.abs() > tol1 {
            let r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let prev = step;
            step = rat;

            if p.abs() < (0.5 * q * prev).abs() && p > q * (a - xf) && p < q * (b - xf) {
                golden = false;
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * if xm >= xf { 1.0 } else { -1.0 };
                }
            }
        }

        if golden {
            step = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN_STEP * step;
        }

        let sign = if rat >= 0.0 { 1.0 } else { -1.0 };
        let x = xf + sign * rat.abs().max(tol1);
        let fu = probe(&f, x)?;
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            (fulc, ffulc) = (nfc, fnfc);
            (nfc, fnfc) = (xf, fx);
            (xf, fx) = (x, fu);
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                (fulc, ffulc) = (nfc, fnfc);
                (nfc, fnfc) = (x, fu);
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                (fulc, ffulc) = (x, fu);
            }
        }

        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + xatol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= options.max_iterations {
            converged = false;
            break;
        }
    }

    Ok(Minimum {
        x: xf,
        objective: fx,
        iterations: evaluations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finds_quadratic_minimum() {
        let m = minimize_scalar(|x| (x - 1.3).powi(2), 0.0, 5.0).unwrap();
        assert_relative_eq!(m, 1.3, epsilon = 1e-4);
    }

    #[test]
    fn respects_active_lower_bound() {
        let m = minimize_scalar(|x| (x - 1.3).powi(2), 2.0, 5.0).unwrap();
        assert_relative_eq!(m, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn finds_nontrivial_interior_minimum() {
        // min of x^4 - 3x^3 + 2 on [0, 4] is at x = 9/4.
        let m = minimize_scalar(|x: f64| x.powi(4) - 3.0 * x.powi(3) + 2.0, 0.0, 4.0).unwrap();
        assert_relative_eq!(m, 2.25, epsilon = 1e-4);
    }

    #[test]
    fn never_probes_the_open_bounds() {
        // Undefined exactly at x = 0; interior search must not touch it.
        let m = minimize_scalar(
            |x: f64| {
                assert!(x > 0.0);
                x.ln().powi(2)
            },
            0.0,
            3.0,
        )
        .unwrap();
        assert_relative_eq!(m, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_interval_returns_the_point() {
        let m = minimize_scalar_full(|x| x * x, 2.0, 2.0, BrentOptions::default()).unwrap();
        assert_relative_eq!(m.x, 2.0);
        assert_relative_eq!(m.objective, 4.0);
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(
            minimize_scalar(|x| x, 1.0, 0.0),
            Err(OptimizeError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn nan_objective_propagates() {
        let err = minimize_scalar(|_| f64::NAN, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, OptimizeError::ObjectiveUndefined { .. }));
    }

    #[test]
    fn evaluation_cap_still_returns_best_point() {
        let m = minimize_scalar_full(
            |x| (x - 0.7).powi(2),
            0.0,
            1.0,
            BrentOptions {
                tolerance: 1e-12,
                max_iterations: 5,
            },
        )
        .unwrap();
        assert!(!m.converged);
        assert!(m.x > 0.0 && m.x < 1.0);
    }

    #[test]
    fn infinite_objective_values_are_tolerated() {
        // +inf is a valid (terrible) objective value, not an undefined one.
        let m = minimize_scalar(
            |x: f64| if x < 0.5 { f64::INFINITY } else { (x - 0.8).powi(2) },
            0.0,
            2.0,
        )
        .unwrap();
        assert_relative_eq!(m, 0.8, epsilon = 1e-3);
    }
}
