//! Stationary cross-sectional wage distribution.
//!
//! Given the converged free-reset wage schedule `ws`, the stationary CDF of
//! wages solves the fixed point
//!
//! ```text
//! g(w) = (1-lambda) F(zs(w)) + lambda F(zs(w)) g(w) (1+pi)
//! ```
//!
//! where `zs = ws^-1` maps a chosen wage back to the shock that produced it
//! and `F` is the shock CDF. The wage schedule only covers a sub-range of
//! the wage grid; points with no defined inverse are excluded up front (the
//! NaN sentinels from [`Interpolant::inverse`]) and the fixed point runs on
//! a grid renormalized to the reachable range.

use tracing::{debug, warn};

use crate::core::SolveError;
use crate::math::{Interpolant, linspace};
use crate::model::params::DerivedConfig;

/// Hard cap on fixed-point sweeps; hitting it is surfaced as a warning and
/// a `converged: false` flag, never an error or an infinite loop.
const MAX_SWEEPS: usize = 5_000;

/// Result of the stationary-distribution fixed point.
#[derive(Debug, Clone)]
pub struct DistributionResult {
    /// Stationary wage CDF over the renormalized (reachable) grid.
    pub cdf: Interpolant,
    /// Fixed-point sweeps performed.
    pub iterations: usize,
    /// Final sup-norm error.
    pub sup_error: f64,
    /// Whether the tolerance was met before the cap.
    pub converged: bool,
}

/// Iterates the distribution fixed point from the CDF guess `g0`.
///
/// `wage_schedule` must be invertible (strictly monotone ordinates); the
/// error is propagated otherwise. `g0` is resampled onto the renormalized
/// grid, so its own grid only needs to cover the reachable wage range.
pub fn stationary_distribution(
    g0: &Interpolant,
    wage_schedule: &Interpolant,
    cfg: &DerivedConfig,
    tolerance: f64,
) -> Result<DistributionResult, SolveError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SolveError::InvalidParameter(format!(
            "tolerance must be positive, got {tolerance}"
        )));
    }

    let zs = wage_schedule.inverse()?;

    // Renormalize to the wage range the schedule actually reaches; outside
    // it the inverse is undefined and the map has no meaning. The schedule
    // range is typically much narrower than the coarse grid spacing, so the
    // NaN filter runs on the fine grid.
    let reachable: Vec<f64> = cfg
        .w_grid_fine
        .iter()
        .copied()
        .filter(|&w| !zs.eval(w).is_nan())
        .collect();
    if reachable.len() < 2 {
        return Err(SolveError::Domain(
            "wage schedule range covers fewer than two wage grid points".to_string(),
        ));
    }
    let grid = linspace(
        reachable[0],
        reachable[reachable.len() - 1],
        cfg.params.w_count,
    );

    // F(zs(w)) is invariant across sweeps.
    let shock_mass: Vec<f64> = grid.iter().map(|&w| cfg.shocks.cdf(zs.eval(w))).collect();

    let lambda = cfg.params.lambda;
    let carry = 1.0 + cfg.params.pi;

    let mut g = g0.resample(&grid)?;
    let mut iterations = 0usize;
    let mut sup_error = f64::INFINITY;
    let mut converged = false;

    while iterations < MAX_SWEEPS && !converged {
        let updated: Vec<f64> = shock_mass
            .iter()
            .zip(g.y().iter())
            .map(|(&fz, &gy)| (1.0 - lambda) * fz + lambda * fz * gy * carry)
            .collect();
        let next = Interpolant::with_extrapolation(
            grid.clone(),
            updated,
            g0.kind(),
            g0.extrapolation(),
        )?;
        iterations += 1;
        sup_error = next.sup_distance(&g)?;
        debug!(iteration = iterations, sup_error, "wage distribution update");
        converged = sup_error < tolerance;
        g = next;
    }

    if !converged {
        warn!(
            iterations,
            sup_error, tolerance, "wage distribution fixed point stopped before convergence"
        );
    }

    Ok(DistributionResult {
        cdf: g,
        iterations,
        sup_error,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::InterpKind;
    use crate::model::Parameters;
    use approx::assert_relative_eq;

    fn config(lambda: f64) -> DerivedConfig {
        DerivedConfig::new(Parameters {
            lambda,
            w_count: 30,
            z_count: 10,
            ..Parameters::default()
        })
        .unwrap()
    }

    /// Synthetic increasing wage schedule covering part of the wage grid.
    fn schedule(cfg: &DerivedConfig) -> Interpolant {
        let y: Vec<f64> = cfg.z_grid.iter().map(|&z| 0.5 + 0.8 * z).collect();
        Interpolant::new(cfg.z_grid.clone(), y, InterpKind::Linear).unwrap()
    }

    fn guess(cfg: &DerivedConfig) -> Interpolant {
        let y: Vec<f64> = cfg.w_grid.iter().map(|&w| w / 4.0).collect();
        Interpolant::new(cfg.w_grid.clone(), y, InterpKind::MonotoneCubic).unwrap()
    }

    #[test]
    fn flexible_economy_lands_on_shock_mass_after_one_application() {
        let cfg = config(0.0);
        let ws = schedule(&cfg);
        let res = stationary_distribution(&guess(&cfg), &ws, &cfg, 1e-10).unwrap();
        assert!(res.converged);
        // One application reaches the fixed point; the second only confirms it.
        assert!(res.iterations <= 2);

        let zs = ws.inverse().unwrap();
        for (&w, &gy) in res.cdf.x().iter().zip(res.cdf.y().iter()) {
            assert_relative_eq!(gy, cfg.shocks.cdf(zs.eval(w)), epsilon = 1e-12);
        }
    }

    #[test]
    fn rigid_economy_converges_to_an_increasing_cdf() {
        let cfg = config(0.5);
        let res = stationary_distribution(&guess(&cfg), &schedule(&cfg), &cfg, 1e-8).unwrap();
        assert!(res.converged);
        assert!(res.sup_error < 1e-8);
        assert!(res.cdf.y().windows(2).all(|w| w[1] >= w[0] - 1e-9));
        assert!(res.cdf.y().iter().all(|&v| (0.0..=1.5).contains(&v)));
    }

    #[test]
    fn renormalized_grid_stays_inside_the_schedule_range() {
        let cfg = config(0.5);
        let ws = schedule(&cfg);
        let res = stationary_distribution(&guess(&cfg), &ws, &cfg, 1e-8).unwrap();
        let lo = ws.y()[0];
        let hi = ws.y()[ws.y().len() - 1];
        assert!(res.cdf.x().iter().all(|&w| w >= lo - 1e-12 && w <= hi + 1e-12));
        assert_eq!(res.cdf.len(), cfg.params.w_count);
    }

    #[test]
    fn non_invertible_schedule_is_rejected() {
        let cfg = config(0.5);
        let mut y: Vec<f64> = cfg.z_grid.iter().map(|&z| 0.5 + 0.8 * z).collect();
        let n = y.len();
        y[n - 1] = y[n - 2]; // flat top segment breaks strict monotonicity
        let ws = Interpolant::new(cfg.z_grid.clone(), y, InterpKind::Linear).unwrap();
        assert!(matches!(
            stationary_distribution(&guess(&cfg), &ws, &cfg, 1e-8),
            Err(SolveError::Interpolation(_))
        ));
    }

    #[test]
    fn schedule_outside_the_wage_grid_is_a_domain_error() {
        let cfg = config(0.5);
        let y: Vec<f64> = cfg.z_grid.iter().map(|&z| 40.0 + z).collect();
        let ws = Interpolant::new(cfg.z_grid.clone(), y, InterpKind::Linear).unwrap();
        assert!(matches!(
            stationary_distribution(&guess(&cfg), &ws, &cfg, 1e-8),
            Err(SolveError::Domain(_))
        ));
    }
}
