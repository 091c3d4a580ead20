//! Period utility and flexible-economy closed forms.
//!
//! The period payoff of a worker supplying labor at wage `w` under
//! idiosyncratic productivity shock `z` is
//!
//! ```text
//! u(w, z) = w^(1-eta) - (gamma/(gamma+1)) * z * (w^(-eta) * L)^((gamma+1)/gamma)
//! ```
//!
//! with `eta` the demand elasticity, `gamma` the labor-supply curvature, and
//! `L` aggregate labor. The flexible-economy steady state admits closed
//! forms for output and the reset wage, used to seed the flexible schedule
//! the aggregate-output step compares against.

use crate::math::{InterpKind, Interpolant, InterpolationError};
use crate::model::params::DerivedConfig;

/// Instantaneous utility of working at `wage` under `shock`.
///
/// Pure function. Returns NaN for `wage <= 0` (the caller keeps optimization
/// bounds positive; the value is never silently clamped). A wage small
/// enough to overflow the labor-disutility term returns `-inf`, the correct
/// limit, so bounded minimizers can still rank it.
pub fn period_utility(wage: f64, shock: f64, eta: f64, gamma: f64, agg_labor: f64) -> f64 {
    if wage <= 0.0 {
        return f64::NAN;
    }
    let consumption = wage.powf(1.0 - eta);
    let labor =
        (gamma / (gamma + 1.0)) * shock * (wage.powf(-eta) * agg_labor).powf((gamma + 1.0) / gamma);
    if labor.is_infinite() {
        return f64::NEG_INFINITY;
    }
    consumption - labor
}

/// Aggregate output (= labor) of the fully flexible steady state.
pub fn flexible_output(eta: f64, gamma: f64, sigma: f64) -> f64 {
    let zt = (-0.5 * (eta * (1.0 + gamma)) / (gamma + eta) * sigma * sigma).exp();
    ((eta - 1.0) / eta).powf(gamma / (1.0 + gamma)) * (1.0 / zt).powf(gamma / (1.0 + gamma))
}

/// Steady-state reset wage of a flexible-wage worker drawing `shock`.
pub fn flexible_wage(eta: f64, gamma: f64, shock: f64, agg_labor: f64) -> f64 {
    (eta / (eta - 1.0)).powf(gamma / (gamma + eta))
        * shock.powf(gamma / (gamma + eta))
        * agg_labor.powf((1.0 + gamma) / (gamma + eta))
}

/// Flexible wage schedule over the shock grid, as an interpolant comparable
/// with the rigid schedule produced by the Bellman solution.
pub fn flexible_wage_schedule(cfg: &DerivedConfig) -> Result<Interpolant, InterpolationError> {
    let p = &cfg.params;
    let y: Vec<f64> = cfg
        .z_grid
        .iter()
        .map(|&z| flexible_wage(p.eta, p.gamma, z, cfg.agg_labor))
        .collect();
    Interpolant::new(cfg.z_grid.clone(), y, InterpKind::Linear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::params::Parameters;
    use approx::assert_relative_eq;

    #[test]
    fn utility_is_nan_at_non_positive_wage() {
        assert!(period_utility(0.0, 1.0, 2.5, 0.5, 0.85).is_nan());
        assert!(period_utility(-1.0, 1.0, 2.5, 0.5, 0.85).is_nan());
    }

    #[test]
    fn utility_matches_hand_computed_value() {
        // w=1, z=1: u = 1 - (gamma/(gamma+1)) * L^((gamma+1)/gamma)
        let gamma = 0.5;
        let agg: f64 = 0.85;
        let expect = 1.0 - (gamma / (gamma + 1.0)) * agg.powf((gamma + 1.0) / gamma);
        assert_relative_eq!(period_utility(1.0, 1.0, 2.5, gamma, agg), expect, epsilon = 1e-14);
    }

    #[test]
    fn utility_tends_to_negative_infinity_at_tiny_wage() {
        let u = period_utility(1e-250, 1.0, 2.5, 0.5, 0.85);
        assert_eq!(u, f64::NEG_INFINITY);
    }

    #[test]
    fn higher_shock_lowers_utility() {
        let lo = period_utility(0.9, 0.8, 2.5, 0.5, 0.85);
        let hi = period_utility(0.9, 1.2, 2.5, 0.5, 0.85);
        assert!(hi < lo);
    }

    #[test]
    fn flexible_closed_forms_are_consistent() {
        // Reference calibration: eta=2.5, gamma=0.5, sigma=0.2 gives
        // aggregate labor ~= 0.8505.
        let l = flexible_output(2.5, 0.5, 0.2);
        assert_relative_eq!(l, 0.850_490_638_221_727, epsilon = 1e-12);

        let w = flexible_wage(2.5, 0.5, 1.0, l);
        assert!(w > 0.0 && w.is_finite());
    }

    #[test]
    fn flexible_schedule_is_increasing_in_shock() {
        let cfg = DerivedConfig::new(Parameters::default()).unwrap();
        let ws = flexible_wage_schedule(&cfg).unwrap();
        assert!(ws.y().windows(2).all(|w| w[1] > w[0]));
    }
}
