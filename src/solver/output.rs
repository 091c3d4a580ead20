//! Aggregate output under rigid wages.
//!
//! Eq. (18) of Daly and Hobijn (2014): a CES-style aggregation of the
//! rigid/flexible wage-schedule gap, taken in expectation over the shock
//! law, with two rigidity corrections driven by the stationary wage
//! distribution (a mass term at the inflated rigid wage and a density
//! integral over the wages above it).

use crate::core::SolveError;
use crate::math::Interpolant;
use crate::model::params::DerivedConfig;

/// Aggregate output (= labor) of the rigid-wage economy.
///
/// `ws` is the rigid free-reset schedule from the Bellman solution,
/// `flex_ws` the flexible-economy schedule, and `cdf` the stationary wage
/// CDF. Pure reduction, no iteration. Fails with [`SolveError::Domain`] if
/// a schedule wage is non-positive (the CES ratio divides by it) or the
/// aggregate base degenerates.
pub fn rigid_output(
    ws: &Interpolant,
    cfg: &DerivedConfig,
    flex_ws: &Interpolant,
    cdf: &Interpolant,
) -> Result<f64, SolveError> {
    let p = &cfg.params;
    let (eta, gamma, lambda) = (p.eta, p.gamma, p.lambda);
    let carry = 1.0 + p.pi;
    let weights = cfg.shocks.grid_weights(&cfg.z_grid);
    let shock_exp = gamma * (eta - 1.0) / (gamma + eta);

    let mut unconstrained = 0.0;
    let mut at_carried = 0.0;
    let mut above_reset = 0.0;

    for (j, &z) in cfg.z_grid.iter().enumerate() {
        let rigid = ws.eval(z);
        if !(rigid > 0.0) {
            return Err(SolveError::Domain(format!(
                "rigid wage schedule must be positive, got {rigid} at shock {z}"
            )));
        }
        let flex = flex_ws.eval(z);
        let ratio = (flex / rigid).powf(eta - 1.0);
        let shock_factor = (1.0 / z).powf(shock_exp);

        unconstrained += weights[j] * shock_factor * ratio;
        at_carried += weights[j] * shock_factor * cdf.eval(rigid * carry) * ratio;

        // Workers stuck above the reset wage: integrate the distribution
        // density over the wage grid points strictly above ws(z).
        let above: Vec<f64> = cfg.w_grid.iter().copied().filter(|&w| w > rigid).collect();
        if !above.is_empty() {
            let inner = above
                .iter()
                .map(|&w| carry * cdf.derivative_at(w * carry) * (flex / w).powf(eta - 1.0))
                .sum::<f64>()
                / above.len() as f64;
            above_reset += weights[j] * shock_factor * inner;
        }
    }

    let base = (1.0 - lambda) * unconstrained + lambda * (at_carried + above_reset);
    if !base.is_finite() || base <= 0.0 {
        return Err(SolveError::Domain(format!(
            "aggregate base must be positive and finite, got {base}"
        )));
    }

    let z_tilde = base.powf(-(eta + gamma) / (gamma * (eta - 1.0)));
    Ok(((eta - 1.0) / eta).powf(gamma / (1.0 + gamma))
        * (1.0 / z_tilde).powf(gamma / (1.0 + gamma)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::InterpKind;
    use crate::model::utility::{flexible_output, flexible_wage_schedule};
    use crate::model::Parameters;

    fn config(lambda: f64) -> DerivedConfig {
        DerivedConfig::new(Parameters {
            lambda,
            w_count: 40,
            z_count: 15,
            ..Parameters::default()
        })
        .unwrap()
    }

    fn uniform_cdf(cfg: &DerivedConfig) -> Interpolant {
        let lo = cfg.params.w_lower;
        let hi = cfg.params.w_upper;
        let y: Vec<f64> = cfg.w_grid.iter().map(|&w| (w - lo) / (hi - lo)).collect();
        Interpolant::new(cfg.w_grid.clone(), y, InterpKind::MonotoneCubic).unwrap()
    }

    #[test]
    fn flexible_economy_recovers_the_closed_form_output() {
        // With lambda = 0 and the rigid schedule equal to the flexible one,
        // the aggregation collapses to the flexible steady state up to the
        // discretization of the shock expectation.
        let cfg = config(0.0);
        let flex = flexible_wage_schedule(&cfg).unwrap();
        let out = rigid_output(&flex, &cfg, &flex, &uniform_cdf(&cfg)).unwrap();
        let closed = flexible_output(cfg.params.eta, cfg.params.gamma, cfg.params.sigma);
        assert!(
            (out - closed).abs() / closed < 0.05,
            "output {out} too far from closed form {closed}"
        );
    }

    #[test]
    fn rigidity_corrections_move_output_away_from_flexible() {
        let cfg = config(0.6);
        let flex = flexible_wage_schedule(&cfg).unwrap();
        let out = rigid_output(&flex, &cfg, &flex, &uniform_cdf(&cfg)).unwrap();
        assert!(out.is_finite() && out > 0.0);
    }

    #[test]
    fn zero_wage_in_schedule_is_a_domain_error() {
        let cfg = config(0.5);
        let flex = flexible_wage_schedule(&cfg).unwrap();
        // A schedule hitting zero at the bottom of the shock grid.
        let y: Vec<f64> = cfg
            .z_grid
            .iter()
            .map(|&z| (z - cfg.z_grid[0]) * 0.5)
            .collect();
        let ws = Interpolant::new(cfg.z_grid.clone(), y, InterpKind::Linear).unwrap();
        assert!(matches!(
            rigid_output(&ws, &cfg, &flex, &uniform_cdf(&cfg)),
            Err(SolveError::Domain(_))
        ));
    }
}
