//! Scenario sweep over steady-state inflation rates.
//!
//! Each inflation rate is an independent solve: derive the configuration,
//! iterate the Bellman operator, recover the stationary wage distribution,
//! and aggregate output. Scenarios share nothing mutable, so the sweep is a
//! rayon parallel map, and one scenario's failure never aborts the others.

use rayon::prelude::*;

use crate::core::{InterpolantSnapshot, ScenarioArtifacts, SolveError};
use crate::math::{InterpKind, Interpolant, linspace};
use crate::model::params::{DerivedConfig, Parameters};
use crate::model::utility::flexible_wage_schedule;
use crate::solver::bellman::{IterationOptions, iter_bellman};
use crate::solver::distribution::stationary_distribution;
use crate::solver::output::rigid_output;

/// Everything one solved inflation scenario produces.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Inflation rate the scenario was solved at.
    pub pi: f64,
    /// Converged value function over the wage grid.
    pub value_fn: Interpolant,
    /// Free-reset wage schedule over the shock grid.
    pub wage_schedule: Interpolant,
    /// Stationary wage CDF over the reachable wage range.
    pub stationary_cdf: Interpolant,
    /// Aggregate output under rigid wages.
    pub rigid_output: f64,
    /// Bellman applications performed.
    pub iterations: usize,
    /// Final sup-norm error of the value iteration.
    pub sup_error: f64,
    /// Whether both fixed points met their tolerances.
    pub converged: bool,
}

impl ScenarioResult {
    /// Serialized form for result persistence.
    pub fn artifacts(&self) -> ScenarioArtifacts {
        ScenarioArtifacts {
            pi: self.pi,
            value_fn: InterpolantSnapshot::from(&self.value_fn),
            wage_schedule: InterpolantSnapshot::from(&self.wage_schedule),
            stationary_cdf: InterpolantSnapshot::from(&self.stationary_cdf),
            rigid_output: self.rigid_output,
        }
    }
}

/// Default initial value-function guess over the wage grid.
fn default_guess(cfg: &DerivedConfig) -> Result<Interpolant, SolveError> {
    let y = cfg.w_grid.iter().map(|w| 29.0 - w).collect();
    Ok(Interpolant::new(
        cfg.w_grid.clone(),
        y,
        InterpKind::Linear,
    )?)
}

/// Solves one inflation scenario end to end.
///
/// `initial_guess`, when given, is resampled onto the scenario's wage grid;
/// otherwise a downward-sloping affine guess is used. The value iteration
/// runs in lenient mode with the parameter set's numerical controls;
/// inspect [`ScenarioResult::converged`].
pub fn solve_scenario(
    pi: f64,
    initial_guess: Option<&Interpolant>,
    params: &Parameters,
) -> Result<ScenarioResult, SolveError> {
    let cfg = DerivedConfig::new(params.at_inflation(pi))?;

    let v0 = match initial_guess {
        Some(guess) => guess.resample(&cfg.w_grid)?,
        None => default_guess(&cfg)?,
    };

    let options = IterationOptions::from_params(&cfg.params);
    let solution = iter_bellman(&v0, &cfg, &options)?;

    let cdf_guess = Interpolant::new(
        cfg.w_grid.clone(),
        cfg.w_grid.iter().map(|w| w / 4.0).collect(),
        InterpKind::MonotoneCubic,
    )?;
    let distribution = stationary_distribution(
        &cdf_guess,
        &solution.wage_schedule,
        &cfg,
        cfg.params.tolerance,
    )?;

    let flex_ws = flexible_wage_schedule(&cfg)?;
    let output = rigid_output(&solution.wage_schedule, &cfg, &flex_ws, &distribution.cdf)?;

    Ok(ScenarioResult {
        pi,
        value_fn: solution.value_fn,
        wage_schedule: solution.wage_schedule,
        stationary_cdf: distribution.cdf,
        rigid_output: output,
        iterations: solution.iterations,
        sup_error: solution.sup_error,
        converged: solution.converged && distribution.converged,
    })
}

/// Solves every inflation rate in `pis` independently, in parallel.
///
/// Failures are isolated per scenario: the result keeps one entry per input
/// rate, in input order, each carrying its own `Result`.
pub fn solve_scenarios(
    pis: &[f64],
    initial_guess: Option<&Interpolant>,
    params: &Parameters,
) -> Vec<(f64, Result<ScenarioResult, SolveError>)> {
    pis.par_iter()
        .map(|&pi| (pi, solve_scenario(pi, initial_guess, params)))
        .collect()
}

/// The inflation sweep grid named by the parameter set.
pub fn inflation_grid(params: &Parameters) -> Vec<f64> {
    linspace(params.pi_lower, params.pi_upper, params.pi_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> Parameters {
        Parameters {
            w_count: 25,
            z_count: 10,
            beta: 0.9,
            tolerance: 1e-2,
            max_iterations: 250,
            ..Parameters::default()
        }
    }

    #[test]
    fn single_scenario_produces_consistent_artifacts() {
        let params = fast_params();
        let res = solve_scenario(0.02, None, &params).unwrap();
        assert!(res.converged, "sup_error = {}", res.sup_error);
        assert!(res.rigid_output > 0.0 && res.rigid_output.is_finite());
        assert!(
            res.wage_schedule
                .y()
                .windows(2)
                .all(|w| w[1] >= w[0] - 1e-7)
        );
        assert_eq!(res.value_fn.len(), params.w_count);

        let artifacts = res.artifacts();
        assert_eq!(artifacts.pi, res.pi);
        assert_eq!(artifacts.wage_schedule.y, res.wage_schedule.y());
    }

    #[test]
    fn sweep_isolates_per_scenario_failures() {
        let params = fast_params();
        // -1.5 violates pi > -1 and must fail alone.
        let pis = [0.0, -1.5, 0.04];
        let results = solve_scenarios(&pis, None, &params);
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(SolveError::InvalidParameter(_))
        ));
        assert!(results[2].1.is_ok());
        // Input order is preserved.
        assert_eq!(results[1].0, -1.5);
    }

    #[test]
    fn inflation_grid_matches_parameter_controls() {
        let params = Parameters {
            pi_lower: 0.0,
            pi_upper: 0.08,
            pi_count: 5,
            ..Parameters::default()
        };
        let grid = inflation_grid(&params);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], 0.0);
        assert!((grid[4] - 0.08).abs() < 1e-12);
    }
}
