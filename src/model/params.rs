//! Structural and numerical-control parameters, and the derived per-scenario
//! configuration (grids, shock law, flexible-economy aggregates).
//!
//! `Parameters` is a plain typed record, loaded once per run and never
//! mutated while solving. Everything derivable from it (grids, truncation
//! bounds, aggregate labor) is computed eagerly, exactly once, by
//! [`DerivedConfig::new`] and then shared read-only with every component.

use serde::{Deserialize, Serialize};

use crate::core::SolveError;
use crate::math::linspace;
use crate::model::shocks::ShockDistribution;
use crate::model::utility::flexible_output;

/// Structural and numerical-control parameters of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    /// Wage grid lower bound (real wage units, > 0).
    pub w_lower: f64,
    /// Wage grid upper bound (real wage units).
    pub w_upper: f64,
    /// Coarse wage grid size.
    pub w_count: usize,
    /// Shock grid size over the truncated support.
    pub z_count: usize,
    /// Log-volatility of the idiosyncratic productivity shock.
    pub sigma: f64,
    /// Probability a worker cannot renegotiate this period
    /// (0 = fully flexible, 1 = fully rigid).
    pub lambda: f64,
    /// Discount factor per period.
    pub beta: f64,
    /// Demand elasticity (> 1).
    pub eta: f64,
    /// Labor-supply curvature.
    pub gamma: f64,
    /// Steady-state inflation rate (decimal, e.g. 0.02 for 2%).
    pub pi: f64,
    /// Inflation sweep lower bound.
    pub pi_lower: f64,
    /// Inflation sweep upper bound.
    pub pi_upper: f64,
    /// Inflation sweep grid size.
    pub pi_count: usize,
    /// Sup-norm convergence tolerance for the fixed-point iterations.
    pub tolerance: f64,
    /// Iteration cap for the value-function iteration.
    pub max_iterations: usize,
    /// Fine grid size used for result reporting.
    pub fine_count: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            w_lower: 0.1,
            w_upper: 5.0,
            w_count: 50,
            z_count: 20,
            sigma: 0.2,
            lambda: 0.5,
            beta: 0.95,
            eta: 2.5,
            gamma: 0.5,
            pi: 0.02,
            pi_lower: 0.0,
            pi_upper: 0.1,
            pi_count: 5,
            tolerance: 5e-3,
            max_iterations: 400,
            fine_count: 10_000,
        }
    }
}

impl Parameters {
    /// Checks every field against its admissible range.
    pub fn validate(&self) -> Result<(), SolveError> {
        fn bad(msg: String) -> Result<(), SolveError> {
            Err(SolveError::InvalidParameter(msg))
        }

        if !(self.w_lower > 0.0 && self.w_lower < self.w_upper && self.w_upper.is_finite()) {
            return bad(format!(
                "wage bounds must satisfy 0 < w_lower < w_upper, got [{}, {}]",
                self.w_lower, self.w_upper
            ));
        }
        if self.w_count < 2 || self.z_count < 2 || self.fine_count < 2 {
            return bad("grid sizes must be at least 2".to_string());
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return bad(format!("sigma must be positive, got {}", self.sigma));
        }
        if !(0.0..=1.0).contains(&self.lambda) {
            return bad(format!("lambda must lie in [0, 1], got {}", self.lambda));
        }
        if !(0.0..1.0).contains(&self.beta) {
            return bad(format!("beta must lie in [0, 1), got {}", self.beta));
        }
        if !(self.eta.is_finite() && self.eta > 1.0) {
            return bad(format!("eta must exceed 1, got {}", self.eta));
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return bad(format!("gamma must be positive, got {}", self.gamma));
        }
        if !(self.pi.is_finite() && self.pi > -1.0) {
            return bad(format!("pi must exceed -1, got {}", self.pi));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return bad(format!("tolerance must be positive, got {}", self.tolerance));
        }
        if self.max_iterations == 0 {
            return bad("max_iterations must be at least 1".to_string());
        }
        if self.pi_count == 0 || !(self.pi_lower <= self.pi_upper) {
            return bad(format!(
                "inflation sweep must satisfy pi_lower <= pi_upper with pi_count >= 1, got [{}, {}] x {}",
                self.pi_lower, self.pi_upper, self.pi_count
            ));
        }
        Ok(())
    }

    /// Returns a copy solved at a different steady-state inflation rate.
    pub fn at_inflation(&self, pi: f64) -> Self {
        Self { pi, ..self.clone() }
    }

    /// Parses the legacy `{key: [value, description]}` parameter document.
    ///
    /// The description strings are documentation in that format and are
    /// discarded; unknown keys are ignored. Missing keys keep their
    /// [`Parameters::default`] values. Legacy key names (`wl`, `wu`, `wn`,
    /// `zn`, `lambda_`, `pi_low`, `pi_high`, `pi_n`, `tol`, `maxiter`) are
    /// accepted alongside the field names used here.
    pub fn from_value_description_json(payload: &str) -> Result<Self, SolveError> {
        let doc: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| SolveError::InvalidParameter(format!("parameter document: {e}")))?;
        let map = doc.as_object().ok_or_else(|| {
            SolveError::InvalidParameter("parameter document must be a JSON object".to_string())
        })?;

        let entry = |names: &[&str]| -> Option<f64> {
            names.iter().find_map(|name| {
                let v = map.get(*name)?;
                // Either a bare number or the legacy [value, description] pair.
                v.as_f64().or_else(|| v.as_array()?.first()?.as_f64())
            })
        };

        let mut p = Parameters::default();
        if let Some(v) = entry(&["w_lower", "wl"]) {
            p.w_lower = v;
        }
        if let Some(v) = entry(&["w_upper", "wu"]) {
            p.w_upper = v;
        }
        if let Some(v) = entry(&["w_count", "wn"]) {
            p.w_count = v as usize;
        }
        if let Some(v) = entry(&["z_count", "zn"]) {
            p.z_count = v as usize;
        }
        if let Some(v) = entry(&["sigma"]) {
            p.sigma = v;
        }
        if let Some(v) = entry(&["lambda", "lambda_"]) {
            p.lambda = v;
        }
        if let Some(v) = entry(&["beta"]) {
            p.beta = v;
        }
        if let Some(v) = entry(&["eta"]) {
            p.eta = v;
        }
        if let Some(v) = entry(&["gamma"]) {
            p.gamma = v;
        }
        if let Some(v) = entry(&["pi", "pibar"]) {
            p.pi = v;
        }
        if let Some(v) = entry(&["pi_lower", "pi_low"]) {
            p.pi_lower = v;
        }
        if let Some(v) = entry(&["pi_upper", "pi_high"]) {
            p.pi_upper = v;
        }
        if let Some(v) = entry(&["pi_count", "pi_n"]) {
            p.pi_count = v as usize;
        }
        if let Some(v) = entry(&["tolerance", "tol"]) {
            p.tolerance = v;
        }
        if let Some(v) = entry(&["max_iterations", "maxiter"]) {
            p.max_iterations = v as usize;
        }
        if let Some(v) = entry(&["fine_count"]) {
            p.fine_count = v as usize;
        }

        p.validate()?;
        Ok(p)
    }
}

/// Everything derivable from [`Parameters`], computed once per scenario and
/// shared read-only with every component.
#[derive(Debug, Clone)]
pub struct DerivedConfig {
    /// The validated parameters this configuration was derived from.
    pub params: Parameters,
    /// Coarse solving grid over the wage support.
    pub w_grid: Vec<f64>,
    /// Fine reporting grid over the wage support.
    pub w_grid_fine: Vec<f64>,
    /// Coarse solving grid over the truncated shock support.
    pub z_grid: Vec<f64>,
    /// Fine reporting grid over the truncated shock support.
    pub z_grid_fine: Vec<f64>,
    /// Truncated shock law.
    pub shocks: ShockDistribution,
    /// Flexible steady-state aggregate labor, entering period utility.
    pub agg_labor: f64,
}

impl DerivedConfig {
    /// Validates `params` and eagerly derives grids, the truncated shock
    /// law, and the flexible-economy aggregate.
    pub fn new(params: Parameters) -> Result<Self, SolveError> {
        params.validate()?;
        let shocks = ShockDistribution::new(params.sigma)?;
        let w_grid = linspace(params.w_lower, params.w_upper, params.w_count);
        let w_grid_fine = linspace(params.w_lower, params.w_upper, params.fine_count);
        let z_grid = shocks.support_grid(params.z_count);
        let z_grid_fine = shocks.support_grid(params.fine_count);
        let agg_labor = flexible_output(params.eta, params.gamma, params.sigma);
        Ok(Self {
            params,
            w_grid,
            w_grid_fine,
            z_grid,
            z_grid_fine,
            shocks,
            agg_labor,
        })
    }

    /// Upper end of the wage support (the last coarse grid point).
    pub fn w_max(&self) -> f64 {
        self.w_grid[self.w_grid.len() - 1]
    }
}
