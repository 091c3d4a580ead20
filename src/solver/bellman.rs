//! The Bellman operator of the sticky-wage model and its fixed-point
//! iteration.
//!
//! Each period a worker observes the idiosyncratic shock `z` and either
//! resets the wage freely (probability `1 - lambda`) or is stuck at no less
//! than the current wage `y` (probability `lambda`), while inflation erodes
//! whatever nominal wage is carried into next period:
//!
//! ```text
//! v(y, z) = (1-lambda) * max_{x in [0, w_max]} { u(x, z) + beta v(x/(1+pi)) }
//!         +     lambda * max_{x in [y, w_max]} { u(x, z) + beta v(x/(1+pi)) }
//! ```
//!
//! The value function is carried between iterations as an [`Interpolant`]
//! over the wage grid; the per-cell maximizations run the bounded Brent
//! search on the negated objective.
//!
//! References:
//! - Daly and Hobijn (2014), *Downward Nominal Wage Rigidities Bend the
//!   Phillips Curve*, Eq. (13).
//! - Stachurski, *Economic Dynamics* (2009), fitted value iteration.

use tracing::{debug, warn};

use crate::core::SolveError;
use crate::math::{Interpolant, minimize_scalar};
use crate::model::params::DerivedConfig;
use crate::model::utility::period_utility;

/// Optimization detail for one (wage, shock) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BellmanCell {
    /// Wage carried into the period (grid point `y`).
    pub wage: f64,
    /// Productivity shock (grid point `z`).
    pub shock: f64,
    /// Rigidity-weighted cell value.
    pub value: f64,
    /// Free-reset optimal wage (`m1`).
    pub free_wage: f64,
    /// Constrained optimal wage, no lower than `wage` (`m2`).
    pub rigid_wage: f64,
}

/// Dense per-iteration optimization detail over the wage x shock grid.
///
/// Owned by the Bellman application that produced it; read-only afterward.
#[derive(Debug, Clone)]
pub struct CellGrid {
    w_grid: Vec<f64>,
    z_grid: Vec<f64>,
    /// Row-major over `[wage][shock]`.
    cells: Vec<BellmanCell>,
}

impl CellGrid {
    /// Grid dimensions as `(wage_points, shock_points)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.w_grid.len(), self.z_grid.len())
    }

    /// Cell at wage index `i`, shock index `j`.
    pub fn get(&self, i: usize, j: usize) -> &BellmanCell {
        &self.cells[i * self.z_grid.len() + j]
    }

    /// Wage grid the rows are indexed by.
    pub fn w_grid(&self) -> &[f64] {
        &self.w_grid
    }

    /// Shock grid the columns are indexed by.
    pub fn z_grid(&self) -> &[f64] {
        &self.z_grid
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &BellmanCell> {
        self.cells.iter()
    }
}

/// Output of a single Bellman application.
#[derive(Debug, Clone)]
pub struct BellmanStep {
    /// Updated value function over the wage grid.
    pub value_fn: Interpolant,
    /// Free-reset wage as a function of the shock.
    pub wage_schedule: Interpolant,
    /// Raw per-cell optimization detail.
    pub cells: CellGrid,
}

/// Applies the Bellman operator once to the candidate value function `v`.
///
/// `v` must be defined over the configuration's wage grid; it is evaluated
/// (never mutated) at the inflation-deflated next-period wage. Cells are
/// filled over the full wage x shock grid; the free optimum is computed once
/// per shock and reused across wage rows, and the constrained optimum
/// short-circuits to it whenever it is feasible (`m1 >= y`), which leaves
/// the mathematically defined result unchanged.
///
/// Returns the updated value function (the pdf-weighted expectation of cell
/// values over the shock grid), the wage schedule, and the raw cells.
pub fn bellman(v: &Interpolant, cfg: &DerivedConfig) -> Result<BellmanStep, SolveError> {
    let p = &cfg.params;
    let w_max = cfg.w_max();
    let deflate = 1.0 + p.pi;

    let h = |x: f64, z: f64| {
        -(period_utility(x, z, p.eta, p.gamma, cfg.agg_labor) + p.beta * v.eval(x / deflate))
    };

    // Free-reset optima, one per shock; independent of the current wage.
    let mut free = Vec::with_capacity(cfg.z_grid.len());
    for &z in &cfg.z_grid {
        free.push(minimize_scalar(|x| h(x, z), 0.0, w_max)?);
    }

    let mut cells = Vec::with_capacity(cfg.w_grid.len() * cfg.z_grid.len());
    for &y in &cfg.w_grid {
        for (j, &z) in cfg.z_grid.iter().enumerate() {
            let m1 = free[j];
            let m2 = if m1 >= y {
                m1
            } else {
                minimize_scalar(|x| h(x, z), y, w_max)?
            };
            let value = -((1.0 - p.lambda) * h(m1, z) + p.lambda * h(m2, z));
            cells.push(BellmanCell {
                wage: y,
                shock: z,
                value,
                free_wage: m1,
                rigid_wage: m2,
            });
        }
    }

    let weights = cfg.shocks.grid_weights(&cfg.z_grid);
    let zn = cfg.z_grid.len();
    let tv: Vec<f64> = (0..cfg.w_grid.len())
        .map(|i| {
            weights
                .iter()
                .enumerate()
                .map(|(j, &w)| w * cells[i * zn + j].value)
                .sum()
        })
        .collect();

    let value_fn =
        Interpolant::with_extrapolation(cfg.w_grid.clone(), tv, v.kind(), v.extrapolation())?;
    let wage_schedule = Interpolant::new(cfg.z_grid.clone(), free, v.kind())?;

    Ok(BellmanStep {
        value_fn,
        wage_schedule,
        cells: CellGrid {
            w_grid: cfg.w_grid.clone(),
            z_grid: cfg.z_grid.clone(),
            cells,
        },
    })
}

/// Knobs for [`iter_bellman`].
#[derive(Debug, Clone, Copy)]
pub struct IterationOptions {
    /// Sup-norm convergence tolerance over the wage grid.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// When true, exhausting the cap is a fatal [`SolveError::Convergence`];
    /// when false the last iterate is returned with `converged == false`.
    pub strict: bool,
    /// Accumulate every intermediate iterate. Off by default; the history
    /// holds a full value function, schedule, and cell grid per iteration.
    pub keep_history: bool,
}

impl Default for IterationOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 100,
            strict: true,
            keep_history: false,
        }
    }
}

impl IterationOptions {
    /// Lenient options taken from the numerical controls of a parameter set,
    /// as the scenario sweep uses them.
    pub fn from_params(params: &crate::model::Parameters) -> Self {
        Self {
            tolerance: params.tolerance,
            max_iterations: params.max_iterations,
            strict: false,
            keep_history: false,
        }
    }
}

/// One retained iterate when history accumulation is on.
#[derive(Debug, Clone)]
pub struct IterationRecord {
    pub value_fn: Interpolant,
    pub wage_schedule: Interpolant,
    pub cells: CellGrid,
    pub sup_error: f64,
}

/// A converged (or lenient-mode final) Bellman fixed point.
#[derive(Debug, Clone)]
pub struct BellmanSolution {
    /// Final value function.
    pub value_fn: Interpolant,
    /// Final free-reset wage schedule.
    pub wage_schedule: Interpolant,
    /// Cell detail of the final iteration.
    pub cells: CellGrid,
    /// Bellman applications performed.
    pub iterations: usize,
    /// Final sup-norm error; inspect this in lenient mode.
    pub sup_error: f64,
    /// Whether `sup_error < tolerance` was reached.
    pub converged: bool,
    /// Intermediate iterates, when requested.
    pub history: Option<Vec<IterationRecord>>,
}

/// Iterates the Bellman operator from `v0` to a sup-norm fixed point.
///
/// `v0` must share the configuration's wage grid. In strict mode exhausting
/// the cap raises [`SolveError::Convergence`] carrying the final error
/// magnitude and iteration count; in lenient mode the last iterate is
/// returned (with a warning log) and the caller inspects
/// [`BellmanSolution::converged`].
pub fn iter_bellman(
    v0: &Interpolant,
    cfg: &DerivedConfig,
    options: &IterationOptions,
) -> Result<BellmanSolution, SolveError> {
    let mut v = v0.clone();
    let mut history = options.keep_history.then(Vec::new);
    let mut iterations = 0usize;
    let mut sup_error = f64::INFINITY;
    let mut converged = false;
    let mut last: Option<BellmanStep> = None;

    while iterations < options.max_iterations && !converged {
        let step = bellman(&v, cfg)?;
        iterations += 1;
        sup_error = step.value_fn.sup_distance(&v)?;
        debug!(iteration = iterations, sup_error, "bellman update");

        if let Some(h) = history.as_mut() {
            h.push(IterationRecord {
                value_fn: step.value_fn.clone(),
                wage_schedule: step.wage_schedule.clone(),
                cells: step.cells.clone(),
                sup_error,
            });
        }

        converged = sup_error < options.tolerance;
        v = step.value_fn.clone();
        last = Some(step);
    }

    let Some(step) = last else {
        return Err(SolveError::Convergence {
            iterations: 0,
            error: f64::INFINITY,
        });
    };

    if !converged {
        if options.strict {
            return Err(SolveError::Convergence {
                iterations,
                error: sup_error,
            });
        }
        warn!(
            iterations,
            sup_error,
            tolerance = options.tolerance,
            "value-function iteration stopped before convergence"
        );
    }

    Ok(BellmanSolution {
        value_fn: step.value_fn,
        wage_schedule: step.wage_schedule,
        cells: step.cells,
        iterations,
        sup_error,
        converged,
        history,
    })
}

/// Cheap pre-shaping rounds at unit shock, to start the main iteration from
/// a value function with roughly the right curvature.
pub fn burn_in(
    v0: &Interpolant,
    cfg: &DerivedConfig,
    rounds: usize,
) -> Result<Interpolant, SolveError> {
    let p = &cfg.params;
    let w_max = cfg.w_max();
    let deflate = 1.0 + p.pi;
    let mut v = v0.clone();

    for _ in 0..rounds {
        let h = |x: f64| {
            -(period_utility(x, 1.0, p.eta, p.gamma, cfg.agg_labor) + p.beta * v.eval(x / deflate))
        };
        let m1 = minimize_scalar(h, 0.0, w_max)?;
        let mut vals = Vec::with_capacity(cfg.w_grid.len());
        for &y in &cfg.w_grid {
            let m2 = if m1 >= y {
                m1
            } else {
                minimize_scalar(h, y, w_max)?
            };
            vals.push(-((1.0 - p.lambda) * h(m1) + p.lambda * h(m2)));
        }
        v = Interpolant::with_extrapolation(cfg.w_grid.clone(), vals, v.kind(), v.extrapolation())?;
    }
    Ok(v)
}
