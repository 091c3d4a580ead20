//! Stickywage solves an infinite-horizon search-and-bargaining labor model
//! with downward nominal wage rigidity by value-function iteration over a
//! discretized wage state.
//!
//! Each period a worker draws an idiosyncratic productivity shock and either
//! resets the wage freely or is stuck at no less than the wage carried in,
//! whose real value inflation erodes. The crate computes the fixed point of
//! the resulting Bellman operator, the stationary cross-sectional wage
//! distribution implied by the converged wage schedule, and the aggregate
//! output of the rigid economy, one independent solve per steady-state
//! inflation rate.
//!
//! References used across modules:
//! - Daly and Hobijn (2014), *Downward Nominal Wage Rigidities Bend the
//!   Phillips Curve*.
//! - Stachurski, *Economic Dynamics* (2009), fitted value iteration.
//! - Brent (1973), bounded derivative-free minimization.
//! - Fritsch and Carlson (1980), monotone cubic interpolation.
//!
//! Numerical considerations:
//! - The Bellman operator is a `beta`-contraction in the sup norm, so the
//!   value iteration converges geometrically; tolerances and iteration caps
//!   trade accuracy against the per-iteration cost of the cell grid of
//!   bounded scalar optimizations.
//! - Value functions and schedules are carried as [`math::Interpolant`]s;
//!   the monotone cubic scheme keeps interpolated CDFs shape-preserving.
//! - Shock expectations discretize a truncated log-normal and renormalize
//!   the grid weights, since the grid excludes the distribution tails.
//!
//! # Quick Start
//!
//! Derive a per-scenario configuration and inspect the grids:
//! ```rust
//! use stickywage::model::{DerivedConfig, Parameters};
//!
//! let cfg = DerivedConfig::new(Parameters::default()).unwrap();
//! assert_eq!(cfg.w_grid.len(), cfg.params.w_count);
//! assert!(cfg.z_grid[0] > 0.0);
//! ```
//!
//! Iterate the Bellman operator to a fixed point on a small grid:
//! ```rust
//! use stickywage::math::{InterpKind, Interpolant};
//! use stickywage::model::{DerivedConfig, Parameters};
//! use stickywage::solver::{IterationOptions, iter_bellman};
//!
//! let cfg = DerivedConfig::new(Parameters {
//!     w_count: 15,
//!     z_count: 7,
//!     beta: 0.6,
//!     ..Parameters::default()
//! })
//! .unwrap();
//!
//! let guess: Vec<f64> = cfg.w_grid.iter().map(|w| 29.0 - w).collect();
//! let v0 = Interpolant::new(cfg.w_grid.clone(), guess, InterpKind::Linear).unwrap();
//!
//! let options = IterationOptions {
//!     tolerance: 1e-2,
//!     max_iterations: 60,
//!     ..Default::default()
//! };
//! let solution = iter_bellman(&v0, &cfg, &options).unwrap();
//! assert!(solution.converged);
//! // Higher productivity never commands a lower reset wage.
//! assert!(solution.wage_schedule.y().windows(2).all(|w| w[1] >= w[0]));
//! ```
//!
//! Persist a solved scenario:
//! ```rust
//! use stickywage::core::{ScenarioArtifacts, from_json, to_json_pretty};
//! use stickywage::model::Parameters;
//! use stickywage::solver::solve_scenario;
//!
//! let params = Parameters {
//!     w_count: 15,
//!     z_count: 7,
//!     beta: 0.6,
//!     tolerance: 1e-2,
//!     max_iterations: 60,
//!     ..Parameters::default()
//! };
//! let result = solve_scenario(0.02, None, &params).unwrap();
//! let json = to_json_pretty(&result.artifacts()).unwrap();
//! let back: ScenarioArtifacts = from_json(&json).unwrap();
//! assert_eq!(back.pi, 0.02);
//! ```

pub mod core;
pub mod math;
pub mod model;
pub mod solver;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::{ScenarioArtifacts, SolveError};
    pub use crate::math::{ExtrapolationMode, InterpKind, Interpolant};
    pub use crate::model::{DerivedConfig, Parameters, ShockDistribution};
    pub use crate::solver::{
        BellmanSolution, IterationOptions, ScenarioResult, bellman, iter_bellman, rigid_output,
        solve_scenario, solve_scenarios, stationary_distribution,
    };
}
