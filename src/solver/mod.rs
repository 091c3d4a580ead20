//! The solver pipeline: Bellman fixed point, stationary wage distribution,
//! aggregate output, scenario sweep, and sample-path simulation.

pub mod bellman;
pub mod distribution;
pub mod output;
pub mod simulate;
pub mod sweep;

pub use bellman::{
    BellmanCell, BellmanSolution, BellmanStep, CellGrid, IterationOptions, IterationRecord,
    bellman, burn_in, iter_bellman,
};
pub use distribution::{DistributionResult, stationary_distribution};
pub use output::rigid_output;
pub use simulate::wage_path;
pub use sweep::{ScenarioResult, inflation_grid, solve_scenario, solve_scenarios};
