//! Model primitives: parameters, the shock law, and period utility.

pub mod params;
pub mod shocks;
pub mod utility;

pub use params::{DerivedConfig, Parameters};
pub use shocks::{LOWER_TAIL, ShockDistribution, UPPER_TAIL};
pub use utility::{flexible_output, flexible_wage, flexible_wage_schedule, period_utility};
