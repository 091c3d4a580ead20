//! Sample-path simulation under the rigidity rule.
//!
//! Given a solved wage schedule, simulates a worker's wage: each period a
//! fresh truncated shock is drawn, the free reset wage is read off the
//! schedule, and with probability `lambda` the worker is stuck at no less
//! than the carried wage. The generator is caller-supplied; identical seeds
//! reproduce identical paths.

use rand::Rng;

use crate::math::Interpolant;
use crate::model::params::DerivedConfig;

/// Simulates `periods` steps of a single worker's wage starting from `w0`.
pub fn wage_path<R: Rng + ?Sized>(
    ws: &Interpolant,
    cfg: &DerivedConfig,
    w0: f64,
    periods: usize,
    rng: &mut R,
) -> Vec<f64> {
    let shocks = cfg.shocks.sample_truncated(rng, periods);
    let lambda = cfg.params.lambda;

    let mut wage = w0;
    shocks
        .into_iter()
        .map(|z| {
            let free = ws.eval(z);
            let stuck = rng.random::<f64>() < lambda;
            wage = if stuck { wage.max(free) } else { free };
            wage
        })
        .collect()
}
