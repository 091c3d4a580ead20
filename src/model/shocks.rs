//! Idiosyncratic productivity shock law.
//!
//! Shocks are log-normal with `mu = -sigma^2/2`, so `E[z] = 1` and the
//! shock is a pure dispersion parameter. The support used by the solver is
//! the law truncated at fixed lower/upper probability tails; grids and
//! expectation weights are derived from that truncation.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use statrs::distribution::{Continuous, ContinuousCDF, LogNormal};

use crate::core::SolveError;
use crate::math::linspace;

/// Probability mass removed below the truncated support.
pub const LOWER_TAIL: f64 = 0.05;
/// Cumulative probability at the top of the truncated support.
pub const UPPER_TAIL: f64 = 0.95;

/// Log-normal productivity law truncated to a finite support.
#[derive(Debug, Clone, Copy)]
pub struct ShockDistribution {
    sigma: f64,
    mu: f64,
    dist: LogNormal,
    underlying: Normal<f64>,
    lower: f64,
    upper: f64,
}

impl ShockDistribution {
    /// Builds the mean-one log-normal shock law for log-volatility `sigma`.
    pub fn new(sigma: f64) -> Result<Self, SolveError> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(SolveError::InvalidParameter(format!(
                "shock log-volatility must be positive and finite, got {sigma}"
            )));
        }
        let mu = -(sigma * sigma) / 2.0;
        let dist = LogNormal::new(mu, sigma)
            .map_err(|e| SolveError::InvalidParameter(format!("log-normal({mu}, {sigma}): {e}")))?;
        let underlying = Normal::new(mu, sigma)
            .map_err(|e| SolveError::InvalidParameter(format!("normal({mu}, {sigma}): {e}")))?;
        let lower = dist.inverse_cdf(LOWER_TAIL);
        let upper = dist.inverse_cdf(UPPER_TAIL);
        Ok(Self {
            sigma,
            mu,
            dist,
            underlying,
            lower,
            upper,
        })
    }

    /// Log-volatility of the underlying normal.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Mean of the underlying normal (`-sigma^2/2`).
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Lower truncation bound (the 5% quantile).
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper truncation bound (the 95% quantile).
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Density of the (untruncated) law at `z`.
    pub fn pdf(&self, z: f64) -> f64 {
        self.dist.pdf(z)
    }

    /// Cumulative probability of the (untruncated) law at `z`.
    pub fn cdf(&self, z: f64) -> f64 {
        self.dist.cdf(z)
    }

    /// Quantile (inverse CDF) of the (untruncated) law at probability `p`.
    pub fn ppf(&self, p: f64) -> f64 {
        self.dist.inverse_cdf(p)
    }

    /// Evenly spaced `n`-point grid over the truncated support.
    pub fn support_grid(&self, n: usize) -> Vec<f64> {
        linspace(self.lower, self.upper, n)
    }

    /// Density weights over `grid`, renormalized to sum to one.
    ///
    /// The grid excludes the distribution tails, so the raw densities are a
    /// deficient discretization of the expectation; renormalizing restores a
    /// proper probability vector.
    pub fn grid_weights(&self, grid: &[f64]) -> Vec<f64> {
        let mut w: Vec<f64> = grid.iter().map(|&z| self.pdf(z)).collect();
        let total: f64 = w.iter().sum();
        debug_assert!(total > 0.0, "shock grid carries no probability mass");
        for v in &mut w {
            *v /= total;
        }
        w
    }

    /// Draws `n` shocks from the truncated law via rejection on the
    /// underlying normal. The generator is caller-supplied; there is no
    /// process-global RNG state.
    pub fn sample_truncated<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        let a = self.lower.ln();
        let b = self.upper.ln();
        (0..n)
            .map(|_| {
                loop {
                    let draw = self.underlying.sample(rng);
                    if (a..=b).contains(&draw) {
                        break draw.exp();
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rejects_non_positive_sigma() {
        assert!(ShockDistribution::new(0.0).is_err());
        assert!(ShockDistribution::new(-0.3).is_err());
        assert!(ShockDistribution::new(f64::NAN).is_err());
    }

    #[test]
    fn truncation_bounds_bracket_the_median() {
        let d = ShockDistribution::new(0.2).unwrap();
        let median = d.ppf(0.5);
        assert!(d.lower() < median && median < d.upper());
        assert_relative_eq!(d.cdf(d.lower()), LOWER_TAIL, epsilon = 1e-6);
        assert_relative_eq!(d.cdf(d.upper()), UPPER_TAIL, epsilon = 1e-6);
    }

    #[test]
    fn grid_weights_sum_to_one() {
        let d = ShockDistribution::new(0.2).unwrap();
        let grid = d.support_grid(20);
        let w = d.grid_weights(&grid);
        assert_eq!(w.len(), 20);
        assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(w.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn samples_stay_inside_the_truncated_support() {
        let d = ShockDistribution::new(0.2).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = d.sample_truncated(&mut rng, 2_000);
        assert_eq!(draws.len(), 2_000);
        assert!(
            draws
                .iter()
                .all(|&z| z >= d.lower() - 1e-12 && z <= d.upper() + 1e-12)
        );
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let d = ShockDistribution::new(0.2).unwrap();
        let a = d.sample_truncated(&mut StdRng::seed_from_u64(42), 50);
        let b = d.sample_truncated(&mut StdRng::seed_from_u64(42), 50);
        assert_eq!(a, b);
    }
}
