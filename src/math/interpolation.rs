//! Sampled-function interpolants used to represent value functions, wage
//! schedules, and wage-distribution CDFs between grid points.
//!
//! Two schemes are supported: piecewise-linear and shape-preserving monotone
//! cubic Hermite (PCHIP). The monotone cubic never overshoots between
//! samples, which keeps interpolated CDFs monotone.
//!
//! References:
//! - Fritsch and Carlson (1980), monotone piecewise cubic interpolation.
//! - Stachurski, *Economic Dynamics* (2009), Ch. 6 on fitted value iteration.

use serde::{Deserialize, Serialize};

/// Interpolation scheme between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpKind {
    /// Piecewise-linear interpolation.
    Linear,
    /// Shape-preserving cubic Hermite interpolation (PCHIP).
    MonotoneCubic,
}

/// Behavior when evaluating outside the sampled range.
///
/// `Flat` clamps to the endpoint value; `Linear` extends the endpoint
/// tangent; `Nan` returns a NaN sentinel so callers can detect and filter
/// out-of-range queries (the inverse of a wage schedule relies on this).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationMode {
    Flat,
    Linear,
    Nan,
}

/// Errors raised by interpolant construction and combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    /// Malformed sample grid (not strictly increasing, length mismatch, ...).
    InvalidGrid(&'static str),
    /// Arithmetic between interpolants defined on different grids.
    GridMismatch(&'static str),
    /// Inverse requested for a non-monotone set of ordinates.
    NonInvertible(&'static str),
}

impl std::fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGrid(msg) => write!(f, "invalid grid: {msg}"),
            Self::GridMismatch(msg) => write!(f, "grid mismatch: {msg}"),
            Self::NonInvertible(msg) => write!(f, "non-invertible: {msg}"),
        }
    }
}

impl std::error::Error for InterpolationError {}

fn validate_samples(x: &[f64], y: &[f64]) -> Result<(), InterpolationError> {
    if x.len() != y.len() {
        return Err(InterpolationError::InvalidGrid(
            "x and y must have same length",
        ));
    }
    if x.len() < 2 {
        return Err(InterpolationError::InvalidGrid(
            "need at least two sample points",
        ));
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(InterpolationError::InvalidGrid(
            "x must be strictly increasing",
        ));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(InterpolationError::InvalidGrid("x must be finite"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Below,
    Segment(usize),
    Above,
}

fn locate(x: &[f64], xq: f64) -> Location {
    if xq < x[0] {
        return Location::Below;
    }
    if xq > x[x.len() - 1] {
        return Location::Above;
    }
    let idx = x.partition_point(|v| *v <= xq);
    if idx == 0 {
        Location::Segment(0)
    } else if idx >= x.len() {
        Location::Segment(x.len() - 2)
    } else {
        Location::Segment(idx - 1)
    }
}

/// Fritsch-Carlson slope limiting; endpoint slopes use the non-centered
/// three-point formula with the usual sign/magnitude filters.
fn monotone_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 2 {
        let m = (y[1] - y[0]) / (x[1] - x[0]);
        return vec![m, m];
    }

    let mut h = vec![0.0; n - 1];
    let mut delta = vec![0.0; n - 1];
    for i in 0..(n - 1) {
        h[i] = x[i + 1] - x[i];
        delta[i] = (y[i + 1] - y[i]) / h[i];
    }

    let mut d = vec![0.0; n];
    for k in 1..(n - 1) {
        if delta[k - 1] * delta[k] <= 0.0 {
            d[k] = 0.0;
        } else {
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
        }
    }

    d[0] = ((2.0 * h[0] + h[1]) * delta[0] - h[0] * delta[1]) / (h[0] + h[1]);
    if d[0].signum() != delta[0].signum() {
        d[0] = 0.0;
    } else if delta[0].signum() != delta[1].signum() && d[0].abs() > 3.0 * delta[0].abs() {
        d[0] = 3.0 * delta[0];
    }

    let m = n - 1;
    d[m] = ((2.0 * h[m - 1] + h[m - 2]) * delta[m - 1] - h[m - 1] * delta[m - 2])
        / (h[m - 1] + h[m - 2]);
    if d[m].signum() != delta[m - 1].signum() {
        d[m] = 0.0;
    } else if delta[m - 1].signum() != delta[m - 2].signum()
        && d[m].abs() > 3.0 * delta[m - 1].abs()
    {
        d[m] = 3.0 * delta[m - 1];
    }

    d
}

#[inline]
fn hermite_value(x0: f64, x1: f64, y0: f64, y1: f64, m0: f64, m1: f64, xq: f64) -> f64 {
    let h = x1 - x0;
    let s = (xq - x0) / h;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * y0 + h10 * h * m0 + h01 * y1 + h11 * h * m1
}

#[inline]
fn hermite_slope(x0: f64, x1: f64, y0: f64, y1: f64, m0: f64, m1: f64, xq: f64) -> f64 {
    let h = x1 - x0;
    let s = (xq - x0) / h;
    let s2 = s * s;

    ((6.0 * s2 - 6.0 * s) * y0 + (-6.0 * s2 + 6.0 * s) * y1) / h
        + (3.0 * s2 - 4.0 * s + 1.0) * m0
        + (3.0 * s2 - 2.0 * s) * m1
}

/// A scalar function of one variable represented by samples on a strictly
/// increasing grid plus an interpolation scheme.
///
/// Immutable once built: every combinator produces a new `Interpolant`.
#[derive(Debug, Clone)]
pub struct Interpolant {
    x: Vec<f64>,
    y: Vec<f64>,
    kind: InterpKind,
    extrapolation: ExtrapolationMode,
    /// Node slopes; populated for `MonotoneCubic` only.
    slopes: Vec<f64>,
}

impl Interpolant {
    /// Builds an interpolant from `(x, y)` samples.
    ///
    /// Fails with [`InterpolationError::InvalidGrid`] unless `x` is finite,
    /// strictly increasing, and matches `y` in length (>= 2 points).
    /// Extrapolation defaults to [`ExtrapolationMode::Flat`] (clamping).
    pub fn new(x: Vec<f64>, y: Vec<f64>, kind: InterpKind) -> Result<Self, InterpolationError> {
        Self::with_extrapolation(x, y, kind, ExtrapolationMode::Flat)
    }

    /// Builds an interpolant with an explicit out-of-range behavior.
    pub fn with_extrapolation(
        x: Vec<f64>,
        y: Vec<f64>,
        kind: InterpKind,
        extrapolation: ExtrapolationMode,
    ) -> Result<Self, InterpolationError> {
        validate_samples(&x, &y)?;
        let slopes = match kind {
            InterpKind::Linear => Vec::new(),
            InterpKind::MonotoneCubic => monotone_slopes(&x, &y),
        };
        Ok(Self {
            x,
            y,
            kind,
            extrapolation,
            slopes,
        })
    }

    /// Sample abscissas.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Sample ordinates.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Interpolation scheme.
    pub fn kind(&self) -> InterpKind {
        self.kind
    }

    /// Out-of-range behavior.
    pub fn extrapolation(&self) -> ExtrapolationMode {
        self.extrapolation
    }

    /// Number of sample points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false for a validly constructed interpolant.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    fn segment_value(&self, i: usize, xq: f64) -> f64 {
        match self.kind {
            InterpKind::Linear => {
                let t = (xq - self.x[i]) / (self.x[i + 1] - self.x[i]);
                (1.0 - t) * self.y[i] + t * self.y[i + 1]
            }
            InterpKind::MonotoneCubic => hermite_value(
                self.x[i],
                self.x[i + 1],
                self.y[i],
                self.y[i + 1],
                self.slopes[i],
                self.slopes[i + 1],
                xq,
            ),
        }
    }

    #[inline]
    fn end_slope(&self, left: bool) -> f64 {
        let n = self.x.len();
        match self.kind {
            InterpKind::Linear => {
                if left {
                    (self.y[1] - self.y[0]) / (self.x[1] - self.x[0])
                } else {
                    (self.y[n - 1] - self.y[n - 2]) / (self.x[n - 1] - self.x[n - 2])
                }
            }
            InterpKind::MonotoneCubic => {
                if left {
                    self.slopes[0]
                } else {
                    self.slopes[n - 1]
                }
            }
        }
    }

    /// Evaluates the interpolant at `xq`.
    ///
    /// Exact at sample points. Outside `[x[0], x[n-1]]` the configured
    /// [`ExtrapolationMode`] applies.
    pub fn eval(&self, xq: f64) -> f64 {
        let n = self.x.len();
        match locate(&self.x, xq) {
            Location::Below => match self.extrapolation {
                ExtrapolationMode::Flat => self.y[0],
                ExtrapolationMode::Linear => self.y[0] + self.end_slope(true) * (xq - self.x[0]),
                ExtrapolationMode::Nan => f64::NAN,
            },
            Location::Above => match self.extrapolation {
                ExtrapolationMode::Flat => self.y[n - 1],
                ExtrapolationMode::Linear => {
                    self.y[n - 1] + self.end_slope(false) * (xq - self.x[n - 1])
                }
                ExtrapolationMode::Nan => f64::NAN,
            },
            Location::Segment(i) => self.segment_value(i, xq),
        }
    }

    /// Evaluates the interpolant at every point of `xs`.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&xq| self.eval(xq)).collect()
    }

    /// First derivative at `xq`.
    ///
    /// Outside the sampled range: zero under `Flat`, the endpoint slope
    /// under `Linear`, NaN under `Nan`.
    pub fn derivative_at(&self, xq: f64) -> f64 {
        match locate(&self.x, xq) {
            Location::Below => match self.extrapolation {
                ExtrapolationMode::Flat => 0.0,
                ExtrapolationMode::Linear => self.end_slope(true),
                ExtrapolationMode::Nan => f64::NAN,
            },
            Location::Above => match self.extrapolation {
                ExtrapolationMode::Flat => 0.0,
                ExtrapolationMode::Linear => self.end_slope(false),
                ExtrapolationMode::Nan => f64::NAN,
            },
            Location::Segment(i) => match self.kind {
                InterpKind::Linear => (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i]),
                InterpKind::MonotoneCubic => hermite_slope(
                    self.x[i],
                    self.x[i + 1],
                    self.y[i],
                    self.y[i + 1],
                    self.slopes[i],
                    self.slopes[i + 1],
                    xq,
                ),
            },
        }
    }

    /// Swaps the roles of abscissas and ordinates.
    ///
    /// Requires `y` to be strictly monotone; fails with
    /// [`InterpolationError::NonInvertible`] otherwise. The returned
    /// interpolant uses [`ExtrapolationMode::Nan`] so that queries outside
    /// the original range of `y` yield NaN sentinels for downstream
    /// filtering.
    pub fn inverse(&self) -> Result<Interpolant, InterpolationError> {
        let increasing = self.y.windows(2).all(|w| w[1] > w[0]);
        let decreasing = self.y.windows(2).all(|w| w[1] < w[0]);
        if !increasing && !decreasing {
            return Err(InterpolationError::NonInvertible(
                "ordinates must be strictly monotone",
            ));
        }

        let (mut nx, mut ny) = (self.y.clone(), self.x.clone());
        if decreasing {
            nx.reverse();
            ny.reverse();
        }
        Interpolant::with_extrapolation(nx, ny, self.kind, ExtrapolationMode::Nan)
    }

    /// Element-wise sum with `other`; both must share the identical grid.
    pub fn add(&self, other: &Interpolant) -> Result<Interpolant, InterpolationError> {
        self.combine(other, |a, b| a + b)
    }

    /// Element-wise difference with `other`; both must share the identical grid.
    pub fn sub(&self, other: &Interpolant) -> Result<Interpolant, InterpolationError> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(
        &self,
        other: &Interpolant,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Interpolant, InterpolationError> {
        if self.x != other.x {
            return Err(InterpolationError::GridMismatch(
                "operands must share the identical x grid",
            ));
        }
        let y = self
            .y
            .iter()
            .zip(other.y.iter())
            .map(|(a, b)| op(*a, *b))
            .collect();
        Interpolant::with_extrapolation(self.x.clone(), y, self.kind, self.extrapolation)
    }

    /// Supremum-norm distance between the ordinates of two interpolants on
    /// the identical grid. Used by the fixed-point convergence checks.
    pub fn sup_distance(&self, other: &Interpolant) -> Result<f64, InterpolationError> {
        if self.x != other.x {
            return Err(InterpolationError::GridMismatch(
                "operands must share the identical x grid",
            ));
        }
        Ok(self
            .y
            .iter()
            .zip(other.y.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max))
    }

    /// Re-samples the interpolant onto a new grid (e.g. the fine reporting
    /// grid), evaluating under the current extrapolation mode.
    pub fn resample(&self, grid: &[f64]) -> Result<Interpolant, InterpolationError> {
        let y = self.eval_many(grid);
        Interpolant::with_extrapolation(grid.to_vec(), y, self.kind, self.extrapolation)
    }
}
