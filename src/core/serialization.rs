//! Stable serde payloads for solved-scenario artifacts.
//!
//! The solver returns live [`Interpolant`]s; the orchestration layer that
//! owns result persistence converts them to these snapshot types and picks
//! a transport (pretty JSON for inspection, MessagePack for bulk storage).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::math::{ExtrapolationMode, InterpKind, Interpolant, InterpolationError};

/// Lossless serialized form of an [`Interpolant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolantSnapshot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub kind: InterpKind,
    pub extrapolation: ExtrapolationMode,
}

impl From<&Interpolant> for InterpolantSnapshot {
    fn from(itp: &Interpolant) -> Self {
        Self {
            x: itp.x().to_vec(),
            y: itp.y().to_vec(),
            kind: itp.kind(),
            extrapolation: itp.extrapolation(),
        }
    }
}

impl TryFrom<InterpolantSnapshot> for Interpolant {
    type Error = InterpolationError;

    /// Re-validates the grid on the way in; a hand-edited payload with a
    /// non-increasing grid is rejected.
    fn try_from(snap: InterpolantSnapshot) -> Result<Self, Self::Error> {
        Interpolant::with_extrapolation(snap.x, snap.y, snap.kind, snap.extrapolation)
    }
}

/// Everything the solver produces for one inflation-rate scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioArtifacts {
    /// Steady-state inflation rate the scenario was solved at.
    pub pi: f64,
    /// Converged value function over the wage grid.
    pub value_fn: InterpolantSnapshot,
    /// Free-reset wage schedule over the shock grid.
    pub wage_schedule: InterpolantSnapshot,
    /// Stationary cross-sectional wage CDF.
    pub stationary_cdf: InterpolantSnapshot,
    /// Aggregate output under rigid wages.
    pub rigid_output: f64,
}

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Serialize a value to MessagePack bytes.
pub fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(value)
}

/// Deserialize a value from MessagePack bytes.
pub fn from_msgpack<T: DeserializeOwned>(payload: &[u8]) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(payload)
}
