//! Common error types and artifact serialization.

pub mod serialization;
pub mod types;

pub use serialization::{
    InterpolantSnapshot, ScenarioArtifacts, from_json, from_msgpack, to_json_pretty, to_msgpack,
};
pub use types::SolveError;
