//! Solved-scenario artifacts survive both serialization transports losslessly.

use stickywage::core::{ScenarioArtifacts, from_json, from_msgpack, to_json_pretty, to_msgpack};
use stickywage::math::Interpolant;
use stickywage::model::Parameters;
use stickywage::solver::solve_scenario;

fn small_params() -> Parameters {
    Parameters {
        w_count: 20,
        z_count: 8,
        beta: 0.8,
        tolerance: 1e-2,
        max_iterations: 150,
        ..Parameters::default()
    }
}

#[test]
fn scenario_artifacts_round_trip_through_json() {
    let res = solve_scenario(0.03, None, &small_params()).unwrap();
    let artifacts = res.artifacts();

    let json = to_json_pretty(&artifacts).unwrap();
    let back: ScenarioArtifacts = from_json(&json).unwrap();
    assert_eq!(back, artifacts);

    let revived = Interpolant::try_from(back.value_fn).unwrap();
    assert_eq!(revived.y(), res.value_fn.y());
    assert_eq!(revived.kind(), res.value_fn.kind());
}

#[test]
fn scenario_artifacts_round_trip_through_msgpack() {
    let res = solve_scenario(0.03, None, &small_params()).unwrap();
    let artifacts = res.artifacts();

    let bytes = to_msgpack(&artifacts).unwrap();
    let back: ScenarioArtifacts = from_msgpack(&bytes).unwrap();
    assert_eq!(back, artifacts);
}
