use approx::assert_relative_eq;
use nalgebra::Vector3;

use hoverboard_sim::gnc::{Controller, FlightController};
use hoverboard_sim::physics::terrain::Terrain;
use hoverboard_sim::sim::simulate;
use hoverboard_sim::types::{BodyState, GamepadInput, SimConfig, SENSOR_MISS_DISTANCE};
use hoverboard_sim::vehicle::presets;
use hoverboard_sim::CraftConfig;

fn ten_metre_board() -> CraftConfig {
    let mut cfg = presets::citycruiser();
    cfg.hover_height = 10.0;
    cfg.height.kp = 1.0;
    cfg.height.ki = 0.0;
    cfg.height.kd = 0.2;
    cfg.height.feedback_min = 0.0;
    cfg.height.feedback_max = 30_000.0;
    cfg
}

#[test]
fn first_tick_below_target_commands_22() {
    let cfg = ten_metre_board();
    let mut fc = FlightController::from_config(&cfg).unwrap();
    let terrain = Terrain::flat(0.0, "street");
    let state = BodyState::at_rest(Vector3::new(0.0, 8.0, 0.0));

    let out = fc.control(&state, &GamepadInput::default(), &terrain, 0.02);

    assert!(out.ground.hit);
    assert_relative_eq!(out.ground.distance, 8.0, epsilon = 1e-12);
    assert_relative_eq!(out.height_response, 22.0, max_relative = 1e-12);
    // front/rear follow the height PID, the jump jet is idle without trigger.
    assert_relative_eq!(out.actuators[0].throttle, 22.0, max_relative = 1e-12);
    assert_relative_eq!(out.actuators[1].throttle, 22.0, max_relative = 1e-12);
    assert_eq!(out.actuators[3].throttle, 0.0);
    assert!(out.attitude_response.norm() < 1e-12);
}

#[test]
fn nothing_below_degrades_to_zero_lift() {
    let cfg = presets::citycruiser();
    let mut fc = FlightController::from_config(&cfg).unwrap();
    let empty = Terrain::new();
    let state = BodyState::at_rest(Vector3::new(0.0, 3.0, 0.0));

    let out = fc.control(&state, &GamepadInput::default(), &empty, 0.02);

    assert!(!out.ground.hit);
    assert_eq!(out.ground.distance, SENSOR_MISS_DISTANCE);
    assert_eq!(out.height_response, 0.0);
    assert!(out.actuators.iter().all(|a| a.throttle.is_finite()));
    assert!(out.attitude_response.iter().all(|v| v.is_finite()));
}

#[test]
fn shipped_config_hovers_without_touching_down() {
    let cfg = CraftConfig::from_toml_str(include_str!("../configs/citycruiser.toml")).unwrap();
    let terrain = Terrain::flat(0.0, "street");
    let traj = simulate(&cfg, &SimConfig { dt: 0.02, max_time: 10.0 }, &terrain).unwrap();

    assert!(traj.iter().all(|f| f.state.pos.y > 0.5));
    assert!(traj.iter().all(|f| f.output.actuators.iter().all(|a| a.throttle.is_finite())));
    let last = traj.last().unwrap();
    assert!((last.state.pos.y - cfg.hover_height).abs() < 0.5);
}

#[test]
fn identical_runs_are_bit_identical() {
    let cfg = presets::citycruiser();
    let terrain = Terrain::flat(0.0, "street");
    let config = SimConfig { dt: 0.02, max_time: 3.0 };
    let a = simulate(&cfg, &config, &terrain).unwrap();
    let b = simulate(&cfg, &config, &terrain).unwrap();

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.state.pos, y.state.pos);
        assert_eq!(x.output.height_response.to_bits(), y.output.height_response.to_bits());
    }
}
