use nalgebra::Vector3;

use crate::config::CraftConfig;
use crate::dynamics::state::{BodyState, SimConfig};
use crate::error::ConfigError;
use crate::gnc::{ControlOutput, Controller, FlightController};
use crate::input::GamepadInput;
use crate::physics::terrain::Terrain;
use crate::vehicle::Craft;
use super::event::{EventBus, EventDetector, SimEvent};
use super::integrator::rk4_step;

/// Contact resolution only reaches this far below a surface.
const MAX_CONTACT_DEPTH: f64 = 1.0;

/// State at the start of a step and what the controller commanded for it.
#[derive(Debug, Clone)]
pub struct Telemetry {
    pub state: BodyState,
    pub output: ControlOutput,
}

// ---------------------------------------------------------------------------
// Fixed-step simulation
// ---------------------------------------------------------------------------

/// Fixed-step host loop: controller → loads → RK4 → terrain contact.
pub struct Simulation<'a> {
    craft: &'a Craft,
    config: &'a SimConfig,
    terrain: &'a Terrain,
    detectors: Vec<Box<dyn EventDetector + 'a>>,
    bus: EventBus<'a>,
}

impl<'a> Simulation<'a> {
    pub fn new(craft: &'a Craft, config: &'a SimConfig, terrain: &'a Terrain) -> Self {
        Self { craft, config, terrain, detectors: vec![], bus: EventBus::new() }
    }

    pub fn detect(mut self, detector: impl EventDetector + 'a) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn subscribe(mut self, f: impl FnMut(&SimEvent) + 'a) -> Self {
        self.bus.subscribe(f);
        self
    }

    /// Run from `start` until `max_time`. `pilot` supplies the gamepad
    /// snapshot for each step time.
    pub fn run(
        &mut self,
        start: BodyState,
        controller: &mut dyn Controller,
        pilot: &mut dyn FnMut(f64) -> GamepadInput,
    ) -> (Vec<Telemetry>, Vec<SimEvent>) {
        let dt = self.config.dt;
        let capacity = (self.config.max_time / dt) as usize + 1;
        let mut telemetry: Vec<Telemetry> = Vec::with_capacity(capacity.min(200_000));
        let mut events = Vec::new();

        log::info!(
            "simulating '{}' with {} for {:.1} s at dt={} s",
            self.craft.name,
            controller.name(),
            self.config.max_time,
            dt
        );

        let mut state = start;
        while state.time < self.config.max_time {
            let input = pilot(state.time);
            let output = controller.control(&state, &input, self.terrain, dt);
            let loads = self.craft.loads(&state, &output);

            let mut next = rk4_step(&state, self.craft, &loads, dt);
            self.terrain.resolve_contact(&mut next.pos, &mut next.vel, MAX_CONTACT_DEPTH);

            let frame = Telemetry { state, output };
            if let Some(prev) = telemetry.last() {
                for det in &mut self.detectors {
                    if let Some(kind) = det.check(prev, &frame) {
                        let event = SimEvent { time: frame.state.time, kind, state: frame.state.clone() };
                        log::debug!("event at t={:.2}: {:?}", event.time, event.kind);
                        self.bus.publish(&event);
                        events.push(event);
                    }
                }
            }
            telemetry.push(frame);
            state = next;
        }

        (telemetry, events)
    }
}

/// Simulate with a custom controller and pilot, no event detection.
pub fn simulate_with(
    craft: &Craft,
    config: &SimConfig,
    terrain: &Terrain,
    start: BodyState,
    controller: &mut dyn Controller,
    pilot: &mut dyn FnMut(f64) -> GamepadInput,
) -> Vec<Telemetry> {
    Simulation::new(craft, config, terrain).run(start, controller, pilot).0
}

/// Hands-off hover from a configured craft (convenience wrapper).
/// The craft starts level at the configured hover height above the origin.
pub fn simulate(
    craft_config: &CraftConfig,
    config: &SimConfig,
    terrain: &Terrain,
) -> Result<Vec<Telemetry>, ConfigError> {
    let craft = Craft::from_config(craft_config)?;
    let mut controller = FlightController::from_config(craft_config)?;
    let start = BodyState::at_rest(Vector3::new(0.0, craft_config.hover_height, 0.0));
    Ok(simulate_with(
        &craft,
        config,
        terrain,
        start,
        &mut controller,
        &mut |_| GamepadInput::default(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TriggerId;
    use crate::sim::event::{EventKind, GroundContactDetector};
    use crate::vehicle::presets;

    fn setup() -> (CraftConfig, Craft, Terrain) {
        let cfg = presets::citycruiser();
        let craft = Craft::from_config(&cfg).unwrap();
        (cfg, craft, Terrain::flat(0.0, "ground"))
    }

    #[test]
    fn hover_settles_below_target() {
        let (cfg, _, terrain) = setup();
        let config = SimConfig { dt: 0.02, max_time: 20.0 };
        let traj = simulate(&cfg, &config, &terrain).unwrap();
        let last = traj.last().unwrap();
        // P+D without integral leaves a steady offset of weight / kp.
        let expected = cfg.hover_height - 60.0 * 9.81 / cfg.height.kp;
        assert!(
            (last.state.pos.y - expected).abs() < 0.05,
            "settled at {:.3}, expected {:.3}",
            last.state.pos.y,
            expected
        );
        assert!(last.state.vel.norm() < 0.05);
        assert!(last.state.tilt() < 1e-6);
    }

    #[test]
    fn steps_and_time_advance() {
        let (cfg, craft, terrain) = setup();
        let config = SimConfig { dt: 0.02, max_time: 1.0 };
        let mut fc = FlightController::from_config(&cfg).unwrap();
        let traj = simulate_with(
            &craft,
            &config,
            &terrain,
            BodyState::at_rest(Vector3::new(0.0, 1.0, 0.0)),
            &mut fc,
            &mut |_| GamepadInput::default(),
        );
        assert!(traj.len() >= 50 && traj.len() <= 51);
        assert!(traj.windows(2).all(|w| w[1].state.time > w[0].state.time));
    }

    #[test]
    fn jump_is_reported_to_subscribers() {
        let (cfg, craft, terrain) = setup();
        let config = SimConfig { dt: 0.02, max_time: 6.0 };
        let mut fc = FlightController::from_config(&cfg).unwrap();
        let mut seen = Vec::new();
        let (traj, events) = {
            let mut sim = Simulation::new(&craft, &config, &terrain)
                .detect(GroundContactDetector::new(2.5))
                .subscribe(|e: &SimEvent| seen.push(e.kind.clone()));
            sim.run(
                BodyState::at_rest(Vector3::new(0.0, 1.2, 0.0)),
                &mut fc,
                &mut |t| {
                    let pull = if (1.0..1.6).contains(&t) { 1.0 } else { 0.0 };
                    GamepadInput::default().with_trigger(TriggerId::Right, pull)
                },
            )
        };
        let peak = traj.iter().map(|f| f.state.pos.y).fold(0.0_f64, f64::max);
        assert!(peak > 2.5, "jump peaked at {peak:.2}");
        assert_eq!(events.first().map(|e| e.kind.clone()), Some(EventKind::Liftoff));
        assert!(events.iter().any(|e| e.kind == EventKind::Touchdown));
        assert_eq!(seen.len(), events.len());
    }

    #[test]
    fn never_sinks_below_ground() {
        let (cfg, craft, terrain) = setup();
        let config = SimConfig { dt: 0.02, max_time: 5.0 };
        let mut fc = FlightController::from_config(&cfg).unwrap();
        // Dropped from height with the thrusters disabled by config.
        fc.mixer.actuators.iter_mut().for_each(|a| a.clamp = Some([0.0, 0.0]));
        let traj = simulate_with(
            &craft,
            &config,
            &terrain,
            BodyState::at_rest(Vector3::new(0.0, 5.0, 0.0)),
            &mut fc,
            &mut |_| GamepadInput::default(),
        );
        assert!(traj.iter().all(|f| f.state.pos.y > -0.5));
        assert!(traj.last().unwrap().state.pos.y.abs() < 0.05);
    }
}
