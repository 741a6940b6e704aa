use nalgebra::{Point3, Vector3};

use crate::actuators::ActuatorCommand;
use crate::dynamics::state::BodyState;
use crate::input::GamepadInput;
use crate::physics::aerodynamics::AeroForces;
use crate::sensors::{GroundSample, LandingPrediction, Raycaster};

/// Everything a controller produced for one step. The host only needs
/// `actuators`, `attitude_response` and `aero`; the rest is telemetry.
#[derive(Debug, Clone)]
pub struct ControlOutput {
    pub ground: GroundSample,
    pub prediction: LandingPrediction,
    pub height_response: f64,
    /// Normalized per-body-axis attitude response (X, Y, Z).
    pub attitude_response: Vector3<f64>,
    pub aero: AeroForces,
    pub actuators: Vec<ActuatorCommand>,
}

impl Default for ControlOutput {
    fn default() -> Self {
        Self {
            ground: GroundSample::miss(),
            prediction: LandingPrediction::miss(Point3::origin()),
            height_response: 0.0,
            attitude_response: Vector3::zeros(),
            aero: AeroForces::zero(),
            actuators: vec![],
        }
    }
}

impl ControlOutput {
    pub fn total_throttle(&self) -> f64 {
        self.actuators.iter().map(|a| a.throttle).sum()
    }
}

/// Trait for flight controllers.
///
/// Implement this to plug a custom controller into the fixed-step loop.
pub trait Controller {
    /// Compute actuator commands for one fixed step.
    fn control(
        &mut self,
        state: &BodyState,
        input: &GamepadInput,
        world: &dyn Raycaster,
        dt: f64,
    ) -> ControlOutput;

    /// Reset retained state (PID errors, predictor cooldown).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
