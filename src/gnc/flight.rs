use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::actuators::Mixer;
use crate::config::CraftConfig;
use crate::dynamics::state::{gravity_vector, BodyState};
use crate::error::ConfigError;
use crate::input::{GamepadInput, StickId};
use crate::physics::aerodynamics::{self, AeroParams};
use crate::sensors::{GroundSensor, LandingPredictor, Raycaster};
use super::attitude::AttitudeController;
use super::controller::{ControlOutput, Controller};
use super::height::HeightController;

// ---------------------------------------------------------------------------
// Flight controller: the per-tick pipeline
// ---------------------------------------------------------------------------

/// Runs, in order: ground sensor, landing predictor, attitude and height
/// controllers, aerodynamics, actuator mixer.
#[derive(Debug, Clone)]
pub struct FlightController {
    pub name: String,
    pub hover_height: f64,
    pub use_landing_prediction: bool,
    pub yaw_authority: f64,
    pub lean_angle_deg: f64,
    pub gravity: Vector3<f64>,
    pub wind: Vector3<f64>,
    pub sensor: GroundSensor,
    pub predictor: LandingPredictor,
    pub attitude: AttitudeController,
    pub height: HeightController,
    pub aero: AeroParams,
    pub mixer: Mixer,
}

impl FlightController {
    pub fn from_config(config: &CraftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            hover_height: config.hover_height,
            use_landing_prediction: config.use_landing_prediction,
            yaw_authority: config.yaw_authority,
            lean_angle_deg: config.lean_angle_deg,
            gravity: Vector3::from(config.gravity),
            wind: Vector3::from(config.wind),
            sensor: GroundSensor::new(config.sensor.max_distance),
            predictor: LandingPredictor::new(
                config.predictor.cooldown,
                config.predictor.max_distance,
            ),
            attitude: AttitudeController::new(
                config.attitude.pids(),
                Vector3::from_column_slice(&config.attitude.thresholds_deg),
            ),
            height: HeightController::new(
                config.height.pid(),
                config.height.feedback_min,
                config.height.feedback_max,
            ),
            aero: config.aero.clone(),
            mixer: Mixer::new(config.actuators.clone()),
        })
    }

    /// World "level" used when nothing is below the craft.
    fn level_normal(&self) -> Vector3<f64> {
        (-self.gravity).try_normalize(1e-9).unwrap_or_else(|| -gravity_vector().normalize())
    }

    pub fn update(
        &mut self,
        state: &BodyState,
        input: &GamepadInput,
        world: &dyn Raycaster,
        dt: f64,
    ) -> ControlOutput {
        let pos = state.position();
        let up = state.up();

        // --- Sensors ---
        let ground = self.sensor.sample(world, &pos, &-up);
        let prediction = self
            .predictor
            .tick(dt, world, &pos, &state.vel, &self.gravity, ground.distance)
            .clone();

        let (distance, normal, surface_below) = if self.use_landing_prediction && prediction.hit {
            (prediction.distance, prediction.normal, true)
        } else {
            (ground.distance, ground.normal, ground.hit)
        };

        // --- Attitude ---
        let mut target = if surface_below { normal } else { self.level_normal() };
        let stick = input.stick(StickId::Left);
        if stick.y != 0.0 {
            let axis = Unit::new_normalize(state.right());
            let lean = UnitQuaternion::from_axis_angle(&axis, stick.y * self.lean_angle_deg.to_radians());
            target = lean * target;
        }
        let mut attitude_response = self.attitude.update(&target, &state.quat, dt);
        attitude_response.y += stick.x * self.yaw_authority;

        // --- Height ---
        let height_response = self.height.update(self.hover_height, distance, dt);

        // --- Aerodynamics ---
        let aero = aerodynamics::compute(
            &state.vel,
            &self.wind,
            &state.forward(),
            &up,
            &state.right(),
            &self.aero,
        );

        // --- Mixer ---
        let height_ratio = distance / self.hover_height;
        let actuators = self.mixer.mix_all(height_response, input, height_ratio);

        log::trace!(
            "t={:.2} dist={:.3} height_resp={:.1} att=({:.3},{:.3},{:.3})",
            state.time,
            distance,
            height_response,
            attitude_response.x,
            attitude_response.y,
            attitude_response.z
        );

        ControlOutput {
            ground,
            prediction,
            height_response,
            attitude_response,
            aero,
            actuators,
        }
    }

    pub fn reset(&mut self) {
        self.predictor.reset();
        self.attitude.reset();
        self.height.reset();
    }
}

impl Controller for FlightController {
    fn control(
        &mut self,
        state: &BodyState,
        input: &GamepadInput,
        world: &dyn Raycaster,
        dt: f64,
    ) -> ControlOutput {
        self.update(state, input, world, dt)
    }

    fn reset(&mut self) {
        FlightController::reset(self);
    }

    fn name(&self) -> &str {
        &self.name
    }
}
