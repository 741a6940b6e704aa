use nalgebra::Vector3;

use crate::actuators::ActuatorKind;
use crate::config::CraftConfig;
use crate::dynamics::rigid_body::AppliedLoads;
use crate::dynamics::state::{gravity_vector, BodyState};
use crate::error::ConfigError;
use crate::gnc::ControlOutput;

// ---------------------------------------------------------------------------
// Craft: mass properties and how the host turns commands into loads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Craft {
    pub name: String,
    pub mass: f64,                      // kg
    pub inertia: Vector3<f64>,          // [Ixx, Iyy, Izz] principal moments, kg·m^2
    pub linear_damping: f64,            // N·s/m
    pub angular_damping: f64,           // N·m·s/rad
    pub attitude_torque: Vector3<f64>,  // N·m per unit of normalized attitude response
    pub force_per_unit: Vec<f64>,       // N per throttle unit, one per actuator
    pub gravity: Vector3<f64>,          // m/s^2, world
}

impl Craft {
    pub fn from_config(config: &CraftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let body = &config.body;
        Ok(Self {
            name: config.name.clone(),
            mass: body.mass,
            inertia: Vector3::from_column_slice(&body.inertia),
            linear_damping: body.linear_damping,
            angular_damping: body.angular_damping,
            attitude_torque: Vector3::from_column_slice(&body.attitude_torque),
            force_per_unit: config.actuators.iter().map(|a| a.force_per_unit).collect(),
            gravity: Vector3::from(config.gravity),
        })
    }

    pub fn weight(&self) -> f64 {
        self.mass * self.gravity.norm()
    }

    /// Force and torque for one step.
    ///
    /// Every actuator pushes along craft up. Attitude torque is scaled by
    /// the summed rotor authority, or applied in full when there are no
    /// rotors.
    pub fn loads(&self, state: &BodyState, output: &ControlOutput) -> AppliedLoads {
        let thrust: f64 = output
            .actuators
            .iter()
            .zip(self.force_per_unit.iter().chain(std::iter::repeat(&1.0)))
            .map(|(cmd, gain)| cmd.throttle * gain)
            .sum();

        let rotors: Vec<f64> = output
            .actuators
            .iter()
            .filter(|c| c.kind == ActuatorKind::Rotor)
            .map(|c| c.torque_authority)
            .collect();
        let authority = if rotors.is_empty() { 1.0 } else { rotors.iter().sum() };

        AppliedLoads {
            force: state.up() * thrust + output.aero.total(),
            torque: output.attitude_response.component_mul(&self.attitude_torque) * authority,
        }
    }
}

impl Default for Craft {
    fn default() -> Self {
        Self {
            name: "Board".into(),
            mass: 60.0,
            inertia: Vector3::new(8.0, 10.0, 4.0),
            linear_damping: 5.0,
            angular_damping: 30.0,
            attitude_torque: Vector3::repeat(400.0),
            force_per_unit: vec![],
            gravity: gravity_vector(),
        }
    }
}
