//! TOML craft configuration.
//!
//! Everything the flight core needs is set here once: PID gains, sensor and
//! predictor settings, aerodynamics and the actuator list. `validate` turns
//! wiring mistakes into a [`ConfigError`] before anything runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actuators::{ActuatorConfig, PowerSource};
use crate::dynamics::state::GRAVITY;
use crate::error::ConfigError;
use crate::gnc::pid::Pid;
use crate::physics::aerodynamics::AeroParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    pub name: String,
    /// Target distance to ground, m.
    pub hover_height: f64,
    /// Feed the landing predictor's distance/normal to the controllers
    /// instead of the instantaneous ground sample.
    pub use_landing_prediction: bool,
    /// Normalized yaw response per unit of left stick X.
    pub yaw_authority: f64,
    /// Target lean per unit of left stick Y, degrees.
    pub lean_angle_deg: f64,
    pub gravity: [f64; 3],
    pub wind: [f64; 3],
    pub body: BodyConfig,
    pub height: HeightConfig,
    pub attitude: AttitudeConfig,
    pub sensor: SensorConfig,
    pub predictor: PredictorConfig,
    pub aero: AeroParams,
    pub actuators: Vec<ActuatorConfig>,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            name: "Board".into(),
            hover_height: 1.5,
            use_landing_prediction: false,
            yaw_authority: 0.05,
            lean_angle_deg: 10.0,
            gravity: [0.0, -GRAVITY, 0.0],
            wind: [0.0; 3],
            body: BodyConfig::default(),
            height: HeightConfig::default(),
            attitude: AttitudeConfig::default(),
            sensor: SensorConfig::default(),
            predictor: PredictorConfig::default(),
            aero: AeroParams::default(),
            actuators: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub mass: f64,
    pub inertia: Vec<f64>,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub attitude_torque: Vec<f64>,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 60.0,
            inertia: vec![8.0, 10.0, 4.0],
            linear_damping: 5.0,
            angular_damping: 30.0,
            attitude_torque: vec![400.0, 400.0, 400.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub integrate: bool,
    pub integral_limit: f64,
    pub feedback_min: f64,
    pub feedback_max: f64,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            kp: 2000.0,
            ki: 0.0,
            kd: 300.0,
            integrate: false,
            integral_limit: 1.0,
            feedback_min: 0.0,
            feedback_max: 30_000.0,
        }
    }
}

impl HeightConfig {
    pub fn pid(&self) -> Pid {
        let pid = Pid::new(self.kp, self.ki, self.kd);
        if self.integrate { pid.with_integration(self.integral_limit) } else { pid }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeConfig {
    pub kp: Vec<f64>,
    pub ki: Vec<f64>,
    pub kd: Vec<f64>,
    pub thresholds_deg: Vec<f64>,
    pub integrate: bool,
    pub integral_limit: f64,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            kp: vec![4.0, 4.0, 4.0],
            ki: vec![0.0, 0.0, 0.0],
            kd: vec![0.6, 0.6, 0.6],
            thresholds_deg: vec![60.0, 60.0, 60.0],
            integrate: false,
            integral_limit: 1.0,
        }
    }
}

impl AttitudeConfig {
    /// One PID per body axis. Call after `CraftConfig::validate`.
    pub fn pids(&self) -> [Pid; 3] {
        std::array::from_fn(|i| {
            let pid = Pid::new(self.kp[i], self.ki[i], self.kd[i]);
            if self.integrate { pid.with_integration(self.integral_limit) } else { pid }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub max_distance: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { max_distance: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub cooldown: f64,
    pub max_distance: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self { cooldown: 0.2, max_distance: 500.0 }
    }
}

fn check_axes(field: &'static str, values: &[f64]) -> Result<(), ConfigError> {
    if values.len() != 3 {
        return Err(ConfigError::AxisCount { field, got: values.len() });
    }
    Ok(())
}

fn check_positive(field: impl Into<String>, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(ConfigError::NotPositive { field: field.into(), value });
    }
    Ok(())
}

fn check_finite(field: impl Into<String>, values: &[f64]) -> Result<(), ConfigError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(ConfigError::NotFinite { field: field.into(), value }),
        None => Ok(()),
    }
}

fn check_range(field: impl Into<String>, min: f64, max: f64) -> Result<(), ConfigError> {
    let field = field.into();
    check_finite(field.as_str(), &[min, max])?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

impl CraftConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CraftConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&text)?;
        log::info!(
            "loaded craft '{}' from {} ({} actuators)",
            config.name,
            path.display(),
            config.actuators.len()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("hover_height", self.hover_height)?;
        check_finite("yaw_authority", &[self.yaw_authority])?;
        check_finite("lean_angle_deg", &[self.lean_angle_deg])?;
        check_finite("gravity", &self.gravity)?;
        check_finite("wind", &self.wind)?;

        check_positive("body.mass", self.body.mass)?;
        check_axes("body.inertia", &self.body.inertia)?;
        for (i, v) in self.body.inertia.iter().enumerate() {
            check_positive(format!("body.inertia[{i}]"), *v)?;
        }
        check_axes("body.attitude_torque", &self.body.attitude_torque)?;
        check_finite("body.attitude_torque", &self.body.attitude_torque)?;
        check_finite(
            "body.damping",
            &[self.body.linear_damping, self.body.angular_damping],
        )?;

        let h = &self.height;
        check_finite("height gains", &[h.kp, h.ki, h.kd, h.integral_limit])?;
        check_range("height.feedback", h.feedback_min, h.feedback_max)?;

        let a = &self.attitude;
        check_axes("attitude.kp", &a.kp)?;
        check_axes("attitude.ki", &a.ki)?;
        check_axes("attitude.kd", &a.kd)?;
        check_axes("attitude.thresholds_deg", &a.thresholds_deg)?;
        for (field, values) in [
            ("attitude.kp", &a.kp),
            ("attitude.ki", &a.ki),
            ("attitude.kd", &a.kd),
            ("attitude.thresholds_deg", &a.thresholds_deg),
        ] {
            check_finite(field, values)?;
        }
        check_finite("attitude.integral_limit", &[a.integral_limit])?;

        let aero = &self.aero;
        check_finite(
            "aero",
            &[
                aero.stall_point_deg,
                aero.lift_scale,
                aero.lift_offset,
                aero.drag_factor,
                aero.minimum_drag,
                aero.surface_area,
                aero.air_density,
            ],
        )?;

        check_positive("sensor.max_distance", self.sensor.max_distance)?;
        check_positive("predictor.cooldown", self.predictor.cooldown)?;
        check_positive("predictor.max_distance", self.predictor.max_distance)?;

        if self.actuators.is_empty() {
            return Err(ConfigError::NoActuators);
        }
        for a in &self.actuators {
            if let Some([min, max]) = a.clamp {
                check_range(format!("actuators.{}.clamp", a.name), min, max)?;
            }
            if let PowerSource::Fixed(level) = a.power {
                check_finite(format!("actuators.{}.power", a.name), &[level])?;
            }
            let curve = &a.airborne;
            check_finite(
                format!("actuators.{}.airborne", a.name),
                &[curve.threshold_ratio, curve.multiplier, curve.minimum],
            )?;
            check_finite(
                format!("actuators.{}", a.name),
                &[a.torque_authority, a.force_per_unit],
            )?;
        }
        Ok(())
    }
}
