use serde::{Deserialize, Serialize};

use super::airborne::AirborneCurve;
use super::trigger::TriggerBinding;
use crate::input::{ButtonId, GamepadInput};

// ---------------------------------------------------------------------------
// Thruster / rotor mixing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// Pushes along craft up.
    #[default]
    Thruster,
    /// Pushes along craft up and scales attitude torque authority.
    Rotor,
}

/// Where an actuator's base power comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    #[default]
    HeightPid,
    Fixed(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    pub name: String,
    #[serde(default)]
    pub kind: ActuatorKind,
    #[serde(default)]
    pub power: PowerSource,
    #[serde(default)]
    pub trigger: Option<TriggerBinding>,
    /// Hold-to-fire button; the actuator idles while it is up.
    #[serde(default)]
    pub button: Option<ButtonId>,
    #[serde(default)]
    pub airborne: AirborneCurve,
    /// `[min, max]` throttle clamp; unclamped when absent.
    #[serde(default)]
    pub clamp: Option<[f64; 2]>,
    #[serde(default = "default_torque_authority")]
    pub torque_authority: f64,
    /// Newtons per unit of throttle, used by the host.
    #[serde(default = "default_force_per_unit")]
    pub force_per_unit: f64,
}

fn default_torque_authority() -> f64 {
    1.0
}

fn default_force_per_unit() -> f64 {
    1.0
}

impl ActuatorConfig {
    pub fn thruster(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ActuatorKind::Thruster,
            power: PowerSource::HeightPid,
            trigger: None,
            button: None,
            airborne: AirborneCurve::default(),
            clamp: None,
            torque_authority: default_torque_authority(),
            force_per_unit: default_force_per_unit(),
        }
    }

    pub fn rotor(name: impl Into<String>) -> Self {
        Self { kind: ActuatorKind::Rotor, ..Self::thruster(name) }
    }
}

/// What the host applies for one actuator this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorCommand {
    pub kind: ActuatorKind,
    pub throttle: f64,
    /// Multiplier on attitude torque; 0 for thrusters.
    pub torque_authority: f64,
}

impl ActuatorCommand {
    pub fn idle(kind: ActuatorKind) -> Self {
        Self { kind, throttle: 0.0, torque_authority: 0.0 }
    }
}

/// Combine trigger factor, airborne factor and base power into one command.
pub fn mix(
    config: &ActuatorConfig,
    height_response: f64,
    input: &GamepadInput,
    height_ratio: f64,
) -> ActuatorCommand {
    if let Some(button) = config.button {
        if !input.pressed(button) {
            return ActuatorCommand::idle(config.kind);
        }
    }
    let trigger = config.trigger.map_or(1.0, |b| b.factor(input));
    let airborne = config.airborne.evaluate(height_ratio);
    let base = match config.power {
        PowerSource::HeightPid => height_response,
        PowerSource::Fixed(level) => level,
    };

    let mut throttle = base * trigger * airborne;
    if let Some([min, max]) = config.clamp {
        throttle = throttle.max(min).min(max);
    }
    if !throttle.is_finite() {
        log::warn!("actuator '{}' produced non-finite throttle, idling", config.name);
        return ActuatorCommand::idle(config.kind);
    }

    let torque_authority = match config.kind {
        ActuatorKind::Thruster => 0.0,
        ActuatorKind::Rotor => config.torque_authority * airborne,
    };
    ActuatorCommand { kind: config.kind, throttle, torque_authority }
}

/// Ordered set of actuators; commands come out in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    pub actuators: Vec<ActuatorConfig>,
}

impl Mixer {
    pub fn new(actuators: Vec<ActuatorConfig>) -> Self {
        Self { actuators }
    }

    pub fn mix_all(
        &self,
        height_response: f64,
        input: &GamepadInput,
        height_ratio: f64,
    ) -> Vec<ActuatorCommand> {
        self.actuators
            .iter()
            .map(|a| mix(a, height_response, input, height_ratio))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::airborne::AirborneMode;
    use crate::actuators::trigger::TriggerResponse;
    use crate::input::TriggerId;

    #[test]
    fn pid_power_passes_through_unclamped() {
        let cfg = ActuatorConfig::thruster("main");
        let cmd = mix(&cfg, 1234.5, &GamepadInput::default(), 1.0);
        assert_eq!(cmd.throttle, 1234.5);
        assert_eq!(cmd.torque_authority, 0.0);
    }

    #[test]
    fn fixed_power_with_trigger_and_clamp() {
        let cfg = ActuatorConfig {
            power: PowerSource::Fixed(800.0),
            trigger: Some(TriggerBinding { trigger: TriggerId::Right, response: TriggerResponse::Linear }),
            clamp: Some([0.0, 300.0]),
            ..ActuatorConfig::thruster("boost")
        };
        let half = GamepadInput::default().with_trigger(TriggerId::Right, 0.25);
        assert_eq!(mix(&cfg, 0.0, &half, 1.0).throttle, 200.0);
        let full = GamepadInput::default().with_trigger(TriggerId::Right, 1.0);
        assert_eq!(mix(&cfg, 0.0, &full, 1.0).throttle, 300.0);
    }

    #[test]
    fn rotor_authority_fades_with_altitude() {
        let cfg = ActuatorConfig {
            airborne: AirborneCurve {
                mode: AirborneMode::LinearFade,
                threshold_ratio: 2.0,
                multiplier: 1.0,
                minimum: 0.0,
            },
            torque_authority: 4.0,
            ..ActuatorConfig::rotor("front")
        };
        let low = mix(&cfg, 100.0, &GamepadInput::default(), 0.0);
        let mid = mix(&cfg, 100.0, &GamepadInput::default(), 1.0);
        let high = mix(&cfg, 100.0, &GamepadInput::default(), 3.0);
        assert_eq!(low.torque_authority, 4.0);
        assert_eq!(mid.torque_authority, 2.0);
        assert_eq!(high.torque_authority, 0.0);
        assert_eq!(high.throttle, 0.0);
    }

    #[test]
    fn held_button_gates_actuator() {
        let cfg = ActuatorConfig {
            power: PowerSource::Fixed(500.0),
            button: Some(ButtonId::South),
            ..ActuatorConfig::rotor("boost")
        };
        let released = mix(&cfg, 0.0, &GamepadInput::default(), 1.0);
        assert_eq!(released.throttle, 0.0);
        assert_eq!(released.torque_authority, 0.0);

        let mut input = GamepadInput::default();
        input.press(ButtonId::South);
        let held = mix(&cfg, 0.0, &input, 1.0);
        assert_eq!(held.throttle, 500.0);
        assert_eq!(held.torque_authority, 1.0);
    }

    #[test]
    fn non_finite_response_idles() {
        let cfg = ActuatorConfig::thruster("main");
        let cmd = mix(&cfg, f64::NAN, &GamepadInput::default(), 1.0);
        assert_eq!(cmd.throttle, 0.0);
    }

    #[test]
    fn mixer_keeps_order() {
        let mixer = Mixer::new(vec![
            ActuatorConfig::thruster("a"),
            ActuatorConfig { power: PowerSource::Fixed(5.0), ..ActuatorConfig::rotor("b") },
        ]);
        let cmds = mixer.mix_all(10.0, &GamepadInput::default(), 1.0);
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].kind, ActuatorKind::Thruster);
        assert_eq!(cmds[1].throttle, 5.0);
    }
}
