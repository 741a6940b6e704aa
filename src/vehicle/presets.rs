use crate::actuators::{
    ActuatorConfig, AirborneCurve, AirborneMode, PowerSource, TriggerBinding, TriggerResponse,
};
use crate::config::CraftConfig;
use crate::input::TriggerId;

use super::craft::Craft;

/// Four-actuator city board: two height-holding thrusters, a stabilizer
/// rotor that loses authority with altitude, and a trigger-driven jump jet.
pub fn citycruiser() -> CraftConfig {
    let lift = |name: &str| ActuatorConfig {
        force_per_unit: 0.5,
        clamp: Some([0.0, 20_000.0]),
        ..ActuatorConfig::thruster(name)
    };
    CraftConfig {
        name: "Citycruiser".into(),
        actuators: vec![
            lift("front"),
            lift("rear"),
            ActuatorConfig {
                power: PowerSource::Fixed(0.0),
                airborne: AirborneCurve {
                    mode: AirborneMode::LinearFade,
                    threshold_ratio: 3.0,
                    multiplier: 1.0,
                    minimum: 0.2,
                },
                ..ActuatorConfig::rotor("stabilizer")
            },
            ActuatorConfig {
                power: PowerSource::Fixed(1200.0),
                trigger: Some(TriggerBinding {
                    trigger: TriggerId::Right,
                    response: TriggerResponse::Squared,
                }),
                airborne: AirborneCurve {
                    mode: AirborneMode::OnlyBelow,
                    threshold_ratio: 2.0,
                    multiplier: 1.0,
                    minimum: 0.0,
                },
                ..ActuatorConfig::thruster("jump")
            },
        ],
        ..CraftConfig::default()
    }
}

pub fn citycruiser_craft() -> Craft {
    let config = citycruiser();
    Craft {
        name: config.name.clone(),
        force_per_unit: config.actuators.iter().map(|a| a.force_per_unit).collect(),
        ..Craft::default()
    }
}
