pub mod airborne;
pub mod trigger;
pub mod mixer;

pub use airborne::{AirborneCurve, AirborneMode};
pub use trigger::{TriggerBinding, TriggerResponse};
pub use mixer::{mix, ActuatorCommand, ActuatorConfig, ActuatorKind, Mixer, PowerSource};
