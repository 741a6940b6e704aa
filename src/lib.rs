pub mod actuators;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod input;
pub mod io;
pub mod physics;
pub mod sensors;
pub mod sim;
pub mod vehicle;

pub use config::CraftConfig;
pub use error::ConfigError;

pub mod types {
    pub use crate::actuators::ActuatorCommand;
    pub use crate::dynamics::state::{BodyState, SimConfig, GRAVITY, SENSOR_MISS_DISTANCE};
    pub use crate::input::{ButtonId, GamepadInput, StickId, TriggerId};
    pub use crate::sensors::{GroundSample, LandingPrediction};
    pub use crate::vehicle::Craft;
}
