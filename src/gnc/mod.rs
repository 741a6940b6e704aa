pub mod controller;
pub mod pid;
pub mod attitude;
pub mod height;
pub mod flight;

pub use controller::{ControlOutput, Controller};
pub use pid::Pid;
pub use attitude::AttitudeController;
pub use height::HeightController;
pub use flight::FlightController;
