pub mod state;
pub mod rigid_body;

pub use state::{BodyState, Deriv, SimConfig, GRAVITY, SENSOR_MISS_DISTANCE};
pub use rigid_body::{derivatives, AppliedLoads};
