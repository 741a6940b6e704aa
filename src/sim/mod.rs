pub mod integrator;
pub mod runner;
pub mod event;

pub use runner::{simulate, simulate_with, Simulation, Telemetry};
pub use integrator::rk4_step;
