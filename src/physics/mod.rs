pub mod aerodynamics;
pub mod terrain;

pub use aerodynamics::{AeroForces, AeroParams};
pub use terrain::{Surface, Terrain};
