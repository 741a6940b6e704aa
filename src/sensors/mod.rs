pub mod ground;
pub mod landing;

pub use ground::{GroundSample, GroundSensor, RayHit, Raycaster};
pub use landing::{solve_ballistic, BallisticSolution, LandingPrediction, LandingPredictor};
