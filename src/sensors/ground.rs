use nalgebra::{Point3, Vector3};

use crate::dynamics::state::SENSOR_MISS_DISTANCE;

// ---------------------------------------------------------------------------
// Host raycast primitive
// ---------------------------------------------------------------------------

/// Nearest intersection reported by the host's world geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub distance: f64,
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
    pub tag: String,
}

/// World-geometry query supplied by the host. `direction` is unit length.
pub trait Raycaster {
    fn raycast(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit>;
}

// ---------------------------------------------------------------------------
// Ground sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroundSample {
    pub hit: bool,
    pub distance: f64,
    pub normal: Vector3<f64>,
    pub tag: String,
}

impl GroundSample {
    /// Nothing below: distance is the miss sentinel, normal is world up.
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: SENSOR_MISS_DISTANCE,
            normal: Vector3::y(),
            tag: String::new(),
        }
    }
}

impl Default for GroundSample {
    fn default() -> Self {
        Self::miss()
    }
}

impl From<RayHit> for GroundSample {
    fn from(hit: RayHit) -> Self {
        Self { hit: true, distance: hit.distance, normal: hit.normal, tag: hit.tag }
    }
}

// ---------------------------------------------------------------------------
// Ground sensor
// ---------------------------------------------------------------------------

/// Downward ray from the craft.
#[derive(Debug, Clone)]
pub struct GroundSensor {
    pub max_distance: f64,
}

impl Default for GroundSensor {
    fn default() -> Self {
        Self { max_distance: 100.0 }
    }
}

impl GroundSensor {
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }

    pub fn sample(
        &self,
        world: &dyn Raycaster,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
    ) -> GroundSample {
        let dir = match direction.try_normalize(1e-12) {
            Some(d) => d,
            None => return GroundSample::miss(),
        };
        match world.raycast(origin, &dir, self.max_distance) {
            Some(hit) => {
                log::trace!("ground hit at {:.3} m on '{}'", hit.distance, hit.tag);
                hit.into()
            }
            None => {
                log::trace!("ground sensor miss");
                GroundSample::miss()
            }
        }
    }
}
