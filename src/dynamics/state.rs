use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const GRAVITY: f64 = 9.81; // m/s^2, world -Y

/// Distance reported by sensors that did not hit anything.
pub const SENSOR_MISS_DISTANCE: f64 = 1_000_000.0;

/// Default world gravity vector (Y-up).
pub fn gravity_vector() -> Vector3<f64> {
    Vector3::new(0.0, -GRAVITY, 0.0)
}

// ---------------------------------------------------------------------------
// Rigid body snapshot: position, velocity, attitude, angular rate
// ---------------------------------------------------------------------------

/// Read-only rigid body snapshot handed to the controllers once per step.
/// Frame: world Y-up. Body axes: +X right, +Y up, +Z forward.
#[derive(Debug, Clone)]
pub struct BodyState {
    pub time: f64,
    pub pos: Vector3<f64>,              // m, world
    pub vel: Vector3<f64>,              // m/s, world
    pub quat: UnitQuaternion<f64>,      // body→world rotation
    pub omega: Vector3<f64>,            // rad/s, body frame angular velocity
}

impl BodyState {
    /// Body at rest at `pos`, level.
    pub fn at_rest(pos: Vector3<f64>) -> Self {
        Self {
            time: 0.0,
            pos,
            vel: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
        }
    }

    pub fn apply(&self, d: &Deriv, dt: f64) -> BodyState {
        let q_raw = self.quat.quaternion() + d.dquat * dt;
        BodyState {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            quat: UnitQuaternion::new_normalize(q_raw),
            omega: self.omega + d.domega * dt,
        }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.pos)
    }

    /// Body +Y in world frame.
    pub fn up(&self) -> Vector3<f64> {
        self.quat * Vector3::y()
    }

    /// Body +Z in world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.quat * Vector3::z()
    }

    /// Body +X in world frame.
    pub fn right(&self) -> Vector3<f64> {
        self.quat * Vector3::x()
    }

    /// Tilt of body up away from world up (rad).
    pub fn tilt(&self) -> f64 {
        self.up().y.clamp(-1.0, 1.0).acos()
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub dvel: Vector3<f64>,
    pub dquat: Quaternion<f64>,   // NOT unit: raw quaternion derivative
    pub domega: Vector3<f64>,     // angular acceleration, body frame
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,         // 50 Hz fixed step
            max_time: 30.0,
        }
    }
}
