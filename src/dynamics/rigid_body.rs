use nalgebra::{Quaternion, Vector3};

use crate::dynamics::state::{BodyState, Deriv};
use crate::vehicle::Craft;

// ---------------------------------------------------------------------------
// Rigid body equations of motion (host physics stand-in)
// ---------------------------------------------------------------------------

/// Force and torque the host applies for one step, held constant over it.
#[derive(Debug, Clone, Copy)]
pub struct AppliedLoads {
    pub force: Vector3<f64>,    // N, world frame (gravity excluded)
    pub torque: Vector3<f64>,   // N·m, body frame
}

impl Default for AppliedLoads {
    fn default() -> Self {
        Self { force: Vector3::zeros(), torque: Vector3::zeros() }
    }
}

/// Compute full 6DOF state derivatives.
///
/// Forces & moments:
///   1. Gravity (uniform, world frame)
///   2. Applied force from actuators and aerodynamics
///   3. Applied body torque from attitude control
///   4. Linear and angular damping (stands in for the host's drag settings)
pub fn derivatives(
    state: &BodyState,
    craft: &Craft,
    loads: &AppliedLoads,
    gravity: &Vector3<f64>,
) -> Deriv {
    // --- Translational ---
    let f_total = gravity * craft.mass + loads.force - state.vel * craft.linear_damping;
    let accel = f_total / craft.mass;

    // --- Rotational (body frame) ---
    let torque_body = loads.torque - state.omega * craft.angular_damping;

    // --- Euler's equation: I * domega = torque - omega × (I * omega) ---
    let i_vec = craft.inertia;
    let i_omega = i_vec.component_mul(&state.omega);
    let gyro = state.omega.cross(&i_omega);
    let domega = (torque_body - gyro).component_div(&i_vec);

    // --- Quaternion kinematics: dq/dt = 0.5 * q * omega_quat ---
    let omega_quat = Quaternion::new(0.0, state.omega.x, state.omega.y, state.omega.z);
    let dquat = state.quat.quaternion() * omega_quat * 0.5;

    Deriv {
        dpos: state.vel,
        dvel: accel,
        dquat,
        domega,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
