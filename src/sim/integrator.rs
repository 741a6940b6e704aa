use nalgebra::UnitQuaternion;

use crate::dynamics::rigid_body::{derivatives, AppliedLoads};
use crate::dynamics::state::BodyState;
use crate::vehicle::Craft;

// ---------------------------------------------------------------------------
// 6DOF RK4 integrator with loads held constant over the step
// ---------------------------------------------------------------------------

/// Single RK4 step with constant applied loads over the step.
pub fn rk4_step(state: &BodyState, craft: &Craft, loads: &AppliedLoads, dt: f64) -> BodyState {
    let g = craft.gravity;
    let k1 = derivatives(state, craft, loads, &g);
    let k2 = derivatives(&state.apply(&k1, dt * 0.5), craft, loads, &g);
    let k3 = derivatives(&state.apply(&k2, dt * 0.5), craft, loads, &g);
    let k4 = derivatives(&state.apply(&k3, dt), craft, loads, &g);

    let new_quat_raw = state.quat.quaternion()
        + (k1.dquat + k2.dquat * 2.0 + k3.dquat * 2.0 + k4.dquat) * (dt / 6.0);

    BodyState {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
        quat: UnitQuaternion::new_normalize(new_quat_raw),
        omega: state.omega
            + (k1.domega + 2.0 * k2.domega + 2.0 * k3.domega + k4.domega) * (dt / 6.0),
    }
}
