use std::f64::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};

use super::pid::Pid;

// ---------------------------------------------------------------------------
// Attitude controller: align craft up with a target surface normal
// ---------------------------------------------------------------------------

pub const DEFAULT_AXIS_THRESHOLD_DEG: f64 = 60.0;

/// Three independent PID loops (body X, Y, Z) driving the craft's up axis
/// toward a world-space target normal.
///
/// Responses are the PID output divided by 360, one scalar per body axis.
/// An axis whose correction angle is at or beyond its threshold outputs 0.
#[derive(Debug, Clone)]
pub struct AttitudeController {
    pub axes: [Pid; 3],
    pub thresholds_deg: Vector3<f64>,
    last_response: Vector3<f64>,
}

impl AttitudeController {
    pub fn new(axes: [Pid; 3], thresholds_deg: Vector3<f64>) -> Self {
        Self { axes, thresholds_deg, last_response: Vector3::zeros() }
    }

    /// Same gains on every axis, default thresholds.
    pub fn uniform(kp: f64, ki: f64, kd: f64) -> Self {
        let pid = Pid::new(kp, ki, kd);
        Self::new(
            [pid.clone(), pid.clone(), pid],
            Vector3::repeat(DEFAULT_AXIS_THRESHOLD_DEG),
        )
    }

    /// Run one step. A zero-length (or non-finite) target holds the
    /// previous response without touching the PID state.
    pub fn update(
        &mut self,
        target_normal: &Vector3<f64>,
        orientation: &UnitQuaternion<f64>,
        dt: f64,
    ) -> Vector3<f64> {
        let angles = match correction_angles(target_normal, orientation) {
            Some(a) => a,
            None => {
                log::debug!("attitude target unusable, holding previous response");
                return self.last_response;
            }
        };

        let mut response = Vector3::zeros();
        for axis in 0..3 {
            let angle = angles[axis];
            if angle.abs() < self.thresholds_deg[axis] {
                response[axis] = self.axes[axis].update(angle, 0.0, dt) / 360.0;
            }
        }
        self.last_response = response;
        response
    }

    pub fn last_response(&self) -> Vector3<f64> {
        self.last_response
    }

    pub fn reset(&mut self) {
        for pid in &mut self.axes {
            pid.reset();
        }
        self.last_response = Vector3::zeros();
    }
}

/// Euler angles (degrees, each in (-180, 180]) of the shortest rotation
/// from body up to `target_normal` expressed in the body frame.
pub fn correction_angles(
    target_normal: &Vector3<f64>,
    orientation: &UnitQuaternion<f64>,
) -> Option<Vector3<f64>> {
    let norm = target_normal.norm();
    if !(norm > 1e-9 && norm.is_finite()) {
        return None;
    }
    let local = orientation.inverse_transform_vector(&(target_normal / norm));
    let rotation = UnitQuaternion::rotation_between(&Vector3::y(), &local)
        // Anti-parallel: any half turn about a horizontal axis is shortest.
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));
    let (x, y, z) = rotation.euler_angles();
    Some(Vector3::new(
        wrap_degrees(x.to_degrees()),
        wrap_degrees(y.to_degrees()),
        wrap_degrees(z.to_degrees()),
    ))
}

/// Map an angle in degrees onto (-180, 180].
pub fn wrap_degrees(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_gain(threshold: f64) -> AttitudeController {
        let pid = Pid::new(1.0, 0.0, 0.0);
        AttitudeController::new([pid.clone(), pid.clone(), pid], Vector3::repeat(threshold))
    }

    #[test]
    fn wrap_degrees_range() {
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-450.0), -90.0);
        assert_eq!(wrap_degrees(30.0), 30.0);
    }

    #[test]
    fn aligned_target_needs_no_correction() {
        let mut ctl = AttitudeController::uniform(2.0, 0.0, 0.1);
        let r = ctl.update(&Vector3::y(), &UnitQuaternion::identity(), 0.02);
        assert!(r.norm() < 1e-12);
    }

    #[test]
    fn tilted_target_drives_roll_axis() {
        let mut ctl = unit_gain(60.0);
        // Target leans toward -X: rotation about +Z by 20 deg.
        let target = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 20f64.to_radians())
            * Vector3::y();
        let r = ctl.update(&target, &UnitQuaternion::identity(), 0.02);
        assert!((r.z - 20.0 / 360.0).abs() < 1e-9, "got {}", r.z);
        assert!(r.x.abs() < 1e-9);
    }

    #[test]
    fn target_is_taken_in_body_frame() {
        let mut ctl = unit_gain(60.0);
        // Craft already rolled by the same amount as the target: no error.
        let roll = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 25f64.to_radians());
        let target = roll * Vector3::y();
        let r = ctl.update(&target, &roll, 0.02);
        assert!(r.norm() < 1e-9);
    }

    #[test]
    fn beyond_threshold_axis_is_zero() {
        let mut ctl = unit_gain(60.0);
        let target = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 75f64.to_radians())
            * Vector3::y();
        let r = ctl.update(&target, &UnitQuaternion::identity(), 0.02);
        assert_eq!(r.x, 0.0);
    }

    #[test]
    fn anti_parallel_target_stays_in_range() {
        let angles = correction_angles(&-Vector3::y(), &UnitQuaternion::identity()).unwrap();
        for a in angles.iter() {
            assert!(*a > -180.0 && *a <= 180.0, "angle {a} out of range");
        }
        // Default thresholds refuse to correct an upside-down craft.
        let mut ctl = AttitudeController::uniform(5.0, 0.0, 0.0);
        let r = ctl.update(&-Vector3::y(), &UnitQuaternion::identity(), 0.02);
        assert!(r.norm() < 1e-12);
    }

    #[test]
    fn normalized_response_bounded_for_any_target() {
        let mut ctl = unit_gain(360.0);
        for i in 0..24 {
            for j in 0..12 {
                let yaw = i as f64 * 15f64.to_radians();
                let pitch = j as f64 * 15f64.to_radians();
                let target = Vector3::new(
                    pitch.sin() * yaw.cos(),
                    pitch.cos(),
                    pitch.sin() * yaw.sin(),
                );
                let r = ctl.update(&target, &UnitQuaternion::identity(), 0.02);
                for v in r.iter() {
                    assert!(v.abs() <= 0.5 + 1e-12, "response {v} exceeds bound");
                }
            }
        }
        let r = ctl.update(&-Vector3::y(), &UnitQuaternion::identity(), 0.02);
        assert!(r.iter().all(|v| v.abs() <= 0.5 + 1e-12));
    }

    #[test]
    fn zero_target_holds_previous_response() {
        let mut ctl = unit_gain(60.0);
        let target = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 10f64.to_radians())
            * Vector3::y();
        let first = ctl.update(&target, &UnitQuaternion::identity(), 0.02);
        let held = ctl.update(&Vector3::zeros(), &UnitQuaternion::identity(), 0.02);
        assert_eq!(first, held);
    }
}
