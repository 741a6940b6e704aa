use super::pid::Pid;

// ---------------------------------------------------------------------------
// Height controller: hover-height PID with an always-on output clamp
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HeightController {
    pub pid: Pid,
    pub feedback_min: f64,
    pub feedback_max: f64,
}

impl HeightController {
    pub fn new(pid: Pid, feedback_min: f64, feedback_max: f64) -> Self {
        Self { pid, feedback_min, feedback_max }
    }

    /// Throttle response for holding `target_height` above the ground,
    /// clamped to `[feedback_min, feedback_max]`.
    pub fn update(&mut self, target_height: f64, current_distance: f64, dt: f64) -> f64 {
        let response = self.pid.update(target_height, current_distance, dt);
        response.max(self.feedback_min).min(self.feedback_max)
    }

    pub fn reset(&mut self) {
        self.pid.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hover_scenario_first_step() {
        let mut ctl = HeightController::new(Pid::new(1.0, 0.0, 0.2), 0.0, 30_000.0);
        let out = ctl.update(10.0, 8.0, 0.02);
        assert_relative_eq!(out, 22.0, max_relative = 1e-12);
    }

    #[test]
    fn output_is_clamped() {
        let mut ctl = HeightController::new(Pid::new(100.0, 0.0, 0.0), 0.0, 50.0);
        assert_eq!(ctl.update(10.0, 0.0, 0.02), 50.0);
        // Above the target the raw response is negative.
        assert_eq!(ctl.update(1.0, 5.0, 0.02), 0.0);
    }

    #[test]
    fn nan_bound_does_not_panic() {
        let mut ctl = HeightController::new(Pid::new(1.0, 0.0, 0.2), f64::NAN, 30_000.0);
        assert_relative_eq!(ctl.update(10.0, 8.0, 0.02), 22.0, max_relative = 1e-12);
        let mut ctl = HeightController::new(Pid::new(1.0, 0.0, 0.2), 0.0, f64::NAN);
        assert_eq!(ctl.update(10.0, 12.0, 0.02), 0.0);
    }

    #[test]
    fn sensor_miss_distance_saturates_low() {
        let mut ctl = HeightController::new(Pid::new(1.0, 0.0, 0.2), 0.0, 30_000.0);
        let out = ctl.update(2.0, crate::dynamics::SENSOR_MISS_DISTANCE, 0.02);
        assert_eq!(out, 0.0);
        assert!(out.is_finite());
    }
}
