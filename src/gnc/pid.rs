// ---------------------------------------------------------------------------
// PID Controller (single axis)
// ---------------------------------------------------------------------------

/// Single-axis feedback loop updated once per fixed step.
///
/// The integral gain is stored but, unless `accumulate_integral` is set,
/// the integral term stays at zero. Tuned crafts rely on that P+D response.
#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub accumulate_integral: bool,
    pub integral_limit: f64,
    integral: f64,
    last_error: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            accumulate_integral: false,
            integral_limit: 1.0,
            integral: 0.0,
            last_error: 0.0,
        }
    }

    /// Opt into true integration; the integral is clamped to ±`limit`.
    pub fn with_integration(mut self, limit: f64) -> Self {
        self.accumulate_integral = true;
        self.integral_limit = limit.abs();
        self
    }

    /// Feed a (target, current) pair and return the unclamped response.
    ///
    /// A non-positive or non-finite `dt` yields 0 and leaves the stored
    /// error untouched.
    pub fn update(&mut self, target: f64, current: f64, dt: f64) -> f64 {
        if !(dt > 0.0 && dt.is_finite()) {
            log::warn!("pid update skipped: invalid dt {dt}");
            return 0.0;
        }
        let error = target - current;
        if self.accumulate_integral {
            self.integral += error * dt;
            self.integral = self.integral.clamp(-self.integral_limit, self.integral_limit);
        }
        let derivative = (error - self.last_error) / dt;
        self.last_error = error;
        error * self.kp + self.integral * self.ki + derivative * self.kd
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }
}
