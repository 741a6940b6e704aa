use std::f64::consts::FRAC_PI_2;

use nalgebra::{Point3, Vector3};

use crate::dynamics::state::SENSOR_MISS_DISTANCE;
use crate::sensors::ground::Raycaster;

// ---------------------------------------------------------------------------
// Landing prediction
// ---------------------------------------------------------------------------

pub const DEFAULT_COOLDOWN: f64 = 0.2; // s

/// Slack on the cooldown comparison; summed fixed steps fall short of an
/// exact multiple by a few ulps.
const TIMER_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct LandingPrediction {
    pub hit: bool,
    pub distance: f64,
    pub normal: Vector3<f64>,
    pub tag: String,
    pub predicted_point: Point3<f64>,
    pub time_to_impact: f64,
    pub origin: Point3<f64>,
}

impl LandingPrediction {
    pub fn miss(origin: Point3<f64>) -> Self {
        Self {
            hit: false,
            distance: SENSOR_MISS_DISTANCE,
            normal: Vector3::y(),
            tag: String::new(),
            predicted_point: origin,
            time_to_impact: f64::INFINITY,
            origin,
        }
    }
}

/// Closed-form landing estimate, before any raycast.
#[derive(Debug, Clone, PartialEq)]
pub struct BallisticSolution {
    pub displacement: Vector3<f64>,
    pub horizontal_distance: f64,
    pub relative_pitch: f64,     // rad, positive = climbing
    pub time_to_impact: f64,     // s
}

/// Invert projectile motion for the horizontal distance travelled before
/// dropping `ground_distance` along `gravity`.
///
/// The combined motion vector is `velocity + gravity`, one step of gravity
/// folded in as a velocity term. Returns `None` for zero gravity or a
/// negative discriminant.
pub fn solve_ballistic(
    velocity: &Vector3<f64>,
    gravity: &Vector3<f64>,
    ground_distance: f64,
) -> Option<BallisticSolution> {
    let g = gravity.norm();
    if !(g > 1e-9 && g.is_finite()) {
        return None;
    }
    let d = if ground_distance.is_finite() { ground_distance.max(0.0) } else { return None };
    let g_dir = gravity / g;

    let impulse = velocity + gravity;
    let speed = impulse.norm();
    if speed < 1e-9 {
        return Some(BallisticSolution {
            displacement: g_dir * d,
            horizontal_distance: 0.0,
            relative_pitch: -FRAC_PI_2,
            time_to_impact: (2.0 * d / g).sqrt(),
        });
    }

    let relative_pitch = gravity.angle(&impulse) - FRAC_PI_2;
    let horizontal_speed = relative_pitch.cos() * speed;
    let k = horizontal_speed * horizontal_speed / g;
    let discriminant = k * k + k * d * 2.0;
    if discriminant < 0.0 {
        return None;
    }
    let x = (k * relative_pitch.tan() + discriminant.sqrt()).max(0.0);

    let horizontal = impulse - g_dir * impulse.dot(&g_dir);
    let h_dir = horizontal.try_normalize(1e-9).unwrap_or_else(Vector3::zeros);

    let time_to_impact = if horizontal_speed > 1e-6 {
        x / horizontal_speed
    } else {
        (2.0 * d / g).sqrt()
    };

    Some(BallisticSolution {
        displacement: h_dir * x + g_dir * d,
        horizontal_distance: x,
        relative_pitch,
        time_to_impact,
    })
}

/// Ballistic landing predictor, throttled by a cooldown so the extra
/// raycast does not run every step.
#[derive(Debug, Clone)]
pub struct LandingPredictor {
    pub cooldown: f64,
    pub max_distance: f64,
    timer: f64,
    last_position: Option<Point3<f64>>,
    latest: LandingPrediction,
}

impl Default for LandingPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, 500.0)
    }
}

impl LandingPredictor {
    /// The first `tick` predicts immediately.
    pub fn new(cooldown: f64, max_distance: f64) -> Self {
        Self {
            cooldown,
            max_distance,
            timer: cooldown,
            last_position: None,
            latest: LandingPrediction::miss(Point3::origin()),
        }
    }

    /// Advance the cooldown; predict when it has elapsed, otherwise return
    /// the prediction from the last run.
    pub fn tick(
        &mut self,
        dt: f64,
        world: &dyn Raycaster,
        position: &Point3<f64>,
        velocity: &Vector3<f64>,
        gravity: &Vector3<f64>,
        ground_distance: f64,
    ) -> &LandingPrediction {
        if dt > 0.0 && dt.is_finite() {
            self.timer += dt;
        }
        if self.timer + TIMER_EPSILON >= self.cooldown {
            self.latest = self.predict(world, position, velocity, gravity, ground_distance);
        }
        &self.latest
    }

    /// Predict now and restart the cooldown, hit or miss.
    pub fn predict(
        &mut self,
        world: &dyn Raycaster,
        position: &Point3<f64>,
        velocity: &Vector3<f64>,
        gravity: &Vector3<f64>,
        ground_distance: f64,
    ) -> LandingPrediction {
        self.timer = 0.0;
        self.last_position = Some(*position);

        let solution = match solve_ballistic(velocity, gravity, ground_distance) {
            Some(s) => s,
            None => {
                log::debug!("landing prediction skipped: no valid ballistic solution");
                return LandingPrediction::miss(*position);
            }
        };

        let direction = solution
            .displacement
            .try_normalize(1e-9)
            .or_else(|| gravity.try_normalize(1e-9));
        let hit = direction.and_then(|dir| world.raycast(position, &dir, self.max_distance));

        match hit {
            Some(hit) => {
                log::debug!(
                    "landing predicted {:.2} m away on '{}' in {:.2} s",
                    hit.distance,
                    hit.tag,
                    solution.time_to_impact
                );
                LandingPrediction {
                    hit: true,
                    distance: hit.distance,
                    normal: hit.normal,
                    tag: hit.tag,
                    predicted_point: hit.point,
                    time_to_impact: solution.time_to_impact,
                    origin: *position,
                }
            }
            None => LandingPrediction {
                predicted_point: *position + solution.displacement,
                time_to_impact: solution.time_to_impact,
                ..LandingPrediction::miss(*position)
            },
        }
    }

    pub fn latest(&self) -> &LandingPrediction {
        &self.latest
    }

    pub fn last_position(&self) -> Option<Point3<f64>> {
        self.last_position
    }

    pub fn reset(&mut self) {
        self.timer = self.cooldown;
        self.last_position = None;
        self.latest = LandingPrediction::miss(Point3::origin());
    }
}
