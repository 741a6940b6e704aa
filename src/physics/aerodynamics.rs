use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Flat-board aerodynamic coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroParams {
    pub stall_point_deg: f64,
    pub lift_scale: f64,
    pub lift_offset: f64,
    pub drag_factor: f64,
    pub minimum_drag: f64,
    pub surface_area: f64,    // m^2
    pub air_density: f64,     // kg/m^3
}

impl Default for AeroParams {
    fn default() -> Self {
        Self {
            stall_point_deg: 15.0,
            lift_scale: 0.5,
            lift_offset: 0.0,
            drag_factor: 0.4,
            minimum_drag: 0.05,
            surface_area: 0.6,
            air_density: 1.225,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroForces {
    pub lift: Vector3<f64>,
    pub drag: Vector3<f64>,
    pub angle_of_attack: f64,     // rad
    pub lift_coefficient: f64,
    pub drag_coefficient: f64,
}

impl AeroForces {
    pub fn zero() -> Self {
        Self {
            lift: Vector3::zeros(),
            drag: Vector3::zeros(),
            angle_of_attack: 0.0,
            lift_coefficient: 0.0,
            drag_coefficient: 0.0,
        }
    }

    pub fn total(&self) -> Vector3<f64> {
        self.lift + self.drag
    }
}

/// Lift coefficient: first plus third harmonic inside the stall envelope
/// (|AoA| < 2·stall), first harmonic alone past it. Even in AoA.
pub fn lift_coefficient(angle_of_attack: f64, params: &AeroParams) -> f64 {
    let a = angle_of_attack.abs();
    let stall = params.stall_point_deg.to_radians();
    let shape = if a < 2.0 * stall {
        (2.0 * a).sin() + (6.0 * a).sin()
    } else {
        (2.0 * a).sin()
    };
    shape * params.lift_scale + params.lift_offset
}

/// Drag coefficient: peaks with the flat side into the airflow, minimal
/// edge-on.
pub fn drag_coefficient(angle_on_drag_area: f64, params: &AeroParams) -> f64 {
    (1.0 + (2.0 * angle_on_drag_area).cos()) * params.drag_factor + params.minimum_drag
}

/// Lift and drag on the board (world frame).
pub fn compute(
    velocity: &Vector3<f64>,
    wind: &Vector3<f64>,
    forward: &Vector3<f64>,
    up: &Vector3<f64>,
    right: &Vector3<f64>,
    params: &AeroParams,
) -> AeroForces {
    let airflow = velocity - wind;
    if airflow.norm() < 1e-6 {
        return AeroForces::zero();
    }

    let angle_of_attack = airflow.angle(&-forward);
    let cl = lift_coefficient(angle_of_attack, params);
    let cd = drag_coefficient(airflow.angle(up), params);

    let q_dyn = 0.5 * params.air_density * (velocity + wind).norm_squared() * params.surface_area;

    let lift_dir = velocity.cross(right).try_normalize(1e-9).unwrap_or_else(Vector3::zeros);
    let drag_dir = velocity.try_normalize(1e-9).map(|v| -v).unwrap_or_else(Vector3::zeros);

    AeroForces {
        lift: lift_dir * cl * q_dyn,
        drag: drag_dir * cd * q_dyn,
        angle_of_attack,
        lift_coefficient: cl,
        drag_coefficient: cd,
    }
}
