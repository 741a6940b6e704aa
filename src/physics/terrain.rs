use nalgebra::{Point3, Vector3};

use crate::sensors::ground::{RayHit, Raycaster};

// ---------------------------------------------------------------------------
// Plane-based terrain (host geometry stand-in)
// ---------------------------------------------------------------------------

/// One-sided plane, optionally limited to a disc around `point`.
#[derive(Debug, Clone)]
pub struct Surface {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,    // unit
    pub radius: Option<f64>,
    pub tag: String,
}

impl Surface {
    pub fn plane(point: Point3<f64>, normal: Vector3<f64>, tag: impl Into<String>) -> Self {
        Self { point, normal: normal.normalize(), radius: None, tag: tag.into() }
    }

    pub fn pad(
        point: Point3<f64>,
        normal: Vector3<f64>,
        radius: f64,
        tag: impl Into<String>,
    ) -> Self {
        Self { radius: Some(radius), ..Self::plane(point, normal, tag) }
    }

    fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        (p - self.point).dot(&self.normal)
    }

    fn contains(&self, p: &Point3<f64>) -> bool {
        match self.radius {
            Some(r) => {
                let offset = p - self.point;
                let in_plane = offset - self.normal * offset.dot(&self.normal);
                in_plane.norm() <= r
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Terrain {
    pub surfaces: Vec<Surface>,
}

impl Terrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infinite horizontal ground at `height`.
    pub fn flat(height: f64, tag: impl Into<String>) -> Self {
        Self::new().with_surface(Surface::plane(Point3::new(0.0, height, 0.0), Vector3::y(), tag))
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.push(surface);
        self
    }

    /// Push a point out of any surface it sank into (up to `max_depth`) and
    /// remove the velocity component heading into that surface.
    /// Returns true when a contact was resolved.
    pub fn resolve_contact(
        &self,
        pos: &mut Vector3<f64>,
        vel: &mut Vector3<f64>,
        max_depth: f64,
    ) -> bool {
        let mut touched = false;
        for s in &self.surfaces {
            let p = Point3::from(*pos);
            let depth = s.signed_distance(&p);
            if depth < 0.0 && depth > -max_depth && s.contains(&p) {
                let n = s.normal;
                *pos -= n * depth;
                let vn = vel.dot(&n);
                if vn < 0.0 {
                    *vel -= n * vn;
                }
                touched = true;
            }
        }
        touched
    }
}

impl Raycaster for Terrain {
    fn raycast(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        self.surfaces
            .iter()
            .filter_map(|s| {
                let denom = direction.dot(&s.normal);
                if denom > -1e-12 {
                    return None; // parallel or hitting the back face
                }
                let t = (s.point - *origin).dot(&s.normal) / denom;
                if !(0.0..=max_distance).contains(&t) {
                    return None;
                }
                let point = *origin + direction * t;
                s.contains(&point).then(|| RayHit {
                    distance: t,
                    point,
                    normal: s.normal,
                    tag: s.tag.clone(),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
