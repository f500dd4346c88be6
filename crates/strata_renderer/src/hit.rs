//! Per-ray intersection and shading record.

use strata_core::{Color, Object};
use strata_math::{Ray, Vec3};

/// A single primitive hit, before it is compared against the current best.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray (in multiples of its direction)
    pub t: f32,
    /// Second root for closed shapes (exit distance), equal to `t` otherwise
    pub t_exit: f32,
    /// Unnormalized surface normal, facing the incoming ray
    pub normal: Vec3,
}

/// Everything learned about one ray: the nearest hit plus the colors the
/// shader accumulates for it.
///
/// Created fresh per ray. Recursive evaluations create nested results, they
/// are never shared.
#[derive(Debug, Clone)]
pub struct RayResult<'a> {
    /// Nearest hit distance, `f32::INFINITY` when nothing was hit
    pub t: f32,
    pub t_exit: f32,
    pub object: Option<&'a Object>,
    pub point: Vec3,
    pub normal: Vec3,
    pub unit_normal: Vec3,
    /// Confirmed hits in front of the origin
    pub collisions: u32,
    /// Plane-level hits, including those later rejected by the in-triangle test
    pub potential_collisions: u32,

    pub color: Color,
    pub reflection_color: Color,
    pub refract_color: Color,
    pub light_color: Color,
    pub specular_color: Color,
}

impl Default for RayResult<'_> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            t_exit: f32::INFINITY,
            object: None,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            unit_normal: Vec3::ZERO,
            collisions: 0,
            potential_collisions: 0,
            color: Color::ZERO,
            reflection_color: Color::ZERO,
            refract_color: Color::ZERO,
            light_color: Color::ZERO,
            specular_color: Color::ZERO,
        }
    }
}

impl<'a> RayResult<'a> {
    pub fn hit(&self) -> bool {
        self.object.is_some()
    }

    /// Hit distance, if anything was hit.
    pub fn distance(&self) -> Option<f32> {
        self.object.map(|_| self.t)
    }

    /// Replace the current best with `hit` if it lies in front of the origin
    /// and strictly nearer. Ties keep the first hit found.
    pub fn offer(&mut self, object: &'a Object, ray: &Ray, hit: Hit) -> bool {
        if !(hit.t >= 0.0 && hit.t < self.t) {
            return false;
        }
        self.t = hit.t;
        self.t_exit = hit.t_exit;
        self.object = Some(object);
        self.point = ray.at(hit.t);
        self.normal = hit.normal;
        self.unit_normal = hit.normal.normalize_or_zero();
        true
    }
}
