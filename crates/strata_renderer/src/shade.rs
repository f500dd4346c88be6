//! Recursive shading: reflection, shadows, Phong highlights and refraction.
//!
//! Every ray is evaluated by [`Shader::cast_ray`], which checks the bounce
//! limit before doing any work. Reflection and refraction recurse with
//! `bounce + 1`; shadow rays are plain intersections that never recurse.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::Serialize;
use strata_core::{Color, Object, Scene, Shape};
use strata_math::{Ray, Vec3};

use crate::hierarchy::Hierarchy;
use crate::hit::RayResult;
use crate::optics::{reflect, EPSILON};
use crate::renderer::RenderConfig;
use crate::sphere;
use crate::traverse::{Intersector, TraceOptions};

/// Ray counters shared by every thread of a render.
#[derive(Debug, Default)]
pub struct TraceStats {
    intersect_calls: AtomicU64,
    primary_rays: AtomicU64,
    secondary_rays: AtomicU64,
    shadow_rays: AtomicU64,
    max_depth: AtomicU32,
}

impl TraceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RenderStats {
        RenderStats {
            intersect_calls: self.intersect_calls.load(Ordering::Relaxed),
            primary_rays: self.primary_rays.load(Ordering::Relaxed),
            secondary_rays: self.secondary_rays.load(Ordering::Relaxed),
            shadow_rays: self.shadow_rays.load(Ordering::Relaxed),
            max_depth: self.max_depth.load(Ordering::Relaxed),
        }
    }
}

/// Totals for one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Intersector invocations, shadow rays included
    pub intersect_calls: u64,
    pub primary_rays: u64,
    /// Reflection and refraction rays that passed the bounce check
    pub secondary_rays: u64,
    pub shadow_rays: u64,
    /// Deepest chain of nested intersector invocations
    pub max_depth: u32,
}

/// Colours rays against one scene and hierarchy snapshot.
pub struct Shader<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    intersector: Intersector<'a>,
    /// Occlusion rays never see debug geometry
    occlusion: Intersector<'a>,
    base_brightness: f32,
    shininess: f32,
    stats: &'a TraceStats,
}

impl<'a> Shader<'a> {
    pub fn new(
        scene: &'a Scene,
        hierarchy: &'a Hierarchy,
        config: &'a RenderConfig,
        stats: &'a TraceStats,
    ) -> Self {
        let options = TraceOptions::from(config);
        let intersector = Intersector::new(scene, hierarchy, options);
        Self {
            scene,
            config,
            intersector,
            occlusion: intersector.with_options(options.without_debug()),
            base_brightness: config.base_brightness.unwrap_or(scene.base_brightness),
            shininess: config.global_shininess.unwrap_or(scene.global_shininess),
            stats,
        }
    }

    /// Shade a primary ray.
    pub fn cast(&self, ray: &Ray) -> RayResult<'a> {
        self.stats.primary_rays.fetch_add(1, Ordering::Relaxed);
        self.cast_ray(ray, 0)
    }

    /// Shade a ray `bounce` levels below the primary one.
    ///
    /// Past `max_bounce` this returns an empty result without touching the
    /// scene.
    pub fn cast_ray(&self, ray: &Ray, bounce: u32) -> RayResult<'a> {
        if bounce > self.config.max_bounce {
            return RayResult::default();
        }
        if bounce > 0 {
            self.stats.secondary_rays.fetch_add(1, Ordering::Relaxed);
        }

        let mut res = self.trace(&self.intersector, ray, bounce);
        let Some(object) = res.object else {
            return res;
        };
        let material = &*object.material;
        res.color = material.color;

        let lifted = res.point + EPSILON * res.unit_normal;

        let reflectiveness = if self.config.reflections {
            material.reflectiveness
        } else {
            0.0
        };
        if reflectiveness != 0.0 {
            let bounced = Ray::new(lifted, reflect(ray.direction, res.unit_normal));
            res.reflection_color = self.cast_ray(&bounced, bounce + 1).color;
        }

        if self.config.lighting && !material.no_lighting {
            self.light(object, ray, &mut res, lifted, bounce);
        } else {
            res.light_color = Color::ONE;
        }

        if material.is_transparent() && res.potential_collisions > 1 {
            res.refract_color = self.refract(object, ray, &res, bounce);
        }

        let local = res.color * res.light_color;
        let mut out = local * (1.0 - reflectiveness) + reflectiveness * res.reflection_color;
        out = material.opacity * out + (1.0 - material.opacity) * res.refract_color;
        out += res.specular_color;
        res.color = out.clamp(Color::ZERO, Color::ONE);
        res
    }

    fn trace(&self, intersector: &Intersector<'a>, ray: &Ray, bounce: u32) -> RayResult<'a> {
        self.stats.intersect_calls.fetch_add(1, Ordering::Relaxed);
        self.stats.max_depth.fetch_max(bounce + 1, Ordering::Relaxed);
        intersector.intersect(ray)
    }

    /// Accumulate unoccluded point lights and their highlights at the hit.
    fn light(&self, object: &Object, ray: &Ray, res: &mut RayResult<'a>, origin: Vec3, bounce: u32) {
        let material = &*object.material;
        let view = (-ray.direction).normalize_or_zero();
        let normal = res.unit_normal;
        let shininess = material.shininess.unwrap_or(self.shininess);

        let mut light_color = Color::ONE * self.base_brightness;
        let mut specular = Color::ZERO;

        for light in &self.scene.lights {
            let to_light = light.center - origin;
            let distance = to_light.length();
            if distance == 0.0 {
                continue;
            }
            let dir = to_light / distance;

            self.stats.shadow_rays.fetch_add(1, Ordering::Relaxed);
            let blocker = self.trace(&self.occlusion, &Ray::new(origin, dir), bounce);
            if blocker.hit() && blocker.t <= distance {
                continue;
            }

            let scaled = distance / self.config.distance_divisor;
            light_color += light.color * (light.brightness / (scaled * scaled));

            if self.config.specular {
                let mirrored = (2.0 * normal * normal.dot(dir) - dir).normalize_or_zero();
                let r_dot_v = mirrored.dot(view).max(0.0).powf(shininess);
                specular += material.specular * light.specular * light.specular_color * r_dot_v;
            }
        }

        res.light_color = light_color;
        res.specular_color = specular;
    }

    /// Colour seen through a transparent hit.
    fn refract(&self, object: &Object, ray: &Ray, res: &RayResult<'a>, bounce: u32) -> Color {
        let exit = match &object.shape {
            Shape::Sphere(s) => {
                sphere::refract_through(s, self.config.refractive_index, res.point, ray.direction)
            }
            // Flat and boxy shapes don't bend the ray
            Shape::Triangle(_) | Shape::Cuboid(_) => Some(Ray::new(res.point, ray.direction)),
        };
        let Some(exit) = exit else {
            log::debug!(
                "Refracted ray still inside sphere after {} bounces; treating it as absorbed",
                sphere::MAX_INTERNAL_BOUNCES
            );
            return Color::ZERO;
        };
        let onward = Ray::new(exit.origin, exit.direction.normalize_or_zero()).nudged(EPSILON);
        self.cast_ray(&onward, bounce + 1).color
    }
}
