//! Ray-sphere intersection and refraction through (possibly hollow) spheres.

use strata_core::Sphere;
use strata_math::{Ray, Vec3};

use crate::hit::Hit;
use crate::optics::{reflect, refract, EPSILON, RI_AIR};

/// Upper bound on internal reflections while looking for a way out of a
/// sphere. Past it the ray is considered absorbed.
pub const MAX_INTERNAL_BOUNCES: usize = 64;

/// Solve the ray-sphere quadratic.
///
/// From outside, returns the near root with the outward normal. From inside,
/// returns the far root with the normal flipped to face the origin.
/// Degenerate spheres and misses return `None`.
pub fn intersect(sphere: &Sphere, ray: &Ray) -> Option<Hit> {
    if sphere.radius <= 0.0 {
        return None;
    }
    let oc = ray.origin - sphere.center;
    let a = ray.direction.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * ray.direction.dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let mut t = (-b - sqrtd) / (2.0 * a);
    let mut t_exit = (-b + sqrtd) / (2.0 * a);
    if t < 0.0 {
        std::mem::swap(&mut t, &mut t_exit);
    }
    if t < 0.0 {
        return None;
    }

    let outward = ray.at(t) - sphere.center;
    let normal = if t <= t_exit { outward } else { -outward };
    Some(Hit { t, t_exit, normal })
}

/// Continue a ray that struck `sphere` at `entry` through it.
///
/// Returns the ray leaving the sphere (or reflecting off it on total
/// internal reflection at entry), or `None` if it is still bouncing inside
/// after `MAX_INTERNAL_BOUNCES`.
pub fn refract_through(sphere: &Sphere, ri: f32, entry: Vec3, direction: Vec3) -> Option<Ray> {
    if sphere.thickness <= 0.0 {
        // A zero-thickness shell is just air
        return Some(Ray::new(entry, direction));
    }
    let outward = entry - sphere.center;
    if outward.dot(direction) > 0.0 {
        // Started inside: this hit is already the way out
        let inward = -outward;
        return Some(match refract(ri, RI_AIR, direction, inward) {
            Some(out) => Ray::new(entry, out),
            None => Ray::new(entry, reflect(direction, inward)),
        });
    }
    if sphere.is_hollow() {
        refract_hollow(sphere, ri, entry, direction)
    } else {
        refract_solid(sphere, RI_AIR, ri, entry, direction)
    }
}

/// Enter a solid sphere going from index `outside` to `inside`, then bounce
/// around until the ray escapes.
fn refract_solid(sphere: &Sphere, outside: f32, inside: f32, entry: Vec3, direction: Vec3) -> Option<Ray> {
    let normal = entry - sphere.center;
    let Some(mut dir) = refract(outside, inside, direction, normal) else {
        let bounced = reflect(direction, normal);
        return Some(Ray::new(entry + EPSILON * bounced, bounced));
    };

    let mut p = entry;
    for _ in 0..MAX_INTERNAL_BOUNCES {
        p += EPSILON * dir;
        let Some(hit) = intersect(sphere, &Ray::new(p, dir)) else {
            // Grazing exit lost to rounding; carry on in a straight line
            return Some(Ray::new(p, dir));
        };
        p += hit.t * dir;
        let inward = sphere.center - p;
        match refract(inside, outside, dir, inward) {
            Some(out) => return Some(Ray::new(p, out)),
            None => dir = reflect(dir, inward),
        }
    }
    None
}

/// Refract through a glass shell around an air core.
fn refract_hollow(sphere: &Sphere, ri: f32, entry: Vec3, direction: Vec3) -> Option<Ray> {
    let normal = entry - sphere.center;
    let Some(mut dir) = refract(RI_AIR, ri, direction, normal) else {
        return Some(Ray::new(entry, reflect(direction, normal)));
    };

    let core = sphere.inner();
    let mut p = entry;
    for _ in 0..MAX_INTERNAL_BOUNCES {
        let Some(hit) = intersect(&core, &Ray::new(p, dir)) else {
            // The path never reaches the core, so the shell acts solid
            return refract_solid(sphere, RI_AIR, ri, entry, direction);
        };
        // Through the air core and back into the shell
        let through = refract_solid(&core, ri, RI_AIR, p + hit.t * dir, dir)?;
        p = through.origin;
        dir = through.direction;

        let Some(hit) = intersect(sphere, &Ray::new(p + EPSILON * dir, dir)) else {
            return Some(Ray::new(p, dir));
        };
        p += (hit.t + EPSILON) * dir;
        let inward = sphere.center - p;
        match refract(ri, RI_AIR, dir, inward) {
            Some(out) => return Some(Ray::new(p, out)),
            None => dir = reflect(dir, inward),
        }
    }
    None
}
