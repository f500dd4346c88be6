//! Reflection and refraction directions.

use strata_math::Vec3;

/// Refractive index of air.
pub const RI_AIR: f32 = 1.0;

/// Distance secondary rays are pushed off the surface they leave.
pub const EPSILON: f32 = 0.00001;

/// Mirror `direction` about the plane with the given normal.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    direction - 2.0 * direction.dot(n) * n
}

/// Snell's law refraction from a medium of index `n1` into `n2`.
///
/// `normal` must face the incoming ray. Returns `None` on total internal
/// reflection; the result is unit length otherwise.
pub fn refract(n1: f32, n2: f32, direction: Vec3, normal: Vec3) -> Option<Vec3> {
    let d = direction.normalize_or_zero();
    let n = normal.normalize_or_zero();
    let eta = n1 / n2;
    let cos_i = -n.dot(d);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some((eta * cos_i - cos_t) * n + eta * d)
}
