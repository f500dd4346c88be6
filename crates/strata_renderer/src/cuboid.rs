//! Ray-box intersection for the cuboid primitive.

use strata_core::Cuboid;
use strata_math::{Axis, Ray, Vec3};

use crate::hit::Hit;

/// Slab test that also reports which face was struck.
///
/// From outside the box the entry face is returned; from inside, the exit
/// face. The normal always faces the incoming ray.
pub fn intersect(cuboid: &Cuboid, ray: &Ray) -> Option<Hit> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    let mut near_axis = Axis::X;
    let mut far_axis = Axis::X;

    for axis in Axis::ALL {
        let origin = axis.of(ray.origin);
        let dir = axis.of(ray.direction);
        let (lo, hi) = (axis.of(cuboid.min), axis.of(cuboid.max));

        if dir == 0.0 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let t0 = (lo - origin) / dir;
        let t1 = (hi - origin) / dir;
        let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        if near >= tmin {
            tmin = near;
            near_axis = axis;
        }
        if far <= tmax {
            tmax = far;
            far_axis = axis;
        }
    }

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    let face = |axis: Axis| {
        let sign = if axis.of(ray.direction) >= 0.0 { -1.0 } else { 1.0 };
        axis.with(Vec3::ZERO, sign)
    };

    if tmin < 0.0 {
        Some(Hit {
            t: tmax,
            t_exit: tmin,
            normal: face(far_axis),
        })
    } else {
        Some(Hit {
            t: tmin,
            t_exit: tmax,
            normal: face(near_axis),
        })
    }
}
