use crate::{Axis, Interval, Ray, Vec3};

/// Axis-aligned bounding box, defined by componentwise min/max corners.
///
/// `Aabb::EMPTY` is the growing sentinel: its min is +inf and its max is
/// -inf, so growing it by any box yields that box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// True for the growing sentinel or any inverted box.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extend this box to cover `other`.
    pub fn grow(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Extend this box to cover a point.
    pub fn grow_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// `2·(dx·dy + dx·dz + dy·dz)`; zero for an empty box.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.size();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// The interval covered along one axis.
    pub fn axis_interval(&self, axis: Axis) -> Interval {
        Interval::new(axis.of(self.min), axis.of(self.max))
    }

    pub fn midpoint(&self, axis: Axis) -> f32 {
        self.axis_interval(axis).midpoint()
    }

    /// Clip the box at `value` on `axis`, keeping the lower half for side 0
    /// and the upper half for side 1.
    pub fn clipped(&self, axis: Axis, value: f32, side: usize) -> Aabb {
        let mut out = *self;
        if side == 0 {
            out.max = axis.with(out.max, value);
        } else {
            out.min = axis.with(out.min, value);
        }
        out
    }

    /// One of the eight boxes produced by cutting this box at its centroid.
    ///
    /// Octant index is `x + 2y + 4z` where a set bit selects the upper half
    /// along that axis.
    pub fn octant(&self, index: usize) -> Aabb {
        let mid = self.centroid();
        let mut out = *self;
        for axis in Axis::ALL {
            let upper = (index >> axis.index()) & 1 == 1;
            if upper {
                out.min = axis.with(out.min, axis.of(mid));
            } else {
                out.max = axis.with(out.max, axis.of(mid));
            }
        }
        out
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// True when `other` lies entirely inside this box (inclusive).
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }

    /// True when a point lies inside this box (inclusive).
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// True when the boxes share at least one point on every axis.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| self.axis_interval(axis).overlaps(&other.axis_interval(axis)))
    }

    /// Slab test.
    ///
    /// Returns the entry distance along the ray (negative when the origin is
    /// inside the box), or `None` when the box lies behind the ray or the
    /// ray misses it.
    pub fn slab(&self, ray: &Ray) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in Axis::ALL {
            let origin = axis.of(ray.origin);
            let dir = axis.of(ray.direction);
            let lo = axis.of(self.min);
            let hi = axis.of(self.max);

            if dir == 0.0 {
                // Parallel to the slab: either always inside it or never
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
        }

        if tmax < 0.0 || tmin > tmax {
            return None;
        }
        Some(tmin)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb::EMPTY
    }
}
