//! Side tests used to distribute bounds between split halves.

use strata_math::{Aabb, Axis, Interval, Vec3};

use crate::hierarchy::Bound;

/// Which half (or halves) of a split a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Both,
    Neither,
}

impl Side {
    pub fn left(self) -> bool {
        matches!(self, Side::Left | Side::Both)
    }

    pub fn right(self) -> bool {
        matches!(self, Side::Right | Side::Both)
    }
}

/// Plane-mode test: does `extent` overlap `[lo, mid]`, `[mid, hi]`, or both?
///
/// Boundaries are inclusive, so a bound touching the split plane lands on
/// both sides.
pub fn which_side(extent: Interval, lo: f32, mid: f32, hi: f32) -> Side {
    let left = extent.overlaps(&Interval::new(lo, mid));
    let right = extent.overlaps(&Interval::new(mid, hi));
    match (left, right) {
        (true, true) => Side::Both,
        (true, false) => Side::Left,
        (false, true) => Side::Right,
        (false, false) => Side::Neither,
    }
}

/// BVH-mode test: centroid at or below the split goes left, never both.
pub fn centroid_side(centroid: f32, mid: f32) -> Side {
    if centroid <= mid {
        Side::Left
    } else {
        Side::Right
    }
}

/// Classify a bound against a split of `region` at `value` along `axis`.
pub fn classify(bound: &Bound, axis: Axis, value: f32, region: &Aabb, bvh: bool) -> Side {
    if bvh {
        centroid_side(axis.of(bound.centroid), value)
    } else {
        let span = region.axis_interval(axis);
        which_side(bound.aabb.axis_interval(axis), span.min, value, span.max)
    }
}

/// Per-axis `(lower, upper)` flags for an octree split at `mid`.
pub fn octant_flags(aabb: &Aabb, mid: Vec3) -> [(bool, bool); 3] {
    Axis::ALL.map(|axis| {
        let m = axis.of(mid);
        (axis.of(aabb.min) < m, axis.of(aabb.max) >= m)
    })
}

/// Whether the flags admit the octant `x + 2y + 4z`.
pub fn in_octant(flags: &[(bool, bool); 3], index: usize) -> bool {
    Axis::ALL.iter().all(|axis| {
        let (lower, upper) = flags[axis.index()];
        if (index >> axis.index()) & 1 == 1 {
            upper
        } else {
            lower
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_which_side() {
        assert_eq!(which_side(Interval::new(-4.0, -2.0), -4.0, 0.0, 4.0), Side::Left);
        assert_eq!(which_side(Interval::new(2.0, 4.0), -4.0, 0.0, 4.0), Side::Right);
        assert_eq!(which_side(Interval::new(-1.0, 1.0), -4.0, 0.0, 4.0), Side::Both);
        // Touching the plane counts for both halves
        assert_eq!(which_side(Interval::new(-2.0, 0.0), -4.0, 0.0, 4.0), Side::Both);
        assert_eq!(which_side(Interval::new(5.0, 6.0), -4.0, 0.0, 4.0), Side::Neither);
    }

    #[test]
    fn test_centroid_side_is_exclusive() {
        assert_eq!(centroid_side(0.0, 0.0), Side::Left);
        assert_eq!(centroid_side(0.001, 0.0), Side::Right);
        assert!(!centroid_side(-1.0, 0.0).right());
    }

    #[test]
    fn test_octant_membership() {
        let mid = Vec3::ZERO;
        let corner = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.0));
        let flags = octant_flags(&corner, mid);
        let hits: Vec<usize> = (0..8).filter(|&i| in_octant(&flags, i)).collect();
        assert_eq!(hits, vec![7]);

        let straddling = Aabb::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(1.0, 1.0, 1.0));
        let flags = octant_flags(&straddling, mid);
        let hits: Vec<usize> = (0..8).filter(|&i| in_octant(&flags, i)).collect();
        assert_eq!(hits, vec![6, 7]);
    }
}
