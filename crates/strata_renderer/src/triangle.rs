//! Ray-triangle intersection.
//!
//! Two tests are available. The plane test intersects the supporting plane
//! first and only then checks containment with a 2D edge-side test, which
//! lets the traversal count "potential" hits. Möller–Trumbore does both in
//! one go.

use strata_core::Triangle;
use strata_math::{Ray, Vec2, Vec3};

use crate::hit::Hit;

/// Distance to the triangle's supporting plane along the ray.
///
/// `normal` is the viewer-facing normal. Returns `None` when the ray runs
/// parallel to the plane or the triangle has no area.
pub fn plane_distance(tri: &Triangle, normal: Vec3, ray: &Ray) -> Option<f32> {
    let denom = normal.dot(ray.direction);
    if denom == 0.0 {
        return None;
    }
    let t = (tri.a - ray.origin).dot(normal) / denom;
    t.is_finite().then_some(t)
}

/// Whether a point on the triangle's plane lies inside it.
///
/// Projects onto the plane most perpendicular to `normal`, then checks the
/// point sits on the same side of all three edges. Points on an edge or a
/// vertex count as inside.
pub fn contains_projected(tri: &Triangle, normal: Vec3, point: Vec3) -> bool {
    let n = normal.abs();
    let project = |v: Vec3| -> Vec2 {
        if n.x >= n.y && n.x >= n.z {
            Vec2::new(v.y, v.z)
        } else if n.y >= n.z {
            Vec2::new(v.x, v.z)
        } else {
            Vec2::new(v.x, v.y)
        }
    };

    let p = project(point);
    let verts = [project(tri.a), project(tri.b), project(tri.c)];
    if (verts[1] - verts[0]).perp_dot(verts[2] - verts[0]) == 0.0 {
        return false;
    }

    let sides: [f32; 3] = std::array::from_fn(|i| {
        let start = verts[i];
        (verts[(i + 1) % 3] - start).perp_dot(p - start)
    });
    sides.iter().all(|&d| d >= 0.0) || sides.iter().all(|&d| d <= 0.0)
}

/// Plane test followed by the containment test, without any bookkeeping.
pub fn intersect_plane(tri: &Triangle, ray: &Ray) -> Option<Hit> {
    let normal = tri.visible_normal(ray.direction);
    let t = plane_distance(tri, normal, ray)?;
    if t < 0.0 || !contains_projected(tri, normal, ray.at(t)) {
        return None;
    }
    Some(Hit { t, t_exit: t, normal })
}

/// Möller–Trumbore ray-triangle intersection.
pub fn intersect_mt(tri: &Triangle, ray: &Ray) -> Option<Hit> {
    const EPS: f32 = 1e-8;

    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;
    let h = ray.direction.cross(e2);
    let det = e1.dot(h);
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - tri.a;
    let u = inv * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = inv * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv * e2.dot(q);
    if t < 0.0 {
        return None;
    }
    Some(Hit {
        t,
        t_exit: t,
        normal: tri.visible_normal(ray.direction),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_plane_test_hit_and_miss() {
        let hit = intersect_plane(&tri(), &Ray::new(Vec3::new(0.0, 0.3, -5.0), Vec3::Z)).unwrap();
        assert!((hit.t - 5.0).abs() < 0.001);
        assert!(hit.normal.dot(Vec3::Z) < 0.0);

        assert!(intersect_plane(&tri(), &Ray::new(Vec3::new(2.0, 0.3, -5.0), Vec3::Z)).is_none());
    }

    #[test]
    fn test_mt_hit_and_miss() {
        let hit = intersect_mt(&tri(), &Ray::new(Vec3::new(0.0, 0.3, -5.0), Vec3::Z)).unwrap();
        assert!((hit.t - 5.0).abs() < 0.001);

        assert!(intersect_mt(&tri(), &Ray::new(Vec3::new(2.0, 0.3, -5.0), Vec3::Z)).is_none());
    }

    #[test]
    fn test_tests_agree_on_a_sweep() {
        let t = tri();
        for i in 0..21 {
            for j in 0..21 {
                let origin = Vec3::new(-1.05 + 0.1 * i as f32 + 0.003, -0.05 + 0.055 * j as f32, 3.0);
                let ray = Ray::new(origin, -Vec3::Z);
                let plane = intersect_plane(&t, &ray).map(|h| h.t);
                let mt = intersect_mt(&t, &ray).map(|h| h.t);
                assert_eq!(plane.is_some(), mt.is_some(), "disagree at {origin:?}");
            }
        }
    }

    #[test]
    fn test_point_level_with_apex_is_outside() {
        // Level with the apex but off to the side
        let beside = Ray::new(Vec3::new(-0.5, 1.0, -5.0), Vec3::Z);
        assert!(intersect_plane(&tri(), &beside).is_none());
        assert!(intersect_mt(&tri(), &beside).is_none());

        let level = Ray::new(Vec3::new(0.5, 1.0, -5.0), Vec3::Z);
        assert!(intersect_plane(&tri(), &level).is_none());
        assert!(intersect_mt(&tri(), &level).is_none());

        // The apex itself and a base vertex are on the boundary
        for origin in [Vec3::new(0.0, 1.0, -5.0), Vec3::new(-1.0, 0.0, -5.0)] {
            let ray = Ray::new(origin, Vec3::Z);
            assert!(intersect_plane(&tri(), &ray).is_some(), "{origin:?}");
            assert!(intersect_mt(&tri(), &ray).is_some(), "{origin:?}");
        }
    }

    #[test]
    fn test_contains_projected_either_winding() {
        let t = tri();
        let flipped = Triangle::new(t.a, t.c, t.b);
        for normal in [Vec3::Z, -Vec3::Z] {
            assert!(contains_projected(&t, normal, Vec3::new(0.0, 0.5, 0.0)));
            assert!(contains_projected(&flipped, normal, Vec3::new(0.0, 0.5, 0.0)));
            assert!(!contains_projected(&flipped, normal, Vec3::new(0.9, 0.5, 0.0)));
        }
    }

    #[test]
    fn test_behind_and_parallel() {
        let behind = Ray::new(Vec3::new(0.0, 0.3, 5.0), Vec3::Z);
        assert!(intersect_plane(&tri(), &behind).is_none());
        assert!(intersect_mt(&tri(), &behind).is_none());

        let parallel = Ray::new(Vec3::new(0.0, 0.3, -5.0), Vec3::X);
        assert!(intersect_plane(&tri(), &parallel).is_none());
        assert!(intersect_mt(&tri(), &parallel).is_none());
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let flat = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        let ray = Ray::new(Vec3::new(0.5, 0.0, -1.0), Vec3::Z);

        assert!(intersect_plane(&flat, &ray).is_none());
        assert!(intersect_mt(&flat, &ray).is_none());
    }
}
