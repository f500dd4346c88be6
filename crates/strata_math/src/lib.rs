//! Strata math - vector types and the small geometric toolkit shared by
//! the scene and renderer crates.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod axis;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use axis::Axis;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_perp_dot_sign() {
        // Triangle containment reads which side of an edge a point is on
        let edge = Vec2::new(2.0, 0.0);
        assert_eq!(edge.perp_dot(Vec2::new(1.0, 3.0)), 6.0);
        assert_eq!(edge.perp_dot(Vec2::new(1.0, -3.0)), -6.0);
        assert_eq!(edge.perp_dot(Vec2::new(5.0, 0.0)), 0.0);
    }
}
