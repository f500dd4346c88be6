use crate::Vec3;

/// A ray in 3D space.
///
/// The direction is not required to be normalized; intersection distances
/// are expressed in multiples of `direction`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Return the same ray with its origin pushed `epsilon` along the direction.
    ///
    /// Secondary rays start slightly off the surface they leave so they do
    /// not immediately re-hit it.
    #[inline]
    pub fn nudged(&self, epsilon: f32) -> Ray {
        Ray::new(self.origin + self.direction * epsilon, self.direction)
    }
}
