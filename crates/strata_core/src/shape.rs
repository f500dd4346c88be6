//! Geometric primitives.
//!
//! Each primitive knows its bounding box, its centroid, its surface area and
//! whether it fully envelops a region of space. Ray intersection lives in
//! the renderer.

use std::f32::consts::PI;

use strata_math::{Aabb, Vec3};

use crate::error::{SceneError, SceneResult};

/// A sphere, optionally hollow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    /// Shell thickness as a fraction of the radius. `1` is solid, `0`
    /// behaves as air when refracting.
    pub thickness: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            thickness: 1.0,
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !self.center.is_finite() || !self.radius.is_finite() {
            return Err(SceneError::NonFinite("sphere"));
        }
        if self.radius < 0.0 {
            return Err(SceneError::NegativeRadius(self.radius));
        }
        if !(0.0..=1.0).contains(&self.thickness) {
            return Err(SceneError::Thickness(self.thickness));
        }
        Ok(())
    }

    pub fn is_hollow(&self) -> bool {
        self.thickness < 1.0
    }

    /// The air sphere carved out of a hollow sphere.
    pub fn inner(&self) -> Sphere {
        Sphere::new(self.center, self.radius * (1.0 - self.thickness))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }

    pub fn surface_area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    /// True when `region` lies strictly inside the sphere and, for a hollow
    /// sphere, clear of the inner cavity. A region touching either surface
    /// is not enveloped.
    pub fn envelops(&self, region: &Aabb) -> bool {
        let r2 = self.radius * self.radius;
        let inside = region
            .corners()
            .iter()
            .all(|c| c.distance_squared(self.center) < r2);
        if !inside || !self.is_hollow() {
            return inside;
        }
        let inner = self.inner();
        let nearest = self.center.clamp(region.min, region.max);
        nearest.distance_squared(self.center) > inner.radius * inner.radius
    }
}

/// A triangle given by three vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !(self.a.is_finite() && self.b.is_finite() && self.c.is_finite()) {
            return Err(SceneError::NonFinite("triangle"));
        }
        Ok(())
    }

    /// Unnormalized face normal `(c-a) × (b-a)`.
    pub fn normal(&self) -> Vec3 {
        (self.c - self.a).cross(self.b - self.a)
    }

    /// The face normal flipped, if needed, to face a viewer looking along
    /// `direction`.
    pub fn visible_normal(&self, direction: Vec3) -> Vec3 {
        let n = self.normal();
        if n.dot(direction) <= 0.0 {
            n
        } else {
            -n
        }
    }

    pub fn bounds(&self) -> Aabb {
        let mut out = Aabb::from_points(self.a, self.b);
        out.grow_point(self.c);
        out
    }

    /// Vertex average.
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn surface_area(&self) -> f32 {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        0.5 * ab.cross(ac).length()
    }
}

/// An axis-aligned box primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    pub min: Vec3,
    pub max: Vec3,
}

impl Cuboid {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(SceneError::NonFinite("cuboid"));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    pub fn surface_area(&self) -> f32 {
        self.bounds().surface_area()
    }

    /// True when `region` lies strictly inside the box. A region that
    /// reaches a face still holds part of the surface.
    pub fn envelops(&self, region: &Aabb) -> bool {
        region.min.cmpgt(self.min).all() && region.max.cmplt(self.max).all()
    }
}

/// Shape type tag, used for per-type toggles and cost weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Triangle,
    Cuboid,
}

/// The closed set of renderable primitives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Cuboid(Cuboid),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Cuboid(_) => ShapeKind::Cuboid,
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        match self {
            Shape::Sphere(s) => s.validate(),
            Shape::Triangle(t) => t.validate(),
            Shape::Cuboid(c) => c.validate(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounds(),
            Shape::Triangle(t) => t.bounds(),
            Shape::Cuboid(c) => c.bounds(),
        }
    }

    /// Point used to decide which side of a split the shape falls on.
    pub fn centroid(&self) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.center,
            Shape::Triangle(t) => t.centroid(),
            Shape::Cuboid(c) => c.bounds().centroid(),
        }
    }

    pub fn surface_area(&self) -> f32 {
        match self {
            Shape::Sphere(s) => s.surface_area(),
            Shape::Triangle(t) => t.surface_area(),
            Shape::Cuboid(c) => c.surface_area(),
        }
    }

    /// True when the shape fully contains `region`, so none of its surface
    /// can lie inside it. A triangle never envelops anything.
    pub fn envelops(&self, region: &Aabb) -> bool {
        match self {
            Shape::Sphere(s) => s.envelops(region),
            Shape::Triangle(_) => false,
            Shape::Cuboid(c) => c.envelops(region),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

impl From<Cuboid> for Shape {
    fn from(c: Cuboid) -> Self {
        Shape::Cuboid(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_bounds_and_area() {
        let s = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let b = s.bounds();

        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(b.max, Vec3::new(3.0, 4.0, 5.0));
        assert!((s.surface_area() - 16.0 * PI).abs() < 0.001);
    }

    #[test]
    fn test_sphere_envelops() {
        let s = Sphere::new(Vec3::ZERO, 2.0);

        assert!(s.envelops(&Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))));
        // Corner (1.5, 1.5, 1.5) sits outside the radius
        assert!(!s.envelops(&Aabb::new(Vec3::ZERO, Vec3::splat(1.5))));
    }

    #[test]
    fn test_sphere_envelops_excludes_surfaces() {
        let s = Sphere::new(Vec3::ZERO, 3.0);
        // Corners land exactly on the surface
        assert!(!s.envelops(&Aabb::new(Vec3::new(-1.0, -2.0, -2.0), Vec3::new(1.0, 2.0, 2.0))));

        // A region in the shell is enveloped, one reaching the cavity is not
        let hollow = Sphere::new(Vec3::ZERO, 4.0).with_thickness(0.5);
        assert!(hollow.envelops(&Aabb::new(Vec3::new(2.5, -0.5, -0.5), Vec3::new(3.0, 0.5, 0.5))));
        assert!(!hollow.envelops(&Aabb::new(Vec3::new(1.5, -0.5, -0.5), Vec3::new(3.0, 0.5, 0.5))));
        assert!(!hollow.envelops(&Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))));
    }

    #[test]
    fn test_sphere_validate() {
        assert!(Sphere::new(Vec3::ZERO, 0.0).validate().is_ok());
        assert_eq!(
            Sphere::new(Vec3::ZERO, -1.0).validate(),
            Err(SceneError::NegativeRadius(-1.0))
        );
        assert_eq!(
            Sphere::new(Vec3::ZERO, 1.0).with_thickness(1.5).validate(),
            Err(SceneError::Thickness(1.5))
        );
        assert!(Sphere::new(Vec3::splat(f32::NAN), 1.0).validate().is_err());
    }

    #[test]
    fn test_triangle_visible_normal_faces_viewer() {
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );

        assert!(tri.visible_normal(Vec3::Z).dot(Vec3::Z) < 0.0);
        assert!(tri.visible_normal(-Vec3::Z).dot(-Vec3::Z) < 0.0);
    }

    #[test]
    fn test_triangle_area_and_centroid() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));

        assert!((tri.surface_area() - 2.0).abs() < 0.001);
        assert!((tri.centroid() - Vec3::new(2.0 / 3.0, 2.0 / 3.0, 0.0)).length() < 0.001);
        assert!(!Shape::from(tri).envelops(&Aabb::new(Vec3::ZERO, Vec3::splat(0.01))));
    }

    #[test]
    fn test_cuboid_envelops() {
        let c = Cuboid::new(Vec3::splat(2.0), Vec3::splat(-2.0));

        assert_eq!(c.min, Vec3::splat(-2.0));
        assert!(c.envelops(&Aabb::new(Vec3::ZERO, Vec3::ONE)));
        assert!(!c.envelops(&Aabb::new(Vec3::ZERO, Vec3::splat(3.0))));
    }

    #[test]
    fn test_cuboid_does_not_envelop_region_touching_a_face() {
        let c = Cuboid::new(Vec3::splat(-5.0), Vec3::splat(5.0));

        assert!(!c.envelops(&c.bounds()));
        assert!(!c.envelops(&Aabb::new(Vec3::ZERO, Vec3::new(5.0, 1.0, 1.0))));
        assert!(!c.envelops(&Aabb::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::ONE)));
        assert!(c.envelops(&Aabb::new(Vec3::splat(-4.9), Vec3::splat(4.9))));
    }

    #[test]
    fn test_shape_dispatch() {
        let shape: Shape = Sphere::new(Vec3::ONE, 1.0).into();
        assert_eq!(shape.kind(), ShapeKind::Sphere);
        assert_eq!(shape.centroid(), Vec3::ONE);
    }
}
