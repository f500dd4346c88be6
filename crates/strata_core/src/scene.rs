//! The flat scene handed to the renderer.
//!
//! A scene is an unclustered list of objects plus point lights. The renderer
//! builds its acceleration hierarchy over it; the scene itself never changes
//! shape while a render is running.

use std::sync::Arc;

use strata_math::Aabb;

use crate::error::SceneResult;
use crate::light::PointLight;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::shape::{Cuboid, Shape, Sphere, Triangle};

/// Index of an object within its scene.
pub type ObjectId = usize;

/// A shape together with its shading attributes.
#[derive(Clone, Debug)]
pub struct Object {
    pub shape: Shape,
    pub material: Arc<Material>,
    /// Visualisation-only geometry (hierarchy outlines). Never casts shadows.
    pub debug: bool,
}

impl Object {
    pub fn new(shape: impl Into<Shape>, material: Arc<Material>) -> Self {
        Self {
            shape: shape.into(),
            material,
            debug: false,
        }
    }

    pub fn debug(shape: impl Into<Shape>, material: Arc<Material>) -> Self {
        Self {
            shape: shape.into(),
            material,
            debug: true,
        }
    }
}

/// A complete renderable scene.
#[derive(Clone, Debug)]
pub struct Scene {
    pub objects: Vec<Object>,
    pub lights: Vec<PointLight>,
    /// Ambient light level every surface receives
    pub base_brightness: f32,
    /// Phong exponent for materials that don't set their own
    pub global_shininess: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            base_brightness: 0.0,
            global_shininess: 8.0,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a material for sharing between objects.
    pub fn add_material(&self, material: Material) -> Arc<Material> {
        Arc::new(material)
    }

    /// Add a validated object and return its id.
    pub fn add_object(&mut self, object: Object) -> SceneResult<ObjectId> {
        object.shape.validate()?;
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    pub fn add_sphere(&mut self, sphere: Sphere, material: Arc<Material>) -> SceneResult<ObjectId> {
        self.add_object(Object::new(sphere, material))
    }

    pub fn add_triangle(&mut self, tri: Triangle, material: Arc<Material>) -> SceneResult<ObjectId> {
        self.add_object(Object::new(tri, material))
    }

    pub fn add_cuboid(&mut self, cuboid: Cuboid, material: Arc<Material>) -> SceneResult<ObjectId> {
        self.add_object(Object::new(cuboid, material))
    }

    /// Add every triangle of a mesh, all sharing one material.
    pub fn add_mesh(&mut self, mesh: &Mesh, material: Arc<Material>) -> SceneResult<()> {
        self.objects.reserve(mesh.triangle_count());
        for tri in mesh.triangles() {
            self.add_triangle(tri, Arc::clone(&material))?;
        }
        log::debug!("Added mesh with {} triangles", mesh.triangle_count());
        Ok(())
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Bounds of every non-debug object in the scene.
    pub fn bounds(&self) -> Aabb {
        self.objects.iter().filter(|o| !o.debug).fold(Aabb::EMPTY, |mut acc, o| {
            acc.grow(&o.shape.bounds());
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use strata_math::Vec3;

    #[test]
    fn test_scene_add_and_bounds() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::default());

        let a = scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0), Arc::clone(&mat)).unwrap();
        let b = scene
            .add_cuboid(Cuboid::new(Vec3::splat(2.0), Vec3::splat(3.0)), mat)
            .unwrap();

        assert_eq!((a, b), (0, 1));
        assert_eq!(scene.object_count(), 2);
        let bounds = scene.bounds();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_scene_rejects_invalid_shape() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::default());

        let err = scene.add_sphere(Sphere::new(Vec3::ZERO, -2.0), mat).unwrap_err();
        assert_eq!(err, SceneError::NegativeRadius(-2.0));
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_scene_add_mesh() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::default());
        scene.add_mesh(&Mesh::cube(Vec3::ZERO, Vec3::ONE), mat).unwrap();

        assert_eq!(scene.object_count(), 12);
        assert!(scene.objects.iter().all(|o| !o.debug));
    }
}
