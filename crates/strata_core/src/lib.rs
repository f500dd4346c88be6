//! Strata Core - scene description for the Strata ray tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `Triangle`, `Cuboid` under the closed `Shape` enum
//! - **Shading attributes**: `Material`, `PointLight`
//! - **Scene container**: `Scene`, the flat, unclustered list of objects and
//!   lights handed to the renderer
//!
//! # Example
//!
//! ```ignore
//! use strata_core::{Material, Scene, Sphere};
//! use strata_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let red = scene.add_material(Material::new("red", Vec3::new(1.0, 0.0, 0.0)));
//! scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0), red)?;
//! ```

pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod shape;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use light::PointLight;
pub use material::{Color, Material};
pub use mesh::Mesh;
pub use scene::{Object, ObjectId, Scene};
pub use shape::{Cuboid, Shape, ShapeKind, Sphere, Triangle};
