//! Strata Renderer - hierarchy construction and Whitted-style ray tracing.
//!
//! Builds a spatial hierarchy over a [`strata_core::Scene`] with one of several
//! split strategies (equal-count, SAH, fixed-threshold, octree, voxel grid),
//! walks rays through it, and shades hits recursively with reflection,
//! refraction, shadows and Phong highlights.

pub mod accel;
mod bucket;
mod camera;
mod cuboid;
mod error;
mod hierarchy;
mod hit;
mod optics;
mod renderer;
mod sampler;
mod shade;
mod sphere;
mod traverse;
mod triangle;
mod world;

pub use accel::{build_hierarchy, AccelConfig, Strategy};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use error::{BuildError, BuildResult, ConfigError};
pub use hierarchy::{Bound, BoundTarget, Container, Hierarchy, HierarchyStats, NodeId};
pub use hit::{Hit, RayResult};
pub use renderer::{color_to_rgba, render, ImageBuffer, RenderConfig, RenderOutput};
pub use sampler::{sample_offsets, SampleMode};
pub use shade::{RenderStats, Shader, TraceStats};
pub use traverse::{Intersector, TraceOptions};
pub use world::World;

/// Re-export the math types the public API mentions
pub use strata_math::{Aabb, Ray, Vec2, Vec3};
