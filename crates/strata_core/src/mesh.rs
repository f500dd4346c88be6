//! Indexed triangle meshes.
//!
//! A mesh is a loader-side convenience: the renderer only sees the
//! individual triangles it expands into.

use strata_math::{Aabb, Vec3};

use crate::error::{SceneError, SceneResult};
use crate::shape::Triangle;

/// Vertex positions plus triangle indices (every 3 indices form a triangle).
#[derive(Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh, checking that every index refers to a vertex.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> SceneResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(SceneError::MeshIndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(SceneError::MeshIndex {
                index,
                vertices: positions.len(),
            });
        }
        if positions.iter().any(|p| !p.is_finite()) {
            return Err(SceneError::NonFinite("mesh"));
        }

        let bounds = positions.iter().fold(Aabb::EMPTY, |mut acc, p| {
            acc.grow_point(*p);
            acc
        });

        Ok(Self {
            positions,
            indices,
            bounds,
        })
    }

    /// Axis-aligned box mesh (12 triangles).
    pub fn cube(min: Vec3, max: Vec3) -> Self {
        let positions: Vec<Vec3> = Aabb::new(min, max).corners().to_vec();
        // Corner i has bit 0 = x, bit 1 = y, bit 2 = z
        let indices = vec![
            0, 1, 3, 0, 3, 2, // -z
            4, 6, 7, 4, 7, 5, // +z
            0, 4, 5, 0, 5, 1, // -y
            2, 3, 7, 2, 7, 6, // +y
            0, 2, 6, 0, 6, 4, // -x
            1, 5, 7, 1, 7, 3, // +x
        ];
        let bounds = Aabb::new(min.min(max), min.max(max));
        Self {
            positions,
            indices,
            bounds,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expand into individual triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|idx| {
            Triangle::new(
                self.positions[idx[0] as usize],
                self.positions[idx[1] as usize],
                self.positions[idx[2] as usize],
            )
        })
    }
}
