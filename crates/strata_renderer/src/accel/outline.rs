//! Wireframe outlines of built containers, for visual debugging.

use std::sync::Arc;

use strata_core::{Color, Cuboid, Material, Object};
use strata_math::{Aabb, Axis, Vec3};

use super::Builder;
use crate::error::BuildResult;
use crate::hierarchy::{BoundTarget, NodeId};

/// Edge thickness of the outline bars.
pub const OUTLINE_WIDTH: f32 = 0.02;

/// Outline colours, picked by container depth.
const PALETTE: [Color; 16] = [
    Color::new(0.545, 0.271, 0.075),
    Color::new(0.098, 0.098, 0.439),
    Color::new(0.000, 0.502, 0.000),
    Color::new(0.741, 0.718, 0.420),
    Color::new(0.690, 0.188, 0.376),
    Color::new(1.000, 0.000, 0.000),
    Color::new(1.000, 0.647, 0.000),
    Color::new(1.000, 1.000, 0.000),
    Color::new(0.486, 0.988, 0.000),
    Color::new(0.000, 0.980, 0.604),
    Color::new(0.000, 1.000, 1.000),
    Color::new(0.000, 0.000, 1.000),
    Color::new(1.000, 0.000, 1.000),
    Color::new(0.392, 0.584, 0.929),
    Color::new(0.933, 0.510, 0.933),
    Color::new(0.902, 0.902, 0.980),
];

impl Builder<'_> {
    /// One twelve-bar wireframe per container reachable from `root`.
    pub(super) fn outlines(&self, root: NodeId) -> BuildResult<Vec<Object>> {
        let materials: Vec<Arc<Material>> = PALETTE
            .iter()
            .enumerate()
            .map(|(i, &color)| Arc::new(Material::new(format!("outline-{i}"), color).unlit()))
            .collect();

        let mut out = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else { continue };
            if node.aabb.is_empty() {
                continue;
            }
            let material = &materials[depth % PALETTE.len()];
            out.try_reserve(12)?;
            out.extend(
                edges(&node.aabb, OUTLINE_WIDTH)
                    .into_iter()
                    .map(|bar| Object::debug(bar, Arc::clone(material))),
            );
            for bound in &node.children {
                if let BoundTarget::Node(child) = bound.target {
                    stack.push((child, depth + 1));
                }
            }
        }
        Ok(out)
    }
}

/// The twelve edges of `aabb` as thin boxes.
fn edges(aabb: &Aabb, width: f32) -> [Cuboid; 12] {
    let half = width * 0.5;
    let corner = |hi: bool, axis: Axis| {
        if hi {
            axis.of(aabb.max)
        } else {
            axis.of(aabb.min)
        }
    };
    std::array::from_fn(|i| {
        // Four edges run along each axis, one per pair of (lo/hi) on the others
        let along = Axis::ALL[i / 4];
        let (u, v) = (along.next(), along.next().next());
        let (u_hi, v_hi) = (i & 1 == 1, i & 2 == 2);

        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo = along.with(lo, along.of(aabb.min) - half);
        hi = along.with(hi, along.of(aabb.max) + half);
        lo = u.with(lo, corner(u_hi, u) - half);
        hi = u.with(hi, corner(u_hi, u) + half);
        lo = v.with(lo, corner(v_hi, v) - half);
        hi = v.with(hi, corner(v_hi, v) + half);
        Cuboid::new(lo, hi)
    })
}
