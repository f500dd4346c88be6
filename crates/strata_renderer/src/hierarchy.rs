//! Bound/Container arena.
//!
//! A hierarchy is a flat `Vec` of containers addressed by `NodeId`. Each
//! container owns an ordered list of bounds, and each bound points either at
//! a scene object or at a child container. Nothing points back up the tree,
//! so dropping the `Vec` drops the whole tree.

use std::fmt;

use strata_core::{Object, ObjectId, Scene};
use strata_math::{Aabb, Axis, Vec3};

use crate::accel::Strategy;
use crate::error::BuildResult;

/// Index of a container within its hierarchy.
pub type NodeId = usize;

/// What a bound wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundTarget {
    Object(ObjectId),
    Node(NodeId),
}

/// A precomputed box around one object or one nested container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub aabb: Aabb,
    /// Split-side discriminator (vertex average for triangles)
    pub centroid: Vec3,
    pub target: BoundTarget,
}

impl Bound {
    pub fn object(id: ObjectId, object: &Object) -> Self {
        Self {
            aabb: object.shape.bounds(),
            centroid: object.shape.centroid(),
            target: BoundTarget::Object(id),
        }
    }

    pub fn node(id: NodeId, aabb: Aabb) -> Self {
        Self {
            aabb,
            centroid: aabb.centroid(),
            target: BoundTarget::Node(id),
        }
    }
}

/// A tree node: a region plus the bounds inside it.
#[derive(Debug, Clone, Default)]
pub struct Container {
    pub aabb: Aabb,
    /// Axis of the split that produced this container
    pub split_axis: Option<Axis>,
    pub children: Vec<Bound>,
    /// Subdivision `N` when the children form an `N³` voxel grid
    pub voxel_grid: Option<u32>,
}

impl Container {
    pub fn new(aabb: Aabb) -> Self {
        Self {
            aabb,
            ..Default::default()
        }
    }

    pub fn size(&self) -> usize {
        self.children.len()
    }
}

/// Shape summary of a built hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HierarchyStats {
    pub nodes: usize,
    /// Containers holding objects directly
    pub leaves: usize,
    /// Object references across all leaves (duplicates included)
    pub object_refs: usize,
    pub max_depth: usize,
    /// Bounds dropped during partitioning
    pub anomalies: usize,
}

/// An immutable acceleration hierarchy over one scene.
#[derive(Debug)]
pub struct Hierarchy {
    nodes: Vec<Container>,
    root: NodeId,
    strategy: Strategy,
    bvh: bool,
    outlines: Vec<Object>,
    anomalies: usize,
}

impl Hierarchy {
    pub(crate) fn from_parts(
        nodes: Vec<Container>,
        root: NodeId,
        strategy: Strategy,
        bvh: bool,
        outlines: Vec<Object>,
        anomalies: usize,
    ) -> Self {
        Self {
            nodes,
            root,
            strategy,
            bvh,
            outlines,
            anomalies,
        }
    }

    /// A single container holding every non-debug object of the scene.
    pub fn flat(scene: &Scene) -> BuildResult<Self> {
        let mut root = Container::new(scene.bounds());
        root.children.try_reserve(scene.objects.len())?;
        root.children.extend(
            scene
                .objects
                .iter()
                .enumerate()
                .filter(|(_, o)| !o.debug)
                .map(|(id, o)| Bound::object(id, o)),
        );
        let mut nodes = Vec::new();
        nodes.try_reserve(1)?;
        nodes.push(root);
        Ok(Self::from_parts(nodes, 0, Strategy::None, false, Vec::new(), 0))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Container> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Container] {
        &self.nodes
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// True when child boxes are tight-fitted rather than clipped regions.
    pub fn is_bvh(&self) -> bool {
        self.bvh
    }

    /// Wireframe objects outlining each container.
    pub fn outlines(&self) -> &[Object] {
        &self.outlines
    }

    /// Every object reference reachable from the root, in traversal order.
    pub fn leaf_objects(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![BoundTarget::Node(self.root)];
        while let Some(target) = stack.pop() {
            match target {
                BoundTarget::Object(obj) => out.push(obj),
                BoundTarget::Node(id) => {
                    let Some(node) = self.node(id) else { continue };
                    // Reversed so siblings pop in order
                    stack.extend(node.children.iter().rev().map(|b| b.target));
                }
            }
        }
        out
    }

    pub fn stats(&self) -> HierarchyStats {
        let mut stats = HierarchyStats {
            nodes: self.nodes.len(),
            anomalies: self.anomalies,
            ..Default::default()
        };
        let mut stack = vec![(self.root, 1)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            stats.max_depth = stats.max_depth.max(depth);
            let mut holds_objects = false;
            for bound in &node.children {
                match bound.target {
                    BoundTarget::Object(_) => {
                        holds_objects = true;
                        stats.object_refs += 1;
                    }
                    BoundTarget::Node(child) => stack.push((child, depth + 1)),
                }
            }
            if holds_objects {
                stats.leaves += 1;
            }
        }
        stats
    }

    /// Surface area of a container's contents: the sum over its children,
    /// recursing into nested containers.
    pub fn surface_area(&self, scene: &Scene, id: NodeId) -> f32 {
        let Some(node) = self.node(id) else { return 0.0 };
        node.children
            .iter()
            .map(|bound| match bound.target {
                BoundTarget::Object(obj) => scene
                    .objects
                    .get(obj)
                    .map_or(0.0, |o| o.shape.surface_area()),
                BoundTarget::Node(child) => self.surface_area(scene, child),
            })
            .sum()
    }

    /// Human-readable dump of the tree: size, bounds and split axis per node.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let Some(node) = self.node(id) else {
            return writeln!(f, "{:indent$}<missing node {id}>", "");
        };
        let axis = node.split_axis.map_or_else(|| "-".to_string(), |a| a.to_string());
        write!(
            f,
            "{:indent$}node {id} size={} split={axis} bounds=[{:.3}, {:.3}, {:.3}]..[{:.3}, {:.3}, {:.3}]",
            "",
            node.size(),
            node.aabb.min.x,
            node.aabb.min.y,
            node.aabb.min.z,
            node.aabb.max.x,
            node.aabb.max.y,
            node.aabb.max.z,
        )?;
        if let Some(n) = node.voxel_grid {
            write!(f, " grid={n}")?;
        }
        writeln!(f, " {{")?;
        for bound in &node.children {
            match bound.target {
                BoundTarget::Object(obj) => writeln!(f, "{:width$}object {obj}", "", width = indent + 2)?,
                BoundTarget::Node(child) => self.write_node(f, child, indent + 2)?,
            }
        }
        writeln!(f, "{:indent$}}}", "")
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} hierarchy (bvh={})", self.strategy, self.bvh)?;
        self.write_node(f, self.root, 0)
    }
}
