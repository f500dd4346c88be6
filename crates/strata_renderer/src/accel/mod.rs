//! Acceleration hierarchy construction.
//!
//! The builder partitions the flat scene into a tree of containers using one
//! of several interchangeable split strategies:
//!
//! - **EqualCount**: the split that balances element counts best
//! - **Sah**: surface area heuristic, axes evaluated in parallel
//! - **FixedThreshold**: midpoint "bi-tree", axis cycling X -> Y -> Z
//! - **Octree**: 8-way split at the midpoint
//! - **VoxelGrid**: a single uniform `N³` grid walked with a 3D-DDA
//!
//! Construction never mutates an existing hierarchy; callers publish the new
//! tree by swapping it in (see [`crate::World`]).

mod bitree;
mod equal_count;
mod octree;
mod outline;
pub mod partition;
pub mod sah;
mod voxel;

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use strata_core::{Object, Scene};
use strata_math::{Aabb, Axis};

use crate::error::{BuildError, BuildResult};
use crate::hierarchy::{Bound, BoundTarget, Container, Hierarchy, NodeId};
use partition::{classify, Side};

pub(crate) use voxel::GridWalk;

/// Largest accepted voxel grid subdivision.
pub const MAX_VOXEL_SUBDIVISION: u32 = 64;

/// Which split policy to build with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Leave the scene flat
    None,
    EqualCount,
    #[default]
    Sah,
    FixedThreshold,
    Octree,
    VoxelGrid,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::None => "none",
            Strategy::EqualCount => "equal-count",
            Strategy::Sah => "sah",
            Strategy::FixedThreshold => "fixed-threshold",
            Strategy::Octree => "octree",
            Strategy::VoxelGrid => "voxel-grid",
        };
        f.write_str(name)
    }
}

/// Hierarchy build settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelConfig {
    pub strategy: Strategy,
    /// Centroid-split BVH (tight child boxes) instead of plane splits.
    /// Only EqualCount and SAH honour it.
    pub bvh: bool,
    pub depth_limit: u32,
    /// Max items per leaf (FixedThreshold, Octree) or grid subdivision (VoxelGrid)
    pub param: u32,
    /// SAH cost of a triangle test relative to a sphere test
    pub cost_ratio: f32,
    /// Generate wireframe outlines of every container
    pub outlines: bool,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Sah,
            bvh: true,
            depth_limit: 32,
            param: 2,
            cost_ratio: 1.5,
            outlines: false,
        }
    }
}

impl AccelConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> BuildResult<()> {
        if !self.cost_ratio.is_finite() || self.cost_ratio <= 0.0 {
            return Err(BuildError::InvalidParameter(format!(
                "cost ratio must be finite and positive, got {}",
                self.cost_ratio
            )));
        }
        if self.strategy == Strategy::VoxelGrid
            && !(1..=MAX_VOXEL_SUBDIVISION).contains(&self.param)
        {
            return Err(BuildError::InvalidParameter(format!(
                "voxel subdivision must lie within 1..={MAX_VOXEL_SUBDIVISION}, got {}",
                self.param
            )));
        }
        Ok(())
    }

    /// Whether children get tight boxes and centroid side tests.
    pub fn uses_bvh(&self) -> bool {
        self.bvh && matches!(self.strategy, Strategy::EqualCount | Strategy::Sah)
    }
}

/// A split plane chosen by a binary strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Split {
    pub axis: Axis,
    pub value: f32,
}

/// Read-only inputs shared by the split strategies.
pub(crate) struct SplitContext<'a> {
    pub objects: &'a [Object],
    pub config: &'a AccelConfig,
    pub bvh: bool,
}

/// Build a hierarchy over `scene`.
pub fn build_hierarchy(scene: &Scene, config: &AccelConfig) -> BuildResult<Hierarchy> {
    config.validate()?;
    let start = Instant::now();

    let mut builder = Builder::new(scene, config);
    let root_node = builder.root_container()?;

    let built = if root_node.size() == 0 {
        None
    } else {
        match config.strategy {
            Strategy::None => None,
            Strategy::Octree => builder.build_octree(&root_node, 0)?,
            Strategy::VoxelGrid => Some(builder.build_grid(&root_node)?),
            Strategy::EqualCount | Strategy::Sah | Strategy::FixedThreshold => {
                builder.build_binary(&root_node, 0, None)?
            }
        }
    };
    let root = match built {
        Some(id) => id,
        None => builder.push(root_node)?,
    };

    let outlines = if config.outlines {
        builder.outlines(root)?
    } else {
        Vec::new()
    };

    let hierarchy = Hierarchy::from_parts(
        builder.nodes,
        root,
        config.strategy,
        builder.bvh,
        outlines,
        builder.anomalies,
    );

    let stats = hierarchy.stats();
    log::info!(
        "Built {} hierarchy over {} objects: {} nodes, {} leaves, depth {} in {:.2?}",
        config.strategy,
        scene.object_count(),
        stats.nodes,
        stats.leaves,
        stats.max_depth,
        start.elapsed()
    );
    if stats.anomalies > 0 {
        log::warn!("{} bounds were dropped during partitioning", stats.anomalies);
    }

    Ok(hierarchy)
}

/// Working state for one build.
pub(crate) struct Builder<'s> {
    scene: &'s Scene,
    config: &'s AccelConfig,
    bvh: bool,
    nodes: Vec<Container>,
    anomalies: usize,
}

impl<'s> Builder<'s> {
    fn new(scene: &'s Scene, config: &'s AccelConfig) -> Self {
        Self {
            scene,
            config,
            bvh: config.uses_bvh(),
            nodes: Vec::new(),
            anomalies: 0,
        }
    }

    fn ctx(&self) -> SplitContext<'s> {
        SplitContext {
            objects: &self.scene.objects,
            config: self.config,
            bvh: self.bvh,
        }
    }

    /// The unpartitioned scene as a single container.
    fn root_container(&self) -> BuildResult<Container> {
        let mut root = Container::new(self.scene.bounds());
        root.children.try_reserve(self.scene.objects.len())?;
        for (id, object) in self.scene.objects.iter().enumerate() {
            if !object.debug {
                root.children.push(Bound::object(id, object));
            }
        }
        Ok(root)
    }

    /// Move a finished container into the arena.
    pub(crate) fn push(&mut self, node: Container) -> BuildResult<NodeId> {
        self.nodes.try_reserve(1)?;
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    /// True when the bound's object fully contains `region`.
    pub(crate) fn envelops(&self, bound: &Bound, region: &Aabb) -> bool {
        match bound.target {
            BoundTarget::Object(id) => self
                .scene
                .objects
                .get(id)
                .is_some_and(|o| o.shape.envelops(region)),
            BoundTarget::Node(_) => false,
        }
    }

    pub(crate) fn anomaly(&mut self, bound: &Bound, what: &str) {
        self.anomalies += 1;
        log::warn!(
            "Bound {:?} [{:?}..{:?}] matched no side of {what}; dropping it",
            bound.target,
            bound.aabb.min,
            bound.aabb.max
        );
    }

    /// Recursive two-way split. Returns `None` when `node` should stay a leaf.
    fn build_binary(
        &mut self,
        node: &Container,
        depth: u32,
        last_axis: Option<Axis>,
    ) -> BuildResult<Option<NodeId>> {
        if depth >= self.config.depth_limit {
            return Ok(None);
        }
        let ctx = self.ctx();
        let split = match self.config.strategy {
            Strategy::EqualCount => equal_count::choose_split(&ctx, node, last_axis),
            Strategy::Sah => sah::choose_split(&ctx, node),
            Strategy::FixedThreshold => bitree::choose_split(&ctx, node, last_axis),
            Strategy::None | Strategy::Octree | Strategy::VoxelGrid => None,
        };
        let Some(split) = split else {
            return Ok(None);
        };

        let sides = self.partition(node, split)?;
        if sides.iter().all(|s| s.is_empty() || s.len() >= node.size()) {
            log::debug!(
                "Split at {}={} separates nothing ({} items); keeping leaf",
                split.axis,
                split.value,
                node.size()
            );
            return Ok(None);
        }

        let mut out = Container {
            aabb: node.aabb,
            split_axis: node.split_axis,
            children: Vec::new(),
            voxel_grid: None,
        };
        out.children.try_reserve(2)?;

        for (side, members) in sides.into_iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let aabb = if self.bvh {
                tight_bounds(&members)
            } else {
                node.aabb.clipped(split.axis, split.value, side)
            };
            let child = Container {
                aabb,
                split_axis: Some(split.axis),
                children: members,
                voxel_grid: None,
            };
            let id = match self.build_binary(&child, depth + 1, Some(split.axis))? {
                Some(id) => id,
                None => self.push(child)?,
            };
            out.children.push(Bound::node(id, aabb));
        }

        Ok(Some(self.push(out)?))
    }

    /// Distribute the node's bounds between the two halves of `split`.
    fn partition(&mut self, node: &Container, split: Split) -> BuildResult<[Vec<Bound>; 2]> {
        let mut sides = [Vec::new(), Vec::new()];
        for side in &mut sides {
            side.try_reserve(node.size())?;
        }
        // Bi-tree halves are regions, so a shape enclosing a whole half
        // contributes no surface to it
        let cull = self.config.strategy == Strategy::FixedThreshold;
        let regions = [0, 1].map(|i| node.aabb.clipped(split.axis, split.value, i));

        for bound in &node.children {
            let side = classify(bound, split.axis, split.value, &node.aabb, self.bvh);
            if side == Side::Neither {
                self.anomaly(bound, "split");
                continue;
            }
            let wanted = [side.left(), side.right()];
            for i in 0..2 {
                if wanted[i] && !(cull && self.envelops(bound, &regions[i])) {
                    sides[i].push(*bound);
                }
            }
        }
        Ok(sides)
    }
}

/// Union of the bounds' boxes.
pub(crate) fn tight_bounds(bounds: &[Bound]) -> Aabb {
    bounds.iter().fold(Aabb::EMPTY, |mut acc, b| {
        acc.grow(&b.aabb);
        acc
    })
}
