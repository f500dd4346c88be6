//! Octree: 8-way subdivision at the node's midpoint.

use super::partition::{in_octant, octant_flags};
use super::Builder;
use crate::error::BuildResult;
use crate::hierarchy::{Bound, Container, NodeId};

impl Builder<'_> {
    /// Recursive octree build. Returns `None` when `node` should stay a leaf.
    pub(super) fn build_octree(&mut self, node: &Container, depth: u32) -> BuildResult<Option<NodeId>> {
        let max_per_voxel = self.config.param;
        if depth >= self.config.depth_limit
            || max_per_voxel < 1
            || node.size() <= max_per_voxel as usize
        {
            return Ok(None);
        }

        let mid = node.aabb.centroid();
        let regions: [_; 8] = std::array::from_fn(|i| node.aabb.octant(i));
        let mut octants: [Vec<Bound>; 8] = Default::default();

        for bound in &node.children {
            let flags = octant_flags(&bound.aabb, mid);
            let mut placed = false;
            for (i, region) in regions.iter().enumerate() {
                if !in_octant(&flags, i) {
                    continue;
                }
                placed = true;
                if !self.envelops(bound, region) {
                    octants[i].try_reserve(1)?;
                    octants[i].push(*bound);
                }
            }
            if !placed {
                self.anomaly(bound, "octree split");
            }
        }

        if octants
            .iter()
            .all(|o| o.is_empty() || o.len() >= node.size())
        {
            log::debug!("Octree split separates nothing ({} items); keeping leaf", node.size());
            return Ok(None);
        }

        let mut out = Container::new(node.aabb);
        out.children.try_reserve(8)?;
        for (members, region) in octants.into_iter().zip(regions) {
            if members.is_empty() {
                continue;
            }
            let child = Container {
                aabb: region,
                split_axis: None,
                children: members,
                voxel_grid: None,
            };
            let id = match self.build_octree(&child, depth + 1)? {
                Some(id) => id,
                None => self.push(child)?,
            };
            out.children.push(Bound::node(id, region));
        }
        Ok(Some(self.push(out)?))
    }
}
