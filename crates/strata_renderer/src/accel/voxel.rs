//! Uniform voxel grid and the 3D-DDA walk used to traverse it.

use strata_math::{Aabb, Axis, Ray, Vec3};

use super::Builder;
use crate::error::BuildResult;
use crate::hierarchy::{Bound, Container, NodeId};

impl Builder<'_> {
    /// Replace `node` with an `N³` grid of cells, `N = param`.
    ///
    /// Cells are stored in `x + N(y + Nz)` order. Every bound goes into every
    /// cell it touches; empty cells are kept so the index stays addressable.
    pub(super) fn build_grid(&mut self, node: &Container) -> BuildResult<NodeId> {
        let n = self.config.param;
        let cell = node.aabb.size() / n as f32;
        log::debug!("Voxel grid {n}^3, cell size {cell:?}");

        let total = (n as usize).pow(3);
        let mut out = Container {
            aabb: node.aabb,
            split_axis: None,
            children: Vec::new(),
            voxel_grid: Some(n),
        };
        out.children.try_reserve(total)?;
        let mut placed = vec![false; node.size()];

        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let min = node.aabb.min + cell * Vec3::new(x as f32, y as f32, z as f32);
                    let region = Aabb::new(min, min + cell);

                    let mut members = Vec::new();
                    for (i, bound) in node.children.iter().enumerate() {
                        if bound.aabb.overlaps(&region) {
                            members.try_reserve(1)?;
                            members.push(*bound);
                            placed[i] = true;
                        }
                    }
                    let id = self.push(Container {
                        aabb: region,
                        split_axis: None,
                        children: members,
                        voxel_grid: None,
                    })?;
                    out.children.push(Bound::node(id, region));
                }
            }
        }

        for (bound, placed) in node.children.iter().zip(placed) {
            if !placed {
                self.anomaly(bound, "voxel grid");
            }
        }
        self.push(out)
    }
}

/// Front-to-back walk over the cells of an `N³` grid pierced by a ray.
///
/// Yields `(cell index, t at which the ray leaves the cell)`.
#[derive(Debug, Clone)]
pub(crate) struct GridWalk {
    n: i64,
    cell: [i64; 3],
    step: [i64; 3],
    t_max: [f32; 3],
    t_delta: [f32; 3],
    done: bool,
}

impl GridWalk {
    /// Start walking `aabb` split into `n` cells per axis. `None` when the
    /// ray misses the grid.
    pub(crate) fn new(aabb: &Aabb, n: u32, ray: &Ray) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let t_entry = aabb.slab(ray)?.max(0.0);
        let p = ray.at(t_entry);
        let n = i64::from(n);
        let cell_size = aabb.size() / n as f32;

        let mut walk = GridWalk {
            n,
            cell: [0; 3],
            step: [0; 3],
            t_max: [f32::INFINITY; 3],
            t_delta: [f32::INFINITY; 3],
            done: false,
        };

        for axis in Axis::ALL {
            let i = axis.index();
            let size = axis.of(cell_size);
            let lo = axis.of(aabb.min);
            let idx = if size > 0.0 {
                // The far face of the grid lands exactly on `n`
                (((axis.of(p) - lo) / size).floor() as i64).clamp(0, n - 1)
            } else {
                0
            };
            walk.cell[i] = idx;

            let origin = axis.of(ray.origin);
            let dir = axis.of(ray.direction);
            if dir > 0.0 {
                walk.step[i] = 1;
                walk.t_max[i] = (lo + (idx + 1) as f32 * size - origin) / dir;
                walk.t_delta[i] = size / dir;
            } else if dir < 0.0 {
                walk.step[i] = -1;
                walk.t_max[i] = (lo + idx as f32 * size - origin) / dir;
                walk.t_delta[i] = -size / dir;
            }
        }
        Some(walk)
    }
}

impl Iterator for GridWalk {
    type Item = (usize, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let [x, y, z] = self.cell;
        let index = (x + self.n * (y + self.n * z)) as usize;

        let mut axis = 0;
        for i in 1..3 {
            if self.t_max[i] < self.t_max[axis] {
                axis = i;
            }
        }
        let t_exit = self.t_max[axis];

        if self.step[axis] == 0 {
            self.done = true;
        } else {
            self.cell[axis] += self.step[axis];
            self.t_max[axis] += self.t_delta[axis];
            if !(0..self.n).contains(&self.cell[axis]) {
                self.done = true;
            }
        }
        Some((index, t_exit))
    }
}
