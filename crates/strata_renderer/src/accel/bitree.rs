//! Fixed-threshold "bi-tree": midpoint splits with the axis cycling X, Y, Z.

use strata_math::Axis;

use super::{Split, SplitContext};
use crate::hierarchy::Container;

pub(crate) fn choose_split(
    ctx: &SplitContext<'_>,
    node: &Container,
    last_axis: Option<Axis>,
) -> Option<Split> {
    let max_per_leaf = ctx.config.param;
    if max_per_leaf < 1 || node.size() <= max_per_leaf as usize {
        return None;
    }
    let axis = last_axis.map_or(Axis::X, Axis::next);
    Some(Split {
        axis,
        value: node.aabb.midpoint(axis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::AccelConfig;
    use strata_math::{Aabb, Vec3};

    fn node(size: usize) -> Container {
        let mut node = Container::new(Aabb::new(Vec3::ZERO, Vec3::new(4.0, 2.0, 8.0)));
        node.children = (0..size)
            .map(|i| crate::hierarchy::Bound::node(i, Aabb::new(Vec3::ZERO, Vec3::ONE)))
            .collect();
        node
    }

    #[test]
    fn test_midpoint_and_axis_cycle() {
        let config = AccelConfig::default();
        let ctx = SplitContext {
            objects: &[],
            config: &config,
            bvh: false,
        };

        let first = choose_split(&ctx, &node(5), None).unwrap();
        assert_eq!(first, Split { axis: Axis::X, value: 2.0 });

        let after_z = choose_split(&ctx, &node(5), Some(Axis::Z)).unwrap();
        assert_eq!(after_z.axis, Axis::X);

        let after_x = choose_split(&ctx, &node(5), Some(Axis::X)).unwrap();
        assert_eq!(after_x, Split { axis: Axis::Y, value: 1.0 });
    }

    #[test]
    fn test_stop_conditions() {
        let config = AccelConfig::default();
        let ctx = SplitContext {
            objects: &[],
            config: &config,
            bvh: false,
        };
        assert!(choose_split(&ctx, &node(2), None).is_none());

        let zero = AccelConfig {
            param: 0,
            ..AccelConfig::default()
        };
        let ctx = SplitContext {
            objects: &[],
            config: &zero,
            bvh: false,
        };
        assert!(choose_split(&ctx, &node(50), None).is_none());
    }
}
