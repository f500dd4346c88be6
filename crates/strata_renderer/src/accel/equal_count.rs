//! Equal-count split: the candidate plane that best balances the two sides.

use strata_math::Axis;

use super::partition::classify;
use super::{Split, SplitContext};
use crate::hierarchy::Container;

/// Best candidate found on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub value: f32,
    /// `min(h0, h1) / max(h0, h1)`, 1 for a perfect balance
    pub ratio: f32,
}

/// Element counts on each side of a split at `value`.
fn side_counts(ctx: &SplitContext<'_>, node: &Container, axis: Axis, value: f32) -> (usize, usize) {
    let mut counts = (0, 0);
    for bound in &node.children {
        let side = classify(bound, axis, value, &node.aabb, ctx.bvh);
        if side.left() {
            counts.0 += 1;
        }
        if side.right() {
            counts.1 += 1;
        }
    }
    counts
}

/// Scan every bound's max coordinate along `axis` and keep the most
/// balanced split.
pub(crate) fn best_on_axis(ctx: &SplitContext<'_>, node: &Container, axis: Axis) -> Option<Candidate> {
    let span = node.aabb.axis_interval(axis);
    let mut best: Option<Candidate> = None;

    for bound in &node.children {
        let value = axis.of(bound.aabb.max);
        // Plane splits must cut the region, not extend it
        if !ctx.bvh && !span.surrounds(value) {
            continue;
        }
        let (h0, h1) = side_counts(ctx, node, axis, value);
        let (lo, hi) = (h0.min(h1), h0.max(h1));
        let ratio = if hi == 0 { 0.0 } else { lo as f32 / hi as f32 };
        if best.map_or(true, |b| ratio > b.ratio) {
            best = Some(Candidate { value, ratio });
        }
    }
    best
}

/// Pick the most balanced split across axes.
///
/// The axis split last time only wins when it is strictly more balanced
/// than every other axis.
pub(crate) fn choose_split(
    ctx: &SplitContext<'_>,
    node: &Container,
    last_axis: Option<Axis>,
) -> Option<Split> {
    if node.size() <= 1 {
        return None;
    }

    let mut best: Option<(Axis, Candidate)> = None;
    let mut repeat: Option<Candidate> = None;
    for axis in Axis::ALL {
        let Some(candidate) = best_on_axis(ctx, node, axis) else {
            continue;
        };
        if Some(axis) == last_axis {
            repeat = Some(candidate);
        } else if best.map_or(true, |(_, b)| candidate.ratio > b.ratio) {
            best = Some((axis, candidate));
        }
    }

    if let (Some(axis), Some(candidate)) = (last_axis, repeat) {
        if best.map_or(true, |(_, b)| candidate.ratio > b.ratio) {
            best = Some((axis, candidate));
        }
    }

    best.map(|(axis, c)| Split { axis, value: c.value })
}
