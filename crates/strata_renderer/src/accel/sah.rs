//! Surface area heuristic.
//!
//! `cost = C_traverse + SA(left)·W(left) + SA(right)·W(right)` where `W` sums
//! the per-shape intersection weights (triangles weigh `cost_ratio`, spheres
//! and cuboids weigh 1). The three axes are scanned in parallel on the rayon
//! pool and joined before the global minimum is taken.

use rayon::prelude::*;
use strata_core::{Object, ShapeKind};
use strata_math::{Aabb, Axis};

use super::partition::classify;
use super::{Split, SplitContext};
use crate::hierarchy::{Bound, BoundTarget, Container};

/// Fixed cost of visiting one more level of the tree.
pub const TRAVERSAL_COST: f32 = 1.0;

/// The cheapest split found on some axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SahCandidate {
    pub axis: Axis,
    pub value: f32,
    pub cost: f32,
}

/// Outcome of scanning a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SahEvaluation {
    pub best: Option<SahCandidate>,
    /// Cost of leaving the node as a leaf
    pub no_split_cost: f32,
}

impl SahEvaluation {
    /// True when splitting is strictly cheaper than not splitting.
    pub fn should_split(&self) -> bool {
        self.best.is_some_and(|b| b.cost < self.no_split_cost)
    }
}

fn weight(objects: &[Object], bound: &Bound, cost_ratio: f32) -> f32 {
    match bound.target {
        BoundTarget::Object(id) => match objects.get(id).map(|o| o.shape.kind()) {
            Some(ShapeKind::Triangle) => cost_ratio,
            _ => 1.0,
        },
        BoundTarget::Node(_) => 1.0,
    }
}

/// Bounds and summed weight of one side of a candidate split.
#[derive(Clone, Copy)]
struct Tally {
    aabb: Aabb,
    weight: f32,
}

impl Tally {
    const EMPTY: Tally = Tally {
        aabb: Aabb::EMPTY,
        weight: 0.0,
    };

    fn add(&mut self, bound: &Bound, weight: f32) {
        self.aabb.grow(&bound.aabb);
        self.weight += weight;
    }

    fn cost(&self) -> f32 {
        // An empty side has zero area
        self.aabb.surface_area() * self.weight
    }
}

fn best_on_axis(ctx: &SplitContext<'_>, node: &Container, axis: Axis) -> Option<SahCandidate> {
    let ratio = ctx.config.cost_ratio;
    let span = node.aabb.axis_interval(axis);
    let mut best: Option<SahCandidate> = None;

    for pivot in &node.children {
        let value = if ctx.bvh {
            axis.of(pivot.centroid)
        } else {
            axis.of(pivot.aabb.max)
        };
        if !ctx.bvh && !span.surrounds(value) {
            continue;
        }

        let mut sides = [Tally::EMPTY; 2];
        for bound in &node.children {
            let side = classify(bound, axis, value, &node.aabb, ctx.bvh);
            let w = weight(ctx.objects, bound, ratio);
            if side.left() {
                sides[0].add(bound, w);
            }
            if side.right() {
                sides[1].add(bound, w);
            }
        }

        let cost = TRAVERSAL_COST + sides[0].cost() + sides[1].cost();
        if best.map_or(true, |b| cost < b.cost) {
            best = Some(SahCandidate { axis, value, cost });
        }
    }
    best
}

/// Scan all three axes (concurrently) and compare against not splitting.
pub(crate) fn evaluate(ctx: &SplitContext<'_>, node: &Container) -> SahEvaluation {
    let per_axis: Vec<Option<SahCandidate>> = Axis::ALL
        .par_iter()
        .map(|&axis| best_on_axis(ctx, node, axis))
        .collect();

    let best = per_axis
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<SahCandidate>, c| match acc {
            Some(b) if b.cost <= c.cost => Some(b),
            _ => Some(c),
        });

    let total_weight: f32 = node
        .children
        .iter()
        .map(|b| weight(ctx.objects, b, ctx.config.cost_ratio))
        .sum();
    let no_split_cost = node.aabb.surface_area() * total_weight;

    SahEvaluation {
        best,
        no_split_cost,
    }
}

pub(crate) fn choose_split(ctx: &SplitContext<'_>, node: &Container) -> Option<Split> {
    if node.size() <= 1 {
        return None;
    }
    let eval = evaluate(ctx, node);
    match eval.best {
        Some(best) if eval.should_split() => Some(Split {
            axis: best.axis,
            value: best.value,
        }),
        _ => {
            log::debug!(
                "SAH keeps {} items as a leaf (best {:?}, no-split {})",
                node.size(),
                eval.best.map(|b| b.cost),
                eval.no_split_cost
            );
            None
        }
    }
}
