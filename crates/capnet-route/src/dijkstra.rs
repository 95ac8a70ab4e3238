//! Capacity-aware Dijkstra used by Stage B of the bulk generator.
//!
//! Edge cost is `(r_e / D)^(−p) + noise`: a near-saturated edge (residual
//! close to the demand D) costs much more than a fresh one, so bulk traffic
//! spreads across the topology instead of piling onto the geographically
//! shortest edges.  The uniform noise in [−δ, +δ] breaks cost ties
//! reproducibly under a fixed seed.  Geography plays no role in the cost;
//! callers must recompute real path distance afterwards.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use capnet_core::{EdgeId, NetRng, NodeId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::GraphView;

/// A path found by the capacity-aware search.
#[derive(Clone, Debug)]
pub struct CapacityPath {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

/// f64 cost usable as a heap key.
#[derive(Clone, Copy, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Cheapest capacity-feasible path from `source` to `target` for demand
/// `demand_gbps`, or `None` when the pair is not connected in the threshold
/// graph.  The reachability pre-check runs first so clearly infeasible pairs
/// never pay for a full search.
pub fn capacity_aware_path(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    demand_gbps: f64,
    p_exponent: f64,
    noise_delta: f64,
    rng: &mut NetRng,
) -> Option<CapacityPath> {
    if !view.contains(source) || !view.contains(target) {
        return None;
    }
    if source == target {
        return Some(CapacityPath {
            nodes: vec![source],
            edges: vec![],
        });
    }
    if !view.reachable_under(source, target, demand_gbps) {
        return None;
    }

    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    dist.insert(source, 0.0);
    let mut prev: FxHashMap<NodeId, (NodeId, EdgeId)> = FxHashMap::default();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();

    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), source)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if !visited.insert(node) {
            continue;
        }
        if node == target {
            break;
        }

        for &(neighbor, edge) in view.neighbors(node) {
            if visited.contains(&neighbor) {
                continue;
            }
            let residual = view.residual(edge);
            if residual < demand_gbps {
                continue;
            }
            let normalized = residual / demand_gbps;
            let edge_cost = normalized.powf(-p_exponent) + rng.jitter(noise_delta);
            let new_cost = cost + edge_cost;
            if new_cost < dist.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                dist.insert(neighbor, new_cost);
                prev.insert(neighbor, (node, edge));
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    if !dist.contains_key(&target) || !visited.contains(&target) {
        return None;
    }

    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while let Some(&(parent, edge)) = prev.get(&current) {
        nodes.push(parent);
        edges.push(edge);
        current = parent;
    }
    if current != source {
        return None;
    }
    nodes.reverse();
    edges.reverse();
    Some(CapacityPath { nodes, edges })
}
