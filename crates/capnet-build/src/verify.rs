//! Mandatory post-build checks: full connectivity by breadth-first search
//! and per-node capacity budgets.  A failure here is fatal; the caller must
//! not hand the topology to the ledger.

use std::collections::VecDeque;

use capnet_core::NodeId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builder::PlannedEdge;
use crate::error::{BuildError, BuildResult};

/// Budget statistics from a passing verification.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VerifySummary {
    pub min_remaining_gbps: f64,
    pub max_remaining_gbps: f64,
}

/// Check that (1) every node is reachable from the first one and (2) the
/// total edge weight incident on each node stays within its capacity
/// (beyond `tolerance`).  Returns the first failure found.
pub(crate) fn verify_topology(
    capacities: &FxHashMap<NodeId, f64>,
    edges: &[PlannedEdge],
    tolerance: f64,
) -> BuildResult<VerifySummary> {
    let total = capacities.len();

    // Connectivity: BFS over an adjacency map built from the planned edges.
    let mut adjacency: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for e in edges {
        adjacency.entry(e.a).or_default().push(e.b);
        adjacency.entry(e.b).or_default().push(e.a);
    }
    // Deterministic start: lowest node id.
    let start = capacities.keys().copied().min();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    if let Some(start) = start {
        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(current) = queue.pop_front() {
            for &neighbor in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
    }
    if visited.len() != total {
        return Err(BuildError::Disconnected {
            reached: visited.len(),
            total,
        });
    }

    // Budgets: incident weight per node must not exceed capacity.
    let mut used: FxHashMap<NodeId, f64> = FxHashMap::default();
    for e in edges {
        *used.entry(e.a).or_insert(0.0) += e.weight_gbps;
        *used.entry(e.b).or_insert(0.0) += e.weight_gbps;
    }
    let mut min_remaining = f64::INFINITY;
    let mut max_remaining = f64::NEG_INFINITY;
    for (&node, &capacity) in capacities {
        let spent = used.get(&node).copied().unwrap_or(0.0);
        let remaining = capacity - spent;
        if remaining < -tolerance {
            return Err(BuildError::BudgetExceeded {
                node,
                capacity,
                used: spent,
            });
        }
        min_remaining = min_remaining.min(remaining);
        max_remaining = max_remaining.max(remaining);
    }

    Ok(VerifySummary {
        min_remaining_gbps: min_remaining,
        max_remaining_gbps: max_remaining,
    })
}
