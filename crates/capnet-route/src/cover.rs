//! Edge cover of the threshold graph, for Stage A of the bulk generator.
//!
//! An edge cover is a set of edges touching every node; the classic
//! construction is a maximum matching plus one incident edge per unmatched
//! node.  The matcher here is greedy with single augmenting-path passes —
//! not a full Blossom implementation, which is overkill at the tens-of-nodes
//! scale this engine targets — and any maximal matching still yields a valid
//! (if not always minimum) cover.

use capnet_core::{EdgeId, NodeId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{RouteError, RouteResult};
use crate::graph::GraphView;

/// One covering edge: its endpoints and the underlying ledger edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub edge: EdgeId,
}

/// Compute an edge cover of the threshold graph G_D (edges with residual
/// ≥ `demand_gbps`).
///
/// Fails with [`RouteError::IsolatedNodes`] if any node has no feasible
/// incident edge — no cover exists then.
pub fn edge_cover(view: &GraphView, demand_gbps: f64) -> RouteResult<Vec<CoverEdge>> {
    let isolated = view.isolated_under(demand_gbps);
    if !isolated.is_empty() {
        return Err(RouteError::IsolatedNodes {
            count: isolated.len(),
        });
    }

    let mate = maximum_matching(view, demand_gbps);

    // Matching edges first (deduplicated by canonical orientation).
    let mut cover: Vec<CoverEdge> = Vec::new();
    let mut covered: FxHashSet<NodeId> = FxHashSet::default();
    for (&u, &(v, edge)) in mate.iter() {
        if u < v {
            cover.push(CoverEdge { a: u, b: v, edge });
            covered.insert(u);
            covered.insert(v);
        }
    }
    // Map iteration order is arbitrary; keep the cover (and everything
    // derived from it, like service numbering) deterministic.
    cover.sort_by_key(|c| (c.a, c.b));

    // Every unmatched node gets one arbitrary (first, deterministic)
    // feasible incident edge.
    for &node in view.node_ids() {
        if covered.contains(&node) {
            continue;
        }
        if let Some((neighbor, edge)) = view.neighbors_under(node, demand_gbps).next() {
            cover.push(CoverEdge {
                a: node,
                b: neighbor,
                edge,
            });
            covered.insert(node);
            covered.insert(neighbor);
        }
    }

    Ok(cover)
}

/// Greedy maximal matching on G_D improved by augmenting-path passes.
///
/// Returns `mate`: for each matched node, its partner and the matched edge.
fn maximum_matching(view: &GraphView, demand_gbps: f64) -> FxHashMap<NodeId, (NodeId, EdgeId)> {
    let mut mate: FxHashMap<NodeId, (NodeId, EdgeId)> = FxHashMap::default();

    // Greedy pass in ascending node order.
    for &u in view.node_ids() {
        if mate.contains_key(&u) {
            continue;
        }
        if let Some((v, edge)) = view
            .neighbors_under(u, demand_gbps)
            .find(|(v, _)| !mate.contains_key(v))
        {
            mate.insert(u, (v, edge));
            mate.insert(v, (u, edge));
        }
    }

    // Augmenting passes: for each still-free node, look for an alternating
    // path free → matched → free and flip it.
    let mut improved = true;
    while improved {
        improved = false;
        for &u in view.node_ids() {
            if mate.contains_key(&u) {
                continue;
            }
            if augment_from(view, demand_gbps, u, &mut mate) {
                improved = true;
            }
        }
    }

    mate
}

/// One-level augmenting search from free node `u`: find a neighbor `v`
/// whose mate `w` can be re-matched elsewhere, then flip the path
/// u–v / v–w / w–x into u–v matched + w–x matched.
fn augment_from(
    view: &GraphView,
    demand_gbps: f64,
    u: NodeId,
    mate: &mut FxHashMap<NodeId, (NodeId, EdgeId)>,
) -> bool {
    let u_neighbors: Vec<(NodeId, EdgeId)> = view.neighbors_under(u, demand_gbps).collect();
    for &(v, uv_edge) in &u_neighbors {
        let Some(&(w, _)) = mate.get(&v) else {
            // v became free since the greedy pass; match directly.
            mate.insert(u, (v, uv_edge));
            mate.insert(v, (u, uv_edge));
            return true;
        };
        // Try to re-home w onto one of its own free neighbors.
        let rehome = view
            .neighbors_under(w, demand_gbps)
            .find(|&(x, _)| x != v && x != u && !mate.contains_key(&x));
        if let Some((x, wx_edge)) = rehome {
            mate.insert(u, (v, uv_edge));
            mate.insert(v, (u, uv_edge));
            mate.insert(w, (x, wx_edge));
            mate.insert(x, (w, wx_edge));
            return true;
        }
    }
    false
}
