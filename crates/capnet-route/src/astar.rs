//! Interactive A* search: minimum geographic distance under a hard
//! capacity constraint.
//!
//! Cost g is the accumulated great-circle distance from the source;
//! heuristic h is the great-circle distance to the destination, which never
//! overestimates the remaining path length and keeps the search admissible.
//! Residual capacity is a *filter* on edge traversal, never a cost term: an
//! edge with residual below the requested demand simply does not exist for
//! the query.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use capnet_core::{EdgeId, NodeId};
use capnet_ledger::{Ledger, ServicePath};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{RouteError, RouteResult};
use crate::graph::GraphView;

/// A successful route computation.
#[derive(Clone, Debug)]
pub struct RouteOutcome {
    pub path_nodes: Vec<NodeId>,
    pub path_edges: Vec<EdgeId>,
    /// Total great-circle path length in km (g at the destination).
    pub distance_km: f64,
    pub hop_count: usize,
    /// Minimum residual capacity across path edges; infinite for the
    /// trivial zero-hop path.
    pub bottleneck_gbps: f64,
    /// Wall-clock computation time.
    pub elapsed: Duration,
}

impl RouteOutcome {
    /// The path in the form the ledger accepts.
    pub fn path(&self) -> ServicePath {
        ServicePath::new(self.path_nodes.clone(), self.path_edges.clone())
    }
}

/// Capacity-filtered A* over the live ledger state.
pub struct AStarRouter;

impl AStarRouter {
    /// Shortest feasible path from `source` to `destination` for a
    /// `demand_gbps` request.
    ///
    /// `source == destination` yields a zero-hop trivial route.  A missing
    /// node is `NodeNotFound`; a reachable pair with no capacity-feasible
    /// path is `NoRoute` — callers can tell the two apart.
    pub fn compute_route(
        &self,
        ledger: &Ledger,
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
    ) -> RouteResult<RouteOutcome> {
        let started = Instant::now();
        ledger.node(source).map_err(|_| RouteError::NodeNotFound(source))?;
        ledger
            .node(destination)
            .map_err(|_| RouteError::NodeNotFound(destination))?;

        if source == destination {
            return Ok(RouteOutcome {
                path_nodes: vec![source],
                path_edges: vec![],
                distance_km: 0.0,
                hop_count: 0,
                bottleneck_gbps: f64::INFINITY,
                elapsed: started.elapsed(),
            });
        }

        let view = GraphView::snapshot(ledger);
        let residuals = view.residual_map().clone();
        search(&view, &residuals, source, destination, demand_gbps)
            .map(|found| finish(&view, found, started))
            .ok_or(RouteError::NoRoute {
                source,
                destination,
                demand_gbps,
            })
    }

    /// Up to `num_paths` alternative routes, most-direct first.
    ///
    /// After each accepted route, the effective residual of its edges is
    /// scaled by 0.8 per prior use before the next search, steering later
    /// routes onto different edges without ever admitting an edge the real
    /// residuals would reject.
    pub fn find_diverse_routes(
        &self,
        ledger: &Ledger,
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
        num_paths: usize,
    ) -> RouteResult<Vec<RouteOutcome>> {
        ledger.node(source).map_err(|_| RouteError::NodeNotFound(source))?;
        ledger
            .node(destination)
            .map_err(|_| RouteError::NodeNotFound(destination))?;

        let view = GraphView::snapshot(ledger);
        let mut routes = Vec::new();
        let mut uses: FxHashMap<EdgeId, u32> = FxHashMap::default();

        for _ in 0..num_paths {
            let started = Instant::now();
            let mut adjusted = view.residual_map().clone();
            for (&edge, &count) in &uses {
                if let Some(r) = adjusted.get_mut(&edge) {
                    *r *= 0.8f64.powi(count as i32);
                }
            }
            let Some(found) = search(&view, &adjusted, source, destination, demand_gbps)
            else {
                break;
            };
            for &e in &found.edges {
                *uses.entry(e).or_insert(0) += 1;
            }
            routes.push(finish(&view, found, started));
        }
        Ok(routes)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// f64 cost usable as a `BinaryHeap` key.
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

struct Found {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    distance_km: f64,
}

fn search(
    view: &GraphView,
    residuals: &FxHashMap<EdgeId, f64>,
    source: NodeId,
    destination: NodeId,
    demand_gbps: f64,
) -> Option<Found> {
    let dest_pos = view.position(destination)?;
    let source_pos = view.position(source)?;

    let mut g_score: FxHashMap<NodeId, f64> = FxHashMap::default();
    g_score.insert(source, 0.0);
    let mut came_from: FxHashMap<NodeId, (NodeId, EdgeId)> = FxHashMap::default();
    let mut closed: FxHashSet<NodeId> = FxHashSet::default();

    // Min-heap on (f, node); the NodeId key makes pops deterministic among
    // equal f-scores.
    let mut open: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    open.push(Reverse((Cost(source_pos.distance_km(dest_pos)), source)));

    while let Some(Reverse((_, current))) = open.pop() {
        if !closed.insert(current) {
            continue;
        }
        if current == destination {
            return Some(reconstruct(&came_from, source, destination, &g_score));
        }

        let current_pos = view.position(current)?;
        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

        for &(neighbor, edge) in view.neighbors(current) {
            if closed.contains(&neighbor) {
                continue;
            }
            // Capacity constraint: hard filter, not a cost term.
            if residuals.get(&edge).copied().unwrap_or(0.0) < demand_gbps {
                continue;
            }
            let Some(neighbor_pos) = view.position(neighbor) else {
                continue;
            };
            let tentative = current_g + current_pos.distance_km(neighbor_pos);
            if tentative < g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, (current, edge));
                let f = tentative + neighbor_pos.distance_km(dest_pos);
                open.push(Reverse((Cost(f), neighbor)));
            }
        }
    }
    None
}

fn reconstruct(
    came_from: &FxHashMap<NodeId, (NodeId, EdgeId)>,
    source: NodeId,
    destination: NodeId,
    g_score: &FxHashMap<NodeId, f64>,
) -> Found {
    let mut nodes = vec![destination];
    let mut edges = Vec::new();
    let mut current = destination;
    while let Some(&(prev, edge)) = came_from.get(&current) {
        edges.push(edge);
        nodes.push(prev);
        current = prev;
    }
    debug_assert_eq!(current, source);
    nodes.reverse();
    edges.reverse();
    Found {
        nodes,
        edges,
        distance_km: g_score.get(&destination).copied().unwrap_or(0.0),
    }
}

fn finish(view: &GraphView, found: Found, started: Instant) -> RouteOutcome {
    let bottleneck = found
        .edges
        .iter()
        .map(|&e| view.residual(e))
        .fold(f64::INFINITY, f64::min);
    RouteOutcome {
        hop_count: found.edges.len(),
        path_nodes: found.nodes,
        path_edges: found.edges,
        distance_km: found.distance_km,
        bottleneck_gbps: bottleneck,
        elapsed: started.elapsed(),
    }
}
