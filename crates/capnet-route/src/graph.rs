//! Snapshot of the ledger as an adjacency structure with live residuals.
//!
//! Routers never walk ledger registries directly; they take a [`GraphView`]
//! once per query (or per generation run) and read adjacency + residuals
//! from it.  During bulk generation the view is kept in sync incrementally
//! via [`GraphView::apply_demand`] instead of re-snapshotting after every
//! accepted service.

use std::collections::VecDeque;

use capnet_core::{EdgeId, GeoPoint, NodeId};
use capnet_ledger::Ledger;
use rustc_hash::{FxHashMap, FxHashSet};

/// Adjacency + residual-capacity view over a ledger at one point in time.
pub struct GraphView {
    /// node → list of (neighbor, connecting edge), neighbor order
    /// deterministic (sorted by edge id).
    adjacency: FxHashMap<NodeId, Vec<(NodeId, EdgeId)>>,
    residuals: FxHashMap<EdgeId, f64>,
    positions: FxHashMap<NodeId, GeoPoint>,
    /// All node ids, ascending.
    node_ids: Vec<NodeId>,
}

impl GraphView {
    pub fn snapshot(ledger: &Ledger) -> Self {
        let mut adjacency: FxHashMap<NodeId, Vec<(NodeId, EdgeId)>> = FxHashMap::default();
        let mut node_ids: Vec<NodeId> = ledger.nodes().map(|n| n.id).collect();
        node_ids.sort_unstable();
        for &id in &node_ids {
            adjacency.insert(id, Vec::new());
        }

        let mut edges: Vec<_> = ledger.edges().collect();
        edges.sort_by_key(|e| e.id);
        for e in edges {
            adjacency.entry(e.node_a).or_default().push((e.node_b, e.id));
            adjacency.entry(e.node_b).or_default().push((e.node_a, e.id));
        }

        GraphView {
            adjacency,
            residuals: ledger.residual_capacities(),
            positions: ledger.nodes().map(|n| (n.id, n.position)).collect(),
            node_ids,
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, EdgeId)] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn residual(&self, edge: EdgeId) -> f64 {
        self.residuals.get(&edge).copied().unwrap_or(0.0)
    }

    /// The full residual map, for searches that need to run against a
    /// locally adjusted copy (e.g. diversity penalties).
    pub fn residual_map(&self) -> &FxHashMap<EdgeId, f64> {
        &self.residuals
    }

    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.positions.get(&node).copied()
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Spend `demand_gbps` of residual on each listed edge, flooring at
    /// zero.  Keeps a long-lived view consistent with ledger inserts made
    /// from its own results.
    pub fn apply_demand(&mut self, edges: &[EdgeId], demand_gbps: f64) {
        for e in edges {
            if let Some(r) = self.residuals.get_mut(e) {
                *r = (*r - demand_gbps).max(0.0);
            }
        }
    }

    /// BFS reachability on the threshold graph G_D (edges with residual
    /// ≥ `demand_gbps` only).  Cheap pre-check that lets the bulk generator
    /// reject infeasible endpoint pairs without a full search.
    pub fn reachable_under(&self, source: NodeId, target: NodeId, demand_gbps: f64) -> bool {
        if source == target {
            return true;
        }
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        visited.insert(source);
        let mut queue = VecDeque::from([source]);
        while let Some(current) = queue.pop_front() {
            for &(neighbor, edge) in self.neighbors(current) {
                if visited.contains(&neighbor) || self.residual(edge) < demand_gbps {
                    continue;
                }
                if neighbor == target {
                    return true;
                }
                visited.insert(neighbor);
                queue.push_back(neighbor);
            }
        }
        false
    }

    /// Nodes with no incident edge of residual ≥ `demand_gbps` — the nodes
    /// that make an edge cover of G_D impossible.
    pub fn isolated_under(&self, demand_gbps: f64) -> Vec<NodeId> {
        self.node_ids
            .iter()
            .copied()
            .filter(|&n| {
                !self
                    .neighbors(n)
                    .iter()
                    .any(|&(_, e)| self.residual(e) >= demand_gbps)
            })
            .collect()
    }

    /// Threshold-graph adjacency for one node: neighbors reachable over an
    /// edge with residual ≥ `demand_gbps`.
    pub fn neighbors_under(
        &self,
        node: NodeId,
        demand_gbps: f64,
    ) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.neighbors(node)
            .iter()
            .copied()
            .filter(move |&(_, e)| self.residual(e) >= demand_gbps)
    }
}
