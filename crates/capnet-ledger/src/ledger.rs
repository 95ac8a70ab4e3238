//! The [`Ledger`]: entity registries, invariant-preserving mutation, and
//! residual-capacity queries.

use capnet_core::{EdgeId, GeoPoint, NodeId, ServiceId};
use rustc_hash::FxHashMap;

use crate::entity::{CapacityViolation, Edge, EdgeUtilization, EdgeView, Node, NodeView, Service};
use crate::error::{LedgerError, LedgerResult};

/// Floating-point tolerance when comparing accumulated demand against edge
/// capacity.
pub const CAPACITY_TOLERANCE: f64 = 1e-6;

/// Aggregate entity counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerStats {
    pub nodes: usize,
    pub edges: usize,
    pub services: usize,
}

/// The authoritative store of nodes, edges, services, and per-edge
/// utilization.
///
/// All mutating operations validate their inputs before touching any state,
/// so a returned error guarantees the ledger is unchanged.  Ids are
/// allocated monotonically and never reused.
#[derive(Default)]
pub struct Ledger {
    nodes: FxHashMap<NodeId, Node>,
    edges: FxHashMap<EdgeId, Edge>,
    services: FxHashMap<ServiceId, Service>,
    utilization: FxHashMap<EdgeId, EdgeUtilization>,

    /// Unique-name index: node name → id.
    name_index: FxHashMap<String, NodeId>,
    /// Canonical endpoint-pair index: (min, max) → edge id.
    endpoint_index: FxHashMap<(NodeId, NodeId), EdgeId>,

    next_node: u32,
    next_edge: u32,
    next_service: u32,
}

/// Order an endpoint pair canonically (smaller id first).
#[inline]
pub(crate) fn canonical_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Node operations ───────────────────────────────────────────────────

    /// Insert a node.  Rejects non-positive capacity, out-of-range
    /// coordinates (Validation) and duplicate names (Conflict).
    pub fn insert_node(
        &mut self,
        name: &str,
        position: GeoPoint,
        vendor: &str,
        capacity_gbps: f64,
    ) -> LedgerResult<NodeId> {
        if !(capacity_gbps > 0.0) {
            return Err(LedgerError::NonPositiveCapacity {
                what: "node",
                value: capacity_gbps,
            });
        }
        if !position.in_valid_range() {
            return Err(LedgerError::CoordinateOutOfRange {
                lat: position.lat,
                lon: position.lon,
            });
        }
        if self.name_index.contains_key(name) {
            return Err(LedgerError::DuplicateNodeName(name.to_owned()));
        }

        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                name: name.to_owned(),
                position,
                vendor: vendor.to_owned(),
                capacity_gbps,
            },
        );
        self.name_index.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> LedgerResult<&Node> {
        self.nodes.get(&id).ok_or(LedgerError::NodeNotFound(id))
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.name_index.get(name).and_then(|id| self.nodes.get(id))
    }

    /// Case-insensitive substring search over node names, sorted by name.
    pub fn search_nodes_by_name(&self, needle: &str) -> Vec<&Node> {
        let needle = needle.to_lowercase();
        let mut hits: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Explicit attribute update; the only sanctioned node mutation.
    pub fn update_node(
        &mut self,
        id: NodeId,
        vendor: Option<&str>,
        capacity_gbps: Option<f64>,
    ) -> LedgerResult<()> {
        if let Some(c) = capacity_gbps {
            if !(c > 0.0) {
                return Err(LedgerError::NonPositiveCapacity {
                    what: "node",
                    value: c,
                });
            }
        }
        let node = self.nodes.get_mut(&id).ok_or(LedgerError::NodeNotFound(id))?;
        if let Some(v) = vendor {
            node.vendor = v.to_owned();
        }
        if let Some(c) = capacity_gbps {
            node.capacity_gbps = c;
        }
        Ok(())
    }

    /// Delete a node.  Fails with a Conflict (not NotFound) while any edge
    /// or service still references it.
    pub fn delete_node(&mut self, id: NodeId) -> LedgerResult<()> {
        let name = self
            .nodes
            .get(&id)
            .ok_or(LedgerError::NodeNotFound(id))?
            .name
            .clone();
        let edge_refs = self
            .edges
            .values()
            .filter(|e| e.node_a == id || e.node_b == id)
            .count();
        let service_refs = self
            .services
            .values()
            .filter(|s| s.path_nodes.contains(&id))
            .count();
        if edge_refs > 0 || service_refs > 0 {
            return Err(LedgerError::NodeInUse {
                node: id,
                edges: edge_refs,
                services: service_refs,
            });
        }
        self.nodes.remove(&id);
        self.name_index.remove(&name);
        Ok(())
    }

    // ── Edge operations ───────────────────────────────────────────────────

    /// Insert an edge between two existing, distinct nodes.  Endpoints are
    /// stored canonically; a duplicate unordered pair is a Conflict.  The
    /// utilization record starts at zero.
    pub fn insert_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        capacity_gbps: f64,
    ) -> LedgerResult<EdgeId> {
        if !(capacity_gbps > 0.0) {
            return Err(LedgerError::NonPositiveCapacity {
                what: "edge",
                value: capacity_gbps,
            });
        }
        if a == b {
            return Err(LedgerError::SelfLoop(a));
        }
        if !self.nodes.contains_key(&a) {
            return Err(LedgerError::NodeNotFound(a));
        }
        if !self.nodes.contains_key(&b) {
            return Err(LedgerError::NodeNotFound(b));
        }
        let (node_a, node_b) = canonical_pair(a, b);
        if self.endpoint_index.contains_key(&(node_a, node_b)) {
            return Err(LedgerError::DuplicateEdge(node_a, node_b));
        }

        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(
            id,
            Edge {
                id,
                node_a,
                node_b,
                capacity_gbps,
            },
        );
        self.endpoint_index.insert((node_a, node_b), id);
        self.utilization.insert(id, EdgeUtilization::default());
        Ok(id)
    }

    pub fn edge(&self, id: EdgeId) -> LedgerResult<&Edge> {
        self.edges.get(&id).ok_or(LedgerError::EdgeNotFound(id))
    }

    /// Resolve an edge by its endpoints in either order.
    pub fn edge_by_endpoints(&self, a: NodeId, b: NodeId) -> LedgerResult<&Edge> {
        let key = canonical_pair(a, b);
        self.endpoint_index
            .get(&key)
            .and_then(|id| self.edges.get(id))
            .ok_or(LedgerError::EdgeNotFoundByEndpoints(key.0, key.1))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Delete an edge.  Fails with a Conflict while any service path
    /// crosses it.
    pub fn delete_edge(&mut self, id: EdgeId) -> LedgerResult<()> {
        let edge = self.edges.get(&id).ok_or(LedgerError::EdgeNotFound(id))?;
        let util = self.utilization.get(&id).copied().unwrap_or_default();
        if util.service_count > 0 {
            return Err(LedgerError::EdgeInUse {
                edge: id,
                services: util.service_count,
            });
        }
        let key = (edge.node_a, edge.node_b);
        self.edges.remove(&id);
        self.endpoint_index.remove(&key);
        self.utilization.remove(&id);
        Ok(())
    }

    // ── Residual capacity ─────────────────────────────────────────────────

    /// Residual capacity of one edge: capacity − demand, floored at zero.
    pub fn residual(&self, id: EdgeId) -> LedgerResult<f64> {
        let edge = self.edge(id)?;
        let util = self.utilization.get(&id).copied().unwrap_or_default();
        Ok((edge.capacity_gbps - util.total_demand_gbps).max(0.0))
    }

    /// The live "available bandwidth" view both routers depend on:
    /// residual capacity for every edge.
    pub fn residual_capacities(&self) -> FxHashMap<EdgeId, f64> {
        self.edges
            .values()
            .map(|e| {
                let util = self.utilization.get(&e.id).copied().unwrap_or_default();
                (e.id, (e.capacity_gbps - util.total_demand_gbps).max(0.0))
            })
            .collect()
    }

    // ── Service operations ────────────────────────────────────────────────

    /// Insert a service and its path, and bump demand/count on every path
    /// edge, as one all-or-nothing operation.
    ///
    /// Shape and capacity validation is the caller's responsibility (see
    /// [`crate::path::ServicePath::validate`]); this method checks only that
    /// every referenced id exists before applying anything, so no partial
    /// state is ever visible.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_service_with_path(
        &mut self,
        name: &str,
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
        path_nodes: Vec<NodeId>,
        path_edges: Vec<EdgeId>,
        distance_km: f64,
        created_unix_secs: u64,
    ) -> LedgerResult<ServiceId> {
        // Referential checks up front; nothing is mutated until all pass.
        for &n in path_nodes.iter().chain([&source, &destination]) {
            if !self.nodes.contains_key(&n) {
                return Err(LedgerError::NodeNotFound(n));
            }
        }
        for &e in &path_edges {
            if !self.edges.contains_key(&e) {
                return Err(LedgerError::EdgeNotFound(e));
            }
        }

        let id = ServiceId(self.next_service);
        self.next_service += 1;
        for &e in &path_edges {
            let util = self.utilization.entry(e).or_default();
            util.total_demand_gbps += demand_gbps;
            util.service_count += 1;
        }
        self.services.insert(
            id,
            Service {
                id,
                name: name.to_owned(),
                source,
                destination,
                demand_gbps,
                path_nodes,
                path_edges,
                distance_km,
                created_unix_secs,
            },
        );
        Ok(id)
    }

    /// Delete a service: decrement demand/count on every path edge by the
    /// service's demand, then remove the service.  Exact inverse of insert;
    /// a second deletion of the same id is NotFound and never touches the
    /// utilization records again.
    pub fn delete_service(&mut self, id: ServiceId) -> LedgerResult<Service> {
        let service = self
            .services
            .remove(&id)
            .ok_or(LedgerError::ServiceNotFound(id))?;
        for &e in &service.path_edges {
            if let Some(util) = self.utilization.get_mut(&e) {
                util.total_demand_gbps = (util.total_demand_gbps - service.demand_gbps).max(0.0);
                util.service_count = util.service_count.saturating_sub(1);
            }
        }
        Ok(service)
    }

    pub fn service(&self, id: ServiceId) -> LedgerResult<&Service> {
        self.services
            .get(&id)
            .ok_or(LedgerError::ServiceNotFound(id))
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Services whose path crosses `edge`, sorted by id.
    pub fn services_using_edge(&self, edge: EdgeId) -> Vec<&Service> {
        let mut hits: Vec<&Service> = self
            .services
            .values()
            .filter(|s| s.path_edges.contains(&edge))
            .collect();
        hits.sort_by_key(|s| s.id);
        hits
    }

    /// Services originating at `node`, sorted by id.
    pub fn services_from_node(&self, node: NodeId) -> Vec<&Service> {
        let mut hits: Vec<&Service> = self
            .services
            .values()
            .filter(|s| s.source == node)
            .collect();
        hits.sort_by_key(|s| s.id);
        hits
    }

    // ── Capacity analytics ────────────────────────────────────────────────

    /// Every edge whose accumulated demand exceeds its capacity (beyond
    /// tolerance), with the overage, sorted by overage descending.
    pub fn verify_capacity_constraints(&self) -> Vec<CapacityViolation> {
        let mut violations: Vec<CapacityViolation> = self
            .edges
            .values()
            .filter_map(|e| {
                let util = self.utilization.get(&e.id).copied().unwrap_or_default();
                let overage = util.total_demand_gbps - e.capacity_gbps;
                (overage > CAPACITY_TOLERANCE).then_some(CapacityViolation {
                    edge: e.id,
                    capacity_gbps: e.capacity_gbps,
                    total_demand_gbps: util.total_demand_gbps,
                    overage_gbps: overage,
                })
            })
            .collect();
        violations.sort_by(|a, b| {
            b.overage_gbps
                .total_cmp(&a.overage_gbps)
                .then(a.edge.cmp(&b.edge))
        });
        violations
    }

    /// Outbound demand per node: the summed demand of services whose
    /// *source* is that node.  Nodes with no originating services are
    /// absent from the map.
    pub fn node_utilizations(&self) -> FxHashMap<NodeId, f64> {
        let mut out: FxHashMap<NodeId, f64> = FxHashMap::default();
        for s in self.services.values() {
            *out.entry(s.source).or_insert(0.0) += s.demand_gbps;
        }
        out
    }

    /// All nodes with their derived free capacity, sorted by name.
    pub fn nodes_with_utilization(&self) -> Vec<NodeView> {
        let outbound = self.node_utilizations();
        let mut views: Vec<NodeView> = self
            .nodes
            .values()
            .map(|n| {
                let used = outbound.get(&n.id).copied().unwrap_or(0.0);
                NodeView {
                    free_capacity_gbps: (n.capacity_gbps - used).max(0.0),
                    outbound_demand_gbps: used,
                    node: n.clone(),
                }
            })
            .collect();
        views.sort_by(|a, b| a.node.name.cmp(&b.node.name));
        views
    }

    /// Utilization view of one edge.
    pub fn edge_utilization(&self, id: EdgeId) -> LedgerResult<EdgeView> {
        let edge = self.edge(id)?;
        let util = self.utilization.get(&id).copied().unwrap_or_default();
        Ok(Self::make_edge_view(edge, util))
    }

    /// Utilization view of every edge, sorted by utilization descending.
    pub fn edge_utilizations(&self) -> Vec<EdgeView> {
        let mut views: Vec<EdgeView> = self
            .edges
            .values()
            .map(|e| {
                let util = self.utilization.get(&e.id).copied().unwrap_or_default();
                Self::make_edge_view(e, util)
            })
            .collect();
        views.sort_by(|a, b| {
            b.utilization_pct
                .total_cmp(&a.utilization_pct)
                .then(a.edge.id.cmp(&b.edge.id))
        });
        views
    }

    fn make_edge_view(edge: &Edge, util: EdgeUtilization) -> EdgeView {
        EdgeView {
            edge: edge.clone(),
            total_demand_gbps: util.total_demand_gbps,
            service_count: util.service_count,
            utilization_pct: util.total_demand_gbps / edge.capacity_gbps * 100.0,
            residual_gbps: (edge.capacity_gbps - util.total_demand_gbps).max(0.0),
        }
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            services: self.services.len(),
        }
    }

    // ── Import support (crate-internal, used by export round-trip) ────────

    /// Re-insert an entity set preserving original ids.  Used only by
    /// [`TopologyExport::into_ledger`](crate::TopologyExport::into_ledger),
    /// which performs referential checks before calling.
    pub(crate) fn restore(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        services: Vec<Service>,
    ) -> Ledger {
        let mut ledger = Ledger::new();
        for n in nodes {
            ledger.next_node = ledger.next_node.max(n.id.0 + 1);
            ledger.name_index.insert(n.name.clone(), n.id);
            ledger.nodes.insert(n.id, n);
        }
        for e in edges {
            ledger.next_edge = ledger.next_edge.max(e.id.0 + 1);
            ledger.endpoint_index.insert((e.node_a, e.node_b), e.id);
            ledger.utilization.insert(e.id, EdgeUtilization::default());
            ledger.edges.insert(e.id, e);
        }
        for s in services {
            ledger.next_service = ledger.next_service.max(s.id.0 + 1);
            for &e in &s.path_edges {
                let util = ledger.utilization.entry(e).or_default();
                util.total_demand_gbps += s.demand_gbps;
                util.service_count += 1;
            }
            ledger.services.insert(s.id, s);
        }
        ledger
    }
}
