//! Entity structs stored in the ledger, plus the derived read views.
//!
//! Stored entities hold only declared state; anything derivable (free
//! capacity, utilization percentage) lives in the `*View` types computed at
//! query time from the ledger's utilization records.

use capnet_core::{EdgeId, GeoPoint, NodeId, ServiceId};
use serde::{Deserialize, Serialize};

// ── Stored entities ───────────────────────────────────────────────────────────

/// A site with switching capacity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Unique human-readable name, e.g. "Boston-MA".
    pub name: String,
    pub position: GeoPoint,
    pub vendor: String,
    /// Total switching capacity in Gbps (> 0).
    pub capacity_gbps: f64,
}

/// A bidirectional link between two nodes.
///
/// Endpoints are stored canonically with `node_a < node_b`, so an (a,b) and
/// a (b,a) request resolve to the same record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub node_a: NodeId,
    pub node_b: NodeId,
    /// Bandwidth capacity in Gbps (> 0).
    pub capacity_gbps: f64,
}

impl Edge {
    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node_a {
            Some(self.node_b)
        } else if node == self.node_b {
            Some(self.node_a)
        } else {
            None
        }
    }
}

/// Pre-aggregated per-edge demand bookkeeping, updated transactionally with
/// every service insert/delete.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EdgeUtilization {
    /// Sum of demand over all services whose path crosses this edge.
    pub total_demand_gbps: f64,
    /// Number of services whose path crosses this edge.
    pub service_count: usize,
}

/// A provisioned service: a bandwidth demand routed along an explicit path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub source: NodeId,
    pub destination: NodeId,
    /// Bandwidth consumed on every path edge, in Gbps (> 0).
    pub demand_gbps: f64,
    /// Ordered node sequence: `path_nodes[0] == source`,
    /// `path_nodes[h] == destination`, length h+1.
    pub path_nodes: Vec<NodeId>,
    /// Ordered edge sequence, length h; `path_edges[i]` connects
    /// `path_nodes[i]` and `path_nodes[i+1]`.
    pub path_edges: Vec<EdgeId>,
    /// Total geographic path length in km (sum of per-hop great-circle
    /// distances).
    pub distance_km: f64,
    /// Creation time, Unix seconds.
    pub created_unix_secs: u64,
}

impl Service {
    /// Hop count h = number of path edges.
    #[inline]
    pub fn hop_count(&self) -> usize {
        self.path_edges.len()
    }
}

// ── Derived views ─────────────────────────────────────────────────────────────

/// A node together with its computed outbound utilization.
///
/// Free capacity subtracts only the demand of services *originating* at the
/// node: node capacity models switching load consumed at the origination
/// site, not transit or termination.
#[derive(Clone, Debug, Serialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub node: Node,
    /// Summed demand of services whose source is this node.
    pub outbound_demand_gbps: f64,
    /// `capacity - outbound_demand`, floored at zero.
    pub free_capacity_gbps: f64,
}

/// An edge together with its computed utilization.
#[derive(Clone, Debug, Serialize)]
pub struct EdgeView {
    #[serde(flatten)]
    pub edge: Edge,
    pub total_demand_gbps: f64,
    pub service_count: usize,
    /// `demand / capacity * 100`.
    pub utilization_pct: f64,
    /// `capacity - demand`, floored at zero.
    pub residual_gbps: f64,
}

/// One over-capacity edge reported by
/// [`Ledger::verify_capacity_constraints`](crate::Ledger::verify_capacity_constraints).
#[derive(Clone, Debug, Serialize)]
pub struct CapacityViolation {
    pub edge: EdgeId,
    pub capacity_gbps: f64,
    pub total_demand_gbps: f64,
    /// `demand - capacity` (always > 0 for a reported violation).
    pub overage_gbps: f64,
}
