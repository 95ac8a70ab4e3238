//! Candidate service paths and their validation against live ledger state.
//!
//! The ledger itself only checks referential integrity on insert; routers
//! and callers run the full shape + capacity validation here first, then
//! insert.  Both routers emit their results as a [`ServicePath`].

use capnet_core::{EdgeId, NodeId};
use rustc_hash::FxHashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// An explicit route through the network: parallel node and edge sequences,
/// `edges[i]` connecting `nodes[i]` and `nodes[i + 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ServicePath {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl ServicePath {
    pub fn new(nodes: Vec<NodeId>, edges: Vec<EdgeId>) -> Self {
        Self { nodes, edges }
    }

    /// Hop count h = number of edges.
    #[inline]
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    /// Full validation of this path as a candidate for carrying `demand_gbps`
    /// from `source` to `destination`:
    ///
    /// 1. shape: `nodes.len() == edges.len() + 1`, at least one hop, starts
    ///    at the source, ends at the destination, visits no node twice;
    /// 2. incidence: each edge exists and connects its two adjacent nodes
    ///    (in either stored order);
    /// 3. capacity: every edge has residual ≥ demand.
    ///
    /// The first failing check is returned; on success the path can be
    /// handed to [`Ledger::insert_service_with_path`] unchanged.
    pub fn validate(
        &self,
        ledger: &Ledger,
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
    ) -> LedgerResult<()> {
        if !(demand_gbps > 0.0) {
            return Err(LedgerError::NonPositiveDemand(demand_gbps));
        }
        if source == destination {
            return Err(LedgerError::SameEndpoints(source));
        }
        if self.edges.is_empty() || self.nodes.len() != self.edges.len() + 1 {
            return Err(LedgerError::PathLengthMismatch {
                nodes: self.nodes.len(),
                edges: self.edges.len(),
            });
        }
        if self.nodes[0] != source || self.nodes[self.nodes.len() - 1] != destination {
            return Err(LedgerError::PathEndpointMismatch);
        }

        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        for &n in &self.nodes {
            ledger.node(n)?;
            if !seen.insert(n) {
                return Err(LedgerError::PathNotSimple(n));
            }
        }

        for (hop, &edge_id) in self.edges.iter().enumerate() {
            let edge = ledger.edge(edge_id)?;
            let (from, to) = (self.nodes[hop], self.nodes[hop + 1]);
            let connects = (edge.node_a == from && edge.node_b == to)
                || (edge.node_a == to && edge.node_b == from);
            if !connects {
                return Err(LedgerError::PathHopNotAnEdge {
                    hop,
                    edge: edge_id,
                    from,
                    to,
                });
            }
            let residual = ledger.residual(edge_id)?;
            if residual < demand_gbps {
                return Err(LedgerError::InsufficientCapacity {
                    edge: edge_id,
                    residual,
                    demand: demand_gbps,
                });
            }
        }
        Ok(())
    }

    /// Sum of per-hop great-circle distances along the node sequence, in km.
    pub fn distance_km(&self, ledger: &Ledger) -> LedgerResult<f64> {
        let mut total = 0.0;
        for pair in self.nodes.windows(2) {
            let a = ledger.node(pair[0])?;
            let b = ledger.node(pair[1])?;
            total += a.position.distance_km(b.position);
        }
        Ok(total)
    }
}
