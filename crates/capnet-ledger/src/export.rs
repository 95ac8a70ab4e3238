//! Canonical interchange form of a full network state.
//!
//! A [`TopologyExport`] is what gets serialized to JSON on export and read
//! back on import; it carries only stored entity state (utilization is
//! recomputed from service paths on import).

use std::collections::BTreeMap;

use capnet_core::{EdgeId, NodeId, ServiceId};
use serde::{Deserialize, Serialize};

use crate::entity::{Edge, Node, Service};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// Full network state: the three entity registries, keyed by id.
///
/// `BTreeMap` keeps the serialized form deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopologyExport {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: BTreeMap<EdgeId, Edge>,
    pub services: BTreeMap<ServiceId, Service>,
}

impl TopologyExport {
    /// Snapshot a ledger's stored state.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            nodes: ledger.nodes().map(|n| (n.id, n.clone())).collect(),
            edges: ledger.edges().map(|e| (e.id, e.clone())).collect(),
            services: ledger.services().map(|s| (s.id, s.clone())).collect(),
        }
    }

    /// Rebuild a ledger from exported state.
    ///
    /// Referential integrity is checked (edge endpoints and service path
    /// members must exist), utilization is recomputed from service paths,
    /// and the id allocators are advanced past the highest imported ids so
    /// later inserts never collide.
    pub fn into_ledger(self) -> LedgerResult<Ledger> {
        for e in self.edges.values() {
            if !self.nodes.contains_key(&e.node_a) {
                return Err(LedgerError::NodeNotFound(e.node_a));
            }
            if !self.nodes.contains_key(&e.node_b) {
                return Err(LedgerError::NodeNotFound(e.node_b));
            }
        }
        for s in self.services.values() {
            for n in s.path_nodes.iter().chain([&s.source, &s.destination]) {
                if !self.nodes.contains_key(n) {
                    return Err(LedgerError::NodeNotFound(*n));
                }
            }
            for e in &s.path_edges {
                if !self.edges.contains_key(e) {
                    return Err(LedgerError::EdgeNotFound(*e));
                }
            }
        }
        Ok(Ledger::restore(
            self.nodes.into_values().collect(),
            self.edges.into_values().collect(),
            self.services.into_values().collect(),
        ))
    }
}
