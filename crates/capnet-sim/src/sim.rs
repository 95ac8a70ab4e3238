//! The [`NetworkSim`] orchestrator.
//!
//! Lifecycle: `load_nodes`/`synthesize_nodes` → `build_topology` →
//! `populate_services` → interactive queries and analytics.  All state is
//! owned and injected explicitly; mutations take `&mut self`, reads take
//! `&self`, so a single `RwLock<NetworkSim>` gives the single-writer /
//! many-reader discipline the engine is designed for.

use std::io::{Read, Write};

use capnet_build::{BuildReport, ConnectionBuilder};
use capnet_core::{BuildParams, NodeId, ServiceGenParams};
use capnet_io::NodeRow;
use capnet_ledger::{CapacityViolation, EdgeView, Ledger, LedgerStats, NodeView};
use capnet_route::{AStarRouter, GenerationReport, RouteOutcome, ServiceGenerator};
use log::info;

use crate::error::{SimError, SimResult};

/// Aggregate state snapshot.
#[derive(Clone, Copy, Debug)]
pub struct SimSummary {
    pub stats: LedgerStats,
    pub topology_built: bool,
}

/// Owns the ledger and drives the build → populate → query lifecycle.
pub struct NetworkSim {
    ledger: Ledger,
    build_params: BuildParams,
    service_params: ServiceGenParams,
    topology_built: bool,
}

impl NetworkSim {
    pub fn new(build_params: BuildParams, service_params: ServiceGenParams) -> Self {
        Self {
            ledger: Ledger::new(),
            build_params,
            service_params,
            topology_built: false,
        }
    }

    /// Direct ledger access for CRUD and analytics beyond the lifecycle
    /// methods below.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Insert a prepared node list (e.g. parsed from CSV).
    pub fn load_nodes(&mut self, rows: &[NodeRow]) -> SimResult<Vec<NodeId>> {
        Ok(capnet_io::csv::load_into_ledger(&mut self.ledger, rows)?)
    }

    /// Generate and insert synthetic sites.
    pub fn synthesize_nodes(
        &mut self,
        num_nodes: usize,
        hub_count: usize,
        seed: u64,
    ) -> SimResult<Vec<NodeId>> {
        let rows = capnet_io::synth::generate_sites(num_nodes, hub_count, seed)?;
        info!("synthesized {} sites ({hub_count} hubs)", rows.len());
        self.load_nodes(&rows)
    }

    /// Run the three-phase connection builder over the loaded nodes.
    ///
    /// A verification failure aborts here and the simulator stays unusable
    /// for service population — an invalid topology must never be filled.
    pub fn build_topology(&mut self) -> SimResult<BuildReport> {
        let report = ConnectionBuilder::new(self.build_params.clone()).build(&mut self.ledger)?;
        self.topology_built = true;
        info!(
            "topology built: {} nodes, {} edges",
            self.ledger.node_count(),
            self.ledger.edge_count()
        );
        Ok(report)
    }

    /// Run the two-stage bulk generator.  Requires a built topology.
    pub fn populate_services(&mut self) -> SimResult<GenerationReport> {
        if !self.topology_built {
            return Err(SimError::TopologyNotBuilt);
        }
        let report =
            ServiceGenerator::new(self.service_params.clone()).run(&mut self.ledger)?;
        Ok(report)
    }

    // ── Interactive queries ───────────────────────────────────────────────

    /// Capacity-constrained shortest path on the live ledger state.
    pub fn route(
        &self,
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
    ) -> SimResult<RouteOutcome> {
        Ok(AStarRouter.compute_route(&self.ledger, source, destination, demand_gbps)?)
    }

    /// Up to `num_paths` edge-diverse alternatives for the same query.
    pub fn route_alternatives(
        &self,
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
        num_paths: usize,
    ) -> SimResult<Vec<RouteOutcome>> {
        Ok(AStarRouter.find_diverse_routes(
            &self.ledger,
            source,
            destination,
            demand_gbps,
            num_paths,
        )?)
    }

    // ── Analytics ─────────────────────────────────────────────────────────

    pub fn edge_utilizations(&self) -> Vec<EdgeView> {
        self.ledger.edge_utilizations()
    }

    pub fn nodes_with_utilization(&self) -> Vec<NodeView> {
        self.ledger.nodes_with_utilization()
    }

    pub fn capacity_violations(&self) -> Vec<CapacityViolation> {
        self.ledger.verify_capacity_constraints()
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            stats: self.ledger.stats(),
            topology_built: self.topology_built,
        }
    }

    // ── Interchange ───────────────────────────────────────────────────────

    /// Export the full topology as JSON.
    pub fn export_topology<W: Write>(&self, writer: W) -> SimResult<()> {
        Ok(capnet_io::json::write_topology(writer, &self.ledger)?)
    }

    /// Replace the current ledger with an imported topology.  The imported
    /// state counts as built when it carries edges.
    pub fn import_topology<R: Read>(&mut self, reader: R) -> SimResult<()> {
        let ledger = capnet_io::json::read_topology(reader)?;
        self.topology_built = ledger.edge_count() > 0;
        self.ledger = ledger;
        Ok(())
    }
}
