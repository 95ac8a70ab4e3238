//! Two-stage bulk service generator.
//!
//! Stage A materializes one direct service per edge-cover edge so every node
//! is a service endpoint at least once.  Stage B then samples endpoint pairs
//! (weighted by node capacity^ρ) and routes them with the capacity-aware
//! Dijkstra until the target count is reached or the candidate space is
//! exhausted.  Both stages write through the ledger and keep the shared
//! graph view's residuals in sync, so every decision sees the effect of all
//! earlier ones.

use capnet_core::{NetRng, NodeId, ServiceGenParams};
use capnet_ledger::{Ledger, ServicePath};
use log::{debug, info, warn};

use crate::cover;
use crate::dijkstra::capacity_aware_path;
use crate::error::{RouteError, RouteResult};
use crate::graph::GraphView;

/// Service creation window: timestamps drawn uniformly from 2020-01-01 to
/// 2025-01-01 UTC.
const CREATED_MIN_UNIX: u64 = 1_577_836_800;
const CREATED_MAX_UNIX: u64 = 1_735_689_600;

/// Stage B gives up after this many sampling attempts per requested
/// service; prevents spinning forever on a capacity-exhausted topology.
const MAX_ATTEMPTS_PER_SERVICE: usize = 20;

/// Outcome summary of a generation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenerationReport {
    pub stage_a_services: usize,
    pub stage_b_services: usize,
    /// Stage B endpoint samples drawn (accepted + rejected).
    pub attempts: usize,
    /// Pairs rejected by the threshold-graph reachability pre-check.
    pub rejected_unreachable: usize,
}

impl GenerationReport {
    pub fn total(&self) -> usize {
        self.stage_a_services + self.stage_b_services
    }
}

/// Seeded two-stage service generator.
pub struct ServiceGenerator {
    params: ServiceGenParams,
}

impl ServiceGenerator {
    pub fn new(params: ServiceGenParams) -> Self {
        Self { params }
    }

    /// Populate `ledger` with services.  Safe to call on a topology already
    /// carrying services; generated demand stacks on existing residuals.
    pub fn run(&self, ledger: &mut Ledger) -> RouteResult<GenerationReport> {
        let demand = self.params.demand_gbps;
        let mut rng = NetRng::new(self.params.seed);
        let mut view = GraphView::snapshot(ledger);
        let mut report = GenerationReport::default();
        let mut sequence = 0usize;

        info!(
            "generating services: demand={demand} Gbps, target={}, stage A {}",
            self.params.target_services,
            if self.params.enable_stage_a { "on" } else { "off" }
        );

        if self.params.enable_stage_a {
            report.stage_a_services =
                self.stage_a(ledger, &mut view, &mut rng, &mut sequence)?;
        }

        self.stage_b(ledger, &mut view, &mut rng, &mut sequence, &mut report)?;

        info!(
            "generation done: {} stage-A + {} stage-B services ({} attempts, {} unreachable pairs)",
            report.stage_a_services,
            report.stage_b_services,
            report.attempts,
            report.rejected_unreachable
        );
        Ok(report)
    }

    /// Stage A: one direct single-hop service per edge-cover edge.  Skipped
    /// entirely (with a warning) when the threshold graph has isolated
    /// nodes, since no cover exists then.
    fn stage_a(
        &self,
        ledger: &mut Ledger,
        view: &mut GraphView,
        rng: &mut NetRng,
        sequence: &mut usize,
    ) -> RouteResult<usize> {
        let demand = self.params.demand_gbps;
        let cover = match cover::edge_cover(view, demand) {
            Ok(cover) => cover,
            Err(RouteError::IsolatedNodes { count }) => {
                warn!("stage A skipped: {count} node(s) isolated in the threshold graph");
                return Ok(0);
            }
            Err(other) => return Err(other),
        };
        debug!("stage A: edge cover of {} edges", cover.len());

        let mut created = 0;
        for c in cover {
            let path = ServicePath::new(vec![c.a, c.b], vec![c.edge]);
            path.validate(ledger, c.a, c.b, demand)?;
            let distance_km = path.distance_km(ledger)?;
            *sequence += 1;
            ledger.insert_service_with_path(
                &format!("SVC-A-{:04}", *sequence),
                c.a,
                c.b,
                demand,
                path.nodes,
                path.edges,
                distance_km,
                rng.gen_range(CREATED_MIN_UNIX..CREATED_MAX_UNIX),
            )?;
            view.apply_demand(&[c.edge], demand);
            created += 1;
        }
        Ok(created)
    }

    /// Stage B: sampled pairs routed capacity-aware until the overall
    /// target is met or the attempt budget runs out.
    fn stage_b(
        &self,
        ledger: &mut Ledger,
        view: &mut GraphView,
        rng: &mut NetRng,
        sequence: &mut usize,
        report: &mut GenerationReport,
    ) -> RouteResult<()> {
        let demand = self.params.demand_gbps;
        let remaining = self
            .params
            .target_services
            .saturating_sub(report.stage_a_services);
        if remaining == 0 {
            return Ok(());
        }

        // Endpoint sampling weights: capacity^ρ, over nodes sorted by id.
        let mut sites: Vec<(NodeId, f64)> = ledger
            .nodes()
            .map(|n| (n.id, n.capacity_gbps))
            .collect();
        sites.sort_by_key(|&(id, _)| id);
        let weights: Vec<f64> = sites
            .iter()
            .map(|&(_, c)| c.powf(self.params.rho_exponent))
            .collect();

        let max_attempts = remaining * MAX_ATTEMPTS_PER_SERVICE;
        let mut created = 0;
        while created < remaining && report.attempts < max_attempts {
            report.attempts += 1;
            let (Some(si), Some(di)) =
                (rng.sample_weighted(&weights), rng.sample_weighted(&weights))
            else {
                break;
            };
            let (source, destination) = (sites[si].0, sites[di].0);
            if source == destination {
                continue;
            }
            if !view.reachable_under(source, destination, demand) {
                report.rejected_unreachable += 1;
                continue;
            }

            let Some(found) = capacity_aware_path(
                view,
                source,
                destination,
                demand,
                self.params.p_exponent,
                self.params.noise_delta,
                rng,
            ) else {
                continue;
            };
            if found.edges.is_empty() {
                continue;
            }

            let path = ServicePath::new(found.nodes, found.edges);
            if let Err(err) = path.validate(ledger, source, destination, demand) {
                debug!("stage B: rejected computed path: {err}");
                continue;
            }
            // Real geographic length; the search cost is capacity-biased
            // and must not be reused as distance.
            let distance_km = path.distance_km(ledger)?;
            *sequence += 1;
            let edges = path.edges.clone();
            ledger.insert_service_with_path(
                &format!("SVC-B-{:04}", *sequence),
                source,
                destination,
                demand,
                path.nodes,
                path.edges,
                distance_km,
                rng.gen_range(CREATED_MIN_UNIX..CREATED_MAX_UNIX),
            )?;
            view.apply_demand(&edges, demand);
            created += 1;
        }

        if created < remaining {
            warn!(
                "stage B exhausted candidates after {} attempts ({created} of {remaining} services)",
                report.attempts
            );
        }
        report.stage_b_services = created;
        Ok(())
    }
}
