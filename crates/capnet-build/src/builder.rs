//! The three-phase connection builder.
//!
//! Works on a build-time capacity *budget* per node (starts equal to node
//! capacity, spent as edges are added) that is separate from the ledger's
//! service-demand residuals.  Edges are planned in memory, verified, and
//! only then inserted into the ledger, so a failed build leaves the ledger
//! untouched.

use capnet_core::{BuildParams, EdgeId, GeoPoint, NetRng, NodeId};
use capnet_ledger::Ledger;
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{BuildError, BuildResult};
use crate::verify;

/// One node as the builder sees it: position and capacity, snapshotted from
/// the ledger at build start.
#[derive(Clone, Copy)]
pub(crate) struct Site {
    pub id: NodeId,
    pub position: GeoPoint,
    pub capacity_gbps: f64,
}

/// An edge the builder has decided on but not yet written to the ledger.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlannedEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight_gbps: f64,
}

/// Summary of a completed build.
#[derive(Clone, Debug)]
pub struct BuildReport {
    /// Ledger ids of the inserted edges, in creation order.
    pub edge_ids: Vec<EdgeId>,
    pub phase1_edges: usize,
    pub phase2_edges: usize,
    pub phase3_edges: usize,
    /// Smallest / largest unspent capacity budget across nodes after build.
    pub min_remaining_budget_gbps: f64,
    pub max_remaining_budget_gbps: f64,
}

/// Three-phase deterministic topology constructor.
pub struct ConnectionBuilder {
    params: BuildParams,
}

impl ConnectionBuilder {
    pub fn new(params: BuildParams) -> Self {
        Self { params }
    }

    /// Run all three phases over the nodes currently in `ledger`, verify the
    /// result, and insert the edges.  Any failure (including verification)
    /// is fatal and leaves the ledger without any new edges.
    pub fn build(&self, ledger: &mut Ledger) -> BuildResult<BuildReport> {
        // Snapshot nodes sorted by id so map iteration order cannot leak
        // into the (seeded, reproducible) result.
        let mut sites: Vec<Site> = ledger
            .nodes()
            .map(|n| Site {
                id: n.id,
                position: n.position,
                capacity_gbps: n.capacity_gbps,
            })
            .collect();
        sites.sort_by_key(|s| s.id);
        if sites.len() < 2 {
            return Err(BuildError::InsufficientNodes { nodes: sites.len() });
        }

        info!(
            "building connections for {} nodes (gamma={}, beta={}, eta={}, target_edges={})",
            sites.len(),
            self.params.gamma,
            self.params.beta,
            self.params.eta,
            self.params.target_edges
        );

        let mut plan = Plan::new(&self.params, sites);

        plan.phase_i_spanning_tree();
        let phase1 = plan.edges.len();
        debug!("phase I: {phase1} spanning-tree edges");

        plan.phase_ii_greedy_augmentation();
        let phase2 = plan.edges.len() - phase1;
        debug!("phase II: {phase2} augmentation edges");

        let mut phase3 = 0;
        if plan.edges.len() < self.params.target_edges {
            plan.phase_iii_local_spokes();
            phase3 = plan.edges.len() - phase1 - phase2;
            debug!("phase III: {phase3} spoke edges");
        }

        let capacities: FxHashMap<NodeId, f64> = plan
            .sites
            .iter()
            .map(|s| (s.id, s.capacity_gbps))
            .collect();
        let summary =
            verify::verify_topology(&capacities, &plan.edges, self.params.capacity_tolerance)?;
        info!(
            "verification passed: {} edges, remaining budget {:.2}..{:.2} Gbps",
            plan.edges.len(),
            summary.min_remaining_gbps,
            summary.max_remaining_gbps
        );
        log_edge_statistics(&plan.edges);

        let mut edge_ids = Vec::with_capacity(plan.edges.len());
        for e in &plan.edges {
            edge_ids.push(ledger.insert_edge(e.a, e.b, e.weight_gbps)?);
        }

        Ok(BuildReport {
            edge_ids,
            phase1_edges: phase1,
            phase2_edges: phase2,
            phase3_edges: phase3,
            min_remaining_budget_gbps: summary.min_remaining_gbps,
            max_remaining_budget_gbps: summary.max_remaining_gbps,
        })
    }
}

// ── Build-time working state ──────────────────────────────────────────────────

struct Plan<'p> {
    params: &'p BuildParams,
    sites: Vec<Site>,
    /// Unspent capacity budget per node.
    budgets: FxHashMap<NodeId, f64>,
    edges: Vec<PlannedEdge>,
    /// Canonical unordered pairs with an edge already planned.
    pairs: FxHashSet<(NodeId, NodeId)>,
    rng: NetRng,
    /// Global maximum noise-free score, fixed up front for α normalization.
    max_score: f64,
}

impl<'p> Plan<'p> {
    fn new(params: &'p BuildParams, sites: Vec<Site>) -> Self {
        let budgets = sites.iter().map(|s| (s.id, s.capacity_gbps)).collect();

        let mut max_score = 0.0f64;
        for (i, u) in sites.iter().enumerate() {
            for v in &sites[i + 1..] {
                max_score = max_score.max(score_raw(params, u, v));
            }
        }

        Plan {
            rng: NetRng::new(params.seed),
            params,
            sites,
            budgets,
            edges: Vec::new(),
            pairs: FxHashSet::default(),
            max_score,
        }
    }

    /// S(u,v) with the configured multiplicative jitter applied.
    fn score(&mut self, u: &Site, v: &Site) -> f64 {
        let s = score_raw(self.params, u, v);
        s * (1.0 + self.rng.jitter(self.params.noise_factor))
    }

    fn budget(&self, id: NodeId) -> f64 {
        self.budgets.get(&id).copied().unwrap_or(0.0)
    }

    fn edge_exists(&self, a: NodeId, b: NodeId) -> bool {
        self.pairs.contains(&canonical(a, b))
    }

    /// Record an edge and spend its weight from both endpoints' budgets.
    fn add_edge(&mut self, a: NodeId, b: NodeId, weight_gbps: f64) {
        self.pairs.insert(canonical(a, b));
        self.edges.push(PlannedEdge { a, b, weight_gbps });
        for id in [a, b] {
            if let Some(budget) = self.budgets.get_mut(&id) {
                *budget -= weight_gbps;
            }
        }
    }

    /// Phase I: connect each node (in capacity-descending order) to the
    /// already-placed node with the best preference score, spending
    /// η·min(budgets).  Guarantees connectivity while touching the smallest
    /// share of each budget first.
    fn phase_i_spanning_tree(&mut self) {
        let mut order: Vec<usize> = (0..self.sites.len()).collect();
        order.sort_by(|&i, &j| {
            self.sites[j]
                .capacity_gbps
                .total_cmp(&self.sites[i].capacity_gbps)
                .then(self.sites[i].id.cmp(&self.sites[j].id))
        });

        for k in 1..order.len() {
            let current = self.sites[order[k]];
            let mut best: Option<Site> = None;
            let mut best_score = -1.0;
            for &placed in &order[..k] {
                let candidate = self.sites[placed];
                let s = self.score(&current, &candidate);
                if s > best_score {
                    best_score = s;
                    best = Some(candidate);
                }
            }
            if let Some(parent) = best {
                let weight =
                    self.params.eta * self.budget(current.id).min(self.budget(parent.id));
                self.add_edge(current.id, parent.id, weight);
            }
        }
    }

    /// Phase II: repeatedly add an edge between the globally best-scoring
    /// unconnected pair with positive budgets on both sides, weighted by
    /// α(Ŝ)·min(budgets), until the edge target is hit or no pair remains.
    fn phase_ii_greedy_augmentation(&mut self) {
        while self.edges.len() < self.params.target_edges {
            let mut best: Option<(Site, Site)> = None;
            let mut best_score = -1.0;
            for i in 0..self.sites.len() {
                for j in i + 1..self.sites.len() {
                    let (u, v) = (self.sites[i], self.sites[j]);
                    if self.edge_exists(u.id, v.id) {
                        continue;
                    }
                    if self.budget(u.id) <= 0.0 || self.budget(v.id) <= 0.0 {
                        continue;
                    }
                    let s = self.score(&u, &v);
                    if s > best_score {
                        best_score = s;
                        best = Some((u, v));
                    }
                }
            }

            let Some((u, v)) = best else {
                debug!(
                    "phase II: no feasible pair left at {} edges",
                    self.edges.len()
                );
                break;
            };

            let alpha = self.alpha(
                best_score,
                self.params.alpha_base_phase2,
                self.params.alpha_coefficient_phase2,
            );
            let weight = alpha * self.budget(u.id).min(self.budget(v.id));
            self.add_edge(u.id, v.id, weight);
        }
    }

    /// Phase III: give each non-hub node (bottom fraction by capacity) up to
    /// `spokes_per_node` extra connections to its best higher-capacity,
    /// not-yet-connected neighbors.
    fn phase_iii_local_spokes(&mut self) {
        let mut by_capacity: Vec<Site> = self.sites.clone();
        by_capacity.sort_by(|a, b| {
            b.capacity_gbps
                .total_cmp(&a.capacity_gbps)
                .then(a.id.cmp(&b.id))
        });
        let threshold_idx =
            (self.params.non_hub_threshold * by_capacity.len() as f64) as usize;
        let non_hubs: Vec<Site> = by_capacity[threshold_idx..].to_vec();

        for node in non_hubs {
            if self.edges.len() >= self.params.target_edges {
                break;
            }
            if self.budget(node.id) <= 0.0 {
                continue;
            }

            let others = self.sites.clone();
            let mut candidates: Vec<(f64, Site)> = Vec::new();
            for other in others {
                if other.capacity_gbps <= node.capacity_gbps
                    || self.edge_exists(node.id, other.id)
                    || self.budget(other.id) <= 0.0
                {
                    continue;
                }
                candidates.push((self.score(&node, &other), other));
            }
            candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

            for (s, other) in candidates.into_iter().take(self.params.spokes_per_node) {
                if self.edges.len() >= self.params.target_edges {
                    break;
                }
                let alpha = self.alpha(
                    s,
                    self.params.alpha_base_phase3,
                    self.params.alpha_coefficient_phase3,
                );
                let weight = alpha * self.budget(node.id).min(self.budget(other.id));
                self.add_edge(node.id, other.id, weight);
            }
        }
    }

    /// α(Ŝ) = base + coeff · (score / global max score).
    fn alpha(&self, score: f64, base: f64, coeff: f64) -> f64 {
        let s_hat = if self.max_score > 0.0 {
            score / self.max_score
        } else {
            0.0
        };
        base + coeff * s_hat
    }
}

/// Weight and degree statistics for a planned edge set.
fn log_edge_statistics(edges: &[PlannedEdge]) {
    if edges.is_empty() {
        return;
    }
    let (mut min_w, mut max_w, mut sum_w) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
    let mut degree: FxHashMap<NodeId, usize> = FxHashMap::default();
    for e in edges {
        min_w = min_w.min(e.weight_gbps);
        max_w = max_w.max(e.weight_gbps);
        sum_w += e.weight_gbps;
        *degree.entry(e.a).or_insert(0) += 1;
        *degree.entry(e.b).or_insert(0) += 1;
    }
    let (min_deg, max_deg) = degree
        .values()
        .fold((usize::MAX, 0), |(lo, hi), &d| (lo.min(d), hi.max(d)));
    debug!(
        "edge weights {min_w:.2}..{max_w:.2} Gbps (mean {:.2}), node degree {min_deg}..{max_deg}",
        sum_w / edges.len() as f64
    );
}

/// Noise-free preference score S(u,v) = (C_u·C_v)^γ / max(d, d_min)^β.
fn score_raw(params: &BuildParams, u: &Site, v: &Site) -> f64 {
    let d = u
        .position
        .distance_km(v.position)
        .max(params.min_distance_km);
    (u.capacity_gbps * v.capacity_gbps).powf(params.gamma) / d.powf(params.beta)
}

#[inline]
fn canonical(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}
