//! Tunable parameters for topology construction and bulk service generation.
//!
//! Both structs are plain serde types: applications load them from a JSON
//! or TOML file (or use `Default`) and pass them explicitly to the builder
//! and generator.  Defaults match the reference parameter set the engine was
//! calibrated with.

use serde::{Deserialize, Serialize};

// ── BuildParams ───────────────────────────────────────────────────────────────

/// Parameters of the three-phase connection-building algorithm.
///
/// The preference score between nodes u, v is
///
///   S(u,v) = (C_u · C_v)^gamma / max(d(u,v), min_distance_km)^beta
///
/// optionally perturbed by ±`noise_factor` multiplicative jitter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildParams {
    /// Capacity importance exponent in the preference score (typical: 1–2).
    pub gamma: f64,

    /// Distance importance exponent in the preference score (typical: 1–3).
    pub beta: f64,

    /// Weight fraction for Phase I spanning-tree edges.  Must be in (0, 0.5]
    /// so the skeleton never spends more than half of either endpoint's
    /// budget.
    pub eta: f64,

    /// Target number of edges across all three phases.
    pub target_edges: usize,

    /// Multiplicative jitter applied to preference scores for organic
    /// variation.  0.0 disables jitter entirely.
    pub noise_factor: f64,

    /// Seed for the builder's RNG.  Same seed + same node list ⇒ identical
    /// topology.
    pub seed: u64,

    /// Phase II alpha function: α(Ŝ) = alpha_base + alpha_coefficient · Ŝ,
    /// where Ŝ is the pair's score normalized by the global maximum.
    pub alpha_base_phase2: f64,
    pub alpha_coefficient_phase2: f64,

    /// Phase III alpha function (same form, separate constants).
    pub alpha_base_phase3: f64,
    pub alpha_coefficient_phase3: f64,

    /// Distance floor in km to avoid division blow-up for co-located sites.
    pub min_distance_km: f64,

    /// Nodes below this capacity-rank fraction are "non-hub" and eligible
    /// for Phase III spokes (0.75 ⇒ bottom 25% by capacity).
    pub non_hub_threshold: f64,

    /// Maximum additional spoke connections per non-hub node in Phase III.
    pub spokes_per_node: usize,

    /// Floating-point tolerance for the post-build capacity check.
    pub capacity_tolerance: f64,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            gamma: 1.5,
            beta: 2.0,
            eta: 0.4,
            target_edges: 200,
            noise_factor: 0.01,
            seed: 42,
            alpha_base_phase2: 0.25,
            alpha_coefficient_phase2: 0.25,
            alpha_base_phase3: 0.25,
            alpha_coefficient_phase3: 0.25,
            min_distance_km: 0.001,
            non_hub_threshold: 0.75,
            spokes_per_node: 2,
            capacity_tolerance: 1e-6,
        }
    }
}

// ── ServiceGenParams ──────────────────────────────────────────────────────────

/// Parameters of the two-stage bulk service generator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceGenParams {
    /// Fixed bandwidth demand D per generated service, in Gbps.
    pub demand_gbps: f64,

    /// Target total number of services (Stage A + Stage B combined).
    pub target_services: usize,

    /// Cost exponent p in the Stage-B edge cost (r_e / D)^(−p): lower
    /// residual ⇒ higher cost, steering paths away from saturated edges.
    pub p_exponent: f64,

    /// Endpoint sampling exponent ρ: Stage B samples endpoints with weight
    /// capacity^ρ, biasing services toward high-capacity sites.
    pub rho_exponent: f64,

    /// Uniform tie-breaking noise in [−δ, +δ] added to each edge cost.
    pub noise_delta: f64,

    /// Seed for the generator's RNG.
    pub seed: u64,

    /// Run Stage A (edge-cover services guaranteeing every node an
    /// endpoint).  Disable to generate purely sampled traffic.
    pub enable_stage_a: bool,
}

impl Default for ServiceGenParams {
    fn default() -> Self {
        Self {
            demand_gbps: 5.0,
            target_services: 100,
            p_exponent: 1.5,
            rho_exponent: 1.0,
            noise_delta: 0.01,
            seed: 42,
            enable_stage_a: true,
        }
    }
}
