//! eastnet — end-to-end demo for the capnet network simulator.
//!
//! Synthesizes 48 eastern-US sites, wires them up with the three-phase
//! connection builder, populates the topology with generated services, then
//! answers an interactive routing query and prints the utilization picture.
//! Everything is seeded, so two runs print identical numbers.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use capnet_core::{BuildParams, ServiceGenParams};
use capnet_sim::NetworkSim;

// ── Constants ─────────────────────────────────────────────────────────────────

const NUM_NODES:       usize = 48;
const HUB_COUNT:       usize = 10;
const TARGET_EDGES:    usize = 110;
const TARGET_SERVICES: usize = 120;
const SEED:            u64   = 42;
const QUERY_DEMAND:    f64   = 25.0; // Gbps

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== eastnet — capnet network simulator ===");
    println!("Nodes: {NUM_NODES} ({HUB_COUNT} hubs)  |  Target edges: {TARGET_EDGES}  |  Seed: {SEED}");
    println!();

    let build = BuildParams {
        target_edges: TARGET_EDGES,
        seed: SEED,
        ..BuildParams::default()
    };
    let services = ServiceGenParams {
        target_services: TARGET_SERVICES,
        seed: SEED,
        ..ServiceGenParams::default()
    };
    let mut sim = NetworkSim::new(build, services);

    // 1. Synthesize sites from the city table.
    sim.synthesize_nodes(NUM_NODES, HUB_COUNT, SEED)?;
    println!("Synthesized {} sites", sim.ledger().node_count());

    // 2. Build the topology.
    let t0 = Instant::now();
    let report = sim.build_topology()?;
    println!(
        "Topology built in {:.3} s: {} edges (tree {}, augmentation {}, spokes {})",
        t0.elapsed().as_secs_f64(),
        report.edge_ids.len(),
        report.phase1_edges,
        report.phase2_edges,
        report.phase3_edges,
    );
    println!(
        "Remaining node budgets: {:.1}–{:.1} Gbps",
        report.min_remaining_budget_gbps, report.max_remaining_budget_gbps
    );

    // 3. Populate services.
    let generated = sim.populate_services()?;
    println!(
        "Placed {} services (coverage {}, demand-weighted {}; {} attempts, {} unreachable)",
        generated.total(),
        generated.stage_a_services,
        generated.stage_b_services,
        generated.attempts,
        generated.rejected_unreachable,
    );
    println!();

    // 4. Interactive query: route between the two highest-capacity hubs.
    let (src, dst) = {
        let mut nodes: Vec<_> = sim.ledger().nodes().cloned().collect();
        nodes.sort_by(|a, b| b.capacity_gbps.total_cmp(&a.capacity_gbps).then(a.id.cmp(&b.id)));
        (nodes[0].clone(), nodes[1].clone())
    };
    let route = sim.route(src.id, dst.id, QUERY_DEMAND)?;
    println!(
        "Route {} → {} @ {QUERY_DEMAND} Gbps: {} hops, {:.1} km, bottleneck {:.1} Gbps ({:?})",
        src.name, dst.name, route.hop_count, route.distance_km, route.bottleneck_gbps, route.elapsed
    );
    let alternatives = sim.route_alternatives(src.id, dst.id, QUERY_DEMAND, 3)?;
    println!("Edge-diverse alternatives found: {}", alternatives.len());
    println!();

    // 5. Capacity check + top edge utilizations.
    let violations = sim.capacity_violations();
    println!("Capacity violations: {}", violations.len());
    println!();
    println!("{:<28} {:>10} {:>10} {:>9} {:>5}", "Edge", "Cap Gbps", "Used Gbps", "Util %", "Svcs");
    println!("{}", "-".repeat(66));
    for view in sim.edge_utilizations().iter().take(10) {
        let a = sim.ledger().node(view.edge.node_a)?;
        let b = sim.ledger().node(view.edge.node_b)?;
        println!(
            "{:<28} {:>10.1} {:>10.1} {:>8.1}% {:>5}",
            format!("{} – {}", a.name, b.name),
            view.edge.capacity_gbps,
            view.total_demand_gbps,
            view.utilization_pct,
            view.service_count,
        );
    }
    println!();

    // 6. Export the full topology.
    std::fs::create_dir_all("output/eastnet")?;
    let path = Path::new("output/eastnet/topology.json");
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    sim.export_topology(file)?;
    println!("Topology exported to {}", path.display());

    Ok(())
}
