//! Unit tests for capnet-build.

#[cfg(test)]
mod helpers {
    use capnet_core::{BuildParams, GeoPoint};
    use capnet_ledger::Ledger;

    /// Eight east-coast sites with mixed hub/regular capacities.
    pub fn city_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let sites: [(&str, f64, f64, f64); 8] = [
            ("New-York-NY", 40.71, -74.01, 4000.0),
            ("Washington-DC", 38.91, -77.04, 3500.0),
            ("Boston-MA", 42.36, -71.06, 3000.0),
            ("Philadelphia-PA", 39.95, -75.17, 1500.0),
            ("Baltimore-MD", 39.29, -76.61, 1200.0),
            ("Richmond-VA", 37.54, -77.44, 900.0),
            ("Hartford-CT", 41.77, -72.67, 700.0),
            ("Albany-NY", 42.65, -73.75, 500.0),
        ];
        for (name, lat, lon, cap) in sites {
            ledger
                .insert_node(name, GeoPoint::new(lat, lon), "Tonio Networks", cap)
                .unwrap();
        }
        ledger
    }

    pub fn small_params() -> BuildParams {
        BuildParams {
            target_edges: 14,
            ..BuildParams::default()
        }
    }
}

// ── Full builds ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use std::collections::VecDeque;

    use capnet_core::{BuildParams, NodeId};
    use capnet_ledger::Ledger;
    use rustc_hash::{FxHashMap, FxHashSet};

    use crate::{BuildError, ConnectionBuilder};

    /// BFS over the ledger's edge set.
    fn reachable_count(ledger: &Ledger) -> usize {
        let mut adjacency: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        for e in ledger.edges() {
            adjacency.entry(e.node_a).or_default().push(e.node_b);
            adjacency.entry(e.node_b).or_default().push(e.node_a);
        }
        let Some(start) = ledger.nodes().map(|n| n.id).min() else {
            return 0;
        };
        let mut visited: FxHashSet<NodeId> = FxHashSet::from_iter([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &next in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited.len()
    }

    #[test]
    fn produces_connected_topology() {
        let mut ledger = super::helpers::city_ledger();
        let report = ConnectionBuilder::new(super::helpers::small_params())
            .build(&mut ledger)
            .unwrap();
        assert!(report.phase1_edges == ledger.node_count() - 1);
        assert_eq!(reachable_count(&ledger), ledger.node_count());
        assert_eq!(ledger.edge_count(), report.edge_ids.len());
    }

    #[test]
    fn respects_node_capacity_budgets() {
        let mut ledger = super::helpers::city_ledger();
        ConnectionBuilder::new(super::helpers::small_params())
            .build(&mut ledger)
            .unwrap();
        // Sum of incident edge capacity per node must stay within the node's
        // capacity.
        let mut incident: FxHashMap<NodeId, f64> = FxHashMap::default();
        for e in ledger.edges() {
            *incident.entry(e.node_a).or_insert(0.0) += e.capacity_gbps;
            *incident.entry(e.node_b).or_insert(0.0) += e.capacity_gbps;
        }
        for node in ledger.nodes() {
            let used = incident.get(&node.id).copied().unwrap_or(0.0);
            assert!(
                used <= node.capacity_gbps + 1e-6,
                "{}: {used} > {}",
                node.name,
                node.capacity_gbps
            );
        }
    }

    #[test]
    fn stops_at_target_edge_count() {
        let mut ledger = super::helpers::city_ledger();
        let params = BuildParams {
            target_edges: 10,
            ..BuildParams::default()
        };
        ConnectionBuilder::new(params).build(&mut ledger).unwrap();
        assert!(ledger.edge_count() <= 10);
    }

    #[test]
    fn same_seed_same_topology() {
        let build = |seed: u64| {
            let mut ledger = super::helpers::city_ledger();
            let params = BuildParams {
                seed,
                ..super::helpers::small_params()
            };
            ConnectionBuilder::new(params).build(&mut ledger).unwrap();
            let mut edges: Vec<_> = ledger
                .edges()
                .map(|e| (e.node_a, e.node_b, e.capacity_gbps))
                .collect();
            edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
            edges
        };
        assert_eq!(build(7), build(7));
        assert_ne!(build(7), build(8), "different seeds should diverge");
    }

    #[test]
    fn too_few_nodes_is_fatal() {
        let mut ledger = Ledger::new();
        let err = ConnectionBuilder::new(BuildParams::default())
            .build(&mut ledger)
            .unwrap_err();
        assert!(matches!(err, BuildError::InsufficientNodes { nodes: 0 }));
        ledger
            .insert_node(
                "Lonely",
                capnet_core::GeoPoint::new(40.0, -74.0),
                "V",
                100.0,
            )
            .unwrap();
        assert!(matches!(
            ConnectionBuilder::new(BuildParams::default()).build(&mut ledger),
            Err(BuildError::InsufficientNodes { nodes: 1 })
        ));
    }

    #[test]
    fn zero_noise_build_is_fully_deterministic() {
        let build = || {
            let mut ledger = super::helpers::city_ledger();
            let params = BuildParams {
                noise_factor: 0.0,
                ..super::helpers::small_params()
            };
            ConnectionBuilder::new(params).build(&mut ledger).unwrap();
            ledger.edge_count()
        };
        assert_eq!(build(), build());
    }
}

// ── Verification primitives ───────────────────────────────────────────────────

#[cfg(test)]
mod verification {
    use capnet_core::NodeId;
    use rustc_hash::FxHashMap;

    use crate::builder::PlannedEdge;
    use crate::error::BuildError;
    use crate::verify::verify_topology;

    fn capacities(caps: &[f64]) -> FxHashMap<NodeId, f64> {
        caps.iter()
            .enumerate()
            .map(|(i, &c)| (NodeId(i as u32), c))
            .collect()
    }

    fn edge(a: u32, b: u32, w: f64) -> PlannedEdge {
        PlannedEdge {
            a: NodeId(a),
            b: NodeId(b),
            weight_gbps: w,
        }
    }

    #[test]
    fn accepts_connected_within_budget() {
        let caps = capacities(&[100.0, 100.0, 100.0]);
        let edges = [edge(0, 1, 40.0), edge(1, 2, 40.0)];
        let summary = verify_topology(&caps, &edges, 1e-6).unwrap();
        assert_eq!(summary.min_remaining_gbps, 20.0); // node 1 spent 80
        assert_eq!(summary.max_remaining_gbps, 60.0);
    }

    #[test]
    fn detects_disconnected_graph() {
        let caps = capacities(&[100.0, 100.0, 100.0, 100.0]);
        // Two separate components: {0,1} and {2,3}.
        let edges = [edge(0, 1, 10.0), edge(2, 3, 10.0)];
        assert!(matches!(
            verify_topology(&caps, &edges, 1e-6),
            Err(BuildError::Disconnected { reached: 2, total: 4 })
        ));
    }

    #[test]
    fn detects_budget_overrun() {
        let caps = capacities(&[100.0, 100.0, 30.0]);
        let edges = [edge(0, 1, 10.0), edge(1, 2, 20.0), edge(0, 2, 20.0)];
        // Node 2 carries 40 against capacity 30.
        assert!(matches!(
            verify_topology(&caps, &edges, 1e-6),
            Err(BuildError::BudgetExceeded { node, .. }) if node == NodeId(2)
        ));
    }

    #[test]
    fn tolerance_absorbs_float_drift() {
        let caps = capacities(&[100.0, 100.0]);
        let edges = [edge(0, 1, 100.0 + 1e-9)];
        assert!(verify_topology(&caps, &edges, 1e-6).is_ok());
    }
}
