//! Unit tests for capnet-route.

#[cfg(test)]
mod helpers {
    use capnet_core::{EdgeId, GeoPoint, NodeId};
    use capnet_ledger::Ledger;

    pub const NYC: GeoPoint = GeoPoint {
        lat: 40.7128,
        lon: -74.0060,
    };
    pub const HARTFORD: GeoPoint = GeoPoint {
        lat: 41.7658,
        lon: -72.6734,
    };
    pub const BOSTON: GeoPoint = GeoPoint {
        lat: 42.3601,
        lon: -71.0589,
    };
    pub const ALBANY: GeoPoint = GeoPoint {
        lat: 42.6526,
        lon: -73.7562,
    };

    /// A ── B ── C line, node capacity 100, edge capacity 20.
    pub fn line_ledger() -> (Ledger, [NodeId; 3], [EdgeId; 2]) {
        let mut ledger = Ledger::new();
        let a = ledger.insert_node("A", NYC, "Tonio Networks", 100.0).unwrap();
        let b = ledger
            .insert_node("B", HARTFORD, "Tonio Networks", 100.0)
            .unwrap();
        let c = ledger.insert_node("C", BOSTON, "Agave Networks", 100.0).unwrap();
        let ab = ledger.insert_edge(a, b, 20.0).unwrap();
        let bc = ledger.insert_edge(b, c, 20.0).unwrap();
        (ledger, [a, b, c], [ab, bc])
    }

    /// Triangle with a direct A–C edge plus the two-hop route via B:
    ///
    ///   A ──(direct, cap `direct_cap`)── C
    ///   A ──50── B ──50── C
    pub fn triangle_ledger(direct_cap: f64) -> (Ledger, [NodeId; 3], [EdgeId; 3]) {
        let mut ledger = Ledger::new();
        let a = ledger.insert_node("A", NYC, "V", 200.0).unwrap();
        let b = ledger.insert_node("B", ALBANY, "V", 200.0).unwrap();
        let c = ledger.insert_node("C", BOSTON, "V", 200.0).unwrap();
        let ac = ledger.insert_edge(a, c, direct_cap).unwrap();
        let ab = ledger.insert_edge(a, b, 50.0).unwrap();
        let bc = ledger.insert_edge(b, c, 50.0).unwrap();
        (ledger, [a, b, c], [ac, ab, bc])
    }

    /// Consume `demand` on one edge via a direct service.
    pub fn saturate(ledger: &mut Ledger, a: NodeId, b: NodeId, edge: EdgeId, demand: f64) {
        ledger
            .insert_service_with_path("load", a, b, demand, vec![a, b], vec![edge], 1.0, 0)
            .unwrap();
    }
}

// ── Interactive A* ────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use capnet_core::NodeId;

    use crate::{AStarRouter, RouteError};

    #[test]
    fn trivial_same_node_route() {
        let (ledger, [a, ..], _) = super::helpers::line_ledger();
        let route = AStarRouter.compute_route(&ledger, a, a, 5.0).unwrap();
        assert_eq!(route.path_nodes, vec![a]);
        assert!(route.path_edges.is_empty());
        assert_eq!(route.distance_km, 0.0);
        assert_eq!(route.hop_count, 0);
        assert!(route.bottleneck_gbps.is_infinite());
    }

    #[test]
    fn two_hop_route_with_distance_and_bottleneck() {
        let (mut ledger, [a, b, c], [ab, bc]) = super::helpers::line_ledger();
        // Preload some demand so the two edges have different residuals.
        super::helpers::saturate(&mut ledger, a, b, ab, 3.0);

        let route = AStarRouter.compute_route(&ledger, a, c, 5.0).unwrap();
        assert_eq!(route.path_nodes, vec![a, b, c]);
        assert_eq!(route.path_edges, vec![ab, bc]);
        assert_eq!(route.hop_count, 2);

        let expected = super::helpers::NYC.distance_km(super::helpers::HARTFORD)
            + super::helpers::HARTFORD.distance_km(super::helpers::BOSTON);
        assert!((route.distance_km - expected).abs() < 1e-9);
        assert_eq!(route.bottleneck_gbps, 17.0); // min(17, 20)
    }

    #[test]
    fn unknown_node_is_not_found_not_no_route() {
        let (ledger, [a, ..], _) = super::helpers::line_ledger();
        let missing = NodeId(99);
        assert!(matches!(
            AStarRouter.compute_route(&ledger, a, missing, 5.0),
            Err(RouteError::NodeNotFound(n)) if n == missing
        ));
        assert!(matches!(
            AStarRouter.compute_route(&ledger, missing, a, 5.0),
            Err(RouteError::NodeNotFound(_))
        ));
    }

    #[test]
    fn infeasible_demand_reports_no_route_with_query() {
        let (ledger, [a, _, c], _) = super::helpers::line_ledger();
        let err = AStarRouter.compute_route(&ledger, a, c, 25.0).unwrap_err();
        match err {
            RouteError::NoRoute {
                source,
                destination,
                demand_gbps,
            } => {
                assert_eq!((source, destination), (a, c));
                assert_eq!(demand_gbps, 25.0);
            }
            other => panic!("expected NoRoute, got {other}"),
        }
    }

    #[test]
    fn capacity_filter_forces_detour() {
        // Direct A–C has capacity 20 but only 4 Gbps left; the request for
        // 5 must take the longer two-hop route.
        let (mut ledger, [a, b, c], [ac, ab, bc]) = super::helpers::triangle_ledger(20.0);
        super::helpers::saturate(&mut ledger, a, c, ac, 16.0);

        let route = AStarRouter.compute_route(&ledger, a, c, 5.0).unwrap();
        assert_eq!(route.path_nodes, vec![a, b, c]);
        assert_eq!(route.path_edges, vec![ab, bc]);

        // With a smaller demand the direct edge is usable again and wins on
        // distance.
        let direct = AStarRouter.compute_route(&ledger, a, c, 3.0).unwrap();
        assert_eq!(direct.path_edges, vec![ac]);
        assert!(direct.distance_km < route.distance_km);
    }

    #[test]
    fn returned_path_passes_ledger_validation() {
        let (ledger, [a, _, c], _) = super::helpers::line_ledger();
        let route = AStarRouter.compute_route(&ledger, a, c, 5.0).unwrap();
        route.path().validate(&ledger, a, c, 5.0).unwrap();
    }

    #[test]
    fn diverse_routes_penalize_used_edges() {
        // Direct A–C has residual 6; after one use the 0.8 penalty drops its
        // effective residual to 4.8 < 5, so the second route must detour.
        let (ledger, [a, _, c], [ac, ab, bc]) = super::helpers::triangle_ledger(6.0);
        let routes = AStarRouter
            .find_diverse_routes(&ledger, a, c, 5.0, 2)
            .unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path_edges, vec![ac], "first route is the direct one");
        assert_eq!(routes[1].path_edges, vec![ab, bc], "second route detours");
    }

    #[test]
    fn diverse_routes_may_repeat_while_capacity_allows() {
        // With a roomy direct edge the penalty never crosses the demand
        // threshold, so every alternative is the same shortest path.
        let (ledger, [a, _, c], [ac, ..]) = super::helpers::triangle_ledger(50.0);
        let routes = AStarRouter
            .find_diverse_routes(&ledger, a, c, 5.0, 3)
            .unwrap();
        assert_eq!(routes.len(), 3);
        assert!(routes.iter().all(|r| r.path_edges == vec![ac]));
    }
}

// ── Capacity-aware Dijkstra ───────────────────────────────────────────────────

#[cfg(test)]
mod dijkstra {
    use capnet_core::NetRng;

    use crate::dijkstra::capacity_aware_path;
    use crate::graph::GraphView;

    #[test]
    fn prefers_high_residual_detour_over_tight_direct_edge() {
        // Direct A–C residual 6 (cost (6/5)^-1.5 ≈ 0.76); each two-hop edge
        // residual 50 (cost 2·(10)^-1.5 ≈ 0.06).  Zero noise: deterministic.
        let (ledger, [a, b, c], _) = super::helpers::triangle_ledger(6.0);
        let view = GraphView::snapshot(&ledger);
        let mut rng = NetRng::new(1);
        let path = capacity_aware_path(&view, a, c, 5.0, 1.5, 0.0, &mut rng).unwrap();
        assert_eq!(path.nodes, vec![a, b, c]);
    }

    #[test]
    fn direct_edge_wins_when_residuals_match() {
        let (ledger, [a, _, c], [ac, ..]) = super::helpers::triangle_ledger(50.0);
        let view = GraphView::snapshot(&ledger);
        let mut rng = NetRng::new(1);
        let path = capacity_aware_path(&view, a, c, 5.0, 1.5, 0.0, &mut rng).unwrap();
        assert_eq!(path.edges, vec![ac], "one cheap hop beats two cheap hops");
    }

    #[test]
    fn unreachable_pair_short_circuits() {
        let (ledger, [a, _, c], _) = super::helpers::line_ledger();
        let view = GraphView::snapshot(&ledger);
        let mut rng = NetRng::new(1);
        // Demand above every edge's residual: the threshold graph has no
        // edges at all.
        assert!(capacity_aware_path(&view, a, c, 25.0, 1.5, 0.01, &mut rng).is_none());
    }

    #[test]
    fn same_node_is_trivial() {
        let (ledger, [a, ..], _) = super::helpers::line_ledger();
        let view = GraphView::snapshot(&ledger);
        let mut rng = NetRng::new(1);
        let path = capacity_aware_path(&view, a, a, 5.0, 1.5, 0.01, &mut rng).unwrap();
        assert_eq!(path.nodes, vec![a]);
        assert!(path.edges.is_empty());
    }
}

// ── Edge cover ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cover {
    use rustc_hash::FxHashSet;

    use capnet_core::NodeId;

    use crate::cover::edge_cover;
    use crate::graph::GraphView;
    use crate::RouteError;

    fn covered_nodes(cover: &[crate::cover::CoverEdge]) -> FxHashSet<NodeId> {
        cover.iter().flat_map(|c| [c.a, c.b]).collect()
    }

    #[test]
    fn line_cover_touches_every_node() {
        let (ledger, [a, b, c], _) = super::helpers::line_ledger();
        let view = GraphView::snapshot(&ledger);
        let cover = edge_cover(&view, 5.0).unwrap();
        let covered = covered_nodes(&cover);
        assert!(covered.contains(&a) && covered.contains(&b) && covered.contains(&c));
        assert!(cover.len() <= 2, "a 3-node line never needs more than 2 edges");
    }

    #[test]
    fn triangle_cover_is_two_edges() {
        let (ledger, nodes, _) = super::helpers::triangle_ledger(50.0);
        let view = GraphView::snapshot(&ledger);
        let cover = edge_cover(&view, 5.0).unwrap();
        assert_eq!(covered_nodes(&cover).len(), 3);
        assert_eq!(cover.len(), 2, "matching edge + one spoke for the odd node");
        let _ = nodes;
    }

    #[test]
    fn isolated_node_means_no_cover() {
        let (mut ledger, [a, b, _], [ab, _]) = super::helpers::line_ledger();
        // Saturate A's only edge below the threshold: A becomes isolated
        // in G_D.
        super::helpers::saturate(&mut ledger, a, b, ab, 16.0);
        let view = GraphView::snapshot(&ledger);
        assert!(matches!(
            edge_cover(&view, 5.0),
            Err(RouteError::IsolatedNodes { count: 1 })
        ));
    }
}

// ── Bulk generation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod generation {
    use capnet_core::{GeoPoint, ServiceGenParams};
    use capnet_ledger::Ledger;
    use rustc_hash::FxHashSet;

    use crate::ServiceGenerator;

    /// Five well-connected sites with roomy edges.
    fn mesh_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let coords = [
            ("New-York-NY", 40.71, -74.01),
            ("Boston-MA", 42.36, -71.06),
            ("Philadelphia-PA", 39.95, -75.17),
            ("Hartford-CT", 41.77, -72.67),
            ("Albany-NY", 42.65, -73.76),
        ];
        let ids: Vec<_> = coords
            .iter()
            .map(|&(name, lat, lon)| {
                ledger
                    .insert_node(name, GeoPoint::new(lat, lon), "Tonio Networks", 1000.0)
                    .unwrap()
            })
            .collect();
        for i in 0..ids.len() {
            for j in i + 1..ids.len() {
                ledger.insert_edge(ids[i], ids[j], 120.0).unwrap();
            }
        }
        ledger
    }

    fn params(target: usize, seed: u64) -> ServiceGenParams {
        ServiceGenParams {
            target_services: target,
            seed,
            ..ServiceGenParams::default()
        }
    }

    #[test]
    fn stage_a_makes_every_node_an_endpoint() {
        let mut ledger = mesh_ledger();
        let report = ServiceGenerator::new(params(20, 42)).run(&mut ledger).unwrap();
        assert!(report.stage_a_services >= 3); // 5 nodes need ≥ ⌈5/2⌉ edges
        let endpoints: FxHashSet<_> = ledger
            .services()
            .flat_map(|s| [s.source, s.destination])
            .collect();
        for node in ledger.nodes() {
            assert!(endpoints.contains(&node.id), "{} has no service", node.name);
        }
    }

    #[test]
    fn reaches_target_and_respects_capacity() {
        let mut ledger = mesh_ledger();
        let report = ServiceGenerator::new(params(30, 42)).run(&mut ledger).unwrap();
        assert_eq!(report.total(), 30);
        assert_eq!(ledger.service_count(), 30);
        assert!(ledger.verify_capacity_constraints().is_empty());
    }

    #[test]
    fn generated_paths_round_trip_against_ledger() {
        let mut ledger = mesh_ledger();
        ServiceGenerator::new(params(25, 7)).run(&mut ledger).unwrap();
        for service in ledger.services() {
            assert_eq!(service.path_nodes.len(), service.path_edges.len() + 1);
            // Each hop is a real edge between consecutive path nodes.
            let mut recomputed_km = 0.0;
            for (i, &edge_id) in service.path_edges.iter().enumerate() {
                let edge = ledger.edge(edge_id).unwrap();
                let (from, to) = (service.path_nodes[i], service.path_nodes[i + 1]);
                assert!(edge.other_endpoint(from) == Some(to));
                let a = ledger.node(from).unwrap();
                let b = ledger.node(to).unwrap();
                recomputed_km += a.position.distance_km(b.position);
            }
            assert!((recomputed_km - service.distance_km).abs() < 1e-9);
            assert!(
                service.created_unix_secs >= 1_577_836_800
                    && service.created_unix_secs < 1_735_689_600
            );
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_services() {
        let run = |seed| {
            let mut ledger = mesh_ledger();
            ServiceGenerator::new(params(20, seed)).run(&mut ledger).unwrap();
            let mut summary: Vec<_> = ledger
                .services()
                .map(|s| (s.name.clone(), s.source, s.destination, s.path_edges.clone()))
                .collect();
            summary.sort();
            summary
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn stage_a_skipped_when_a_node_is_isolated() {
        let mut ledger = Ledger::new();
        let a = ledger
            .insert_node("A", GeoPoint::new(40.0, -74.0), "V", 100.0)
            .unwrap();
        let b = ledger
            .insert_node("B", GeoPoint::new(41.0, -73.0), "V", 100.0)
            .unwrap();
        let c = ledger
            .insert_node("C", GeoPoint::new(42.0, -72.0), "V", 100.0)
            .unwrap();
        ledger.insert_edge(a, b, 100.0).unwrap();
        // C's only edge is too small for the default 5 Gbps demand.
        ledger.insert_edge(b, c, 2.0).unwrap();

        let report = ServiceGenerator::new(params(5, 1)).run(&mut ledger).unwrap();
        assert_eq!(report.stage_a_services, 0);
        // Stage B still routes what it can between A and B.
        assert!(ledger.services().all(|s| s.path_nodes.iter().all(|&n| n != c)));
    }

    #[test]
    fn stage_a_can_be_disabled() {
        let mut ledger = mesh_ledger();
        let p = ServiceGenParams {
            enable_stage_a: false,
            ..params(10, 42)
        };
        let report = ServiceGenerator::new(p).run(&mut ledger).unwrap();
        assert_eq!(report.stage_a_services, 0);
        assert_eq!(report.stage_b_services, 10);
        assert!(ledger.services().all(|s| s.name.starts_with("SVC-B-")));
    }
}
