//! Unit tests for capnet-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, ServiceId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(ServiceId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(ServiceId(7).to_string(), "ServiceId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert!(p.distance_km(p) < 1e-9);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111.2 km
        let a = GeoPoint::new(40.0, -74.0);
        let b = GeoPoint::new(41.0, -74.0);
        let d = a.distance_km(b);
        assert!((d - 111.195).abs() < 0.5, "got {d}");
    }

    #[test]
    fn symmetric() {
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let bos = GeoPoint::new(42.3601, -71.0589);
        assert!((nyc.distance_km(bos) - bos.distance_km(nyc)).abs() < 1e-9);
        // NYC–Boston is roughly 306 km
        assert!((nyc.distance_km(bos) - 306.0).abs() < 5.0);
    }

    #[test]
    fn range_validation() {
        assert!(GeoPoint::new(90.0, 180.0).in_valid_range());
        assert!(GeoPoint::new(-90.0, -180.0).in_valid_range());
        assert!(!GeoPoint::new(91.0, 0.0).in_valid_range());
        assert!(!GeoPoint::new(0.0, 180.5).in_valid_range());
    }
}

#[cfg(test)]
mod rng {
    use crate::NetRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = NetRng::new(12345);
        let mut r2 = NetRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.gen_range(0.0..1.0);
            let b: f64 = r2.gen_range(0.0..1.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn child_streams_diverge() {
        let mut root = NetRng::new(1);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let a: u64 = c0.gen_range(0..u64::MAX);
        let b: u64 = c1.gen_range(0..u64::MAX);
        assert_ne!(a, b);
    }

    #[test]
    fn jitter_bounds() {
        let mut rng = NetRng::new(7);
        for _ in 0..1000 {
            let j = rng.jitter(0.01);
            assert!((-0.01..=0.01).contains(&j));
        }
        assert_eq!(rng.jitter(0.0), 0.0);
    }

    #[test]
    fn weighted_sampling_respects_zeros() {
        let mut rng = NetRng::new(3);
        // Only index 2 has weight — must always be chosen.
        for _ in 0..50 {
            assert_eq!(rng.sample_weighted(&[0.0, 0.0, 5.0, 0.0]), Some(2));
        }
        assert_eq!(rng.sample_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.sample_weighted(&[]), None);
    }

    #[test]
    fn weighted_sampling_hits_all_positive_entries() {
        let mut rng = NetRng::new(11);
        let weights = [1.0, 2.0, 3.0];
        let mut seen = [false; 3];
        for _ in 0..500 {
            let i = rng.sample_weighted(&weights).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}

#[cfg(test)]
mod config {
    use crate::{BuildParams, ServiceGenParams};

    #[test]
    fn build_defaults() {
        let p = BuildParams::default();
        assert_eq!(p.gamma, 1.5);
        assert_eq!(p.beta, 2.0);
        assert_eq!(p.eta, 0.4);
        assert_eq!(p.target_edges, 200);
        assert_eq!(p.spokes_per_node, 2);
        assert!(p.eta > 0.0 && p.eta <= 0.5);
    }

    #[test]
    fn servicegen_defaults() {
        let p = ServiceGenParams::default();
        assert_eq!(p.demand_gbps, 5.0);
        assert_eq!(p.target_services, 100);
        assert!(p.enable_stage_a);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let p: BuildParams = serde_json::from_str(r#"{"target_edges": 40}"#).unwrap();
        assert_eq!(p.target_edges, 40);
        assert_eq!(p.gamma, 1.5);
    }
}
