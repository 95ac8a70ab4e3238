//! Seeded synthetic site generation.
//!
//! Draws from a fixed table of eastern-US cities with real coordinates, so
//! generated topologies have plausible geography.  The first `hub_count`
//! drawn cities become high-capacity hubs; vendor names are assigned
//! uniformly from a fixed roster.

use rand::seq::SliceRandom;

use capnet_core::NetRng;

use crate::csv::NodeRow;
use crate::error::{IoError, IoResult};

/// Eastern-US cities with WGS-84 coordinates.
const CITIES: &[(&str, f64, f64)] = &[
    ("New York-NY", 40.7128, -74.0060),
    ("Boston-MA", 42.3601, -71.0589),
    ("Philadelphia-PA", 39.9526, -75.1652),
    ("Pittsburgh-PA", 40.4406, -79.9959),
    ("Baltimore-MD", 39.2904, -76.6122),
    ("Washington-DC", 38.9072, -77.0369),
    ("Richmond-VA", 37.5407, -77.4360),
    ("Norfolk-VA", 36.8508, -76.2859),
    ("Raleigh-NC", 35.7796, -78.6382),
    ("Charlotte-NC", 35.2271, -80.8431),
    ("Atlanta-GA", 33.7490, -84.3880),
    ("Miami-FL", 25.7617, -80.1918),
    ("Orlando-FL", 28.5383, -81.3792),
    ("Jacksonville-FL", 30.3322, -81.6557),
    ("Tampa-FL", 27.9506, -82.4572),
    ("Charleston-SC", 32.7765, -79.9311),
    ("Columbia-SC", 34.0007, -81.0348),
    ("Nashville-TN", 36.1627, -86.7816),
    ("Memphis-TN", 35.1495, -90.0490),
    ("Knoxville-TN", 35.9606, -83.9207),
    ("Louisville-KY", 38.2527, -85.7585),
    ("Lexington-KY", 38.0406, -84.5037),
    ("Cincinnati-OH", 39.1031, -84.5120),
    ("Columbus-OH", 39.9612, -82.9988),
    ("Cleveland-OH", 41.4993, -81.6944),
    ("Akron-OH", 41.0814, -81.5190),
    ("Toledo-OH", 41.6528, -83.5379),
    ("Dayton-OH", 39.7589, -84.1916),
    ("Indianapolis-IN", 39.7684, -86.1581),
    ("Detroit-MI", 42.3314, -83.0458),
    ("Grand Rapids-MI", 42.9634, -85.6681),
    ("Lansing-MI", 42.7325, -84.5555),
    ("Chicago-IL", 41.8781, -87.6298),
    ("Springfield-IL", 39.7817, -89.6501),
    ("Buffalo-NY", 42.8864, -78.8784),
    ("Rochester-NY", 43.1566, -77.6088),
    ("Syracuse-NY", 43.0481, -76.1474),
    ("Albany-NY", 42.6526, -73.7562),
    ("Hartford-CT", 41.7658, -72.6734),
    ("New Haven-CT", 41.3083, -72.9279),
    ("Providence-RI", 41.8240, -71.4128),
    ("Portland-ME", 43.6591, -70.2568),
    ("Manchester-NH", 42.9956, -71.4548),
    ("Burlington-VT", 44.4759, -73.2121),
    ("Trenton-NJ", 40.2171, -74.7429),
    ("Newark-NJ", 40.7357, -74.1724),
    ("Wilmington-DE", 39.7391, -75.5398),
    ("Dover-DE", 39.1582, -75.5244),
    ("Harrisburg-PA", 40.2732, -76.8867),
    ("Scranton-PA", 41.4090, -75.6624),
];

/// Parody vendor roster.
const VENDORS: &[&str] = &[
    "Tonio Networks",
    "Agave Networks",
    "Toscana Systems",
    "Cadenza Networks",
    "Suomi Networks",
];

const HUB_CAPACITY_GBPS: std::ops::RangeInclusive<u32> = 3_000..=5_000;
const REGULAR_CAPACITY_GBPS: std::ops::RangeInclusive<u32> = 400..=2_000;

/// Generate `num_nodes` synthetic sites, the first `hub_count` of them
/// high-capacity hubs, sorted by capacity descending.  Deterministic for a
/// fixed seed.
pub fn generate_sites(num_nodes: usize, hub_count: usize, seed: u64) -> IoResult<Vec<NodeRow>> {
    if num_nodes > CITIES.len() {
        return Err(IoError::NotEnoughCities {
            requested: num_nodes,
            available: CITIES.len(),
        });
    }

    let mut rng = NetRng::new(seed);
    let mut cities: Vec<&(&str, f64, f64)> = CITIES.iter().collect();
    cities.shuffle(rng.inner());

    let mut rows: Vec<NodeRow> = cities
        .into_iter()
        .take(num_nodes)
        .enumerate()
        .map(|(i, &(name, lat, lon))| {
            let capacity = if i < hub_count {
                rng.gen_range(HUB_CAPACITY_GBPS)
            } else {
                rng.gen_range(REGULAR_CAPACITY_GBPS)
            };
            NodeRow {
                name: name.to_owned(),
                lat,
                lon,
                vendor: rng
                    .choose(VENDORS)
                    .copied()
                    .unwrap_or("Tonio Networks")
                    .to_owned(),
                capacity_gbps: f64::from(capacity),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.capacity_gbps.total_cmp(&a.capacity_gbps));
    Ok(rows)
}
