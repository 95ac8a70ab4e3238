//! `capnet-core` — foundational types for the capnet network simulation engine.
//!
//! This crate is a dependency of every other `capnet-*` crate.  It
//! intentionally has no `capnet-*` dependencies and minimal external ones
//! (only `rand` and `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `ServiceId`                           |
//! | [`geo`]    | `GeoPoint`, haversine distance in km                      |
//! | [`rng`]    | `NetRng` — explicitly seeded PRNG for reproducible runs   |
//! | [`config`] | `BuildParams`, `ServiceGenParams` tunables with defaults  |

pub mod config;
pub mod geo;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BuildParams, ServiceGenParams};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId, ServiceId};
pub use rng::NetRng;
