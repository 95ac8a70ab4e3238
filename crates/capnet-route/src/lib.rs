//! `capnet-route` — capacity-constrained path computation.
//!
//! Two consumers, one graph view:
//!
//! * the **interactive router** ([`astar`]) answers ad-hoc shortest-path
//!   queries where residual capacity is a hard edge filter and geographic
//!   distance is the cost;
//! * the **bulk service generator** ([`generator`]) populates a fresh
//!   topology with services in two stages — an edge cover guaranteeing every
//!   node becomes a service endpoint ([`cover`]), then capacity-aware
//!   Dijkstra sampling ([`dijkstra`]) until a target count is reached.
//!
//! Both work over a [`graph::GraphView`] snapshot of the ledger's adjacency
//! and residual capacities.

pub mod astar;
pub mod cover;
pub mod dijkstra;
pub mod error;
pub mod generator;
pub mod graph;

#[cfg(test)]
mod tests;

pub use astar::{AStarRouter, RouteOutcome};
pub use error::{RouteError, RouteResult};
pub use generator::{GenerationReport, ServiceGenerator};
pub use graph::GraphView;
