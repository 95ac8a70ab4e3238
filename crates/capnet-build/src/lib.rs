//! `capnet-build` — capacity-aware topology construction.
//!
//! Turns a node set already registered in the ledger into a connected,
//! capacity-feasible edge set via a three-phase preference-score algorithm,
//! then verifies connectivity and per-node capacity budgets before any edge
//! reaches the ledger.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`builder`] | [`ConnectionBuilder`] — the three phases              |
//! | [`verify`]  | Post-build connectivity + budget checks               |
//! | [`error`]   | `BuildError` (fatal; a failed build must be discarded)|

pub mod builder;
pub mod error;
pub mod verify;

#[cfg(test)]
mod tests;

pub use builder::{BuildReport, ConnectionBuilder};
pub use error::{BuildError, BuildResult};
