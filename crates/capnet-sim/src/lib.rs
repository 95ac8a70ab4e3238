//! `capnet-sim` — the orchestration layer tying the engine together.
//!
//! [`NetworkSim`] owns a ledger plus the two parameter sets and drives the
//! standard lifecycle: load or synthesize nodes, build the topology
//! (fatal on verification failure), populate services, then serve
//! interactive route queries and analytics against the live state.

pub mod error;
pub mod sim;


pub use error::{SimError, SimResult};
pub use sim::{NetworkSim, SimSummary};
