//! Build errors.  All of them are fatal: a topology that fails construction
//! or verification must be discarded, not patched up and used.

use capnet_core::NodeId;
use capnet_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot build a topology from {nodes} node(s); need at least 2")]
    InsufficientNodes { nodes: usize },

    #[error("graph is not connected: reached {reached} of {total} nodes")]
    Disconnected { reached: usize, total: usize },

    #[error(
        "node {node} capacity budget exceeded: used {used:.2} of {capacity:.2} Gbps"
    )]
    BudgetExceeded {
        node: NodeId,
        capacity: f64,
        used: f64,
    },

    #[error("ledger rejected a built edge: {0}")]
    Ledger(#[from] LedgerError),
}

pub type BuildResult<T> = Result<T, BuildError>;
