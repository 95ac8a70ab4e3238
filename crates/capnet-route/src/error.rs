//! Routing errors.
//!
//! Infeasibility (`NoRoute`) is an expected outcome, not an exceptional one,
//! and carries the query parameters so callers can report *which* request
//! had no feasible path — distinct from referencing a node that does not
//! exist at all.

use capnet_core::NodeId;
use capnet_ledger::LedgerError;
use std::fmt;

// `Display`/`Error` are written by hand: a field named `source` makes
// thiserror's derive treat it as the error's source, but here it is a query
// parameter (the route's source node), which does not implement `Error`.
#[derive(Debug)]
pub enum RouteError {
    NodeNotFound(NodeId),

    NoRoute {
        source: NodeId,
        destination: NodeId,
        demand_gbps: f64,
    },

    IsolatedNodes { count: usize },

    Ledger(LedgerError),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NodeNotFound(node) => write!(f, "node {node} not found"),
            RouteError::NoRoute {
                source,
                destination,
                demand_gbps,
            } => write!(
                f,
                "no route from {source} to {destination} with {demand_gbps} Gbps of capacity on every edge"
            ),
            RouteError::IsolatedNodes { count } => write!(
                f,
                "no edge cover exists: {count} node(s) have no edge with sufficient residual"
            ),
            RouteError::Ledger(inner) => fmt::Display::fmt(inner, f),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::Ledger(inner) => std::error::Error::source(inner),
            _ => None,
        }
    }
}

impl From<LedgerError> for RouteError {
    fn from(err: LedgerError) -> Self {
        RouteError::Ledger(err)
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
