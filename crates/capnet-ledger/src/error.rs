//! Ledger error type.
//!
//! Variants are grouped by the three caller-distinguishable kinds: not-found
//! (the referenced id does not exist), conflict (the entity exists but a
//! referential or uniqueness guard forbids the operation), and validation
//! (malformed input independent of current state).  Callers that need the
//! kind rather than the specific variant use [`LedgerError::kind`].

use capnet_core::{EdgeId, NodeId, ServiceId};
use thiserror::Error;

/// Coarse classification of a [`LedgerError`], mirroring the error taxonomy
/// an HTTP façade would map to status codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    // ── Not-found ─────────────────────────────────────────────────────────
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("service {0} not found")]
    ServiceNotFound(ServiceId),

    #[error("no edge between nodes {0} and {1}")]
    EdgeNotFoundByEndpoints(NodeId, NodeId),

    // ── Conflict ──────────────────────────────────────────────────────────
    #[error("node name '{0}' already exists")]
    DuplicateNodeName(String),

    #[error("edge between {0} and {1} already exists")]
    DuplicateEdge(NodeId, NodeId),

    #[error("node {node} is referenced by {edges} edge(s) and {services} service(s)")]
    NodeInUse {
        node: NodeId,
        edges: usize,
        services: usize,
    },

    #[error("edge {edge} is referenced by {services} service(s)")]
    EdgeInUse { edge: EdgeId, services: usize },

    // ── Validation ────────────────────────────────────────────────────────
    #[error("{what} capacity must be positive, got {value}")]
    NonPositiveCapacity { what: &'static str, value: f64 },

    #[error("demand must be positive, got {0}")]
    NonPositiveDemand(f64),

    #[error("coordinates ({lat}, {lon}) outside valid range")]
    CoordinateOutOfRange { lat: f64, lon: f64 },

    #[error("edge endpoints must be distinct, got {0} twice")]
    SelfLoop(NodeId),

    #[error("service source and destination must be distinct, got {0} twice")]
    SameEndpoints(NodeId),

    #[error("path has {nodes} node(s) and {edges} edge(s); expected edges = nodes - 1 with at least 1 hop")]
    PathLengthMismatch { nodes: usize, edges: usize },

    #[error("path must start at the source and end at the destination")]
    PathEndpointMismatch,

    #[error("path revisits node {0}")]
    PathNotSimple(NodeId),

    #[error("path hop {hop} uses edge {edge}, which does not connect {from} and {to}")]
    PathHopNotAnEdge {
        hop: usize,
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
    },

    #[error("edge {edge} has residual {residual:.3} Gbps, below demand {demand:.3} Gbps")]
    InsufficientCapacity {
        edge: EdgeId,
        residual: f64,
        demand: f64,
    },
}

impl LedgerError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        use LedgerError::*;
        match self {
            NodeNotFound(_) | EdgeNotFound(_) | ServiceNotFound(_)
            | EdgeNotFoundByEndpoints(..) => ErrorKind::NotFound,
            DuplicateNodeName(_) | DuplicateEdge(..) | NodeInUse { .. } | EdgeInUse { .. } => {
                ErrorKind::Conflict
            }
            _ => ErrorKind::Validation,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
