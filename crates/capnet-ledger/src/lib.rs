//! `capnet-ledger` — the authoritative store of network state.
//!
//! The ledger owns three entity registries (nodes, edges, services) plus a
//! pre-aggregated per-edge utilization record, and exposes the mutation and
//! residual-capacity operations every other component builds on.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`entity`] | `Node`, `Edge`, `Service`, utilization records and views   |
//! | [`ledger`] | The [`Ledger`] itself: mutation ops + capacity queries     |
//! | [`path`]   | Service-path validation against live ledger state          |
//! | [`export`] | `TopologyExport` — the canonical interchange registries    |
//! | [`error`]  | `LedgerError`, `LedgerResult<T>`                           |
//!
//! # Write discipline
//!
//! Every mutating operation validates first and applies second, so a failed
//! call leaves the ledger exactly as it was.  Mutations take `&mut self` and
//! reads take `&self`; concurrent use requires an external lock around the
//! ledger instance (single-writer, many-reader).

pub mod entity;
pub mod error;
pub mod export;
pub mod ledger;
pub mod path;


pub use entity::{CapacityViolation, Edge, EdgeUtilization, EdgeView, Node, NodeView, Service};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use export::TopologyExport;
pub use ledger::{Ledger, LedgerStats, CAPACITY_TOLERANCE};
pub use path::ServicePath;
