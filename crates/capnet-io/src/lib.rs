//! `capnet-io` — getting node and topology data in and out of the engine.
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`csv`]   | Typed node rows, CSV read/write, ledger loading           |
//! | [`synth`] | Seeded synthetic site generation (eastern-US city table)  |
//! | [`json`]  | Whole-topology JSON export/import via `TopologyExport`    |
//! | [`error`] | `IoError`, `IoResult<T>`                                  |

pub mod csv;
pub mod error;
pub mod json;
pub mod synth;


pub use csv::NodeRow;
pub use error::{IoError, IoResult};
