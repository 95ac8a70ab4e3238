//! Whole-topology JSON interchange.
//!
//! The serialized form is [`TopologyExport`]: three id-keyed registries.
//! Export then import reproduces an equivalent ledger (same entities, same
//! recomputed residuals), which is what visualization and backup tooling
//! rely on.

use std::io::{Read, Write};

use capnet_ledger::{Ledger, TopologyExport};

use crate::error::IoResult;

/// Serialize the full ledger state as pretty-printed JSON.
pub fn write_topology<W: Write>(writer: W, ledger: &Ledger) -> IoResult<()> {
    let export = TopologyExport::from_ledger(ledger);
    serde_json::to_writer_pretty(writer, &export)?;
    Ok(())
}

/// Deserialize a topology and rebuild a ledger from it, re-checking
/// referential integrity and recomputing utilization.
pub fn read_topology<R: Read>(reader: R) -> IoResult<Ledger> {
    let export: TopologyExport = serde_json::from_reader(reader)?;
    Ok(export.into_ledger()?)
}
