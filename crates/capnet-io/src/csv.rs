//! Typed CSV node rows.
//!
//! Column layout: `name,lat,long,vendor,capacity_gbps` — one site per row.
//! Rows are parsed into [`NodeRow`] structs and inserted into the ledger
//! row-wise; validation (coordinate ranges, positive capacity, unique
//! names) happens in the ledger insert, so a bad row surfaces as a typed
//! ledger error naming the problem.

use std::io::{Read, Write};

use capnet_core::{GeoPoint, NodeId};
use capnet_ledger::Ledger;
use serde::{Deserialize, Serialize};

use crate::error::IoResult;

/// One node as stored in a nodes CSV file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub name: String,
    pub lat: f64,
    #[serde(rename = "long")]
    pub lon: f64,
    pub vendor: String,
    pub capacity_gbps: f64,
}

impl NodeRow {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Read all node rows from CSV data (header row required).
pub fn read_nodes<R: Read>(reader: R) -> IoResult<Vec<NodeRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write node rows as CSV with a header row.
pub fn write_nodes<W: Write>(writer: W, rows: &[NodeRow]) -> IoResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Insert every row into the ledger, returning the assigned ids in row
/// order.  Stops at the first rejected row.
pub fn load_into_ledger(ledger: &mut Ledger, rows: &[NodeRow]) -> IoResult<Vec<NodeId>> {
    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        ids.push(ledger.insert_node(
            &row.name,
            row.position(),
            &row.vendor,
            row.capacity_gbps,
        )?);
    }
    Ok(ids)
}
