//! This module implements the extraction of node coordinates, one table per
//! load case, out of the node data echoes of a report.

use std::collections::BTreeSet;

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

use crate::columns::Field;
use crate::connectivity::Connectivity;
use crate::lines::LineStore;
use crate::loadcases::LoadCases;
use crate::util::decode_float;

/// Text starting a node data block.
pub const NODE_DATA_MARKER: &str = "NODE DATA";

/// Text ending a node data block.
pub const ELEMENT_DATA_MARKER: &str = "ELEMENT DATA";

/// Suffix of the alternative form of a node id.
pub const NODE_SUFFIX: &str = " M";

/// Maximum total distance for two tables to count as the same geometry.
pub const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// A node and its coordinates, as written.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoordinateRecord {
  /// The (reconciled) node id.
  pub node: String,
  /// X, as text.
  pub x: String,
  /// Y, as text.
  pub y: String,
  /// Z, as text.
  pub z: String
}

/// The coordinates of a load case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoordinateTable {
  /// The load case.
  pub load_case: String,
  /// The records, in report order.
  pub records: Vec<CoordinateRecord>
}

impl CoordinateTable {
  /// The record of a node.
  pub fn get(&self, node: &str) -> Option<&CoordinateRecord> {
    return self.records.iter().find(|r| r.node == node);
  }

  /// All coordinates as numbers, if every one of them is a number.
  fn numeric(&self) -> Option<Vec<Vector3<f64>>> {
    return self.records.iter()
      .map(|r| Some(Vector3::new(
        decode_float(&r.x)?,
        decode_float(&r.y)?,
        decode_float(&r.z)?
      )))
      .collect();
  }
}

/// Whether the geometry is the same in every load case.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Consistency {
  /// Every table has the same coordinates.
  Consistent,
  /// Some tables differ, by this much in total.
  Inconsistent {
    /// The sum of the distances.
    spread: f64
  },
  /// Couldn't tell: tables of different sizes, or non-numeric coordinates.
  Inconclusive
}

/// Maps a node id onto the form the connectivity knows it by. An id that no
/// edge has, but whose suffixed form some edge has, becomes the suffixed
/// form. Anything else stays.
pub fn reconcile_coordinate_id(id: &str, connectivity: &Connectivity) -> String {
  if !connectivity.contains(id) {
    let suffixed = format!("{}{}", id, NODE_SUFFIX);
    if connectivity.contains(&suffixed) {
      return suffixed;
    }
  }
  return id.to_owned();
}

/// Every coordinate table, plus the ids that were stored as-is.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoordinateSet {
  /// One table per load case with rows, in registry order.
  pub tables: Vec<CoordinateTable>,
  /// Ids stored without reconciliation, spaces removed.
  pub known_ids: BTreeSet<String>
}

impl CoordinateSet {
  /// The table of a load case.
  pub fn table(&self, load_case: &str) -> Option<&CoordinateTable> {
    return self.tables.iter().find(|t| t.load_case == load_case);
  }

  /// Extracts every table of a report.
  pub fn parse(
    store: &LineStore,
    load_cases: &LoadCases,
    connectivity: &Connectivity
  ) -> Self {
    let mut tables = load_cases.iter()
      .map(|lc| CoordinateTable { load_case: lc.clone(), records: Vec::new() })
      .collect::<Vec<_>>();
    let mut known_ids = BTreeSet::new();
    let mut current: Option<usize> = None;
    for line in store.lines() {
      let text = line.text.as_str();
      if text.contains(NODE_DATA_MARKER) {
        let lc = Field::NodeDataLoadCase.trimmed(text);
        if let Some(i) = tables.iter().position(|t| t.load_case == lc) {
          debug!("Node data of {} starts on line {}.", lc, line.number);
          current = Some(i);
        }
      }
      if current.is_some() && text.contains(ELEMENT_DATA_MARKER) {
        current = None;
      }
      let table = match current {
        Some(i) => &mut tables[i],
        None => continue
      };
      if !Field::NodeDataBand.qualifies(text) {
        continue;
      }
      let raw = Field::NodeDataNode.trimmed(text);
      let node = reconcile_coordinate_id(raw, connectivity);
      if node == raw {
        known_ids.insert(raw.replace(' ', ""));
      }
      if table.get(&node).is_some() {
        warn!(
          "Node {} repeated in {} on line {}, keeping the first.",
          node, table.load_case, line.number
        );
        continue;
      }
      table.records.push(CoordinateRecord {
        node,
        x: Field::NodeDataX.trimmed(text).to_owned(),
        y: Field::NodeDataY.trimmed(text).to_owned(),
        z: Field::NodeDataZ.trimmed(text).to_owned()
      });
    }
    tables.retain(|t| {
      if t.records.is_empty() {
        debug!("No coordinates for {}, dropping it.", t.load_case);
      }
      !t.records.is_empty()
    });
    return Self { tables, known_ids };
  }

  /// Compares the coordinates of every pair of load cases.
  pub fn consistency(&self) -> Consistency {
    let numeric = match self.tables.iter()
      .map(CoordinateTable::numeric)
      .collect::<Option<Vec<_>>>() {
      Some(n) => n,
      None => return Consistency::Inconclusive
    };
    let mut spread = 0.0;
    for a in numeric.iter() {
      for b in numeric.iter() {
        if a.len() != b.len() {
          return Consistency::Inconclusive;
        }
        // frobenius norm of the difference
        spread += a.iter().zip(b.iter())
          .map(|(p, q)| (p - q).norm_squared())
          .sum::<f64>()
          .sqrt();
      }
    }
    if spread < CONSISTENCY_TOLERANCE {
      return Consistency::Consistent;
    }
    return Consistency::Inconsistent { spread };
  }
}
