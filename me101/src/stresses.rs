//! This module implements the extraction of sustained stresses per node.

use std::collections::BTreeSet;

use itertools::{Itertools, MinMaxResult};
use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::columns::Field;
use crate::lines::LineStore;
use crate::sections::Sections;
use crate::util::decode_float;

/// A stress row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StressRecord {
  /// The (reconciled) node id.
  pub node: String,
  /// The sustained stress, as text.
  pub stress: String,
  /// The secondary value next to it, as text.
  pub secondary: String
}

impl StressRecord {
  /// The stress as a number.
  pub fn stress_value(&self) -> Option<f64> {
    return decode_float(&self.stress);
  }
}

/// Maps a stress row id onto a known coordinate id. An unknown id whose
/// last character can be dropped to get a known one is shortened; anything
/// else stays.
pub fn reconcile_stress_id(id: &str, known: &BTreeSet<String>) -> String {
  if !known.contains(id) {
    let mut shorter = id.chars();
    if shorter.next_back().is_some() && known.contains(shorter.as_str()) {
      return shorter.as_str().to_owned();
    }
  }
  return id.to_owned();
}

/// Every stress row, in report order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StressTable {
  /// The rows.
  pub records: Vec<StressRecord>
}

impl StressTable {
  /// The first row for a node.
  pub fn first_for(&self, node: &str) -> Option<&StressRecord> {
    return self.records.iter().find(|r| r.node == node);
  }

  /// The smallest and largest numeric stresses. Rows that aren't numbers
  /// don't count.
  pub fn range(&self) -> Option<(f64, f64)> {
    let values = self.records.iter().filter_map(StressRecord::stress_value);
    return match values.minmax_by(|a, b| a.total_cmp(b)) {
      MinMaxResult::NoElements => None,
      MinMaxResult::OneElement(x) => Some((x, x)),
      MinMaxResult::MinMax(lo, hi) => Some((lo, hi))
    };
  }

  /// Number of rows.
  pub fn len(&self) -> usize {
    return self.records.len();
  }

  /// Whether there are no rows.
  pub fn is_empty(&self) -> bool {
    return self.records.is_empty();
  }

  /// Extracts the stress rows of a report, from the stress analysis onwards.
  pub fn parse(
    store: &LineStore,
    sections: &Sections,
    known_ids: &BTreeSet<String>
  ) -> Self {
    let start = match sections.stress_analysis.start {
      Some(s) => s,
      None => {
        warn!("No stress analysis in the report, no stresses.");
        return Self::default();
      }
    };
    let mut records = Vec::new();
    for line in store.from_line(start) {
      let text = line.text.as_str();
      if !Field::StressBand.qualifies(text) {
        continue;
      }
      let raw = Field::StressNode.trimmed(text);
      let node = reconcile_stress_id(raw, known_ids);
      if node != raw {
        warn!(
          "Stress node {} on line {} is unknown, using {}.",
          raw, line.number, node
        );
      }
      records.push(StressRecord {
        node,
        stress: Field::StressValue.trimmed(text).to_owned(),
        secondary: Field::StressSecondary.trimmed(text).to_owned()
      });
    }
    debug!("Found {} stress rows.", records.len());
    return Self { records };
  }
}
