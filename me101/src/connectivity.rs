//! This module implements the extraction of node connectivity (which nodes
//! make up each pipe element) out of the stress analysis tables.

use std::iter::once;

use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::columns::Field;
use crate::lines::{LineStore, RawLine};
use crate::sections::Sections;

/// Text in the header of a connectivity table.
pub const CONNECTIVITY_HEADER: &str = " FROM ";

/// Banner after the stress tables.
pub const CONNECTIVITY_END: &str = "PIPING STRESS SUMMARY CHECK AND COVER SHEET";

/// How many lines after the header the first row is.
pub const ANCHOR_OFFSET: usize = 4;

/// A pipe element, as the nodes at its ends.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConnectivityEdge {
  /// Node at the start.
  pub from: String,
  /// Node at the end.
  pub to: String
}

/// Every edge found, in discovery order. Duplicates are kept.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connectivity {
  /// The edges.
  pub edges: Vec<ConnectivityEdge>
}

impl Connectivity {
  /// Whether a node is at either end of any edge.
  pub fn contains(&self, node: &str) -> bool {
    return self.edges.iter().any(|e| e.from == node || e.to == node);
  }

  /// Number of edges.
  pub fn len(&self) -> usize {
    return self.edges.len();
  }

  /// Whether there are no edges.
  pub fn is_empty(&self) -> bool {
    return self.edges.is_empty();
  }
}

/// Where the extractor is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TableState {
  /// Looking for a header.
  Waiting,
  /// Saw a header; the first row should be on this line.
  Armed(usize),
  /// Reading rows.
  Reading
}

/// Whether a line is a row of numbers in a connectivity table.
fn is_data_row(line: &str) -> bool {
  return Field::ConnectivityBand.qualifies(line);
}

/// Extracts the edges from a run of lines.
pub fn extract_edges(lines: &[RawLine]) -> Connectivity {
  let mut edges = Vec::new();
  let mut state = TableState::Waiting;
  let nexts = lines.iter().skip(1).map(Some).chain(once(None));
  for (line, next) in lines.iter().zip(nexts) {
    let text = line.text.as_str();
    state = match state {
      TableState::Waiting | TableState::Armed(_)
        if text.contains(CONNECTIVITY_HEADER) => {
        debug!("Connectivity header on line {}.", line.number);
        TableState::Armed(line.number + ANCHOR_OFFSET)
      },
      TableState::Armed(anchor) if line.number == anchor => {
        if is_data_row(text) {
          TableState::Reading
        } else {
          warn!(
            "No connectivity row where expected on line {}, dropping header.",
            line.number
          );
          TableState::Waiting
        }
      },
      other => other
    };
    if state != TableState::Reading {
      continue;
    }
    if text.contains(CONNECTIVITY_END) {
      debug!("Connectivity table ends on line {}.", line.number);
      state = TableState::Waiting;
      continue;
    }
    if let Some(next) = next {
      if is_data_row(text) && is_data_row(&next.text) {
        edges.push(ConnectivityEdge {
          from: Field::ConnectivityNode.trimmed(text).to_owned(),
          to: Field::ConnectivityNode.trimmed(&next.text).to_owned()
        });
      }
    }
  }
  return Connectivity { edges };
}

/// Extracts the edges of a report, from the stress analysis onwards.
pub fn parse(store: &LineStore, sections: &Sections) -> Connectivity {
  return match sections.stress_analysis.start {
    Some(start) => extract_edges(store.from_line(start)),
    None => {
      warn!("No stress analysis in the report, no connectivity.");
      Connectivity::default()
    }
  };
}
