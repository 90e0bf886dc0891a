//! This module implements the extraction of THOR node blocks: comment lines
//! that tie ME101 nodes to THOR nodes, and optionally give an origin offset
//! for the THOR coordinate system.
//!
//! Errors here are sticky. Once a block is malformed, nothing THOR-derived is
//! produced for the rest of the report.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use log::{debug, error, warn};
use nalgebra::Vector3;
use serde::{Serialize, Deserialize};
use serde_with::skip_serializing_none;

use crate::columns::Field;
use crate::frame::FrameTable;
use crate::util::{decode_float, round_to};

/// What columns 14..23 of a THOR line read.
pub const THOR_MARKER: &str = "THOR NODE";

/// Key of the ME101 node a THOR block belongs to.
pub const NODE_NUMBER_KEY: &str = "ME101 NODE NUMBER";

/// Key of the THOR node number.
pub const THOR_NUMBER_KEY: &str = "THOR NODE NUMBER";

/// Key flagging a block as the one holding the origin.
pub const ORIGIN_KEY: &str = "ORIGIN";

/// Keys of the origin components, in vector order.
pub const ORIGIN_COMPONENTS: [&str; 3] = [
  "EAST_WEST_ORIGIN",
  "NORTH_SOUTH_ORIGIN",
  "UP_DOWN_ORIGIN"
];

/// Something went wrong with a THOR block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThorError {
  /// A THOR line without the ME101 node number.
  MissingNodeNumber {
    /// Line number.
    line: usize
  },
  /// An item that isn't a `KEY=VALUE` pair.
  MalformedItem {
    /// Line number.
    line: usize,
    /// The offending item.
    item: String
  },
  /// A THOR line after an error was already recorded.
  AfterError {
    /// Line number.
    line: usize
  },
  /// An origin block missing one of the components.
  MissingOrigin {
    /// Node of the block.
    node: String,
    /// The missing key.
    key: &'static str
  },
  /// An origin component that is not a number.
  InvalidOrigin {
    /// Node of the block.
    node: String,
    /// The key.
    key: &'static str,
    /// The value found.
    value: String
  },
  /// THOR output was asked for, but the input had errors.
  Unusable
}

impl Display for ThorError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::MissingNodeNumber { line } => write!(
        f, "THOR block on line {} lacks the {}", line, NODE_NUMBER_KEY
      ),
      Self::MalformedItem { line, item } => write!(
        f, "THOR block on line {} has a malformed item \"{}\"", line, item
      ),
      Self::AfterError { line } => write!(
        f, "THOR block on line {} comes after a previous error", line
      ),
      Self::MissingOrigin { node, key } => write!(
        f, "origin block of node {} lacks {}", node, key
      ),
      Self::InvalidOrigin { node, key, value } => write!(
        f, "origin block of node {} has a non-numeric {}: \"{}\"",
        node, key, value
      ),
      Self::Unusable => write!(
        f, "THOR input is not in the correct format, no THOR output"
      )
    };
  }
}

impl Error for ThorError {}

/// One row of the elevation table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ThorElevation {
  /// The ME101 node.
  #[serde(rename = "ME101 NODE NUMBER")]
  pub node: String,
  /// The THOR node.
  #[serde(rename = "THOR NODE NUMBER")]
  pub thor_node: String,
  /// The elevation, rounded to three decimals.
  #[serde(rename = "NODE ELEVATION (FT)")]
  pub elevation: f64
}

/// Every THOR block found, keyed by ME101 node number.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ThorNodes {
  /// Parameters of each node.
  pub nodes: BTreeMap<String, BTreeMap<String, String>>,
  /// ME101 nodes in the order their blocks first appeared.
  pub order: Vec<String>,
  /// The origin offset, if a block gave one.
  pub origin: Option<Vector3<f64>>,
  /// Whether any error occurred. Never goes back to false.
  pub error: bool
}

impl ThorNodes {
  /// Creates an empty set.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Records an error.
  fn fail(&mut self, e: ThorError) -> ThorError {
    error!("{}", e);
    self.error = true;
    return e;
  }

  /// Looks at a line. Returns the ME101 node of a block that was read in.
  pub fn consume(
    &mut self,
    number: usize,
    line: &str
  ) -> Result<Option<String>, ThorError> {
    if Field::ThorMarker.slice(line) != THOR_MARKER {
      return Ok(None);
    }
    if self.error {
      return Err(self.fail(ThorError::AfterError { line: number }));
    }
    let body = match (line.find('{'), line.find('}')) {
      (Some(a), Some(b)) if b > a => &line[a + 1..b],
      (Some(a), _) => &line[a + 1..],
      _ => ""
    };
    let after_key = match body.find(NODE_NUMBER_KEY) {
      Some(i) => &body[i + NODE_NUMBER_KEY.len()..],
      None => {
        return Err(self.fail(ThorError::MissingNodeNumber { line: number }));
      }
    };
    // past the node number, every comma item must be a pair, blanks included
    let (node_part, items) = match after_key.split_once(',') {
      Some((n, rest)) => (n, rest.split(',').collect::<Vec<_>>()),
      None => (after_key, Vec::new())
    };
    let node = node_part.replace('=', "").trim().to_owned();
    let mut params = BTreeMap::new();
    for item in items {
      match item.split_once('=') {
        Some((k, v)) => {
          params.insert(k.trim().to_owned(), v.trim().to_owned());
        },
        None => {
          return Err(self.fail(ThorError::MalformedItem {
            line: number,
            item: item.trim().to_owned()
          }));
        }
      }
    }
    debug!("THOR block for node {} on line {}.", node, number);
    if self.nodes.insert(node.clone(), params).is_none() {
      self.order.push(node.clone());
    }
    return Ok(Some(node));
  }

  /// Looks for the origin block and reads the offset out of it. The first
  /// node (in report order) flagged as the origin is the one used.
  pub fn settle_origin(&mut self) -> Result<Option<Vector3<f64>>, ThorError> {
    if self.error {
      return Err(ThorError::Unusable);
    }
    let found = self.order.iter()
      .filter_map(|node| self.nodes.get(node).map(|params| (node, params)))
      .find(|(_, params)| params.contains_key(ORIGIN_KEY))
      .map(|(node, params)| (node.clone(), params.clone()));
    let (node, params) = match found {
      Some(f) => f,
      None => {
        warn!("No THOR origin given, using relative coordinates.");
        return Ok(None);
      }
    };
    let mut origin = Vector3::zeros();
    for (i, key) in ORIGIN_COMPONENTS.iter().copied().enumerate() {
      let value = match params.get(key) {
        Some(v) => v,
        None => {
          return Err(self.fail(ThorError::MissingOrigin { node, key }));
        }
      };
      origin[i] = match decode_float(value) {
        Some(x) => x,
        None => {
          let value = value.clone();
          return Err(self.fail(ThorError::InvalidOrigin { node, key, value }));
        }
      };
    }
    debug!("THOR origin from node {}: {:?}", node, origin);
    self.origin = Some(origin);
    return Ok(self.origin);
  }

  /// Moves a transformed table into THOR coordinates.
  pub fn apply_origin(&self, table: &FrameTable) -> Result<FrameTable, ThorError> {
    if self.error {
      return Err(ThorError::Unusable);
    }
    return Ok(match self.origin {
      Some(origin) => table.translate(&origin),
      None => table.clone()
    });
  }

  /// The elevation table of every node in a THOR-placed table that has a
  /// THOR block.
  pub fn elevations(
    &self,
    table: &FrameTable
  ) -> Result<Vec<ThorElevation>, ThorError> {
    if self.error {
      return Err(ThorError::Unusable);
    }
    let mut rows = Vec::new();
    for point in table.points.iter() {
      let params = match self.nodes.get(&point.node) {
        Some(p) => p,
        None => continue
      };
      match params.get(THOR_NUMBER_KEY) {
        Some(thor_node) => rows.push(ThorElevation {
          node: point.node.clone(),
          thor_node: thor_node.clone(),
          elevation: round_to(point.position.z, 3)
        }),
        None => warn!(
          "Missing {} for ME101 node {}.", THOR_NUMBER_KEY, point.node
        )
      }
    }
    if rows.is_empty() {
      warn!("No valid THOR node data found.");
    }
    return Ok(rows);
  }
}
