//! This module implements the coordinate frame transform, which turns a
//! table of coordinates as written into numeric points in a plant's
//! convention.

use std::fmt::Display;
use std::str::FromStr;

use log::warn;
use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

use crate::coordinates::CoordinateTable;
use crate::errors::ReportError;
use crate::util::decode_float;

/// A convention for the axes of a plant.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum Convention {
  /// Axes as written in the report.
  Raw,
  /// X stays, Y becomes -Z, Z becomes Y.
  Hc
}

impl Convention {
  /// All conventions.
  pub const fn all() -> &'static [Self] {
    return &[Self::Raw, Self::Hc];
  }

  /// The name of the convention.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Raw => "raw",
      Self::Hc => "hc"
    };
  }

  /// Applies the convention to a point.
  pub fn apply(&self, p: Vector3<f64>) -> Vector3<f64> {
    return match self {
      Self::Raw => p,
      Self::Hc => Vector3::new(p.x, -p.z, p.y)
    };
  }
}

impl FromStr for Convention {
  type Err = ReportError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    return Self::all()
      .iter()
      .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
      .copied()
      .ok_or_else(|| ReportError::UnknownConvention(s.to_owned()));
  }
}

impl TryFrom<String> for Convention {
  type Error = ReportError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    return s.parse();
  }
}

impl From<Convention> for String {
  fn from(c: Convention) -> String {
    return c.name().to_owned();
  }
}

impl Display for Convention {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// A node at a numeric position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FramePoint {
  /// The node.
  pub node: String,
  /// Where it is.
  pub position: Vector3<f64>
}

/// The points of a load case in some convention.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FrameTable {
  /// The load case.
  pub load_case: String,
  /// The convention of the points.
  pub convention: Convention,
  /// The points, in the order of the coordinate table.
  pub points: Vec<FramePoint>
}

impl FrameTable {
  /// Converts a coordinate table. Rows that aren't numbers are left out,
  /// with a warning.
  pub fn transform(table: &CoordinateTable, convention: Convention) -> Self {
    let points = table.records.iter()
      .filter_map(|r| {
        let xyz = [&r.x, &r.y, &r.z].map(|s| decode_float(s));
        match xyz {
          [Some(x), Some(y), Some(z)] => Some(FramePoint {
            node: r.node.clone(),
            position: convention.apply(Vector3::new(x, y, z))
          }),
          _ => {
            warn!(
              "Coordinates of node {} in {} are not numbers, dropping it.",
              r.node, table.load_case
            );
            None
          }
        }
      })
      .collect();
    return Self { load_case: table.load_case.clone(), convention, points };
  }

  /// The position of a node.
  pub fn get(&self, node: &str) -> Option<Vector3<f64>> {
    return self.points.iter()
      .find(|p| p.node == node)
      .map(|p| p.position);
  }

  /// The same table, moved by an offset.
  pub fn translate(&self, by: &Vector3<f64>) -> Self {
    let points = self.points.iter()
      .map(|p| FramePoint { node: p.node.clone(), position: p.position + by })
      .collect();
    return Self {
      load_case: self.load_case.clone(),
      convention: self.convention,
      points
    };
  }
}
