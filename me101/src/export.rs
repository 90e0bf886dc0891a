//! This module implements the export of extracted tables to CSV, and of tube
//! meshes to Wavefront OBJ files with vertex colours.

use std::fmt::Display;
use std::io::{self, Write};

use clap::ValueEnum;
use log::info;
use serde::{Serialize, Deserialize};

use crate::errors::ReportError;
use crate::frame::Convention;
use crate::mesh::TubeSet;
use crate::report::PipeReport;

/// Headers of the THOR elevation table.
pub const ELEVATION_HEADERS: [&str; 3] = [
  "ME101 NODE NUMBER",
  "THOR NODE NUMBER",
  "NODE ELEVATION (FT)"
];

/// The tables that can be written as CSV.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
  ValueEnum
)]
#[clap(rename_all = "snake_case")]
pub enum CsvTable {
  /// Coordinates as written, for every load case.
  Coordinates,
  /// Coordinates of one load case, in a convention.
  Frame,
  /// Sustained stresses.
  Stresses,
  /// Pipe elements.
  Connectivity,
  /// THOR node elevations of one load case.
  Elevations,
  /// Parameters from comments.
  Parameters,
  /// Nozzle check results.
  Nozzles
}

impl CsvTable {
  /// All tables.
  pub const fn all() -> &'static [Self] {
    return &[
      Self::Coordinates, Self::Frame, Self::Stresses, Self::Connectivity,
      Self::Elevations, Self::Parameters, Self::Nozzles
    ];
  }

  /// The name of the table.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Coordinates => "coordinates",
      Self::Frame => "frame",
      Self::Stresses => "stresses",
      Self::Connectivity => "connectivity",
      Self::Elevations => "elevations",
      Self::Parameters => "parameters",
      Self::Nozzles => "nozzles"
    };
  }

  /// Whether the table is for a single load case.
  pub const fn per_load_case(&self) -> bool {
    return matches!(self, Self::Frame | Self::Elevations);
  }
}

impl Display for CsvTable {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// Writes a table. Tables for a single load case need one; the others use
/// it as a filter when it's there. Returns the number of rows written.
pub fn write_table<W: Write>(
  wtr: &mut csv::Writer<W>,
  table: CsvTable,
  report: &PipeReport,
  load_case: Option<&str>,
  convention: Convention
) -> Result<usize, ReportError> {
  let required = || load_case
    .ok_or_else(|| ReportError::NoLoadCase(Vec::new()));
  let mut rows = 0;
  match table {
    CsvTable::Coordinates => {
      wtr.write_record(["LOAD CASE", "NODE", "X", "Y", "Z"])?;
      let tables = report.coordinates.tables.iter()
        .filter(|t| load_case.map_or(true, |lc| lc == t.load_case));
      for t in tables {
        for r in t.records.iter() {
          wtr.write_record([&t.load_case, &r.node, &r.x, &r.y, &r.z])?;
          rows += 1;
        }
      }
    },
    CsvTable::Frame => {
      let frame = report.frame(required()?, convention)?;
      wtr.write_record(["NODE", "X", "Y", "Z"])?;
      for p in frame.points.iter() {
        wtr.write_record([
          p.node.clone(),
          p.position.x.to_string(),
          p.position.y.to_string(),
          p.position.z.to_string()
        ])?;
        rows += 1;
      }
    },
    CsvTable::Stresses => {
      wtr.write_record(["NODE", "STRESS", "SECONDARY"])?;
      for r in report.stresses.records.iter() {
        wtr.write_record([&r.node, &r.stress, &r.secondary])?;
        rows += 1;
      }
    },
    CsvTable::Connectivity => {
      wtr.write_record(["FROM", "TO"])?;
      for e in report.connectivity.edges.iter() {
        wtr.write_record([&e.from, &e.to])?;
        rows += 1;
      }
    },
    CsvTable::Elevations => {
      let elevations = report.thor_elevations(required()?, convention)?;
      if elevations.is_empty() {
        wtr.write_record(ELEVATION_HEADERS)?;
      }
      for e in elevations.iter() {
        wtr.serialize(e)?;
        rows += 1;
      }
    },
    CsvTable::Parameters => {
      wtr.write_record(["NAME", "KEY", "VALUE"])?;
      for (key, value) in report.params.iter() {
        wtr.write_record([
          key.snake_case_name(),
          key.text().to_owned(),
          value.render()
        ])?;
        rows += 1;
      }
    },
    CsvTable::Nozzles => {
      wtr.write_record(["NODE", "FIELD", "VALUE"])?;
      for (node, check) in report.nozzles.iter() {
        for (field, value) in check.fields() {
          wtr.write_record([node.as_str(), field, value.as_str()])?;
          rows += 1;
        }
      }
    }
  }
  wtr.flush()?;
  info!("Wrote {} rows of {}.", rows, table);
  return Ok(rows);
}

/// Writes tubes as a Wavefront OBJ file: one object per tube, vertices with
/// their colours, and quad faces.
pub fn write_obj<W: Write>(out: &mut W, tubes: &TubeSet) -> io::Result<()> {
  writeln!(out, "# stress-coloured tubes of load case {}", tubes.load_case)?;
  writeln!(
    out,
    "# stress range {} to {}",
    tubes.range.min,
    tubes.range.max
  )?;
  let mut offset = 1;
  for segment in tubes.segments.iter() {
    writeln!(
      out,
      "o tube_{}_{}",
      segment.from.replace(' ', "_"),
      segment.to.replace(' ', "_")
    )?;
    for (v, c) in segment.vertices.iter().zip(segment.colors.iter()) {
      writeln!(
        out,
        "v {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}",
        v.x, v.y, v.z, c[0], c[1], c[2]
      )?;
    }
    for face in segment.faces() {
      let [a, b, c, d] = face.map(|i| i + offset);
      writeln!(out, "f {} {} {} {}", a, b, c, d)?;
    }
    offset += segment.vertices.len();
  }
  return out.flush();
}
