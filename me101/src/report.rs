//! This module defines the extracted report: every table the pipeline
//! produces, bundled, plus the queries that derive more from them.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::connectivity::Connectivity;
use crate::coordinates::{Consistency, CoordinateSet, CoordinateTable};
use crate::errors::ReportError;
use crate::frame::{Convention, FrameTable};
use crate::geometry::SegmentChain;
use crate::loadcases::LoadCases;
use crate::mesh::TubeSet;
use crate::nozzle::NozzleCheck;
use crate::params::ParameterRecord;
use crate::sections::Sections;
use crate::settings::MeshSettings;
use crate::stresses::StressTable;
use crate::summary::StressSummary;
use crate::thor::{ThorElevation, ThorNodes};

/// Everything extracted from a report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipeReport {
  /// Name of the file, if it came from one.
  pub filename: Option<String>,
  /// Number of lines read.
  pub line_count: usize,
  /// Section boundaries.
  pub sections: Sections,
  /// Parameters from comments.
  pub params: ParameterRecord,
  /// THOR blocks.
  pub thor: ThorNodes,
  /// Load cases.
  pub load_cases: LoadCases,
  /// The segment chain from the card images.
  pub geometry: SegmentChain,
  /// Pipe elements.
  pub connectivity: Connectivity,
  /// Coordinates, per load case.
  pub coordinates: CoordinateSet,
  /// Whether the coordinates agree across load cases.
  pub consistency: Consistency,
  /// Sustained stresses.
  pub stresses: StressTable,
  /// The pipe stress summary.
  pub summary: StressSummary,
  /// Nozzle checks, by node.
  pub nozzles: BTreeMap<String, NozzleCheck>
}

impl PipeReport {
  /// The coordinates of a load case.
  pub fn coordinate_table(
    &self,
    load_case: &str
  ) -> Result<&CoordinateTable, ReportError> {
    return self.coordinates.table(load_case)
      .ok_or_else(|| ReportError::UnknownLoadCase(load_case.to_owned()));
  }

  /// The coordinates of a load case, in a convention.
  pub fn frame(
    &self,
    load_case: &str,
    convention: Convention
  ) -> Result<FrameTable, ReportError> {
    let table = self.coordinate_table(load_case)?;
    return Ok(FrameTable::transform(table, convention));
  }

  /// The coordinates of a load case, in a convention, moved to the THOR
  /// origin.
  pub fn thor_frame(
    &self,
    load_case: &str,
    convention: Convention
  ) -> Result<FrameTable, ReportError> {
    let frame = self.frame(load_case, convention)?;
    return Ok(self.thor.apply_origin(&frame)?);
  }

  /// The THOR elevation table of a load case.
  pub fn thor_elevations(
    &self,
    load_case: &str,
    convention: Convention
  ) -> Result<Vec<ThorElevation>, ReportError> {
    let frame = self.thor_frame(load_case, convention)?;
    return Ok(self.thor.elevations(&frame)?);
  }

  /// The first registered load case among the given names.
  pub fn default_load_case<S: AsRef<str>>(&self, names: &[S]) -> Option<&str> {
    return self.load_cases.first_of(names);
  }

  /// The stress-coloured tubes of a load case.
  pub fn tubes(
    &self,
    load_case: &str,
    convention: Convention,
    settings: &MeshSettings
  ) -> Result<TubeSet, ReportError> {
    let frame = self.frame(load_case, convention)?;
    return Ok(TubeSet::build(
      &frame,
      &self.stresses,
      &self.connectivity,
      settings
    )?);
  }
}
