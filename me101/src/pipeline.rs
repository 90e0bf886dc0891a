//! This module implements the extraction pipeline: the stages that turn a
//! loaded report into a `PipeReport`, in order. Each stage can also be run
//! on its own.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::connectivity::{self, Connectivity};
use crate::coordinates::CoordinateSet;
use crate::errors::ReportError;
use crate::export::{self, CsvTable};
use crate::geometry::{GeometryCardParser, SegmentChain};
use crate::lines::LineStore;
use crate::loadcases::LoadCases;
use crate::mesh::TubeSet;
use crate::nozzle::{self, NozzleCheck};
use crate::report::PipeReport;
use crate::scanner::{OnePassScanner, ScanOutput};
use crate::sections::Sections;
use crate::settings::Settings;
use crate::stresses::StressTable;
use crate::summary::StressSummary;

/// Runs extractions with some settings.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
  /// The settings.
  pub settings: Settings
}

impl Pipeline {
  /// A pipeline with these settings.
  pub fn new(settings: Settings) -> Self {
    return Self { settings };
  }

  /// Boundaries, parameters, THOR blocks and load cases, in one pass.
  pub fn scan(&self, store: &LineStore) -> ScanOutput {
    return OnePassScanner::scan(store, self.settings.max_blank_lines);
  }

  /// The segment chain of the card images.
  pub fn geometry(&self, store: &LineStore, sections: &Sections) -> SegmentChain {
    return GeometryCardParser::parse(store, sections);
  }

  /// The pipe elements.
  pub fn connectivity(
    &self,
    store: &LineStore,
    sections: &Sections
  ) -> Connectivity {
    return connectivity::parse(store, sections);
  }

  /// The coordinates of every load case.
  pub fn coordinates(
    &self,
    store: &LineStore,
    load_cases: &LoadCases,
    connectivity: &Connectivity
  ) -> CoordinateSet {
    return CoordinateSet::parse(store, load_cases, connectivity);
  }

  /// The stresses.
  pub fn stresses(
    &self,
    store: &LineStore,
    sections: &Sections,
    coordinates: &CoordinateSet
  ) -> StressTable {
    return StressTable::parse(store, sections, &coordinates.known_ids);
  }

  /// The pipe stress summary.
  pub fn summary(&self, store: &LineStore, sections: &Sections) -> StressSummary {
    return StressSummary::parse(store, sections);
  }

  /// The nozzle checks.
  pub fn nozzles(&self, chain: &SegmentChain) -> BTreeMap<String, NozzleCheck> {
    return nozzle::check_all(chain, &self.settings.nozzle);
  }

  /// Runs every stage.
  pub fn run(&self, store: &LineStore) -> PipeReport {
    let scan = self.scan(store);
    info!("Found {} load cases.", scan.load_cases.len());
    let geometry = self.geometry(store, &scan.sections);
    debug!("Rebuilt {} segment entries.", geometry.len());
    let connectivity = self.connectivity(store, &scan.sections);
    debug!("Found {} elements.", connectivity.len());
    let coordinates = self.coordinates(store, &scan.load_cases, &connectivity);
    let consistency = coordinates.consistency();
    debug!("Geometry across load cases: {:?}.", consistency);
    let stresses = self.stresses(store, &scan.sections, &coordinates);
    let summary = self.summary(store, &scan.sections);
    let nozzles = self.nozzles(&geometry);
    return PipeReport {
      filename: store.filename.clone(),
      line_count: store.len(),
      sections: scan.sections,
      params: scan.params,
      thor: scan.thor,
      load_cases: scan.load_cases,
      geometry,
      connectivity,
      coordinates,
      consistency,
      stresses,
      summary,
      nozzles
    };
  }

  /// Reads everything from a reader and runs every stage.
  pub fn run_reader<R: Read>(&self, reader: R) -> io::Result<PipeReport> {
    return Ok(self.run(&LineStore::read(reader)?));
  }

  /// Reads a file and runs every stage.
  pub fn run_file<P: AsRef<Path>>(&self, path: P) -> io::Result<PipeReport> {
    return Ok(self.run(&LineStore::read_file(path)?));
  }

  /// The default load case of a report: the first deadweight one.
  pub fn default_load_case<'a>(&self, report: &'a PipeReport) -> Option<&'a str> {
    return report.default_load_case(&self.settings.deadweight_keywords);
  }

  /// The error for a missing load case: which defaults were tried.
  fn no_load_case(&self) -> ReportError {
    return ReportError::NoLoadCase(self.settings.deadweight_keywords.clone());
  }

  /// Writes a CSV table in the configured convention. Tables for a single
  /// load case fall back to the default one. Returns the number of rows.
  pub fn write_table<W: Write>(
    &self,
    wtr: &mut csv::Writer<W>,
    table: CsvTable,
    report: &PipeReport,
    load_case: Option<&str>
  ) -> Result<usize, ReportError> {
    let load_case = match load_case {
      Some(lc) => Some(lc),
      None if table.per_load_case() => {
        let lc = self.default_load_case(report)
          .ok_or_else(|| self.no_load_case())?;
        info!("No load case given, using {}.", lc);
        Some(lc)
      },
      None => None
    };
    return export::write_table(
      wtr, table, report, load_case, self.settings.convention
    );
  }

  /// The tubes of a load case, in the configured convention. Without a
  /// load case, the default one is used.
  pub fn tubes(
    &self,
    report: &PipeReport,
    load_case: Option<&str>
  ) -> Result<TubeSet, ReportError> {
    let lc = match load_case.or_else(|| self.default_load_case(report)) {
      Some(lc) => lc,
      None => {
        return Err(self.no_load_case());
      }
    };
    return report.tubes(lc, self.settings.convention, &self.settings.mesh);
  }
}
