//! This module implements the one-pass scanner: the first stage of an
//! extraction, which goes over every line once and picks up everything that
//! doesn't depend on anything else (section boundaries, parameters, THOR
//! blocks and load cases).

use log::debug;
use serde::{Serialize, Deserialize};

use crate::lines::LineStore;
use crate::loadcases::{LoadCaseRegistry, LoadCaseResponse, LoadCases};
use crate::params::{ParameterKey, ParameterRecord};
use crate::sections::{Boundary, SectionKind, SectionLocator, Sections};
use crate::thor::ThorNodes;

/// What the scanner made of a line. A line may mean several things; this
/// is the first of them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanResponse {
  /// Nothing of interest.
  Useless,
  /// The line is a section boundary.
  Boundary(SectionKind, Boundary),
  /// The line declared a parameter.
  Parameter(ParameterKey),
  /// The line was a THOR block for this node.
  Thor(String),
  /// The line was a broken THOR block.
  ThorError,
  /// The line declared a new load case.
  LoadCase(String)
}

/// Everything the scanner found.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanOutput {
  /// Section boundaries.
  pub sections: Sections,
  /// Parameters.
  pub params: ParameterRecord,
  /// THOR blocks.
  pub thor: ThorNodes,
  /// Load cases.
  pub load_cases: LoadCases
}

/// The scanner. It doesn't care where lines come from.
pub struct OnePassScanner {
  /// Section boundaries.
  sections: SectionLocator,
  /// Parameters.
  params: ParameterRecord,
  /// THOR blocks.
  thor: ThorNodes,
  /// Load cases.
  load_cases: LoadCaseRegistry,
  /// The total number of consumed lines.
  total_lines: usize
}

impl OnePassScanner {
  /// Instantiates a new scanner.
  pub fn new(max_blank_lines: usize) -> Self {
    return Self {
      sections: SectionLocator::new(),
      params: ParameterRecord::new(),
      thor: ThorNodes::new(),
      load_cases: LoadCaseRegistry::new(max_blank_lines),
      total_lines: 0
    };
  }

  /// Consumes a line into the scanner.
  pub fn consume(&mut self, line: &str) -> ScanResponse {
    let number = self.total_lines;
    self.total_lines += 1;
    let thor = match self.thor.consume(number, line) {
      Ok(Some(node)) => Some(ScanResponse::Thor(node)),
      Ok(None) => None,
      Err(_) => Some(ScanResponse::ThorError)
    };
    let boundaries = self.sections.consume(number, line);
    for (kind, boundary) in boundaries.iter() {
      debug!("Line {} is the {:?} of the {}.", number, boundary, kind);
    }
    let param = self.params.consume(line);
    let load_case = match self.load_cases.consume(line) {
      LoadCaseResponse::Registered(lc) => {
        debug!("Load case {} declared on line {}.", lc, number);
        Some(ScanResponse::LoadCase(lc))
      },
      _ => None
    };
    let candidates = [
      thor,
      boundaries.first().map(|(k, b)| ScanResponse::Boundary(*k, *b)),
      param.map(ScanResponse::Parameter),
      load_case
    ];
    return candidates.into_iter()
      .flatten()
      .next()
      .unwrap_or(ScanResponse::Useless);
  }

  /// Finishes up and returns what was found.
  pub fn finish(mut self) -> ScanOutput {
    if let Err(e) = self.thor.settle_origin() {
      debug!("No THOR origin: {}.", e);
    }
    return ScanOutput {
      sections: self.sections.finish(),
      params: self.params,
      thor: self.thor,
      load_cases: self.load_cases.finish()
    };
  }

  /// Scans every line of a store.
  pub fn scan(store: &LineStore, max_blank_lines: usize) -> ScanOutput {
    let mut scanner = Self::new(max_blank_lines);
    for line in store.lines() {
      scanner.consume(&line.text);
    }
    debug!("Scanned {} lines.", scanner.total_lines);
    return scanner.finish();
  }
}
