//! This module implements the section locator, which records where the named
//! blocks of a report begin and end.

use std::fmt::Display;

use serde::{Serialize, Deserialize};
use serde_with::skip_serializing_none;

/// Line boundaries of a section. Either one may be missing.
#[skip_serializing_none]
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionSpan {
  /// Line of the start marker.
  pub start: Option<usize>,
  /// Line of the terminator.
  pub end: Option<usize>
}

impl SectionSpan {
  /// Whether the section was found at all.
  pub fn found(&self) -> bool {
    return self.start.is_some();
  }
}

/// Which boundary of a section a line turned out to be.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Boundary {
  /// The start marker.
  Start,
  /// The terminator.
  End
}

/// The sections we know how to find.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub enum SectionKind {
  /// The stress analysis block. It runs to the end of the file.
  StressAnalysis,
  /// The pipe stress summary block.
  StressSummary,
  /// The input card images.
  Geometry
}

impl SectionKind {
  /// All known sections.
  pub const fn all() -> &'static [Self] {
    return &[Self::StressAnalysis, Self::StressSummary, Self::Geometry];
  }

  /// The text that starts the section.
  pub const fn start_marker(&self) -> &'static str {
    return match self {
      Self::StressAnalysis => "ALL     STRESS ANALYSIS",
      Self::StressSummary => concat!(
        "    CONDITION      LEVEL     END    ELEMENT  ",
        "STRESS(   PSI) (   PSI)  ALLOWABLE"
      ),
      Self::Geometry => "INPUT CARD IMAGES"
    };
  }

  /// The text that ends the section, if it has one.
  pub const fn end_marker(&self) -> Option<&'static str> {
    return match self {
      Self::StressAnalysis => None,
      Self::StressSummary => Some(" APPROVED BY "),
      Self::Geometry => Some("         .  +")
    };
  }
}

impl Display for SectionKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", match self {
      Self::StressAnalysis => "stress analysis",
      Self::StressSummary => "pipe stress summary",
      Self::Geometry => "input card images"
    });
  }
}

/// Boundaries of every known section.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sections {
  /// The stress analysis block.
  pub stress_analysis: SectionSpan,
  /// The pipe stress summary block.
  pub stress_summary: SectionSpan,
  /// The input card images.
  pub geometry: SectionSpan
}

impl Sections {
  /// Boundaries of a section.
  pub fn get(&self, kind: SectionKind) -> &SectionSpan {
    return match kind {
      SectionKind::StressAnalysis => &self.stress_analysis,
      SectionKind::StressSummary => &self.stress_summary,
      SectionKind::Geometry => &self.geometry
    };
  }

  /// Mutable boundaries of a section.
  fn get_mut(&mut self, kind: SectionKind) -> &mut SectionSpan {
    return match kind {
      SectionKind::StressAnalysis => &mut self.stress_analysis,
      SectionKind::StressSummary => &mut self.stress_summary,
      SectionKind::Geometry => &mut self.geometry
    };
  }
}

/// Finds section boundaries one line at a time. The first start marker wins,
/// and the end is the first terminator at or after it.
#[derive(Clone, Debug, Default)]
pub struct SectionLocator {
  /// What was found so far.
  sections: Sections
}

impl SectionLocator {
  /// Creates an empty locator.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Looks at a line. Returns the boundaries it set, if any.
  pub fn consume(
    &mut self,
    number: usize,
    line: &str
  ) -> Vec<(SectionKind, Boundary)> {
    let mut found = Vec::new();
    for kind in SectionKind::all() {
      let span = self.sections.get_mut(*kind);
      if span.start.is_none() && line.contains(kind.start_marker()) {
        span.start = Some(number);
        found.push((*kind, Boundary::Start));
      }
      if let Some(marker) = kind.end_marker() {
        if span.start.is_some() && span.end.is_none()
          && line.contains(marker) {
          span.end = Some(number);
          found.push((*kind, Boundary::End));
        }
      }
    }
    return found;
  }

  /// Returns whatever was found.
  pub fn finish(self) -> Sections {
    return self.sections;
  }
}
