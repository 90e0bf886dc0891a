//! This module implements the reading of the pipe stress summary: the block
//! of text that closes a report, and the stress ratios in it.

use std::fmt::Display;

use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::columns::Field;
use crate::lines::LineStore;
use crate::sections::Sections;
use crate::util::{char_len, decode_float};

/// Lines of context kept above the summary header.
pub const LEADING_LINES: usize = 16;

/// Lines kept after the terminator, counting it.
pub const TRAILING_LINES: usize = 2;

/// What the stress ratios say.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SummaryVerdict {
  /// There is no summary in the report.
  Missing,
  /// There is a summary, but no ratio could be read from it.
  NoRatios,
  /// Every ratio is below one.
  WithinAllowable,
  /// Some ratio is one or more.
  Exceeded {
    /// The largest ratio.
    max: f64
  }
}

impl SummaryVerdict {
  /// Classifies a list of stress ratios.
  pub fn classify(ratios: &[f64]) -> Self {
    let max = ratios.iter().copied().reduce(f64::max);
    return match max {
      None => Self::NoRatios,
      Some(m) if m < 1.0 => Self::WithinAllowable,
      Some(m) => Self::Exceeded { max: m }
    };
  }

  /// A sentence introducing the summary.
  pub fn text(&self) -> String {
    return match self {
      Self::Missing => "Error: Pipe stress summary not found.".to_owned(),
      Self::NoRatios => concat!(
        "The pipe stress summary is shown below. No valid stress ratios were ",
        "found in the expected columns (72-79)."
      ).to_owned(),
      Self::WithinAllowable => concat!(
        "The pipe stress summary is shown below, with all actual pipe ",
        "stresses meeting code allowable stresses."
      ).to_owned(),
      Self::Exceeded { max } => format!(
        concat!(
          "The pipe stress summary is shown below, with code allowable ",
          "stresses potentially being exceeded. The maximum stress ratio ",
          "found is {:.3}."
        ),
        max
      )
    };
  }
}

impl Display for SummaryVerdict {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.text());
  }
}

/// Reads the stress ratio of a summary line, if it has one.
pub fn stress_ratio(line: &str) -> Option<f64> {
  if char_len(line) < Field::SummaryRatio.span().end {
    return None;
  }
  let s = Field::SummaryRatio.trimmed(line).replace('*', "");
  return decode_float(&s);
}

/// The pipe stress summary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StressSummary {
  /// The text of the block.
  pub lines: Vec<String>,
  /// Every stress ratio read from it.
  pub ratios: Vec<f64>,
  /// What the ratios say.
  pub verdict: SummaryVerdict
}

impl StressSummary {
  /// The summary of a report without one.
  pub fn missing() -> Self {
    return Self {
      lines: Vec::new(),
      ratios: Vec::new(),
      verdict: SummaryVerdict::Missing
    };
  }

  /// Builds the summary from its lines.
  pub fn from_lines(lines: Vec<String>) -> Self {
    let ratios = lines.iter()
      .filter_map(|l| stress_ratio(l))
      .collect::<Vec<_>>();
    let verdict = SummaryVerdict::classify(&ratios);
    return Self { lines, ratios, verdict };
  }

  /// Reads the summary of a report.
  pub fn parse(store: &LineStore, sections: &Sections) -> Self {
    let span = sections.stress_summary;
    let (start, end) = match (span.start, span.end) {
      (Some(s), Some(e)) => (s, e),
      _ => {
        warn!("Pipe stress summary boundaries not found.");
        return Self::missing();
      }
    };
    let lines = store
      .range(start.saturating_sub(LEADING_LINES), end + TRAILING_LINES)
      .iter()
      .map(|l| l.text.replace('\x01', " "))
      .collect::<Vec<_>>();
    let summary = Self::from_lines(lines);
    debug!(
      "Pipe stress summary has {} lines and {} ratios.",
      summary.lines.len(),
      summary.ratios.len()
    );
    return summary;
  }

  /// The whole block as one piece of text.
  pub fn text(&self) -> String {
    return self.lines.join("\n");
  }
}
