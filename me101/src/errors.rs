//! This module defines the error type of the library. Most extraction never
//! fails (missing data just means empty results), so this covers reading
//! input and settings, plus the few requests that can't be answered.

use std::error::Error;
use std::fmt::Display;
use std::io;

use crate::mesh::MeshError;
use crate::thor::ThorError;

/// Something went wrong reading or querying a report.
#[derive(Debug, derive_more::From)]
pub enum ReportError {
  /// Could not read a file.
  Io(io::Error),
  /// Could not write a CSV table.
  Csv(csv::Error),
  /// Could not read the settings.
  Config(toml::de::Error),
  /// A coordinate convention we don't know.
  #[from(ignore)]
  UnknownConvention(String),
  /// A load case the report doesn't have.
  #[from(ignore)]
  UnknownLoadCase(String),
  /// No load case was given, and none of these defaults is in the report.
  #[from(ignore)]
  NoLoadCase(Vec<String>),
  /// THOR output can't be produced.
  Thor(ThorError),
  /// The mesh can't be built.
  Mesh(MeshError)
}

impl Display for ReportError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Io(e) => write!(f, "I/O error: {}", e),
      Self::Csv(e) => write!(f, "CSV error: {}", e),
      Self::Config(e) => write!(f, "bad settings: {}", e),
      Self::UnknownConvention(s) => write!(
        f, "unknown coordinate convention \"{}\"", s
      ),
      Self::UnknownLoadCase(s) => write!(f, "no such load case \"{}\"", s),
      Self::NoLoadCase(tried) if tried.is_empty() => write!(
        f, "no load case given"
      ),
      Self::NoLoadCase(tried) => write!(
        f, "no load case given, and none of {} is in the report",
        tried.join(", ")
      ),
      Self::Thor(e) => write!(f, "{}", e),
      Self::Mesh(e) => write!(f, "{}", e)
    };
  }
}

impl Error for ReportError {}
