//! This module implements the settings of an extraction run, which can be
//! loaded from a TOML file. Every setting has a default, so an empty file (or
//! no file at all) is fine.

use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::errors::ReportError;
use crate::frame::Convention;

/// Settings of the tube mesh.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshSettings {
  /// Radius of the tubes.
  pub radius: f64,
  /// Points around each ring.
  pub circumference: usize,
  /// Rings along each segment, both ends included.
  pub stations: usize,
  /// Display scale applied to the coordinates.
  pub scale: f64,
  /// Vector used to find a direction normal to each segment.
  pub seed: [f64; 3]
}

impl Default for MeshSettings {
  fn default() -> Self {
    return Self {
      radius: 1.0 / 24.0,
      circumference: 20,
      stations: 10,
      scale: 1.3,
      seed: [1.0, 2.0, 3.0]
    };
  }
}

/// Settings of the nozzle load check.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NozzleSettings {
  /// Nodes to check.
  pub nodes: Vec<String>,
  /// Yield strength of the nozzle material.
  #[serde(alias = "yield")]
  pub yield_strength: f64,
  /// Factor of the axial and shear allowables.
  pub k1: f64,
  /// Factor of the bending allowable.
  pub k2: f64
}

impl Default for NozzleSettings {
  fn default() -> Self {
    return Self {
      nodes: vec!["50".to_owned()],
      yield_strength: 35000.0,
      k1: 0.01,
      k2: 0.1
    };
  }
}

/// Settings of a whole run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
  /// Lines without a load case declaration after which we stop looking.
  pub max_blank_lines: usize,
  /// Coordinate convention of the output.
  pub convention: Convention,
  /// Load cases that count as deadweight; the first registered one of them
  /// is the default for the mesh.
  pub deadweight_keywords: Vec<String>,
  /// Tube mesh settings.
  pub mesh: MeshSettings,
  /// Nozzle check settings.
  pub nozzle: NozzleSettings
}

impl Default for Settings {
  fn default() -> Self {
    return Self {
      max_blank_lines: 500,
      convention: Convention::Hc,
      deadweight_keywords: vec!["WTDW".to_owned(), "DW".to_owned()],
      mesh: MeshSettings::default(),
      nozzle: NozzleSettings::default()
    };
  }
}

impl Settings {
  /// Reads settings from TOML text.
  pub fn from_toml_str(s: &str) -> Result<Self, ReportError> {
    return Ok(toml::from_str(s)?);
  }

  /// Reads settings from a TOML file.
  pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
    let contents = std::fs::read_to_string(path)?;
    return Self::from_toml_str(&contents);
  }
}
