//! This module implements the nozzle load check: allowable loads at nozzle
//! nodes, from the thinnest pipe that meets each of them.

use std::collections::BTreeMap;
use std::error::Error;
use std::f64::consts::PI;
use std::fmt::Display;

use log::{info, warn};
use serde::{Serialize, Deserialize};

use crate::geometry::{SegmentChain, SegmentKey};
use crate::settings::NozzleSettings;
use crate::util::{decode_float, round_to};

/// Why a nozzle couldn't be checked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NozzleError {
  /// The node isn't in the segment chain.
  NotFound(String),
  /// Some entry of the node has no usable thickness.
  InvalidThickness(String),
  /// The thinnest entry has no usable outside diameter.
  InvalidDiameter(String)
}

impl Display for NozzleError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::NotFound(n) => write!(
        f, "nozzle node {} is not in the segment data", n
      ),
      Self::InvalidThickness(n) => write!(
        f, "nozzle node {} has a missing or invalid THI", n
      ),
      Self::InvalidDiameter(n) => write!(
        f, "nozzle node {} has a missing or invalid OD", n
      )
    };
  }
}

impl Error for NozzleError {}

/// The result of checking one nozzle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NozzleCheck {
  /// The node.
  pub node: String,
  /// Outside diameter.
  pub outside_diameter: f64,
  /// Wall thickness.
  pub thickness: f64,
  /// Cross-section area of the wall.
  pub area: f64,
  /// Section modulus.
  pub section_modulus: f64,
  /// Yield strength.
  pub yield_strength: f64,
  /// Axial and shear factor.
  pub k1: f64,
  /// Bending factor.
  pub k2: f64,
  /// Allowable axial load.
  pub axial: i64,
  /// Allowable resultant shear load.
  pub shear: i64,
  /// Allowable bending moment.
  pub bending: i64,
  /// Allowable torsion moment.
  pub torsion: i64
}

impl NozzleCheck {
  /// The results under the names a report form uses for them.
  pub fn fields(&self) -> Vec<(&'static str, String)> {
    return vec![
      ("NOZZLE NODE POINT", self.node.clone()),
      ("OUTSIDE DIAMETER", self.outside_diameter.to_string()),
      ("NOZZLE THICKNESS", self.thickness.to_string()),
      ("NOZZLE AREA", self.area.to_string()),
      ("NOZZLE SECTION MODULUS", self.section_modulus.to_string()),
      ("YIELD", self.yield_strength.round().to_string()),
      ("K1", self.k1.to_string()),
      ("K2", self.k2.to_string()),
      ("ALLOWABLE AXIAL LOAD", self.axial.to_string()),
      ("ALLOWABLE RESULTANT SHEAR LOAD", self.shear.to_string()),
      ("ALLOWABLE BENDING MOMENT", self.bending.to_string()),
      ("ALLOWABLE TORSION MOMENT", self.torsion.to_string())
    ];
  }
}

/// Checks one nozzle node.
pub fn check_nozzle(
  node: &str,
  chain: &SegmentChain,
  settings: &NozzleSettings
) -> Result<NozzleCheck, NozzleError> {
  let entries = chain.entries_for(node).collect::<Vec<_>>();
  if entries.is_empty() {
    return Err(NozzleError::NotFound(node.to_owned()));
  }
  let thicknesses = entries.iter()
    .map(|e| e.get(SegmentKey::Thi).and_then(decode_float))
    .collect::<Option<Vec<f64>>>()
    .ok_or_else(|| NozzleError::InvalidThickness(node.to_owned()))?;
  let (thinnest, thi) = thicknesses.iter()
    .copied()
    .enumerate()
    .fold(None, |best: Option<(usize, f64)>, (i, t)| match best {
      Some((_, b)) if b <= t => best,
      _ => Some((i, t))
    })
    .ok_or_else(|| NozzleError::InvalidThickness(node.to_owned()))?;
  let od = entries[thinnest].get(SegmentKey::Od)
    .and_then(decode_float)
    .ok_or_else(|| NozzleError::InvalidDiameter(node.to_owned()))?;
  let id = od - 2.0 * thi;
  let area = PI * ((od / 2.0).powi(2) - (id / 2.0).powi(2));
  let modulus = PI * (od.powi(4) - id.powi(4)) / (32.0 * od);
  let sy = settings.yield_strength;
  let axial = (settings.k1 * sy * area).trunc() as i64;
  let bending = (settings.k2 * sy * modulus / 12.0).trunc() as i64;
  return Ok(NozzleCheck {
    node: node.to_owned(),
    outside_diameter: round_to(od, 3),
    thickness: round_to(thi, 3),
    area: round_to(area, 3),
    section_modulus: round_to(modulus, 5),
    yield_strength: sy,
    k1: settings.k1,
    k2: settings.k2,
    axial,
    shear: axial,
    bending,
    torsion: 2 * bending
  });
}

/// Checks every configured nozzle. Nozzles that can't be checked are left
/// out, with a warning.
pub fn check_all(
  chain: &SegmentChain,
  settings: &NozzleSettings
) -> BTreeMap<String, NozzleCheck> {
  let mut checks = BTreeMap::new();
  for node in settings.nodes.iter() {
    match check_nozzle(node, chain, settings) {
      Ok(check) => {
        info!("Nozzle check done for node {}.", node);
        checks.insert(node.clone(), check);
      },
      Err(e) => warn!("Skipping nozzle: {}.", e)
    }
  }
  return checks;
}
