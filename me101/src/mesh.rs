//! This module implements the tube mesh builder. Every pipe element becomes
//! a tube, swept as a circle along the element, with the stress at each ring
//! interpolated between the ends and mapped onto a colour.
//!
//! Elements are meshed in parallel, but the tubes always come out in the
//! order of the connectivity.

use std::error::Error;
use std::f64::consts::PI;
use std::fmt::Display;

use log::{debug, warn};
use nalgebra::{Rotation3, Unit, Vector3};
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::connectivity::{Connectivity, ConnectivityEdge};
use crate::frame::FrameTable;
use crate::settings::MeshSettings;
use crate::stresses::StressTable;

/// Lengths below this are zero.
const EPSILON: f64 = 1e-12;

/// Why a tube couldn't be built.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum MeshError {
  /// Both ends of the element are at the same place.
  DegenerateSegment {
    /// Start node.
    from: String,
    /// End node.
    to: String
  },
  /// A node without coordinates.
  MissingCoordinate(String),
  /// A node without a numeric stress.
  MissingStress(String),
  /// There are no numeric stresses at all.
  NoStressRange,
  /// Too few points around or along the tubes.
  InvalidResolution {
    /// Points around.
    circumference: usize,
    /// Rings along.
    stations: usize
  }
}

impl Display for MeshError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::DegenerateSegment { from, to } => write!(
        f, "element {}-{} has zero length", from, to
      ),
      Self::MissingCoordinate(n) => write!(
        f, "node {} has no coordinates", n
      ),
      Self::MissingStress(n) => write!(f, "node {} has no stress", n),
      Self::NoStressRange => write!(f, "there are no numeric stresses"),
      Self::InvalidResolution { circumference, stations } => write!(
        f,
        "need at least 3 points around and 2 rings, got {} and {}",
        circumference,
        stations
      )
    };
  }
}

impl Error for MeshError {}

/// Checks that a mesh can be built with these settings.
pub fn validate(settings: &MeshSettings) -> Result<(), MeshError> {
  if settings.circumference < 3 || settings.stations < 2 {
    return Err(MeshError::InvalidResolution {
      circumference: settings.circumference,
      stations: settings.stations
    });
  }
  return Ok(());
}

/// The `rainbow` colormap: from purple through green to red.
pub fn rainbow(t: f64) -> [f64; 3] {
  let r = (2.0 * t - 0.5).abs();
  let g = (PI * t).sin();
  let b = (PI * t / 2.0).cos();
  return [r, g, b].map(|c| c.clamp(0.0, 1.0));
}

/// The smallest and largest stress, used to normalise colours.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StressRange {
  /// Smallest stress.
  pub min: f64,
  /// Largest stress.
  pub max: f64
}

impl StressRange {
  /// Where a stress lies in the range, from 0 to 1. A range of a single
  /// value puts everything at 0.
  pub fn normalise(&self, x: f64) -> f64 {
    let width = self.max - self.min;
    if width.abs() < f64::EPSILON {
      return 0.0;
    }
    return (x - self.min) / width;
  }

  /// The colour of a stress.
  pub fn colour(&self, x: f64) -> [f64; 3] {
    return rainbow(self.normalise(x));
  }
}

/// An end of a tube.
#[derive(Clone, Debug, PartialEq)]
pub struct TubeEnd {
  /// The node.
  pub node: String,
  /// Where it is, scaled.
  pub position: Vector3<f64>,
  /// The stress at it.
  pub stress: f64
}

/// A unit vector normal to an axis, found by taking the part of the seed that
/// isn't along the axis. A seed along the axis is replaced by the coordinate
/// axis least aligned with it.
pub fn normal_to(axis: &Unit<Vector3<f64>>, seed: &Vector3<f64>) -> Vector3<f64> {
  let reject = |v: &Vector3<f64>| v - axis.into_inner() * axis.dot(v);
  let candidate = reject(seed);
  if candidate.norm() > EPSILON * seed.norm().max(1.0) {
    return candidate.normalize();
  }
  let least = axis.iamin();
  let mut fallback = Vector3::zeros();
  fallback[least] = 1.0;
  return reject(&fallback).normalize();
}

/// A tube around one element.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MeshSegment {
  /// Start node.
  pub from: String,
  /// End node.
  pub to: String,
  /// Rings along the tube.
  pub stations: usize,
  /// Points around each ring.
  pub circumference: usize,
  /// Vertices, ring after ring.
  pub vertices: Vec<Vector3<f64>>,
  /// The stress at each vertex.
  pub scalars: Vec<f64>,
  /// The colour of each vertex.
  pub colors: Vec<[f64; 3]>
}

impl MeshSegment {
  /// Sweeps a circle from one end to the other.
  pub fn sweep(
    start: &TubeEnd,
    end: &TubeEnd,
    range: &StressRange,
    settings: &MeshSettings
  ) -> Result<Self, MeshError> {
    validate(settings)?;
    let span = end.position - start.position;
    let axis = match Unit::try_new(span, EPSILON) {
      Some(a) => a,
      None => return Err(MeshError::DegenerateSegment {
        from: start.node.clone(),
        to: end.node.clone()
      })
    };
    let seed = Vector3::from(settings.seed);
    let reference = normal_to(&axis, &seed) * settings.radius;
    let n = settings.circumference;
    let ring = (0..n)
      .map(|k| {
        let angle = 2.0 * PI * (k as f64) / (n as f64);
        Rotation3::from_axis_angle(&axis, angle) * reference
      })
      .collect::<Vec<_>>();
    let last = (settings.stations - 1) as f64;
    let size = settings.stations * n;
    let mut vertices = Vec::with_capacity(size);
    let mut scalars = Vec::with_capacity(size);
    let mut colors = Vec::with_capacity(size);
    for station in 0..settings.stations {
      let frac = (station as f64) / last;
      let centre = start.position + span * frac;
      let scalar = start.stress + (end.stress - start.stress) * frac;
      let colour = range.colour(scalar);
      for offset in ring.iter() {
        vertices.push(centre + offset);
        scalars.push(scalar);
        colors.push(colour);
      }
    }
    return Ok(Self {
      from: start.node.clone(),
      to: end.node.clone(),
      stations: settings.stations,
      circumference: n,
      vertices,
      scalars,
      colors
    });
  }

  /// Quads of the vertex grid, wrapping around each ring. Indices are
  /// 0-based.
  pub fn faces(&self) -> Vec<[usize; 4]> {
    let n = self.circumference;
    let mut faces = Vec::new();
    for i in 0..self.stations.saturating_sub(1) {
      for k in 0..n {
        let next = (k + 1) % n;
        faces.push([i * n + k, i * n + next, (i + 1) * n + next, (i + 1) * n + k]);
      }
    }
    return faces;
  }
}

/// An element that couldn't be meshed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkippedEdge {
  /// The element.
  pub edge: ConnectivityEdge,
  /// Why.
  pub reason: MeshError
}

/// Every tube of a load case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TubeSet {
  /// The load case.
  pub load_case: String,
  /// The stresses the colours span.
  pub range: StressRange,
  /// The tubes, in connectivity order.
  pub segments: Vec<MeshSegment>,
  /// Elements left out.
  pub skipped: Vec<SkippedEdge>
}

/// Finds one end of an element.
fn resolve_end(
  node: &str,
  frame: &FrameTable,
  stresses: &StressTable,
  scale: f64
) -> Result<TubeEnd, MeshError> {
  let position = frame.get(node)
    .ok_or_else(|| MeshError::MissingCoordinate(node.to_owned()))?;
  let stress = stresses.first_for(node)
    .and_then(|r| r.stress_value())
    .ok_or_else(|| MeshError::MissingStress(node.to_owned()))?;
  return Ok(TubeEnd { node: node.to_owned(), position: position * scale, stress });
}

impl TubeSet {
  /// Builds the tubes of every element of a load case.
  pub fn build(
    frame: &FrameTable,
    stresses: &StressTable,
    connectivity: &Connectivity,
    settings: &MeshSettings
  ) -> Result<Self, MeshError> {
    validate(settings)?;
    let (min, max) = stresses.range().ok_or(MeshError::NoStressRange)?;
    let range = StressRange { min, max };
    let results = connectivity.edges
      .par_iter()
      .map(|edge| {
        let start = resolve_end(&edge.from, frame, stresses, settings.scale)?;
        let end = resolve_end(&edge.to, frame, stresses, settings.scale)?;
        return MeshSegment::sweep(&start, &end, &range, settings);
      })
      .collect::<Vec<_>>();
    let mut segments = Vec::new();
    let mut skipped = Vec::new();
    for (edge, result) in connectivity.edges.iter().zip(results) {
      match result {
        Ok(segment) => segments.push(segment),
        Err(reason) => {
          warn!("Skipping element {}-{}: {}.", edge.from, edge.to, reason);
          skipped.push(SkippedEdge { edge: edge.clone(), reason });
        }
      }
    }
    debug!(
      "Meshed {} elements of {}, skipped {}.",
      segments.len(),
      frame.load_case,
      skipped.len()
    );
    return Ok(Self {
      load_case: frame.load_case.clone(),
      range,
      segments,
      skipped
    });
  }

  /// Total number of vertices.
  pub fn vertex_count(&self) -> usize {
    return self.segments.iter().map(|s| s.vertices.len()).sum();
  }
}
