//! This library implements types and functions to extract structured data
//! from the fixed-column text output of ME101/ADLPIPE-style pipe stress
//! analyses.
//!
//! A report is read once into a line store. A one-pass scanner then finds
//! section boundaries, comment parameters, THOR node blocks and load cases;
//! the stages after it rebuild the pipe geometry from the input card images,
//! and read the connectivity, coordinates, stresses and stress summary out of
//! the analysis tables. Last, the tables of a load case can be turned into a
//! mesh of stress-coloured tubes.
//!
//! Missing data is never fatal: a stage that can't find what it needs says so
//! through `log` and returns an empty result.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod columns;
pub mod connectivity;
pub mod coordinates;
pub mod errors;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod lines;
pub mod loadcases;
pub mod mesh;
pub mod nozzle;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod sections;
pub mod settings;
pub mod stresses;
pub mod summary;
pub mod thor;
pub mod util;

/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use super::columns::*;
  pub use super::connectivity::{Connectivity, ConnectivityEdge};
  pub use super::coordinates::*;
  pub use super::errors::*;
  pub use super::export::*;
  pub use super::frame::*;
  pub use super::geometry::*;
  pub use super::lines::*;
  pub use super::loadcases::*;
  pub use super::mesh::*;
  pub use super::nozzle::*;
  pub use super::params::*;
  pub use super::pipeline::*;
  pub use super::report::*;
  pub use super::scanner::*;
  pub use super::sections::*;
  pub use super::settings::*;
  pub use super::stresses::*;
  pub use super::summary::*;
  pub use super::thor::*;
}

#[cfg(test)]
mod tests;
