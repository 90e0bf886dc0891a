//! Logs an overview of an ME101 report: its sections, parameters, load cases
//! and what could be extracted from them.

#![allow(clippy::needless_return)]

use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, info, warn, error};
use me101::prelude::*;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
  /// TOML file with settings. If absent, defaults are used.
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// File path (set to "-" to read from standard input).
  file: PathBuf
}

const INDENT: &str = "  ";

fn main() -> io::Result<()> {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  let settings = match args.config {
    Some(ref path) => match Settings::read_file(path) {
      Ok(s) => s,
      Err(e) => {
        error!("Could not load settings: {}", e);
        std::process::exit(1);
      }
    },
    None => Settings::default()
  };
  let pipeline = Pipeline::new(settings);
  // parse the file
  let report = if args.file.as_os_str().eq_ignore_ascii_case("-") {
    pipeline.run_reader(BufReader::new(io::stdin()))?
  } else if args.file.is_file() {
    if let Some(bn) = args.file.file_name() {
      if let Some(sbn) = bn.to_str() {
        info!("Parsing {}...", sbn);
      }
    } else {
      info!("Parsing...");
    }
    pipeline.run_file(&args.file)?
  } else {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  };
  info!("Done parsing {} lines.", report.line_count);
  // sections
  for kind in SectionKind::all() {
    let span = report.sections.get(*kind);
    match (span.start, span.end) {
      (Some(s), Some(e)) => info!("Found the {} on lines {}-{}.", kind, s, e),
      (Some(s), None) => info!("Found the {} from line {} on.", kind, s),
      _ => info!("No {} found.", kind)
    }
  }
  // parameters
  if report.params.is_empty() {
    info!("No parameters declared.");
  } else {
    info!("Parameters declared:");
    for (key, value) in report.params.iter() {
      info!("{}- {}: {}", INDENT, key, value.render().replace('\n', "; "));
    }
  }
  // load cases
  if report.load_cases.is_empty() {
    warn!("No load cases declared.");
  } else {
    info!("Load cases: {}.", report.load_cases.0.join(", "));
  }
  match pipeline.default_load_case(&report) {
    Some(lc) => info!("Meshes default to load case {}.", lc),
    None => info!("No deadweight load case, meshes need one to be given.")
  }
  // geometry
  info!("The card images make a chain of {} entries.", report.geometry.len());
  info!("Found {} pipe elements.", report.connectivity.len());
  if report.coordinates.tables.is_empty() {
    info!("No node coordinates found.");
  } else {
    info!("Node coordinates found:");
    for table in report.coordinates.tables.iter() {
      info!("{}- {}: {} nodes", INDENT, table.load_case, table.records.len());
    }
  }
  match report.consistency {
    Consistency::Consistent => info!("Coordinates agree across load cases."),
    Consistency::Inconsistent { spread } => warn!(
      "Coordinates differ across load cases, by {} in total.", spread
    ),
    Consistency::Inconclusive => info!(
      "Could not compare coordinates across load cases."
    )
  }
  // stresses
  match report.stresses.range() {
    Some((lo, hi)) => info!(
      "Found {} stress rows, ranging from {} to {}.",
      report.stresses.len(),
      lo,
      hi
    ),
    None => info!("No numeric stresses found.")
  }
  // thor
  if report.thor.error {
    warn!("THOR blocks have errors, there will be no THOR output.");
  } else if report.thor.nodes.is_empty() {
    info!("No THOR blocks found.");
  } else {
    info!("Found {} THOR blocks.", report.thor.nodes.len());
    if let Some(o) = report.thor.origin {
      info!("{}- origin at ({}, {}, {})", INDENT, o.x, o.y, o.z);
    }
  }
  // summary and nozzles
  info!("{}", report.summary.verdict);
  for (node, check) in report.nozzles.iter() {
    info!("Nozzle check of node {}:", node);
    for (field, value) in check.fields().iter().skip(1) {
      info!("{}- {}: {}", INDENT, field, value);
    }
  }
  return Ok(());
}
