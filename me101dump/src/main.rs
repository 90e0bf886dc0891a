//! Dumps an ME101 report into a JSON, and optionally its stress-coloured tube
//! mesh into a Wavefront OBJ file.

#![allow(clippy::needless_return)]

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, info, warn, error};
use me101::prelude::*;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
  /// Also write the tube mesh to this OBJ file.
  #[arg(long)]
  obj: Option<PathBuf>,
  /// Load case of the mesh. If absent, the first deadweight one is used.
  #[arg(short, long)]
  load_case: Option<String>,
  /// Coordinate convention of the mesh ("raw" or "hc"). Overrides the
  /// settings.
  #[arg(short = 'C', long)]
  convention: Option<Convention>,
  /// TOML file with settings. If absent, defaults are used.
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// Path to write the JSON to. If absent, writes to standard output.
  #[arg(short = 'o')]
  output: Option<PathBuf>,
  /// File path (set to "-" to read from standard input).
  file: PathBuf
}

fn main() -> io::Result<()> {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  let mut settings = match args.config {
    Some(ref path) => match Settings::read_file(path) {
      Ok(s) => s,
      Err(e) => {
        error!("Could not load settings: {}", e);
        std::process::exit(1);
      }
    },
    None => Settings::default()
  };
  if let Some(convention) = args.convention {
    settings.convention = convention;
  }
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
  info!("Done parsing.");
  // dump the json
  let mut output: BufWriter<Box<dyn Write>> = BufWriter::new(
    if let Some(ref op) = args.output {
      Box::new(File::create(op)?)
    } else {
      Box::new(io::stdout())
    }
  );
  serde_json::to_writer_pretty(&mut output, &report)?;
  writeln!(output)?;
  output.flush()?;
  // write the mesh
  if let Some(ref path) = args.obj {
    let tubes = match pipeline.tubes(&report, args.load_case.as_deref()) {
      Ok(t) => t,
      Err(e) => {
        error!("Could not build the tube mesh: {}", e);
        std::process::exit(1);
      }
    };
    if !tubes.skipped.is_empty() {
      warn!("Left {} elements out of the mesh.", tubes.skipped.len());
    }
    let mut obj = BufWriter::new(File::create(path)?);
    write_obj(&mut obj, &tubes)?;
    info!(
      "Wrote {} tubes of {} ({} vertices).",
      tubes.segments.len(),
      tubes.load_case,
      tubes.vertex_count()
    );
  }
  return Ok(());
}
