//! A command-line application to write the tables of an ME101 report to CSV.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::*;
use me101::prelude::*;

/// The arguments passed to the converter.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// The table to write.
  #[arg(short = 't', long = "table", value_enum, default_value_t = CsvTable::Coordinates)]
  table: CsvTable,
  /// The load case. Required by the frame and elevation tables, which fall
  /// back to the first deadweight load case; filters the coordinates.
  #[arg(short = 'l', long = "load-case")]
  load_case: Option<String>,
  /// Coordinate convention ("raw" or "hc"). Overrides the settings.
  #[arg(short = 'C', long = "convention")]
  convention: Option<Convention>,
  /// TOML file with settings. If absent, defaults are used.
  #[arg(short = 'c', long = "config")]
  config: Option<PathBuf>,
  /// The delimiter used in the CSV.
  #[arg(short = 'd', long = "delim", default_value = ",")]
  delim: char,
  /// Output extra/debug info while parsing and converting.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  /// Path to write output to. If absent, writes to standard output.
  #[arg(short = 'o')]
  output: Option<PathBuf>,
  /// The name of the input report. If -, reads from standard input.
  input: PathBuf,
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
  let delim_byte: u8 = match args.delim.try_into() {
    Ok(b) => b,
    Err(_) => {
      error!("Delimiter must be a single-byte character!");
      std::process::exit(1);
    }
  };
  let pipeline = Pipeline::new(settings);
  // parse the file
  let report = if args.input.as_os_str().eq_ignore_ascii_case("-") {
    pipeline.run_reader(BufReader::new(io::stdin()))?
  } else if args.input.is_file() {
    if let Some(bn) = args.input.file_name() {
      if let Some(sbn) = bn.to_str() {
        info!("Parsing {}...", sbn);
      }
    } else {
      info!("Parsing...");
    }
    pipeline.run_file(&args.input)?
  } else {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  };
  info!("Done parsing.");
  // init the csv writer
  let output: BufWriter<Box<dyn Write>> = BufWriter::new(
    if let Some(ref op) = args.output {
      Box::new(File::create(op)?)
    } else {
      Box::new(io::stdout())
    }
  );
  let mut wtr = csv::WriterBuilder::new()
    .delimiter(delim_byte)
    .from_writer(output);
  // write the table
  info!("Writing the {} table...", args.table);
  let load_case = args.load_case.as_deref();
  if let Err(e) = pipeline.write_table(&mut wtr, args.table, &report, load_case) {
    error!("Could not write the {} table: {}", args.table, e);
    std::process::exit(1);
  }
  info!("All done.");
  return Ok(());
}
