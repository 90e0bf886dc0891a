//! This module implements the line store: the whole report, loaded once, as
//! an ordered sequence of numbered lines.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::util::{decode_cp1252, split_lines};

/// One line of the report with its 0-based line number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawLine {
  /// The 0-based line number.
  pub number: usize,
  /// The text, without its terminator.
  pub text: String
}

/// The loaded report. Everything downstream indexes into it by line number.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LineStore {
  /// The lines, in order.
  lines: Vec<RawLine>,
  /// The name of the file the lines came from, if any.
  pub filename: Option<String>
}

impl LineStore {
  /// Builds a store out of already decoded text.
  pub fn from_text(text: &str) -> Self {
    let lines = split_lines(text)
      .into_iter()
      .enumerate()
      .map(|(number, s)| RawLine { number, text: s.to_owned() })
      .collect();
    return Self { lines, filename: None };
  }

  /// Builds a store out of Windows-1252 bytes.
  pub fn from_cp1252(bytes: &[u8]) -> Self {
    return Self::from_text(&decode_cp1252(bytes));
  }

  /// Reads everything from a reader in one go.
  pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    return Ok(Self::from_cp1252(&bytes));
  }

  /// Reads a file. The handle is closed once the bytes are in.
  pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
    let mut store = Self::read(File::open(path.as_ref())?)?;
    store.filename = path.as_ref().file_name()
      .and_then(|s| s.to_str())
      .map(String::from);
    return Ok(store);
  }

  /// Number of lines.
  pub fn len(&self) -> usize {
    return self.lines.len();
  }

  /// Whether there are no lines at all.
  pub fn is_empty(&self) -> bool {
    return self.lines.is_empty();
  }

  /// The text of a line, if it exists.
  pub fn text(&self, number: usize) -> Option<&str> {
    return self.lines.get(number).map(|l| l.text.as_str());
  }

  /// All lines.
  pub fn lines(&self) -> &[RawLine] {
    return &self.lines;
  }

  /// Lines from a line number to the end. Past the end, nothing.
  pub fn from_line(&self, start: usize) -> &[RawLine] {
    return self.lines.get(start..).unwrap_or(&[]);
  }

  /// Lines in a half-open range, clamped to the store.
  pub fn range(&self, start: usize, end: usize) -> &[RawLine] {
    let end = end.min(self.lines.len());
    let start = start.min(end);
    return &self.lines[start..end];
  }
}
