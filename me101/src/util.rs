//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules.

use encoding_rs::WINDOWS_1252;

/// Decodes Windows-1252 text. Every byte maps to exactly one char, so this
/// never fails. A leading BOM is kept as text.
pub fn decode_cp1252(bytes: &[u8]) -> String {
  let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
  return text.into_owned();
}

/// Splits text into lines the way a universal-newline reader does: "\r\n",
/// "\r" and "\n" all end a line, and a trailing terminator does not start a
/// new, empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
  let mut lines = Vec::new();
  let mut start = 0;
  let bytes = text.as_bytes();
  let mut i = 0;
  while i < bytes.len() {
    match bytes[i] {
      b'\n' => {
        lines.push(&text[start..i]);
        start = i + 1;
      },
      b'\r' => {
        lines.push(&text[start..i]);
        if bytes.get(i + 1) == Some(&b'\n') {
          i += 1;
        }
        start = i + 1;
      },
      _ => {}
    }
    i += 1;
  }
  if start < text.len() {
    lines.push(&text[start..]);
  }
  return lines;
}

/// Returns the byte offset of a character column, clamped to the line length.
pub(crate) fn byte_offset(line: &str, col: usize) -> usize {
  if line.is_ascii() {
    return col.min(line.len());
  }
  return line.char_indices().nth(col).map_or(line.len(), |(i, _)| i);
}

/// Returns the character column of a byte offset.
pub(crate) fn char_column(line: &str, byte: usize) -> usize {
  if line.is_ascii() {
    return byte;
  }
  return line[..byte].chars().count();
}

/// Length of a line in characters.
pub(crate) fn char_len(line: &str) -> usize {
  if line.is_ascii() {
    return line.len();
  }
  return line.chars().count();
}

/// Slices a line by character columns, end-exclusive. Lenient like a slice
/// of a fixed-form card: columns past the end of the line are just missing.
pub fn column_slice(line: &str, start: usize, end: usize) -> &str {
  let a = byte_offset(line, start);
  let b = byte_offset(line, end).max(a);
  return &line[a..b];
}

/// Checks that, after removing filler characters, some characters remain and
/// they are all numeric.
pub fn is_numeric_after(s: &str, fillers: &str) -> bool {
  let mut seen = false;
  for c in s.chars().filter(|c| !fillers.contains(*c)) {
    if !c.is_numeric() {
      return false;
    }
    seen = true;
  }
  return seen;
}

/// Decodes a plain decimal number out of a text field. Surrounding blanks are
/// fine, but anything non-finite is not a usable number.
pub fn decode_float(s: &str) -> Option<f64> {
  return s.trim().parse::<f64>().ok().filter(|x| x.is_finite());
}

/// Rounds to a number of decimal places.
pub fn round_to(x: f64, decimals: i32) -> f64 {
  let factor = 10.0_f64.powi(decimals);
  return (x * factor).round() / factor;
}
