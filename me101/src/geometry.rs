//! This module implements the geometry card parser, which rebuilds the chain
//! of segment endpoints (and the segment keywords attached to them) out of
//! the input card images echoed at the top of a report.
//!
//! Cards give either both endpoints of a segment, or a single node that
//! continues from the last one. The parser turns both into a flat chain in
//! which every segment is a consecutive pair of entries, except for a single
//! starting node.

use std::collections::BTreeMap;
use std::fmt::Display;

use log::debug;
use serde::{Serialize, Deserialize};

use crate::columns::Field;
use crate::lines::LineStore;
use crate::sections::{SectionKind, Sections};
use crate::util::{char_column, column_slice};

/// Lines containing this are comments.
pub const COMMENT_MARKER: &str = "***";

/// Codes in columns 10..13 that end the card images.
pub const END_CODES: [&str; 3] = ["TEA", "ACE", "END"];

/// A keyword a card can give a value for.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
  Hash
)]
pub enum SegmentKey {
  /// Outside diameter.
  Od,
  /// Wall thickness.
  Thi,
  /// Weight per unit length.
  LbsPerFt,
  /// Design pressure.
  Dpress,
  /// Operating pressure.
  Press,
  /// Peak pressure.
  Ppress,
  /// Elastic modulus.
  E,
  /// Design code.
  Code,
  /// Piping class.
  Class,
  /// Cold allowable stress.
  Sc,
  /// Hot allowable stress.
  Sh,
  /// Stress intensification factor.
  Sif,
  /// Added weight.
  Addwt,
  /// Added item.
  Add
}

impl SegmentKey {
  /// All keywords.
  pub const fn all() -> &'static [Self] {
    return &[
      Self::Od, Self::Thi, Self::LbsPerFt, Self::Dpress, Self::Press,
      Self::Ppress, Self::E, Self::Code, Self::Class, Self::Sc, Self::Sh,
      Self::Sif, Self::Addwt, Self::Add
    ];
  }

  /// The keyword as written on a card, separator included.
  pub const fn keyword(&self) -> &'static str {
    return match self {
      Self::Od => "OD=",
      Self::Thi => "THI=",
      Self::LbsPerFt => "LBS/FT=",
      Self::Dpress => "DPRESS=",
      Self::Press => "PRESS=",
      Self::Ppress => "PPRESS=",
      Self::E => "E=",
      Self::Code => "CODE=",
      Self::Class => "CLASS=",
      Self::Sc => "SC=",
      Self::Sh => "SH=",
      Self::Sif => "SIF=",
      Self::Addwt => "ADDWT=",
      Self::Add => "ADD="
    };
  }

  /// The keyword without its separator.
  pub fn name(&self) -> &'static str {
    let kw = self.keyword();
    return &kw[..kw.len() - 1];
  }

  /// Finds the value of this keyword in a line. The keyword must start a
  /// token, so that `PRESS=` is not found inside `DPRESS=`. The value runs
  /// to the next comma, or to column 92 if no comma follows, with every
  /// space removed.
  pub fn find_value(&self, line: &str) -> Option<String> {
    let kw = self.keyword();
    let at = line.match_indices(kw)
      .map(|(i, _)| i)
      .find(|&i| {
        line[..i].chars().next_back()
          .map_or(true, |c| !c.is_alphanumeric() && c != '/')
      })?;
    let start = at + kw.len();
    let raw = match line[start..].find(',') {
      Some(comma) => &line[start..start + comma],
      None => column_slice(
        line,
        char_column(line, start),
        Field::GeometryValue.span().end
      )
    };
    return Some(raw.replace(' ', ""));
  }
}

impl Display for SegmentKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// A node of the chain, and the keyword values that apply at it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentEndpointEntry {
  /// The node.
  pub node: String,
  /// Keyword values.
  pub params: BTreeMap<SegmentKey, String>
}

impl SegmentEndpointEntry {
  /// Creates an entry without values.
  pub fn new(node: &str) -> Self {
    return Self { node: node.to_owned(), params: BTreeMap::new() };
  }

  /// The value of a keyword.
  pub fn get(&self, key: SegmentKey) -> Option<&str> {
    return self.params.get(&key).map(String::as_str);
  }
}

/// The chain of entries rebuilt from the cards.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentChain {
  /// The entries, in card order.
  pub entries: Vec<SegmentEndpointEntry>
}

impl SegmentChain {
  /// Every entry for a node.
  pub fn entries_for<'a>(
    &'a self,
    node: &'a str
  ) -> impl Iterator<Item = &'a SegmentEndpointEntry> + 'a {
    return self.entries.iter().filter(move |e| e.node == node);
  }

  /// Number of entries.
  pub fn len(&self) -> usize {
    return self.entries.len();
  }

  /// Whether there are no entries.
  pub fn is_empty(&self) -> bool {
    return self.entries.is_empty();
  }
}

/// What kind of endpoints the last card gave.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EndpointMode {
  /// No endpoints yet.
  Awaiting,
  /// A single starting node.
  SingleStart,
  /// A segment, as the last two entries.
  Paired
}

/// Where the parser is.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardState {
  /// Outside the card images. The mode is kept for a later re-entry.
  Outside(EndpointMode),
  /// Inside the card images.
  Inside(EndpointMode)
}

/// What the parser made of a line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardResponse {
  /// Outside the card images; nothing to do.
  Outside,
  /// The line started the card images.
  Entered,
  /// The line ended the card images.
  Left,
  /// A comment.
  Comment,
  /// A card. Says how many entries it added and how many values it set.
  Card {
    /// Entries added.
    entries: usize,
    /// Keyword values found.
    values: usize
  }
}

/// Indices of the three most recent entries, newest first.
#[derive(Copy, Clone, Debug, Default)]
struct Lookback {
  /// The indices.
  recent: [Option<usize>; 3]
}

impl Lookback {
  /// Records a new entry.
  fn push(&mut self, index: usize) {
    self.recent = [Some(index), self.recent[0], self.recent[1]];
  }

  /// The entry `n` places back; 0 is the newest.
  fn back(&self, n: usize) -> Option<usize> {
    return self.recent.get(n).copied().flatten();
  }
}

/// The state machine that reads the cards.
#[derive(Clone, Debug)]
pub struct GeometryCardParser {
  /// Where we are.
  state: CardState,
  /// What was rebuilt so far.
  entries: Vec<SegmentEndpointEntry>,
  /// The most recent entries.
  lookback: Lookback,
  /// Endpoint fields of the last card that had any.
  last_endpoints: Option<(String, String)>
}

impl Default for GeometryCardParser {
  fn default() -> Self {
    return Self::new();
  }
}

impl GeometryCardParser {
  /// Creates a parser, outside the card images.
  pub fn new() -> Self {
    return Self {
      state: CardState::Outside(EndpointMode::Awaiting),
      entries: Vec::new(),
      lookback: Lookback::default(),
      last_endpoints: None
    };
  }

  /// Current state.
  pub fn state(&self) -> CardState {
    return self.state;
  }

  /// Appends an entry.
  fn push(&mut self, node: &str) {
    self.entries.push(SegmentEndpointEntry::new(node));
    self.lookback.push(self.entries.len() - 1);
  }

  /// Sets a value on the entry `n` places back, if there is one.
  fn set_back(&mut self, n: usize, key: SegmentKey, value: &str) {
    if let Some(i) = self.lookback.back(n) {
      self.entries[i].params.insert(key, value.to_owned());
    }
  }

  /// Consumes a line.
  pub fn consume(&mut self, number: usize, line: &str) -> CardResponse {
    let geometry = SectionKind::Geometry;
    match self.state {
      CardState::Outside(mode) => {
        if line.contains(geometry.start_marker()) {
          debug!("Entering the card images on line {}.", number);
          self.state = CardState::Inside(mode);
          return CardResponse::Entered;
        }
        return CardResponse::Outside;
      },
      CardState::Inside(mode) => {
        let terminated = geometry.end_marker()
          .map_or(false, |m| line.contains(m));
        let code = Field::GeometryEndCode.slice(line);
        if terminated || END_CODES.contains(&code) {
          debug!("Leaving the card images on line {}.", number);
          self.state = CardState::Outside(mode);
          return CardResponse::Left;
        }
        if line.contains(COMMENT_MARKER)
          || line.contains(geometry.start_marker()) {
          return CardResponse::Comment;
        }
        return self.card(number, line, mode);
      }
    }
  }

  /// Reads a card.
  fn card(
    &mut self,
    number: usize,
    line: &str,
    mut mode: EndpointMode
  ) -> CardResponse {
    let before = self.entries.len();
    let mut new_pair = false;
    if !Field::GeometryEndpoints.span().is_blank(line) {
      let from = Field::GeometryFrom.trimmed(line).to_owned();
      let to = Field::GeometryTo.trimmed(line).to_owned();
      let endpoints = (from, to);
      if self.last_endpoints.as_ref() == Some(&endpoints) {
        debug!("Line {} repeats the previous endpoints.", number);
      } else {
        let (from, to) = (&endpoints.0, &endpoints.1);
        let single = match (from.is_empty(), to.is_empty()) {
          (true, false) => Some(to.clone()),
          (false, true) => Some(from.clone()),
          _ => None
        };
        match single {
          Some(node) if mode == EndpointMode::Awaiting => {
            self.push(&node);
            mode = EndpointMode::SingleStart;
          },
          Some(node) => {
            let previous = self.entries.last()
              .map(|e| e.node.clone())
              .unwrap_or_default();
            self.push(&previous);
            self.push(&node);
            mode = EndpointMode::Paired;
            new_pair = true;
          },
          None => {
            self.push(from);
            self.push(to);
            mode = EndpointMode::Paired;
            new_pair = true;
          }
        }
      }
      self.last_endpoints = Some(endpoints);
    }
    self.state = CardState::Inside(mode);
    let found = SegmentKey::all()
      .iter()
      .filter_map(|k| k.find_value(line).map(|v| (*k, v)))
      .filter(|(_, v)| !v.is_empty())
      .collect::<BTreeMap<_, _>>();
    for (key, value) in found.iter() {
      match mode {
        EndpointMode::Awaiting => {},
        EndpointMode::SingleStart => self.set_back(0, *key, value),
        EndpointMode::Paired => {
          self.set_back(0, *key, value);
          self.set_back(1, *key, value);
        }
      }
    }
    if new_pair {
      self.inherit(number, &found);
    }
    return CardResponse::Card {
      entries: self.entries.len() - before,
      values: found.len()
    };
  }

  /// Copies onto a new pair the values the line didn't give, from the entry
  /// just before the pair.
  fn inherit(&mut self, number: usize, given: &BTreeMap<SegmentKey, String>) {
    let newest = match self.lookback.back(0) {
      Some(i) => i,
      None => return
    };
    for key in SegmentKey::all() {
      if given.contains_key(key)
        || self.entries[newest].params.contains_key(key) {
        continue;
      }
      let source = match self.lookback.back(2) {
        Some(i) => i,
        None => {
          debug!(
            "Line {}: no history to inherit {} from.", number, key
          );
          return;
        }
      };
      match self.entries[source].params.get(key).cloned() {
        Some(value) => {
          self.set_back(0, *key, &value);
          self.set_back(1, *key, &value);
        },
        None => debug!(
          "Line {}: previous segment has no {} to inherit.", number, key
        )
      }
    }
  }

  /// Returns the rebuilt chain.
  pub fn finish(self) -> SegmentChain {
    return SegmentChain { entries: self.entries };
  }

  /// Parses the card images of a report. Without a card images section,
  /// the chain is empty.
  pub fn parse(store: &LineStore, sections: &Sections) -> SegmentChain {
    let start = match sections.geometry.start {
      Some(s) => s,
      None => {
        debug!("No card images in the report, no geometry.");
        return SegmentChain::default();
      }
    };
    let mut parser = Self::new();
    for line in store.from_line(start) {
      parser.consume(line.number, &line.text);
    }
    return parser.finish();
  }
}
