//! This module implements the load case registry, which collects load case
//! names out of `LDCASE=` declarations.

use log::debug;
use serde::{Serialize, Deserialize};

/// Keyword of a load case declaration.
pub const LOAD_CASE_KEYWORD: &str = "LDCASE=";

/// Character that ends a load case name.
const LOAD_CASE_END: char = '(';

/// An ordered, duplicate-free set of load case names.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadCases(pub Vec<String>);

impl LoadCases {
  /// Whether a name is registered.
  pub fn contains(&self, name: &str) -> bool {
    return self.0.iter().any(|lc| lc == name);
  }

  /// The first registered load case that is one of the given names.
  pub fn first_of<S: AsRef<str>>(&self, names: &[S]) -> Option<&str> {
    return self.0.iter()
      .find(|lc| names.iter().any(|n| n.as_ref() == lc.as_str()))
      .map(String::as_str);
  }

  /// Iterates over the names, in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &String> {
    return self.0.iter();
  }

  /// Number of load cases.
  pub fn len(&self) -> usize {
    return self.0.len();
  }

  /// Whether there are none.
  pub fn is_empty(&self) -> bool {
    return self.0.is_empty();
  }
}

/// What the registry made of a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadCaseResponse {
  /// Registered a new load case.
  Registered(String),
  /// A declaration of a load case we already had.
  Duplicate(String),
  /// A declaration without a name. Still resets the miss counter.
  Unnamed,
  /// A line without a declaration.
  Miss,
  /// The registry had already stopped.
  Finished
}

/// Collects load cases until too many consecutive lines go by without a
/// declaration. Misses only count once the first declaration was seen.
#[derive(Clone, Debug)]
pub struct LoadCaseRegistry {
  /// What was found.
  cases: LoadCases,
  /// Consecutive lines without a declaration since the last one.
  misses: usize,
  /// Whether a declaration was seen yet.
  started: bool,
  /// How many consecutive misses are tolerated.
  max_misses: usize
}

impl LoadCaseRegistry {
  /// Creates a registry with a miss threshold.
  pub fn new(max_misses: usize) -> Self {
    return Self {
      cases: LoadCases::default(),
      misses: 0,
      started: false,
      max_misses
    };
  }

  /// Whether the registry stopped looking.
  pub fn finished(&self) -> bool {
    return self.misses > self.max_misses;
  }

  /// Looks at a line.
  pub fn consume(&mut self, line: &str) -> LoadCaseResponse {
    if self.finished() {
      return LoadCaseResponse::Finished;
    }
    let start = match line.find(LOAD_CASE_KEYWORD) {
      Some(i) => i + LOAD_CASE_KEYWORD.len(),
      None => {
        if self.started {
          self.misses += 1;
          if self.finished() {
            debug!(
              "Stopped looking for load cases after {} blank lines.",
              self.misses
            );
          }
        }
        return LoadCaseResponse::Miss;
      }
    };
    self.started = true;
    self.misses = 0;
    let rest = &line[start..];
    let name = rest[..rest.find(LOAD_CASE_END).unwrap_or(rest.len())].trim();
    if name.is_empty() {
      debug!("Ignoring a load case declaration without a name.");
      return LoadCaseResponse::Unnamed;
    }
    if self.cases.contains(name) {
      debug!("Load case {} declared again.", name);
      return LoadCaseResponse::Duplicate(name.to_owned());
    }
    self.cases.0.push(name.to_owned());
    return LoadCaseResponse::Registered(name.to_owned());
  }

  /// Returns the registered load cases.
  pub fn finish(self) -> LoadCases {
    return self.cases;
  }
}
