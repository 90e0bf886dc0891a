//! This module defines the one table of fixed column positions the extractors
//! use. ME101 output is card-image text, so every field lives at a fixed
//! character range of its line; those ranges are written down here and only
//! here.
//!
//! Spans are 0-based and end-exclusive, counted in characters.

use std::fmt::Display;

use serde::{Serialize, Deserialize};

use crate::util::{char_len, column_slice, is_numeric_after};

/// The part of the report a field belongs to.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub enum Section {
  /// The input card images (pipe geometry).
  Geometry,
  /// The connectivity sub-table of the stress analysis.
  Connectivity,
  /// The per-load-case node data blocks.
  NodeData,
  /// The stress analysis rows.
  Stress,
  /// The pipe stress summary block.
  Summary,
  /// THOR node comment lines.
  Thor
}

impl Display for Section {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", match self {
      Self::Geometry => "card images",
      Self::Connectivity => "connectivity",
      Self::NodeData => "node data",
      Self::Stress => "stress analysis",
      Self::Summary => "stress summary",
      Self::Thor => "THOR comments"
    });
  }
}

/// How the contents of a span are interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
  /// Free text, sliced leniently.
  Text,
  /// A band of numbers. It qualifies only if the line reaches the end of the
  /// span and, once the fillers are gone, only digits remain.
  Digits {
    /// Characters allowed in between the digits.
    fillers: &'static str
  }
}

/// A fixed character range of a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
  /// First column.
  pub start: usize,
  /// One past the last column.
  pub end: usize,
  /// The expected contents.
  pub kind: FieldKind
}

impl ColumnSpan {
  /// The raw text in the span.
  pub fn slice<'a>(&self, line: &'a str) -> &'a str {
    return column_slice(line, self.start, self.end);
  }

  /// The text in the span, trimmed.
  pub fn trimmed<'a>(&self, line: &'a str) -> &'a str {
    return self.slice(line).trim();
  }

  /// Whether the span is empty or only blanks.
  pub fn is_blank(&self, line: &str) -> bool {
    return self.trimmed(line).is_empty();
  }

  /// Whether the line carries the expected contents in this span. Text spans
  /// just need to be non-blank.
  pub fn qualifies(&self, line: &str) -> bool {
    return match self.kind {
      FieldKind::Text => !self.is_blank(line),
      FieldKind::Digits { fillers } => {
        char_len(line) >= self.end
          && is_numeric_after(self.slice(line), fillers)
      }
    };
  }
}

/// Generates the Field enum and its column table.
macro_rules! gen_fields {
  (
    $(
      {
        $desc:literal,
        $fname:ident,
        $section:ident,
        $start:expr,
        $end:expr,
        $kind:expr
      },
    )*
  ) => {
    /// Every fixed-position field known to the extractors.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord
    )]
    pub enum Field {
      $(
        #[doc = $desc]
        $fname,
      )*
    }

    impl Field {
      /// Returns all known fields.
      pub const fn all() -> &'static [Self] {
        return &[ $(Self::$fname,)* ];
      }

      /// Returns a description of the field.
      pub const fn desc(&self) -> &'static str {
        return match self {
          $(Self::$fname => $desc,)*
        };
      }

      /// Returns the section this field is read in.
      pub const fn section(&self) -> Section {
        return match self {
          $(Self::$fname => Section::$section,)*
        };
      }

      /// Returns the columns of this field.
      pub const fn span(&self) -> ColumnSpan {
        return match self {
          $(
            Self::$fname => ColumnSpan {
              start: $start,
              end: $end,
              kind: $kind
            },
          )*
        };
      }
    }
  }
}

/// Fillers in the stress and connectivity bands.
const STRESS_FILLERS: &str = " *.";

/// Fillers in the node data coordinate band.
const COORDINATE_FILLERS: &str = " -.";

gen_fields!(
  // geometry cards
  {
    "Node at the start of a segment card",
    GeometryFrom, Geometry, 13, 16, FieldKind::Text
  },
  {
    "Node at the end of a segment card",
    GeometryTo, Geometry, 16, 19, FieldKind::Text
  },
  {
    "Both endpoint fields together",
    GeometryEndpoints, Geometry, 13, 19, FieldKind::Text
  },
  {
    "Short code that ends the card images",
    GeometryEndCode, Geometry, 10, 13, FieldKind::Text
  },
  {
    "Where a keyword value ends when no comma follows it",
    GeometryValue, Geometry, 0, 92, FieldKind::Text
  },
  // connectivity
  {
    "Node of a connectivity row",
    ConnectivityNode, Connectivity, 0, 8, FieldKind::Text
  },
  {
    "Numeric band of a connectivity row",
    ConnectivityBand, Connectivity, 25, 115,
    FieldKind::Digits { fillers: STRESS_FILLERS }
  },
  // node data
  {
    "Load case named in a node data header",
    NodeDataLoadCase, NodeData, 15, 24, FieldKind::Text
  },
  {
    "Node of a coordinate row",
    NodeDataNode, NodeData, 0, 8, FieldKind::Text
  },
  {
    "Numeric band of a coordinate row",
    NodeDataBand, NodeData, 34, 61,
    FieldKind::Digits { fillers: COORDINATE_FILLERS }
  },
  {
    "X coordinate",
    NodeDataX, NodeData, 33, 39, FieldKind::Text
  },
  {
    "Y coordinate",
    NodeDataY, NodeData, 44, 50, FieldKind::Text
  },
  {
    "Z coordinate",
    NodeDataZ, NodeData, 55, 61, FieldKind::Text
  },
  // stresses
  {
    "Node of a stress row",
    StressNode, Stress, 0, 7, FieldKind::Text
  },
  {
    "Numeric band of a stress row",
    StressBand, Stress, 18, 130,
    FieldKind::Digits { fillers: STRESS_FILLERS }
  },
  {
    "Sustained stress value",
    StressValue, Stress, 28, 35, FieldKind::Text
  },
  {
    "Secondary (allowable) stress value",
    StressSecondary, Stress, 35, 44, FieldKind::Text
  },
  // summary
  {
    "Stress ratio in the pipe stress summary",
    SummaryRatio, Summary, 72, 79, FieldKind::Text
  },
  // THOR
  {
    "Marker of a THOR node comment",
    ThorMarker, Thor, 14, 23, FieldKind::Text
  },
);

impl Field {
  /// The raw text of this field in a line.
  pub fn slice<'a>(&self, line: &'a str) -> &'a str {
    return self.span().slice(line);
  }

  /// The trimmed text of this field in a line.
  pub fn trimmed<'a>(&self, line: &'a str) -> &'a str {
    return self.span().trimmed(line);
  }

  /// Whether the line carries this field.
  pub fn qualifies(&self, line: &str) -> bool {
    return self.span().qualifies(line);
  }
}

impl Display for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let span = self.span();
    return write!(
      f, "{} ({}, {}..{})", self.desc(), self.section(), span.start, span.end
    );
  }
}
