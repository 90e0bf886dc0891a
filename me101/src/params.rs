//! This module implements the extraction of free-form parameters embedded in
//! comment lines of the form `***/KEY = VALUE`.
//!
//! The set of keys is closed: every key belongs to exactly one catalog, and
//! the catalog decides how repeated declarations accumulate. Anything else
//! after the marker is ignored.

use std::collections::BTreeMap;
use std::fmt::Display;

use convert_case::{Case, Casing};
use serde::{Serialize, Deserialize};

/// Marker that starts a parameter declaration.
pub const PARAMETER_MARKER: &str = "***/";

/// Separator between a key and its value.
const PARAMETER_SEPARATOR: char = '=';

/// How the values of a key accumulate.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub enum Catalog {
  /// A single value; a later declaration replaces an earlier one.
  Single,
  /// An ordered list of every declared value.
  Repeatable,
  /// Text continued over several lines, concatenated as written.
  MultiLine
}

/// Generates the ParameterKey enum.
macro_rules! gen_parameter_keys {
  (
    $(
      {
        $text:literal,
        $kname:ident,
        $catalog:ident
      },
    )*
  ) => {
    /// Every parameter key that can be declared in a comment.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord, Hash
    )]
    pub enum ParameterKey {
      $(
        #[doc = $text]
        $kname,
      )*
    }

    impl ParameterKey {
      /// Returns all known keys, in declaration order.
      pub const fn all() -> &'static [Self] {
        return &[ $(Self::$kname,)* ];
      }

      /// Returns the key exactly as written in a report.
      pub const fn text(&self) -> &'static str {
        return match self {
          $(Self::$kname => $text,)*
        };
      }

      /// Returns the catalog of the key.
      pub const fn catalog(&self) -> Catalog {
        return match self {
          $(Self::$kname => Catalog::$catalog,)*
        };
      }

      /// Returns the small name of the variant, CamelCase.
      pub const fn short_name(&self) -> &'static str {
        return match self {
          $(Self::$kname => stringify!($kname),)*
        };
      }

      /// Returns the small, snake case name of the variant.
      pub fn snake_case_name(&self) -> String {
        return self.short_name().to_case(Case::Snake);
      }

      /// Finds the key written exactly like this.
      pub fn from_text(s: &str) -> Option<Self> {
        return match s {
          $($text => Some(Self::$kname),)*
          _ => None
        };
      }
    }
  }
}

gen_parameter_keys!(
  // single values
  { "ANALYSIS NUMBER", AnalysisNumber, Single },
  { "ANALYSIS TITLE", AnalysisTitle, Single },
  { "STATION", Station, Single },
  { "UNIT NUMBER", UnitNumber, Single },
  { "DISCIPLINE", Discipline, Single },
  { "SAFETY CLASS", SafetyClass, Single },
  { "SYSTEM CODE", SystemCode, Single },
  { "STRUCTURE", Structure, Single },
  { "ANALYSIS REVISION", AnalysisRevision, Single },
  { "PACKAGE NUMBER", PackageNumber, Single },
  { "PACKAGE REVISION", PackageRevision, Single },
  { "AFFECTED DOCUMENT NUMBER", AffectedDocumentNumber, Single },
  { "AFFECTED DOCUMENT REVISION", AffectedDocumentRevision, Single },
  {
    "DOES ANALYSIS CONTAIN SAFEGUARDS INFORMATION(YER OR NO)?",
    ContainsSafeguardsInformation, Single
  },
  {
    "DOES ANALYSIS CONTAIN UNVERIFIED ASSUMPTIONS(YER OR NO)?",
    ContainsUnverifiedAssumptions, Single
  },
  {
    "UNVERIFIED ASSUMPTION TRACKING ORDER",
    UnverifiedAssumptionTrackingOrder, Single
  },
  { "SUPERSEDED DOCUMENT", SupersededDocument, Single },
  { "PREPARER NAME", PreparerName, Single },
  { "PREPARER SIGNATURE", PreparerSignature, Single },
  { "DATE PREPARED", DatePrepared, Single },
  { "REVIEWER NAME", ReviewerName, Single },
  { "REVIEWER SIGNATURE", ReviewerSignature, Single },
  { "DATE REVIEWED", DateReviewed, Single },
  { "METHOD OF REVIEW", MethodOfReview, Single },
  { "TYPE OF REVIEW", TypeOfReview, Single },
  { "EXTERNAL APPROVER NAME", ExternalApproverName, Single },
  { "EXTERNAL APPROVER SIGNATURE", ExternalApproverSignature, Single },
  { "EXTERNAL APPROVAL DATE", ExternalApprovalDate, Single },
  { "COMPANY REVIEWER NAME", CompanyReviewerName, Single },
  { "COMPANY REVIEWER SIGNATURE", CompanyReviewerSignature, Single },
  { "COMPANY REVIEW DATE", CompanyReviewDate, Single },
  {
    "INDEPENDENT THIRD PARTY REVIEW REQUIRED(YER OR NO)",
    ThirdPartyReviewRequired, Single
  },
  { "COMPANY APPROVER NAME", CompanyApproverName, Single },
  { "COMPANY APPROVAL SIGNATURE", CompanyApprovalSignature, Single },
  { "COMPANY APPROVAL DATE", CompanyApprovalDate, Single },
  // repeatable
  { "INPUT DOC", InputDoc, Repeatable },
  { "FROM/TO", FromTo, Repeatable },
  { "COMPONENT", Component, Repeatable },
  // multi-line
  { "DESCRIPTION OF CHANGE", DescriptionOfChange, MultiLine },
  { "DESCRIPTION OF REVISION", DescriptionOfRevision, MultiLine },
);

impl Display for ParameterKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.text());
  }
}

/// The accumulated value of a key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParameterValue {
  /// The value of a single-value key.
  Scalar(String),
  /// Every value of a repeatable key, in order.
  List(Vec<String>),
  /// The concatenated text of a multi-line key.
  Text(String)
}

impl ParameterValue {
  /// Renders the value as one piece of text. Lists are joined by newlines.
  pub fn render(&self) -> String {
    return match self {
      Self::Scalar(s) | Self::Text(s) => s.clone(),
      Self::List(v) => v.join("\n")
    };
  }
}

/// Splits a parameter line into its key and raw value. The key runs from the
/// marker to the next separator; a line without one declares nothing.
pub fn split_parameter_line(line: &str) -> Option<(&str, &str)> {
  let after = &line[line.find(PARAMETER_MARKER)? + PARAMETER_MARKER.len()..];
  let sep = after.find(PARAMETER_SEPARATOR)?;
  return Some((after[..sep].trim(), &after[sep + 1..]));
}

/// Every parameter declared in a report.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterRecord {
  /// The values, by key.
  values: BTreeMap<ParameterKey, ParameterValue>
}

impl ParameterRecord {
  /// Creates an empty record.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Looks at a line and absorbs the declaration in it, if any. Returns the
  /// key that was updated.
  pub fn consume(&mut self, line: &str) -> Option<ParameterKey> {
    let (key_text, raw) = split_parameter_line(line)?;
    let key = ParameterKey::from_text(key_text)?;
    match key.catalog() {
      Catalog::Single => {
        self.values.insert(key, ParameterValue::Scalar(raw.trim().to_owned()));
      },
      Catalog::Repeatable => {
        let value = raw.trim().to_owned();
        match self.values.get_mut(&key) {
          Some(ParameterValue::List(v)) => v.push(value),
          _ => {
            self.values.insert(key, ParameterValue::List(vec![value]));
          }
        }
      },
      Catalog::MultiLine => {
        let piece = raw.replace('\n', "");
        match self.values.get_mut(&key) {
          Some(ParameterValue::Text(s)) => s.push_str(&piece),
          _ => {
            self.values.insert(key, ParameterValue::Text(piece));
          }
        }
      }
    }
    return Some(key);
  }

  /// The value of a key, if it was declared.
  pub fn get(&self, key: ParameterKey) -> Option<&ParameterValue> {
    return self.values.get(&key);
  }

  /// The value of a single-value key.
  pub fn scalar(&self, key: ParameterKey) -> Option<&str> {
    return match self.values.get(&key) {
      Some(ParameterValue::Scalar(s)) => Some(s.as_str()),
      _ => None
    };
  }

  /// The values of a repeatable key.
  pub fn list(&self, key: ParameterKey) -> Option<&[String]> {
    return match self.values.get(&key) {
      Some(ParameterValue::List(v)) => Some(v.as_slice()),
      _ => None
    };
  }

  /// The text of a multi-line key.
  pub fn text(&self, key: ParameterKey) -> Option<&str> {
    return match self.values.get(&key) {
      Some(ParameterValue::Text(s)) => Some(s.as_str()),
      _ => None
    };
  }

  /// Every declared key and its value, in catalog order.
  pub fn iter(&self) -> impl Iterator<Item = (&ParameterKey, &ParameterValue)> {
    return self.values.iter();
  }

  /// Number of declared keys.
  pub fn len(&self) -> usize {
    return self.values.len();
  }

  /// Whether nothing was declared.
  pub fn is_empty(&self) -> bool {
    return self.values.is_empty();
  }
}
