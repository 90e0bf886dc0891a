mod cards;
mod comments;

use crate::columns::{Field, FieldKind, Section};
use crate::util::*;

#[test]
fn test_decode_float() {
  let epsilon = 1e-9_f64;
  let assert_near = |a: f64, b: f64| assert!((a - b).abs() < epsilon);
  let direct = |s: &str, f: f64| assert_near(decode_float(s).unwrap(), f);
  let must_fail = |s: &str| assert_eq!(decode_float(s), None);
  direct("1.5", 1.5);
  direct("  -12.25 ", -12.25);
  direct("1e3", 1000.0);
  direct(".5", 0.5);
  must_fail("");
  must_fail("   ");
  must_fail("1.2.3");
  must_fail("*****");
  must_fail("inf");
  must_fail("NaN");
}

#[test]
fn test_split_lines() {
  assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
  assert_eq!(split_lines("a\n"), vec!["a"]);
  assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
  assert!(split_lines("").is_empty());
}

#[test]
fn test_decode_cp1252() {
  assert_eq!(decode_cp1252(b"abc"), "abc");
  assert_eq!(decode_cp1252(&[0x80, 0x97, 0xE9]), "\u{20AC}\u{2014}\u{E9}");
  // undefined slots come out as the matching C1 controls
  assert_eq!(decode_cp1252(&[0x81, 0x9D]), "\u{81}\u{9D}");
}

#[test]
fn test_column_slice() {
  assert_eq!(column_slice("0123456789", 2, 5), "234");
  assert_eq!(column_slice("0123", 2, 10), "23");
  assert_eq!(column_slice("0123", 8, 10), "");
  assert_eq!(column_slice("\u{20AC}bcdef", 1, 3), "bc");
}

#[test]
fn test_is_numeric_after() {
  assert!(is_numeric_after(" 1.5 * 2", " *."));
  assert!(is_numeric_after("-1.0 -2.0", " -."));
  assert!(!is_numeric_after("   ", " *."));
  assert!(!is_numeric_after("1.5 A", " *."));
  assert!(!is_numeric_after("-1.0", " *."));
}

#[test]
fn test_digit_spans() {
  let mut line = " ".repeat(25);
  line.push_str(&"  1.0".repeat(18));
  assert_eq!(line.len(), 115);
  assert!(Field::ConnectivityBand.qualifies(&line));
  // one column short of the end of the band
  assert!(!Field::ConnectivityBand.qualifies(&line[..114]));
  line.replace_range(30..31, "X");
  assert!(!Field::ConnectivityBand.qualifies(&line));
  assert!(!Field::NodeDataX.qualifies(""));
}

#[test]
fn test_round_to() {
  assert_eq!(round_to(3.958406, 3), 3.958);
  assert_eq!(round_to(3.8990306, 5), 3.89903);
  assert_eq!(round_to(-0.0004, 3), -0.0);
}

#[test]
fn test_column_schema() {
  let fields = Field::all();
  assert!(fields.iter().all(|f| f.span().start < f.span().end));
  // text fields of a section either nest or stay apart
  for a in fields.iter() {
    for b in fields.iter().filter(|b| *b != a && b.section() == a.section()) {
      let (sa, sb) = (a.span(), b.span());
      if sa.kind != FieldKind::Text || sb.kind != FieldKind::Text {
        continue;
      }
      let apart = sa.end <= sb.start || sb.end <= sa.start;
      let nested = (sa.start <= sb.start && sb.end <= sa.end)
        || (sb.start <= sa.start && sa.end <= sb.end);
      assert!(apart || nested, "{} clashes with {}", a, b);
    }
  }
  // every digit band leaves the node id of its section alone
  for band in fields.iter().filter(|f| f.span().kind != FieldKind::Text) {
    for id in fields.iter().filter(|f| f.section() == band.section()) {
      if is_node_field(id) {
        assert!(id.span().end <= band.span().start, "{} covers {}", band, id);
      }
    }
  }
  let thor = fields.iter()
    .filter(|f| f.section() == Section::Thor)
    .collect::<Vec<_>>();
  assert_eq!(thor, vec![&Field::ThorMarker]);
  assert_eq!(
    Field::StressValue.to_string(),
    "Sustained stress value (stress analysis, 28..35)"
  );
}

/// Whether a field holds the node id of its rows.
fn is_node_field(field: &Field) -> bool {
  return matches!(
    field,
    Field::ConnectivityNode | Field::NodeDataNode | Field::StressNode
  );
}
