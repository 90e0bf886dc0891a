//! Tests of the one-pass scanner and what it picks up: parameters, THOR
//! blocks, load cases and section boundaries.

use std::io::Write;

use nalgebra::Vector3;

use crate::errors::ReportError;
use crate::frame::*;
use crate::lines::LineStore;
use crate::loadcases::*;
use crate::params::*;
use crate::scanner::*;
use crate::sections::*;
use crate::settings::Settings;
use crate::thor::*;

use super::fixtures::{place, report_text};

/// A THOR comment line with the given body.
fn thor_line(body: &str) -> String {
  return place(&[(0, "***"), (14, &format!("THOR NODE {{{}}}", body))]);
}

#[test]
fn test_parameters() {
  let mut record = ParameterRecord::new();
  let lines = [
    "***/ANALYSIS NUMBER = 12-345  ",
    "***/ANALYSIS NUMBER = 12-346",
    "***/INPUT DOC = DOC-1",
    "***/INPUT DOC= DOC-2 ",
    "***/FROM/TO = 10=20",
    "***/DESCRIPTION OF CHANGE = first part",
    "***/DESCRIPTION OF CHANGE = second part",
    "***/NOT A KEY = x",
    "***/ANALYSIS TITLE",
    "ANALYSIS TITLE = no marker"
  ];
  let keys = lines.iter().map(|l| record.consume(l)).collect::<Vec<_>>();
  assert_eq!(keys[0], Some(ParameterKey::AnalysisNumber));
  assert_eq!(keys[4], Some(ParameterKey::FromTo));
  assert_eq!(&keys[7..], &[None, None, None]);
  assert_eq!(record.len(), 4);
  // the last declaration of a single value wins
  assert_eq!(record.scalar(ParameterKey::AnalysisNumber), Some("12-346"));
  assert_eq!(
    record.list(ParameterKey::InputDoc),
    Some(&["DOC-1".to_owned(), "DOC-2".to_owned()][..])
  );
  assert_eq!(record.list(ParameterKey::FromTo), Some(&["10=20".to_owned()][..]));
  assert_eq!(
    record.text(ParameterKey::DescriptionOfChange),
    Some(" first part second part")
  );
  assert_eq!(record.scalar(ParameterKey::AnalysisTitle), None);
  assert_eq!(
    record.get(ParameterKey::InputDoc).map(ParameterValue::render),
    Some("DOC-1\nDOC-2".to_owned())
  );
}

#[test]
fn test_parameter_keys() {
  for key in ParameterKey::all() {
    assert_eq!(ParameterKey::from_text(key.text()), Some(*key));
  }
  assert_eq!(ParameterKey::all().len(), 40);
  assert_eq!(ParameterKey::InputDoc.catalog(), Catalog::Repeatable);
  assert_eq!(
    split_parameter_line("  ***/ STATION =  X "),
    Some(("STATION", "  X "))
  );
  assert_eq!(split_parameter_line("***/STATION"), None);
}

#[test]
fn test_thor_blocks() {
  let mut thor = ThorNodes::new();
  let lines = [
    thor_line("ME101 NODE NUMBER=10, THOR NODE NUMBER=T10"),
    thor_line(concat!(
      "ME101 NODE NUMBER = 20, THOR NODE NUMBER=T20, ORIGIN=YES, ",
      "EAST_WEST_ORIGIN=100, NORTH_SOUTH_ORIGIN=200, UP_DOWN_ORIGIN=300"
    )),
    thor_line("ME101 NODE NUMBER=30"),
    "*** just a comment".to_owned()
  ];
  let found = lines.iter()
    .enumerate()
    .map(|(i, l)| thor.consume(i, l))
    .collect::<Vec<_>>();
  assert_eq!(found[0], Ok(Some("10".to_owned())));
  assert_eq!(found[1], Ok(Some("20".to_owned())));
  assert_eq!(found[3], Ok(None));
  assert_eq!(thor.nodes["20"]["THOR NODE NUMBER"], "T20");
  assert!(thor.nodes["30"].is_empty());
  assert_eq!(
    thor.settle_origin(),
    Ok(Some(Vector3::new(100.0, 200.0, 300.0)))
  );
  let table = FrameTable {
    load_case: "WTDW".to_owned(),
    convention: Convention::Raw,
    points: [("10", 3.0004), ("20", 0.5), ("30", 0.0), ("40", 1.0)].iter()
      .map(|(node, z)| FramePoint {
        node: node.to_string(),
        position: Vector3::new(1.0, 2.0, *z)
      })
      .collect()
  };
  let placed = thor.apply_origin(&table).unwrap();
  assert_eq!(placed.get("10").map(|p| p.x), Some(101.0));
  let rows = thor.elevations(&placed).unwrap();
  // node 30 has no THOR number and node 40 no block at all
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].node, "10");
  assert_eq!(rows[0].thor_node, "T10");
  assert_eq!(rows[0].elevation, 303.0);
  assert_eq!(rows[1].elevation, 300.5);
}

#[test]
fn test_thor_errors_are_sticky() {
  let mut thor = ThorNodes::new();
  assert_eq!(
    thor.consume(4, &thor_line("THOR NODE NUMBER=T1")),
    Err(ThorError::MissingNodeNumber { line: 4 })
  );
  assert_eq!(
    thor.consume(5, &thor_line("ME101 NODE NUMBER=10, THOR NODE NUMBER=T1")),
    Err(ThorError::AfterError { line: 5 })
  );
  assert!(thor.error);
  assert_eq!(thor.settle_origin(), Err(ThorError::Unusable));
  let empty = FrameTable {
    load_case: "WTDW".to_owned(),
    convention: Convention::Hc,
    points: Vec::new()
  };
  assert_eq!(thor.apply_origin(&empty), Err(ThorError::Unusable));
  assert_eq!(thor.elevations(&empty), Err(ThorError::Unusable));

  let mut malformed = ThorNodes::new();
  assert_eq!(
    malformed.consume(0, &thor_line("ME101 NODE NUMBER=10, BROKEN")),
    Err(ThorError::MalformedItem { line: 0, item: "BROKEN".to_owned() })
  );

  // a trailing comma leaves an empty item behind
  let mut trailing = ThorNodes::new();
  assert_eq!(
    trailing.consume(0, &thor_line(
      "ME101 NODE NUMBER=10, THOR NODE NUMBER=T10,"
    )),
    Err(ThorError::MalformedItem { line: 0, item: String::new() })
  );
  assert!(trailing.error);
  assert!(trailing.nodes.is_empty());
  assert!(trailing.order.is_empty());
}

#[test]
fn test_thor_first_origin_wins() {
  let mut thor = ThorNodes::new();
  let lines = [
    thor_line(concat!(
      "ME101 NODE NUMBER=20, ORIGIN=YES, ",
      "EAST_WEST_ORIGIN=0, NORTH_SOUTH_ORIGIN=0, UP_DOWN_ORIGIN=100"
    )),
    thor_line(concat!(
      "ME101 NODE NUMBER=100, ORIGIN=YES, ",
      "EAST_WEST_ORIGIN=0, NORTH_SOUTH_ORIGIN=0, UP_DOWN_ORIGIN=7"
    )),
    // a later block for the same node keeps its place
    thor_line(concat!(
      "ME101 NODE NUMBER=20, ORIGIN=YES, ",
      "EAST_WEST_ORIGIN=0, NORTH_SOUTH_ORIGIN=0, UP_DOWN_ORIGIN=50"
    ))
  ];
  thor.consume(0, &lines[0]).unwrap();
  thor.consume(1, &lines[1]).unwrap();
  assert_eq!(thor.settle_origin(), Ok(Some(Vector3::new(0.0, 0.0, 100.0))));
  thor.consume(2, &lines[2]).unwrap();
  assert_eq!(thor.order, vec!["20".to_owned(), "100".to_owned()]);
  assert_eq!(thor.settle_origin(), Ok(Some(Vector3::new(0.0, 0.0, 50.0))));

  let mut unflagged = ThorNodes::new();
  unflagged.consume(0, &thor_line(
    "ME101 NODE NUMBER=20, THOR NODE NUMBER=T20"
  )).unwrap();
  unflagged.consume(1, &thor_line(concat!(
    "ME101 NODE NUMBER=100, ORIGIN=YES, ",
    "EAST_WEST_ORIGIN=1, NORTH_SOUTH_ORIGIN=2, UP_DOWN_ORIGIN=3"
  ))).unwrap();
  assert_eq!(unflagged.settle_origin(), Ok(Some(Vector3::new(1.0, 2.0, 3.0))));
}

#[test]
fn test_thor_origin_errors() {
  let mut missing = ThorNodes::new();
  missing.consume(0, &thor_line(
    "ME101 NODE NUMBER=10, ORIGIN=YES, EAST_WEST_ORIGIN=1, UP_DOWN_ORIGIN=2"
  )).unwrap();
  assert_eq!(
    missing.settle_origin(),
    Err(ThorError::MissingOrigin {
      node: "10".to_owned(),
      key: "NORTH_SOUTH_ORIGIN"
    })
  );
  assert!(missing.error);

  let mut none = ThorNodes::new();
  none.consume(0, &thor_line("ME101 NODE NUMBER=10")).unwrap();
  assert_eq!(none.settle_origin(), Ok(None));
  assert!(!none.error);
}

#[test]
fn test_load_case_registry() {
  let mut registry = LoadCaseRegistry::new(2);
  let lines = [
    "nothing yet",
    "  LDCASE=WTDW(  1)",
    "a",
    "b",
    "LDCASE= TH1 ",
    "LDCASE=WTDW (again)",
    "LDCASE=(",
    "c",
    "d",
    "e",
    "LDCASE=LATE"
  ];
  let responses = lines.iter()
    .map(|l| registry.consume(l))
    .collect::<Vec<_>>();
  assert_eq!(responses[0], LoadCaseResponse::Miss);
  assert_eq!(responses[1], LoadCaseResponse::Registered("WTDW".to_owned()));
  assert_eq!(responses[4], LoadCaseResponse::Registered("TH1".to_owned()));
  assert_eq!(responses[5], LoadCaseResponse::Duplicate("WTDW".to_owned()));
  assert_eq!(responses[6], LoadCaseResponse::Unnamed);
  assert_eq!(responses[10], LoadCaseResponse::Finished);
  assert!(registry.finished());
  let cases = registry.finish();
  assert_eq!(cases.0, vec!["WTDW".to_owned(), "TH1".to_owned()]);
  assert_eq!(cases.first_of(&["DW", "TH1"]), Some("TH1"));
  assert_eq!(cases.first_of(&["DW"]), None);

  // a declaration without a name keeps the registry going
  let mut registry = LoadCaseRegistry::new(2);
  for line in ["LDCASE=A(", "x", "y", "LDCASE=(", "z", "w"] {
    registry.consume(line);
  }
  assert!(!registry.finished());
  assert_eq!(
    registry.consume("LDCASE=B("),
    LoadCaseResponse::Registered("B".to_owned())
  );
  assert_eq!(registry.finish().0, vec!["A".to_owned(), "B".to_owned()]);
}

#[test]
fn test_sections() {
  let lines = vec![
    "ALL     STRESS ANALYSIS".to_owned(),
    "INPUT CARD IMAGES         .  +".to_owned(),
    "ALL     STRESS ANALYSIS".to_owned(),
    " APPROVED BY ".to_owned(),
    "INPUT CARD IMAGES".to_owned()
  ];
  let mut locator = SectionLocator::new();
  let found = lines.iter()
    .enumerate()
    .map(|(i, l)| locator.consume(i, l))
    .collect::<Vec<_>>();
  assert_eq!(found[1], vec![
    (SectionKind::Geometry, Boundary::Start),
    (SectionKind::Geometry, Boundary::End)
  ]);
  // a terminator before the start doesn't count
  assert!(found[3].is_empty());
  assert!(found[4].is_empty());
  let sections = locator.finish();
  assert_eq!(sections.stress_analysis.start, Some(0));
  assert_eq!(sections.stress_analysis.end, None);
  assert_eq!(sections.geometry.start, Some(1));
  assert_eq!(sections.geometry.end, Some(1));
  assert!(!sections.stress_summary.found());
}

#[test]
fn test_scanner_responses() {
  let mut scanner = OnePassScanner::new(500);
  assert_eq!(scanner.consume("hello"), ScanResponse::Useless);
  assert_eq!(
    scanner.consume("***/STATION = 7"),
    ScanResponse::Parameter(ParameterKey::Station)
  );
  assert_eq!(
    scanner.consume(&thor_line("ME101 NODE NUMBER=10")),
    ScanResponse::Thor("10".to_owned())
  );
  assert_eq!(
    scanner.consume("LDCASE=WTDW("),
    ScanResponse::LoadCase("WTDW".to_owned())
  );
  assert_eq!(
    scanner.consume("  INPUT CARD IMAGES"),
    ScanResponse::Boundary(SectionKind::Geometry, Boundary::Start)
  );
  assert_eq!(
    scanner.consume(&thor_line("ME101 NODE NUMBER=20, X")),
    ScanResponse::ThorError
  );
  let output = scanner.finish();
  assert_eq!(output.params.scalar(ParameterKey::Station), Some("7"));
  assert_eq!(output.sections.geometry.start, Some(4));
  assert!(output.thor.error);
  assert_eq!(output.load_cases.0, vec!["WTDW".to_owned()]);
}

#[test]
fn test_settings() {
  let settings = Settings::from_toml_str(concat!(
    "max_blank_lines = 10\n",
    "convention = \"RAW\"\n",
    "[mesh]\n",
    "circumference = 8\n",
    "[nozzle]\n",
    "nodes = [\"20\", \"30\"]\n",
    "yield = 30000.0\n"
  )).unwrap();
  assert_eq!(settings.max_blank_lines, 10);
  assert_eq!(settings.convention, Convention::Raw);
  assert_eq!(settings.mesh.circumference, 8);
  assert_eq!(settings.mesh.stations, 10);
  assert_eq!(settings.nozzle.nodes, vec!["20".to_owned(), "30".to_owned()]);
  assert_eq!(settings.nozzle.yield_strength, 30000.0);
  assert_eq!(settings.nozzle.k1, 0.01);
  assert_eq!(settings.deadweight_keywords, vec!["WTDW", "DW"]);
  assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
  assert!(matches!(
    Settings::from_toml_str("convention = \"sideways\""),
    Err(ReportError::Config(_))
  ));
  assert!(matches!(
    "sideways".parse::<Convention>(),
    Err(ReportError::UnknownConvention(_))
  ));
  assert_eq!("Hc".parse::<Convention>().unwrap(), Convention::Hc);
}

#[test]
fn test_read_cp1252_file() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  file.write_all(b"***/ANALYSIS TITLE = Caf\xE9\r\nLDCASE=WTDW(\r\n").unwrap();
  file.flush().unwrap();
  let store = LineStore::read_file(file.path()).unwrap();
  assert_eq!(store.len(), 2);
  assert_eq!(store.text(0), Some("***/ANALYSIS TITLE = Caf\u{E9}"));
  assert_eq!(
    store.filename.as_deref(),
    file.path().file_name().and_then(|s| s.to_str())
  );
  let output = OnePassScanner::scan(&store, 500);
  assert_eq!(output.params.scalar(ParameterKey::AnalysisTitle), Some("Caf\u{E9}"));
  assert_eq!(output.load_cases.0, vec!["WTDW".to_owned()]);
  assert!(LineStore::read_file(file.path().with_extension("missing")).is_err());
  let text = report_text(&["a".to_owned(), "b".to_owned()]);
  assert_eq!(LineStore::from_text(&text).len(), 2);
}
