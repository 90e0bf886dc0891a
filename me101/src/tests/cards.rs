//! Tests of the geometry card parser.

use crate::geometry::*;
use crate::lines::LineStore;
use crate::scanner::OnePassScanner;

use super::fixtures::{card, place, report_text};

/// Runs the parser over some lines, starting inside the card images.
fn parse_cards(cards: &[String]) -> SegmentChain {
  let mut lines = vec!["  INPUT CARD IMAGES".to_owned()];
  lines.extend(cards.iter().cloned());
  lines.push(place(&[(10, "END")]));
  let store = LineStore::from_text(&report_text(&lines));
  let scan = OnePassScanner::scan(&store, 500);
  return GeometryCardParser::parse(&store, &scan.sections);
}

/// Nodes of the chain, in order.
fn nodes(chain: &SegmentChain) -> Vec<&str> {
  return chain.entries.iter().map(|e| e.node.as_str()).collect();
}

#[test]
fn test_five_card_chain() {
  let chain = parse_cards(&[
    card("", "10", "OD=4.5, THI=0.3"),
    card("10", "20", ""),
    card("", "30", "THI=0.5"),
    card("30", "40", "OD=6.6"),
    card("", "50", "")
  ]);
  // one entry for the first single node, two for everything else
  assert_eq!(chain.len(), 2 * 2 + 1 + 2 * 2);
  assert_eq!(
    nodes(&chain),
    vec!["10", "10", "20", "20", "30", "30", "40", "40", "50"]
  );
  let get = |i: usize, k: SegmentKey| chain.entries[i].get(k);
  // the single start carries its own values
  assert_eq!(get(0, SegmentKey::Od), Some("4.5"));
  assert_eq!(get(0, SegmentKey::Thi), Some("0.3"));
  // the bare pair inherits from the single start
  assert_eq!(get(1, SegmentKey::Od), Some("4.5"));
  assert_eq!(get(2, SegmentKey::Thi), Some("0.3"));
  // given values win, the others are inherited
  assert_eq!(get(3, SegmentKey::Thi), Some("0.5"));
  assert_eq!(get(4, SegmentKey::Thi), Some("0.5"));
  assert_eq!(get(4, SegmentKey::Od), Some("4.5"));
  assert_eq!(get(6, SegmentKey::Od), Some("6.6"));
  assert_eq!(get(6, SegmentKey::Thi), Some("0.5"));
  assert_eq!(get(8, SegmentKey::Od), Some("6.6"));
  assert_eq!(get(7, SegmentKey::Thi), Some("0.5"));
  assert_eq!(get(8, SegmentKey::E), None);
}

#[test]
fn test_repeated_card() {
  let chain = parse_cards(&[
    card("10", "20", "OD=4.5"),
    card("10", "20", "THI=0.3"),
    card("", "", "E=27.9")
  ]);
  assert_eq!(nodes(&chain), vec!["10", "20"]);
  for entry in chain.entries.iter() {
    assert_eq!(entry.get(SegmentKey::Od), Some("4.5"));
    assert_eq!(entry.get(SegmentKey::Thi), Some("0.3"));
    assert_eq!(entry.get(SegmentKey::E), Some("27.9"));
  }
}

#[test]
fn test_single_in_from_column() {
  let chain = parse_cards(&[
    card("10", "", ""),
    card("20", "", "")
  ]);
  assert_eq!(nodes(&chain), vec!["10", "10", "20"]);
}

#[test]
fn test_comments_are_skipped() {
  let chain = parse_cards(&[
    card("10", "20", ""),
    card("30", "40", "*** OD=9.9")
  ]);
  assert_eq!(nodes(&chain), vec!["10", "20"]);
  assert_eq!(chain.entries[0].get(SegmentKey::Od), None);
}

#[test]
fn test_keyword_boundaries() {
  let line = card("10", "20", "DPRESS=100, PRESS= 50 ,ADDWT=3, LBS/FT=12");
  assert_eq!(SegmentKey::Dpress.find_value(&line).as_deref(), Some("100"));
  assert_eq!(SegmentKey::Press.find_value(&line).as_deref(), Some("50"));
  assert_eq!(SegmentKey::Addwt.find_value(&line).as_deref(), Some("3"));
  assert_eq!(SegmentKey::Add.find_value(&line), None);
  assert_eq!(SegmentKey::LbsPerFt.find_value(&line).as_deref(), Some("12"));
  assert_eq!(SegmentKey::Ppress.find_value(&line), None);
  // the value of the last keyword is cut at column 92
  let long = place(&[(80, "OD=1234567890123456")]);
  assert_eq!(SegmentKey::Od.find_value(&long).as_deref(), Some("123456789"));
}

#[test]
fn test_end_code_and_reentry() {
  let mut parser = GeometryCardParser::new();
  let lines = [
    "INPUT CARD IMAGES".to_owned(),
    card("10", "20", "OD=4.5"),
    place(&[(10, "TEA")]),
    card("30", "40", "OD=9.9"),
    "INPUT CARD IMAGES".to_owned(),
    card("", "", "THI=0.3"),
    "         .  +".to_owned(),
    card("50", "60", "")
  ];
  let responses = lines.iter()
    .enumerate()
    .map(|(i, l)| parser.consume(i, l))
    .collect::<Vec<_>>();
  assert_eq!(responses[0], CardResponse::Entered);
  assert_eq!(responses[2], CardResponse::Left);
  assert_eq!(responses[3], CardResponse::Outside);
  assert_eq!(responses[6], CardResponse::Left);
  assert_eq!(parser.state(), CardState::Outside(EndpointMode::Paired));
  let chain = parser.finish();
  assert_eq!(nodes(&chain), vec!["10", "20"]);
  // the mode was kept over the gap, so the value still lands on the pair
  assert_eq!(chain.entries[1].get(SegmentKey::Thi), Some("0.3"));
  assert_eq!(chain.entries[1].get(SegmentKey::Od), Some("4.5"));
}

#[test]
fn test_no_card_images() {
  let store = LineStore::from_text(&report_text(&[card("10", "20", "")]));
  let scan = OnePassScanner::scan(&store, 500);
  assert!(GeometryCardParser::parse(&store, &scan.sections).is_empty());
}

#[test]
fn test_nozzle_check() {
  use crate::nozzle::{check_nozzle, NozzleError};
  let chain = parse_cards(&[
    card("10", "20", "OD=6.625, THI=0.5"),
    card("", "30", "OD=4.5, THI=0.3"),
    card("", "40", "THI=0.6"),
    card("", "50", "THI=BAD")
  ]);
  let settings = crate::settings::NozzleSettings::default();
  let check = check_nozzle("30", &chain, &settings).unwrap();
  // the thinner of the two entries of node 30 is used
  assert_eq!(check.outside_diameter, 4.5);
  assert_eq!(check.thickness, 0.3);
  assert_eq!(check.area, 3.958);
  assert_eq!(check.section_modulus, 3.89903);
  assert_eq!(check.axial, 1385);
  assert_eq!(check.shear, 1385);
  assert_eq!(check.bending, 1137);
  assert_eq!(check.torsion, 2274);
  let fields = check.fields();
  assert_eq!(fields.len(), 12);
  assert_eq!(fields[0], ("NOZZLE NODE POINT", "30".to_owned()));
  assert_eq!(fields[5], ("YIELD", "35000".to_owned()));
  assert_eq!(
    check_nozzle("40", &chain, &settings),
    Err(NozzleError::InvalidThickness("40".to_owned()))
  );
  assert_eq!(
    check_nozzle("70", &chain, &settings),
    Err(NozzleError::NotFound("70".to_owned()))
  );
  let bare = parse_cards(&[card("", "10", "THI=0.3")]);
  assert_eq!(
    check_nozzle("10", &bare, &settings),
    Err(NozzleError::InvalidDiameter("10".to_owned()))
  );
}
