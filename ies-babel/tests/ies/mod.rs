//! IES grammar tests
//!
//! Parsing real-shaped IES files and writing them back out.

use crate::common::{describe, fixture, fixture_lines};
use ies_babel::formats::csv::serialize_to_csv;
use ies_babel::formats::ies::{parse_from_ies, serialize_to_ies};
use ies_babel::{DiagnosticKind, FormatError, KeywordValue, Tilt};
use insta::assert_snapshot;

#[test]
fn troffer_fixture_parses_cleanly() {
    let report = parse_from_ies(fixture_lines("troffer.ies")).unwrap();
    let doc = &report.document;

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(doc.keywords.text("LUMINAIRE"), Some("Recessed troffer"));
    assert_eq!(
        doc.keywords.more("LUMINAIRE"),
        ["with prismatic lens", "white housing"]
    );
    assert_eq!(doc.keywords.text("_SERIAL"), Some("00042"));
    assert_eq!(doc.fields.width, 0.5);
    assert_eq!(doc.fields.input_watts, 56.0);
    assert_eq!(doc.vertical_angles, vec![0.0, 22.5, 45.0, 67.5, 90.0]);
    assert_eq!(doc.candela[1], vec![1180.0, 1080.0, 880.0, 480.0, 90.0]);
    match &doc.tilt {
        Tilt::Include(tilt) => {
            assert_eq!(tilt.tilt_angles, vec![0.0, 45.0, 90.0]);
            assert_eq!(tilt.multiplying_factors, vec![1.0, 0.95, 0.9]);
        }
        other => panic!("Expected inline tilt, got {other:?}"),
    }
}

#[test]
fn troffer_fixture_converts_to_csv() {
    let report = parse_from_ies(fixture_lines("troffer.ies")).unwrap();
    let csv = serialize_to_csv(&report.document).unwrap();
    assert_eq!(csv, fixture_lines("troffer.csv"));
}

#[test]
fn troffer_fixture_normalizes_packing() {
    let report = parse_from_ies(fixture_lines("troffer.ies")).unwrap();
    let ies = serialize_to_ies(&report.document).unwrap().join("\n");
    assert_snapshot!(ies, @r"
    IESNA:LM-63-2002
    [TEST] TL-2041
    [TESTLAB] Photometric Testing Lab
    [MANUFAC] Acme Lighting
    [LUMCAT] AL-400
    [LUMINAIRE] Recessed troffer
    [MORE] with prismatic lens
    [MORE] white housing
    [LAMP] 2 x 28W T5
    [_SERIAL] 00042
    TILT=INCLUDE
    1
    3
    0 45 90
    1 0.95 0.9
    2 2600 1 5 3 1 1 0.5 1.2 0.1
    1 1 56
    0 22.5 45 67.5 90
    0 45 90
    1200 1100 900 500 100
    1180 1080 880 480 90
    1150 1050 850 450 80
    ");
}

#[test]
fn candela_tokens_fill_rows_across_lines() {
    let source = "IESNA:LM-63-2002
[TEST] abc
TILT=NONE
1 1000 1 2 2 1 1 0 0 0 0 1 100
0 90
0 90
10 20
30 40
";
    let report = parse_from_ies(source.lines()).unwrap();
    assert_eq!(report.document.candela, vec![vec![10.0, 20.0], vec![30.0, 40.0]]);

    // Same tokens packed 2+2+1 with a third row.
    let packed = "IESNA:LM-63-2002
TILT=NONE
1 1000 1 2 3 1 1 0 0 0 0 1 100
0 90
0 90 180
1 2
3 4
5 6
";
    let report = parse_from_ies(packed.lines()).unwrap();
    assert_eq!(
        report.document.candela,
        vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
    );
}

#[test]
fn tolerated_problems_are_reported_in_order() {
    let source = "IESNA:LM-63-1995
[MORE] stray
[VENDOR] x
garbage
TILT=NONE
1 1000 1 2 1 1 1 0 0 0
0 1 50 7
0 abc
0
10 20
trailing
";
    let report = parse_from_ies(source.lines()).unwrap();

    assert_snapshot!(describe(&report.diagnostics), @r"
    line 1: Version 'IESNA:LM-63-1995' not supported, continuing anyway
    line 2: [MORE] without a preceding keyword
    line 3: Unknown keyword 'VENDOR', continuing anyway
    line 4: Expected a keyword or 'TILT=' line, got 'garbage'
    line 7: 1 extra value(s) after the fixed fields dropped
    line 8: 'abc' is not a number, stored as NaN
    line 11: Extra line found
    ");

    let doc = &report.document;
    assert_eq!(doc.version, "IESNA:LM-63-1995");
    assert_eq!(doc.keywords.get("_MORE"), Some(&KeywordValue::More(vec!["stray".to_string()])));
    assert_eq!(doc.keywords.text("VENDOR"), Some("x"));
    assert_eq!(doc.fields.input_watts, 50.0);
    assert!(doc.vertical_angles[1].is_nan());
    assert_eq!(doc.candela, vec![vec![10.0, 20.0]]);
}

#[test]
fn truncated_table_is_padded() {
    let source = "IESNA:LM-63-2002
TILT=NONE
1 1000 1 3 2 1 1 0 0 0 0 1 100
0 45 90
0 90
100 90 80
70
";
    let report = parse_from_ies(source.lines()).unwrap();
    assert_eq!(
        report.document.candela,
        vec![vec![100.0, 90.0, 80.0], vec![70.0, 0.0, 0.0]]
    );
    assert!(matches!(
        report.diagnostics[0].kind,
        DiagnosticKind::TruncatedInput { .. }
    ));
    assert!(report.diagnostics.iter().any(|d| matches!(
        d.kind,
        DiagnosticKind::DimensionMismatch {
            expected: 3,
            found: 1,
            ..
        }
    )));
}

#[test]
fn tilt_file_reference_aborts_the_parse() {
    let source = fixture("troffer.ies").replace("TILT=INCLUDE", "TILT=troffer.tlt");
    let err = parse_from_ies(source.lines()).unwrap_err();
    assert_eq!(
        err,
        FormatError::UnsupportedTiltReference {
            line: 11,
            reference: "troffer.tlt".to_string()
        }
    );
}
