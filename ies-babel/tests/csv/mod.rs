//! CSV grammar tests
//!
//! Spreadsheet-shaped input and CSV to IES conversion.

use crate::common::{describe, fixture_lines};
use ies_babel::formats::csv::parse_from_csv;
use ies_babel::formats::ies::{serialize_to_ies, IesOptions, IesSerializer};
use ies_babel::{convert_lines, DiagnosticKind, Direction, Tilt};
use insta::assert_snapshot;

#[test]
fn troffer_csv_matches_troffer_ies() {
    let from_csv = parse_from_csv(fixture_lines("troffer.csv")).unwrap();
    let from_ies = ies_babel::formats::ies::parse_from_ies(fixture_lines("troffer.ies")).unwrap();
    assert!(from_csv.diagnostics.is_empty(), "{:?}", from_csv.diagnostics);
    assert_eq!(from_csv.document, from_ies.document);
}

#[test]
fn spreadsheet_export_is_accepted() {
    let report = parse_from_csv(fixture_lines("spreadsheet.csv")).unwrap();
    let doc = &report.document;

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(doc.version, "IESNA:LM-63-2002");
    assert_eq!(doc.keywords.text("MANUFAC"), Some("Acme, Inc."));
    assert_eq!(doc.tilt, Tilt::None);
    assert_eq!(doc.fields.units_type, 2.0);
    assert_eq!(doc.fields.input_watts, 18.5);
    assert_eq!(doc.vertical_angles, vec![0.0, 45.0, 90.0]);
    assert_eq!(doc.horizontal_angles, vec![0.0, 90.0]);
    assert_eq!(
        doc.candela,
        vec![vec![450.0, 300.0, 20.0], vec![440.0, 290.0, 15.0]]
    );
}

#[test]
fn spreadsheet_export_converts_to_ies() {
    let conversion = convert_lines(
        fixture_lines("spreadsheet.csv"),
        Direction::CsvToIes,
        &IesOptions::default(),
    )
    .unwrap();
    assert_snapshot!(conversion.lines.join("\n"), @r"
    IESNA:LM-63-2002
    [TEST] TL-2041
    [MANUFAC] Acme, Inc.
    TILT=NONE
    1 1500 1 3 2 1 2 0.6 0.6 0
    1 1 18.5
    0 45 90
    0 90
    450 300 20
    440 290 15
    ");
}

#[test]
fn single_cell_table() {
    let source = [
        "IES file version,IESNA:LM-63-2002",
        "[TEST],abc",
        "TILT=NONE",
        "numOfLamps,1",
        "lumensPerLamp,10000",
        "multiplier,1",
        "numberOfVerticalAngles,1",
        "numberOfHorizontalAngles,1",
        "photometricType,1",
        "unitsType,1",
        "width,0",
        "length,0",
        "height,0",
        "ballastFactor,0",
        "futureUse,1",
        "inputWatts,1000",
        "verticalAnglesArray,0",
        "horizontalAnglesArray,0",
        "candelaValuesTable,0",
        "0,500",
    ];
    let report = parse_from_csv(source).unwrap();
    assert_eq!(report.document.candela, vec![vec![500.0]]);
    assert_eq!(
        serialize_to_ies(&report.document).unwrap()[5..],
        ["0", "0", "500"]
    );
}

#[test]
fn tilt_rows_convert_to_four_ies_lines() {
    let source = [
        "IES file version,IESNA:LM-63-2002",
        "TILT=INCLUDE",
        "lampToLuminaireGeometry,1",
        "numberOfTiltAngles,2",
        "tiltAngles,0,90",
        "multiplyingFactors,1,0.5",
        "numberOfVerticalAngles,0",
        "numberOfHorizontalAngles,0",
        "inputWatts,1000",
        "verticalAnglesArray",
        "horizontalAnglesArray",
        "candelaValuesTable",
    ];
    let report = parse_from_csv(source).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    let ies = serialize_to_ies(&report.document).unwrap();
    assert_eq!(ies[1..6], ["TILT=INCLUDE", "1", "2", "0 90", "1 0.5"]);
}

#[test]
fn narrow_width_wraps_every_section() {
    let report = parse_from_csv(fixture_lines("troffer.csv")).unwrap();
    let lines = IesSerializer::new(IesOptions { line_width: 12 })
        .serialize_lines(&report.document)
        .unwrap();
    let data = &lines[lines.iter().position(|l| l == "1 1 56").unwrap() + 1..];
    assert!(data.iter().all(|line| line.len() <= 12), "{data:?}");
    assert_eq!(data[0], "0 22.5 45");
}

#[test]
fn malformed_rows_are_reported() {
    let source = [
        "IES file version,IESNA:LM-63-2002",
        "[BROKEN,abc",
        "TILT=NONE",
        "numberOfVerticalAngles,1",
        "numberOfHorizontalAngles,1",
        "colour,red",
        "inputWatts,n/a",
        "verticalAnglesArray,0,10",
        "horizontalAnglesArray,0",
        "candelaValuesTable,0",
        "0,500",
        "notes,done",
    ];
    let report = parse_from_csv(source).unwrap();
    assert_snapshot!(describe(&report.diagnostics), @r"
    line 2: Expected a keyword or 'TILT=' line, got '[BROKEN,abc'
    line 6: Unknown field 'colour' ignored
    line 7: 'n/a' is not a number, stored as NaN
    line 12: Extra line found
    line 12: verticalAngles: expected 1 value(s), found 2
    ");
    assert!(report.document.fields.input_watts.is_nan());
    assert_eq!(report.document.vertical_angles, vec![0.0]);
    assert!(matches!(
        report.diagnostics.last().map(|d| &d.kind),
        Some(DiagnosticKind::DimensionMismatch { .. })
    ));
}
