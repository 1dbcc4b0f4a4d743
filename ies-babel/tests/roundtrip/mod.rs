//! Round-trip properties across both grammars

use ies_babel::formats::csv::{parse_from_csv, serialize_to_csv};
use ies_babel::formats::ies::{parse_from_ies, serialize_to_ies};
use ies_babel::grammar::STANDARD_KEYWORDS;
use ies_babel::{FieldName, Fields, KeywordValue, Keywords, PhotometricDocument, Tilt, TiltData};
use proptest::prelude::*;

fn number() -> impl Strategy<Value = f64> {
    prop_oneof![(-1000i32..100_000).prop_map(f64::from), -1.0e6..1.0e6f64]
}

/// Trimmed keyword text, possibly empty, possibly with commas.
fn keyword_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z0-9]([A-Za-z0-9 .,:/-]{0,30}[A-Za-z0-9])?",
    ]
}

fn keywords() -> impl Strategy<Value = Keywords> {
    let names: Vec<&'static str> = STANDARD_KEYWORDS
        .iter()
        .copied()
        .filter(|name| *name != "MORE")
        .collect();
    (
        prop::sample::subsequence(names, 0..=6).prop_shuffle(),
        prop::collection::vec(
            (keyword_value(), prop::collection::vec(keyword_value(), 0..3)),
            6,
        ),
        prop::option::of(("_[A-Z0-9]{1,8}", keyword_value())),
    )
        .prop_map(|(names, values, custom)| {
            let mut keywords = Keywords::new();
            for (name, (value, more)) in names.into_iter().zip(values) {
                keywords.set(name, value);
                for line in more {
                    keywords.append_more(name, line);
                }
            }
            if let Some((name, value)) = custom {
                keywords.set(name, value);
            }
            keywords
        })
}

fn tilt() -> impl Strategy<Value = Tilt> {
    prop_oneof![
        Just(Tilt::None),
        (1u8..=3, prop::collection::vec((number(), number()), 0..5)).prop_map(
            |(geometry, pairs)| {
                let (tilt_angles, multiplying_factors): (Vec<f64>, Vec<f64>) =
                    pairs.into_iter().unzip();
                Tilt::Include(TiltData {
                    lamp_to_luminaire_geometry: f64::from(geometry),
                    number_of_tilt_angles: tilt_angles.len() as f64,
                    tilt_angles,
                    multiplying_factors,
                })
            }
        ),
    ]
}

/// Well-formed documents: every array already matches its declared count.
fn document() -> impl Strategy<Value = PhotometricDocument> {
    (0usize..6, 0usize..5).prop_flat_map(|(vertical, horizontal)| {
        (
            keywords(),
            tilt(),
            prop::array::uniform13(number()),
            prop::collection::vec(number(), vertical),
            prop::collection::vec(number(), horizontal),
            prop::collection::vec(prop::collection::vec(number(), vertical), horizontal),
        )
            .prop_map(
                move |(keywords, tilt, values, vertical_angles, horizontal_angles, candela)| {
                    let mut fields = Fields::default();
                    for (name, value) in FieldName::ALL.into_iter().zip(values) {
                        fields.set(name, value);
                    }
                    fields.number_of_vertical_angles = vertical as f64;
                    fields.number_of_horizontal_angles = horizontal as f64;
                    PhotometricDocument {
                        version: "IESNA:LM-63-2002".to_string(),
                        keywords,
                        tilt,
                        fields,
                        vertical_angles,
                        horizontal_angles,
                        candela,
                    }
                },
            )
    })
}

/// Number of IES lines before the wrapped sections start.
fn header_len(doc: &PhotometricDocument) -> usize {
    let keyword_lines: usize = doc
        .keywords
        .iter()
        .map(|(_, value)| match value {
            KeywordValue::Text(_) => 1,
            KeywordValue::More(lines) => lines.len(),
        })
        .sum();
    let tilt_lines = match doc.tilt {
        Tilt::Include(_) => 5,
        _ => 1,
    };
    1 + keyword_lines + tilt_lines + 2
}

/// Loosely IES-shaped noise: small numbers and short words.
fn noisy_lines() -> impl Strategy<Value = Vec<String>> {
    let token = prop_oneof![
        "[0-9]{1,2}(\\.[0-9])?",
        "[a-z]{1,3}",
    ];
    prop::collection::vec(prop::collection::vec(token, 0..8), 0..25)
        .prop_map(|lines| lines.into_iter().map(|tokens| tokens.join(" ")).collect())
}

proptest! {
    #[test]
    fn ies_round_trip(doc in document()) {
        let lines = serialize_to_ies(&doc).unwrap();
        let report = parse_from_ies(&lines).unwrap();
        prop_assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        prop_assert_eq!(report.document, doc);
    }

    #[test]
    fn csv_round_trip(doc in document()) {
        let lines = serialize_to_csv(&doc).unwrap();
        let report = parse_from_csv(&lines).unwrap();
        prop_assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        prop_assert_eq!(report.document, doc);
    }

    #[test]
    fn grammars_agree(doc in document()) {
        let from_ies = parse_from_ies(serialize_to_ies(&doc).unwrap()).unwrap();
        let from_csv = parse_from_csv(serialize_to_csv(&doc).unwrap()).unwrap();
        prop_assert_eq!(from_ies.document, from_csv.document);
    }

    #[test]
    fn wrapped_lines_fit_120_columns(doc in document()) {
        let lines = serialize_to_ies(&doc).unwrap();
        for line in &lines[header_len(&doc)..] {
            prop_assert!(
                line.len() <= 120 || !line.contains(' '),
                "line too long: {line}"
            );
        }
    }

    #[test]
    fn keyword_order_survives_both_grammars(doc in document()) {
        let expected: Vec<&str> = doc.keywords.iter().map(|(name, _)| name).collect();

        let from_ies = parse_from_ies(serialize_to_ies(&doc).unwrap()).unwrap();
        let ies_order: Vec<&str> = from_ies
            .document
            .keywords
            .iter()
            .map(|(name, _)| name)
            .collect();
        prop_assert_eq!(&ies_order, &expected);

        let from_csv = parse_from_csv(serialize_to_csv(&doc).unwrap()).unwrap();
        let csv_order: Vec<&str> = from_csv
            .document
            .keywords
            .iter()
            .map(|(name, _)| name)
            .collect();
        prop_assert_eq!(&csv_order, &expected);
    }

    #[test]
    fn parsed_dimensions_match_declared_counts(
        body in noisy_lines(),
        tilt_include in any::<bool>(),
    ) {
        let mut lines = vec!["IESNA:LM-63-2002".to_string(), "[TEST] noise".to_string()];
        lines.push(if tilt_include { "TILT=INCLUDE" } else { "TILT=NONE" }.to_string());
        lines.extend(body);

        let doc = parse_from_ies(&lines).unwrap().document;
        prop_assert_eq!(doc.vertical_angles.len(), doc.vertical_count());
        prop_assert_eq!(doc.horizontal_angles.len(), doc.horizontal_count());
        prop_assert_eq!(doc.candela.len(), doc.horizontal_count());
        for row in &doc.candela {
            prop_assert_eq!(row.len(), doc.vertical_count());
        }
        if let Tilt::Include(tilt) = &doc.tilt {
            prop_assert_eq!(tilt.multiplying_factors.len(), tilt.tilt_angles.len());
        }
    }
}
