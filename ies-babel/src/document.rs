//! Photometric document model
//!
//! [`PhotometricDocument`] is the pivot between the two grammars: a parser
//! fills one in line by line, and a serializer renders it. It always starts
//! from the LM-63 defaults so that fields absent from the input still
//! serialize with a value.

use crate::grammar::{self, MORE_SUFFIX};
use serde::{Deserialize, Serialize};

/// A parsed IES photometric file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotometricDocument {
    pub version: String,
    pub keywords: Keywords,
    pub tilt: Tilt,
    pub fields: Fields,
    pub vertical_angles: Vec<f64>,
    pub horizontal_angles: Vec<f64>,
    /// Indexed `[horizontal][vertical]`.
    pub candela: Vec<Vec<f64>>,
}

impl Default for PhotometricDocument {
    fn default() -> Self {
        Self {
            version: grammar::SUPPORTED_VERSIONS[0].to_string(),
            keywords: Keywords::default(),
            tilt: Tilt::None,
            fields: Fields::default(),
            vertical_angles: Vec::new(),
            horizontal_angles: Vec::new(),
            candela: Vec::new(),
        }
    }
}

/// A dimension that did not match its declared count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub what: String,
    pub expected: usize,
    pub found: usize,
}

impl PhotometricDocument {
    pub fn vertical_count(&self) -> usize {
        grammar::count(self.fields.number_of_vertical_angles)
    }

    pub fn horizontal_count(&self) -> usize {
        grammar::count(self.fields.number_of_horizontal_angles)
    }

    /// Forces the angle arrays and the candela table to the declared counts.
    ///
    /// Missing values become `0`, surplus values are dropped. Inline tilt
    /// factors are aligned to the tilt angles with the neutral factor `1`.
    /// Returns every correction made.
    pub fn conform(&mut self) -> Vec<Mismatch> {
        let vertical = self.vertical_count();
        let horizontal = self.horizontal_count();
        let mut mismatches = Vec::new();

        let angles = &mut self.vertical_angles;
        resize(angles, vertical, 0.0, "verticalAngles", &mut mismatches);
        let angles = &mut self.horizontal_angles;
        resize(angles, horizontal, 0.0, "horizontalAngles", &mut mismatches);

        if self.candela.len() != horizontal {
            mismatches.push(Mismatch {
                what: "candela rows".to_string(),
                expected: horizontal,
                found: self.candela.len(),
            });
            self.candela.resize_with(horizontal, Vec::new);
        }
        for (index, row) in self.candela.iter_mut().enumerate() {
            resize(row, vertical, 0.0, &format!("candela row {index}"), &mut mismatches);
        }

        if let Tilt::Include(tilt) = &mut self.tilt {
            let angles = tilt.tilt_angles.len();
            let factors = &mut tilt.multiplying_factors;
            resize(factors, angles, 1.0, "multiplyingFactors", &mut mismatches);
        }

        mismatches
    }
}

fn resize(values: &mut Vec<f64>, len: usize, fill: f64, what: &str, out: &mut Vec<Mismatch>) {
    if values.len() != len {
        out.push(Mismatch {
            what: what.to_string(),
            expected: len,
            found: values.len(),
        });
        values.resize(len, fill);
    }
}

/// Value stored under a keyword name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordValue {
    Text(String),
    /// Continuation lines, stored under `<parent>_MORE`
    More(Vec<String>),
}

/// Keywords in first-seen order
///
/// Setting an existing name replaces its value without moving it. The
/// continuation entry of a keyword is created where its first `[MORE]` line
/// appears and keeps that position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keywords {
    entries: Vec<(String, KeywordValue)>,
}

impl Keywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&KeywordValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Text value of an ordinary keyword.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(KeywordValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Continuation lines recorded for `parent`.
    pub fn more(&self, parent: &str) -> &[String] {
        match self.get(&more_key(parent)) {
            Some(KeywordValue::More(lines)) => lines,
            _ => &[],
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = KeywordValue::Text(value.into());
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Appends a `[MORE]` line to the continuation entry of `parent`.
    ///
    /// Returns `false` and leaves the keywords untouched when `<parent>_MORE`
    /// already holds an ordinary keyword value (`[LAMP_MORE] x`).
    pub fn append_more(&mut self, parent: &str, line: impl Into<String>) -> bool {
        let key = more_key(parent);
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, KeywordValue::More(lines))) => lines.push(line.into()),
            Some(_) => return false,
            None => self.entries.push((key, KeywordValue::More(vec![line.into()]))),
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

pub(crate) fn more_key(parent: &str) -> String {
    format!("{parent}{MORE_SUFFIX}")
}

/// Tilt section of the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Tilt {
    /// `TILT=NONE`
    None,
    /// `TILT=INCLUDE`, data follows inline
    Include(TiltData),
    /// `TILT=<filename>`. Never produced by the parsers, rejected by the serializers.
    ExternalFile { path: String },
}

impl Tilt {
    /// The text after `TILT=`.
    pub fn mode(&self) -> &str {
        match self {
            Tilt::None => "NONE",
            Tilt::Include(_) => "INCLUDE",
            Tilt::ExternalFile { path } => path,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiltData {
    pub lamp_to_luminaire_geometry: f64,
    pub number_of_tilt_angles: f64,
    pub tilt_angles: Vec<f64>,
    pub multiplying_factors: Vec<f64>,
}

/// The thirteen fixed numeric fields following the tilt section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fields {
    pub num_of_lamps: f64,
    pub lumens_per_lamp: f64,
    pub multiplier: f64,
    pub number_of_vertical_angles: f64,
    pub number_of_horizontal_angles: f64,
    pub photometric_type: f64,
    pub units_type: f64,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub ballast_factor: f64,
    pub future_use: f64,
    pub input_watts: f64,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            num_of_lamps: 1.0,
            lumens_per_lamp: 10000.0,
            multiplier: 1.0,
            number_of_vertical_angles: 0.0,
            number_of_horizontal_angles: 0.0,
            photometric_type: 1.0,
            units_type: 1.0,
            width: 0.0,
            length: 0.0,
            height: 0.0,
            ballast_factor: 0.0,
            future_use: 1.0,
            input_watts: 1000.0,
        }
    }
}

impl Fields {
    pub fn get(&self, name: FieldName) -> f64 {
        match name {
            FieldName::NumOfLamps => self.num_of_lamps,
            FieldName::LumensPerLamp => self.lumens_per_lamp,
            FieldName::Multiplier => self.multiplier,
            FieldName::NumberOfVerticalAngles => self.number_of_vertical_angles,
            FieldName::NumberOfHorizontalAngles => self.number_of_horizontal_angles,
            FieldName::PhotometricType => self.photometric_type,
            FieldName::UnitsType => self.units_type,
            FieldName::Width => self.width,
            FieldName::Length => self.length,
            FieldName::Height => self.height,
            FieldName::BallastFactor => self.ballast_factor,
            FieldName::FutureUse => self.future_use,
            FieldName::InputWatts => self.input_watts,
        }
    }

    pub fn set(&mut self, name: FieldName, value: f64) {
        let slot = match name {
            FieldName::NumOfLamps => &mut self.num_of_lamps,
            FieldName::LumensPerLamp => &mut self.lumens_per_lamp,
            FieldName::Multiplier => &mut self.multiplier,
            FieldName::NumberOfVerticalAngles => &mut self.number_of_vertical_angles,
            FieldName::NumberOfHorizontalAngles => &mut self.number_of_horizontal_angles,
            FieldName::PhotometricType => &mut self.photometric_type,
            FieldName::UnitsType => &mut self.units_type,
            FieldName::Width => &mut self.width,
            FieldName::Length => &mut self.length,
            FieldName::Height => &mut self.height,
            FieldName::BallastFactor => &mut self.ballast_factor,
            FieldName::FutureUse => &mut self.future_use,
            FieldName::InputWatts => &mut self.input_watts,
        };
        *slot = value;
    }

    /// Values in file order.
    pub fn values(&self) -> [f64; FieldName::COUNT] {
        FieldName::ALL.map(|name| self.get(name))
    }
}

/// Names of the fixed fields, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    NumOfLamps,
    LumensPerLamp,
    Multiplier,
    NumberOfVerticalAngles,
    NumberOfHorizontalAngles,
    PhotometricType,
    UnitsType,
    Width,
    Length,
    Height,
    BallastFactor,
    FutureUse,
    InputWatts,
}

impl FieldName {
    pub const COUNT: usize = 13;

    pub const ALL: [FieldName; Self::COUNT] = [
        FieldName::NumOfLamps,
        FieldName::LumensPerLamp,
        FieldName::Multiplier,
        FieldName::NumberOfVerticalAngles,
        FieldName::NumberOfHorizontalAngles,
        FieldName::PhotometricType,
        FieldName::UnitsType,
        FieldName::Width,
        FieldName::Length,
        FieldName::Height,
        FieldName::BallastFactor,
        FieldName::FutureUse,
        FieldName::InputWatts,
    ];

    /// Label used in the CSV grammar.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::NumOfLamps => "numOfLamps",
            FieldName::LumensPerLamp => "lumensPerLamp",
            FieldName::Multiplier => "multiplier",
            FieldName::NumberOfVerticalAngles => "numberOfVerticalAngles",
            FieldName::NumberOfHorizontalAngles => "numberOfHorizontalAngles",
            FieldName::PhotometricType => "photometricType",
            FieldName::UnitsType => "unitsType",
            FieldName::Width => "width",
            FieldName::Length => "length",
            FieldName::Height => "height",
            FieldName::BallastFactor => "ballastFactor",
            FieldName::FutureUse => "futureUse",
            FieldName::InputWatts => "inputWatts",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == label)
    }
}
