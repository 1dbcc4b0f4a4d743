//! Grammar constants and token helpers shared by both line grammars
//!
//! The IES and CSV grammars differ only in how a physical line is cut into
//! records. The vocabulary (versions, keywords, tilt modes, section labels)
//! and the numeric conversion rules are the same and live here.

/// IES versions this crate knows how to read. Anything else is parsed anyway.
pub const SUPPORTED_VERSIONS: &[&str] = &["IESNA:LM-63-2002"];

/// Keywords defined by LM-63-2002. `MORE` continues the previous keyword.
pub const STANDARD_KEYWORDS: &[&str] = &[
    "TEST",
    "TESTLAB",
    "TESTDATE",
    "NEARFIELD",
    "MANUFAC",
    "LUMCAT",
    "LUMINAIRE",
    "LAMPCAT",
    "LAMP",
    "BALLAST",
    "BALLASTCAT",
    "MAINTCAT",
    "DISTRIBUTION",
    "FLASHAREA",
    "COLORCONSTANT",
    "LAMPPOSITION",
    "ISSUEDATE",
    "OTHER",
    "SEARCH",
    "MORE",
];

/// Continuation keyword.
pub const MORE_KEYWORD: &str = "MORE";

/// Suffix of the keyword entry collecting `[MORE]` lines for a parent keyword.
pub const MORE_SUFFIX: &str = "_MORE";

/// User keywords must start with this prefix.
pub const CUSTOM_KEYWORD_PREFIX: char = '_';

/// Prefix of the tilt selector line.
pub const TILT_PREFIX: &str = "TILT=";

/// Maximum width of a wrapped IES data line.
pub const DEFAULT_LINE_WIDTH: usize = 120;

/// Largest angle count honored for either axis (0.1° steps over a full turn).
/// Declared counts above it are clamped.
pub const MAX_ANGLES: usize = 3601;

/// Number of fields on the first line of the IES fixed-field block.
pub const FIRST_FIELD_LINE_LEN: usize = 10;

/// CSV labels
pub const CSV_VERSION_LABEL: &str = "IES file version";
pub const CSV_GEOMETRY_LABEL: &str = "lampToLuminaireGeometry";
pub const CSV_TILT_COUNT_LABEL: &str = "numberOfTiltAngles";
pub const CSV_TILT_ANGLES_LABEL: &str = "tiltAngles";
pub const CSV_MULTIPLYING_FACTORS_LABEL: &str = "multiplyingFactors";
pub const CSV_VERTICAL_ANGLES_LABEL: &str = "verticalAnglesArray";
pub const CSV_HORIZONTAL_ANGLES_LABEL: &str = "horizontalAnglesArray";
pub const CSV_CANDELA_LABEL: &str = "candelaValuesTable";

/// How a keyword name relates to the LM-63 keyword set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    /// `[MORE]`, continuation of the previous keyword
    More,
    /// One of [`STANDARD_KEYWORDS`]
    Standard,
    /// User keyword, `_` prefixed
    Custom,
    /// Neither standard nor custom-prefixed
    Unknown,
}

impl KeywordClass {
    pub fn of(name: &str) -> Self {
        if name == MORE_KEYWORD {
            KeywordClass::More
        } else if STANDARD_KEYWORDS.contains(&name) {
            KeywordClass::Standard
        } else if name.starts_with(CUSTOM_KEYWORD_PREFIX) {
            KeywordClass::Custom
        } else {
            KeywordClass::Unknown
        }
    }
}

/// Decoded value of a `TILT=` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TiltMode<'a> {
    None,
    Include,
    File(&'a str),
}

impl<'a> TiltMode<'a> {
    /// Decode the text after `TILT=`.
    pub fn decode(mode: &'a str) -> Self {
        match mode.trim() {
            "NONE" => TiltMode::None,
            "INCLUDE" => TiltMode::Include,
            other => TiltMode::File(other),
        }
    }
}

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// Splits `[NAME]rest` into `NAME` and `rest`.
///
/// Returns `None` when the line does not open with `[` or never closes it.
pub fn split_keyword(line: &str) -> Option<(&str, &str)> {
    line.strip_prefix('[')?.split_once(']')
}

/// Locale-agnostic decimal conversion.
///
/// Returns `None` for anything that does not denote a finite number, including
/// the textual `inf`/`nan` spellings `f64::from_str` would otherwise accept.
pub fn parse_number(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Converts a declared count field into a length, at most [`MAX_ANGLES`].
pub fn count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        (value as usize).min(MAX_ANGLES)
    } else {
        0
    }
}

/// Formats a number the way both serializers print it (`1`, `0.5`, `NaN`).
pub fn format_number(value: f64) -> String {
    value.to_string()
}
