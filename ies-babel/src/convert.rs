//! One-shot conversion between the two grammars
//!
//! The direction is chosen by the caller. [`Direction::from_path`] applies the
//! usual rule: a `.ies` extension (any case) reads IES, anything else reads CSV.

use crate::diagnostics::Diagnostic;
use crate::document::PhotometricDocument;
use crate::error::FormatError;
use crate::formats::csv::{parse_from_csv, serialize_to_csv};
use crate::formats::ies::{parse_from_ies, IesOptions, IesSerializer};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    IesToCsv,
    CsvToIes,
}

impl Direction {
    /// Format name of the input side
    pub fn source(self) -> &'static str {
        match self {
            Direction::IesToCsv => "ies",
            Direction::CsvToIes => "csv",
        }
    }

    /// Format name of the output side
    pub fn target(self) -> &'static str {
        match self {
            Direction::IesToCsv => "csv",
            Direction::CsvToIes => "ies",
        }
    }

    /// The direction reading `format`, if it is one of the two grammars.
    pub fn from_source(format: &str) -> Option<Self> {
        match format.to_ascii_lowercase().as_str() {
            "ies" => Some(Direction::IesToCsv),
            "csv" => Some(Direction::CsvToIes),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let is_ies = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ies"));
        if is_ies {
            Direction::IesToCsv
        } else {
            Direction::CsvToIes
        }
    }
}

/// Output of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub lines: Vec<String>,
    pub document: PhotometricDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses `lines` in the source grammar of `direction` and serializes the
/// result in the other one.
///
/// `options` only applies when IES is the output.
pub fn convert_lines<I, S>(
    lines: I,
    direction: Direction,
    options: &IesOptions,
) -> Result<Conversion, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let report = match direction {
        Direction::IesToCsv => parse_from_ies(lines)?,
        Direction::CsvToIes => parse_from_csv(lines)?,
    };
    let lines = match direction {
        Direction::IesToCsv => serialize_to_csv(&report.document)?,
        Direction::CsvToIes => {
            IesSerializer::new(options.clone()).serialize_lines(&report.document)?
        }
    };
    tracing::debug!(
        from = direction.source(),
        to = direction.target(),
        lines = lines.len(),
        diagnostics = report.diagnostics.len(),
        "conversion finished"
    );

    Ok(Conversion {
        lines,
        document: report.document,
        diagnostics: report.diagnostics,
    })
}
