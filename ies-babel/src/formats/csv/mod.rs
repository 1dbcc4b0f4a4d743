//! CSV rendition of IES photometric data
//!
//! Each IES section is a labeled record so the file opens cleanly in a
//! spreadsheet:
//!
//! ```text
//! IES file version,IESNA:LM-63-2002
//! [TEST],abc
//! [MORE],continued
//! TILT=INCLUDE
//! lampToLuminaireGeometry,1          (INCLUDE only)
//! numberOfTiltAngles,2               (INCLUDE only)
//! tiltAngles,0,90                    (INCLUDE only)
//! multiplyingFactors,1,0.5           (INCLUDE only)
//! numOfLamps,1                       (one record per fixed field, ending at inputWatts)
//! ...
//! inputWatts,1000
//! verticalAnglesArray,0,90
//! horizontalAnglesArray,0,180
//! candelaValuesTable,0,90
//! 0,500,250                          (one record per horizontal angle)
//! 180,400,200
//! ```
//!
//! Labels of array and tilt records are not checked on input; only their
//! position counts.

pub mod parser;
pub mod serializer;

use crate::document::PhotometricDocument;
use crate::error::FormatError;
use crate::format::Format;
use crate::parser::ParseReport;

pub use parser::{parse_from_csv, CsvGrammar};
pub use serializer::serialize_to_csv;

/// Format implementation for CSV files
#[derive(Default)]
pub struct CsvFormat;

impl Format for CsvFormat {
    fn name(&self) -> &str {
        "csv"
    }

    fn description(&self) -> &str {
        "Spreadsheet-friendly CSV rendition of IES data"
    }

    fn file_extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn parse_lines(
        &self,
        lines: &mut dyn Iterator<Item = &str>,
    ) -> Result<ParseReport, FormatError> {
        parse_from_csv(lines)
    }

    fn serialize_lines(&self, doc: &PhotometricDocument) -> Result<Vec<String>, FormatError> {
        serialize_to_csv(doc)
    }
}
