//! IES (IESNA LM-63-2002) format implementation
//!
//! # Grammar
//!
//! ```text
//! <version>
//! [KEYWORD] value          (any number, [MORE] continues the previous one)
//! TILT=NONE|INCLUDE
//! <geometry>               (INCLUDE only, one value per line)
//! <number of tilt angles>  (INCLUDE only)
//! <tilt angles>            (INCLUDE only, one line)
//! <multiplying factors>    (INCLUDE only, one line)
//! <13 fixed fields>        (whitespace separated, any number of lines)
//! <vertical angles>        (any number of lines)
//! <horizontal angles>      (any number of lines)
//! <candela values>         (row-major by horizontal angle, any number of lines)
//! ```
//!
//! `TILT=<filename>` is rejected: external tilt files are not resolved.
//! Output line width comes from [`IesOptions`].

pub mod options;
pub mod parser;
pub mod serializer;

use crate::document::PhotometricDocument;
use crate::error::FormatError;
use crate::format::Format;
use crate::parser::ParseReport;

pub use options::IesOptions;
pub use parser::{parse_from_ies, IesGrammar};
pub use serializer::{serialize_to_ies, IesSerializer};

/// Format implementation for IES files
#[derive(Default)]
pub struct IesFormat {
    options: IesOptions,
}

impl IesFormat {
    pub fn new(options: IesOptions) -> Self {
        Self { options }
    }
}

impl Format for IesFormat {
    fn name(&self) -> &str {
        "ies"
    }

    fn description(&self) -> &str {
        "IESNA LM-63-2002 photometric data"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ies"]
    }

    fn parse_lines(
        &self,
        lines: &mut dyn Iterator<Item = &str>,
    ) -> Result<ParseReport, FormatError> {
        parse_from_ies(lines)
    }

    fn serialize_lines(&self, doc: &PhotometricDocument) -> Result<Vec<String>, FormatError> {
        IesSerializer::new(self.options.clone()).serialize_lines(doc)
    }
}
