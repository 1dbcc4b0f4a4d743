//! Format trait definition
//!
//! A format reads a sequence of text lines into a [`PhotometricDocument`] and
//! writes a document back out as lines. Splitting bytes into lines and joining
//! lines into bytes is left to the caller.

use crate::document::PhotometricDocument;
use crate::error::FormatError;
use crate::parser::ParseReport;

/// Trait for photometric file formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn parse_lines(
///         &self,
///         lines: &mut dyn Iterator<Item = &str>,
///     ) -> Result<ParseReport, FormatError> {
///         todo!()
///     }
///
///     fn serialize_lines(&self, doc: &PhotometricDocument) -> Result<Vec<String>, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "ies", "csv")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Parse a sequence of lines into a document
    fn parse_lines(
        &self,
        lines: &mut dyn Iterator<Item = &str>,
    ) -> Result<ParseReport, FormatError>;

    /// Parse source text, split on line endings
    fn parse(&self, source: &str) -> Result<ParseReport, FormatError> {
        self.parse_lines(&mut source.lines())
    }

    /// Serialize a document into output lines
    fn serialize_lines(&self, doc: &PhotometricDocument) -> Result<Vec<String>, FormatError>;

    /// Serialize a document into newline terminated text
    fn serialize(&self, doc: &PhotometricDocument) -> Result<String, FormatError> {
        self.serialize_lines(doc).map(|lines| join_lines(&lines))
    }
}

/// Joins lines with `\n`, terminating the last one.
pub fn join_lines(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|line| line.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
