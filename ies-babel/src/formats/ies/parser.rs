//! IES grammar
//!
//! Whitespace separated tokens, packed: the fixed fields, both angle arrays
//! and the candela table may spread over any number of physical lines.

use crate::error::FormatError;
use crate::grammar;
use crate::parser::{self, Grammar, Layout, ParseReport};

#[derive(Debug, Clone, Copy, Default)]
pub struct IesGrammar;

impl Grammar for IesGrammar {
    fn name(&self) -> &'static str {
        "ies"
    }

    fn layout(&self) -> Layout {
        Layout::Packed
    }

    fn version(&self, line: &str) -> String {
        line.to_string()
    }

    fn keyword(&self, line: &str) -> Option<(String, String)> {
        let (name, value) = grammar::split_keyword(line)?;
        Some((name.to_string(), value.trim().to_string()))
    }

    fn scalar(&self, line: &str) -> String {
        line.to_string()
    }

    fn values(&self, line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }
}

/// Parses IES lines into a document.
pub fn parse_from_ies<I, S>(lines: I) -> Result<ParseReport, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parser::parse_lines(IesGrammar, lines)
}
