//! CSV grammar
//!
//! One record per line. The first column is a label (`IES file version`,
//! `[NAME]`, a field name, an array name or a horizontal angle) and the
//! remaining columns carry the values. Trailing runs of empty columns, as
//! spreadsheets like to append, are dropped before a line is read.

use crate::error::FormatError;
use crate::grammar;
use crate::parser::{self, Grammar, Layout, ParseReport};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvGrammar;

impl Grammar for CsvGrammar {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn layout(&self) -> Layout {
        Layout::Tabular
    }

    fn normalize<'a>(&self, line: &'a str) -> &'a str {
        line.trim_end_matches(',').trim_end()
    }

    fn version(&self, line: &str) -> String {
        let columns = record(line);
        match columns.split_first() {
            Some((_, rest)) if !rest.is_empty() => rest.join(",").trim().to_string(),
            _ => line.to_string(),
        }
    }

    fn keyword(&self, line: &str) -> Option<(String, String)> {
        let columns = record(line);
        let (label, rest) = columns.split_first()?;
        let (name, inline) = grammar::split_keyword(label.trim())?;
        let value = if rest.is_empty() {
            inline.to_string()
        } else {
            rest.join(",")
        };
        Some((name.to_string(), value.trim().to_string()))
    }

    fn scalar(&self, line: &str) -> String {
        let columns = record(line);
        match columns.as_slice() {
            [_, value, ..] => value.trim().to_string(),
            [only] => only.trim().to_string(),
            [] => String::new(),
        }
    }

    fn values(&self, line: &str) -> Vec<String> {
        record(line)
            .into_iter()
            .skip(1)
            .map(|column| column.trim().to_string())
            .collect()
    }

    fn named_value(&self, line: &str) -> Option<(String, String)> {
        let columns = record(line);
        let (label, rest) = columns.split_first()?;
        let value = rest.first().map(|value| value.trim()).unwrap_or_default();
        Some((label.trim().to_string(), value.to_string()))
    }
}

/// Splits one CSV line into columns, honoring quotes.
fn record(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(columns)) => columns.iter().map(str::to_string).collect(),
        _ => line.split(',').map(str::to_string).collect(),
    }
}

/// Parses CSV lines into a document.
pub fn parse_from_csv<I, S>(lines: I) -> Result<ParseReport, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parser::parse_lines(CsvGrammar, lines)
}
