//! IES serializer
//!
//! Keywords come out in stored order, `_MORE` entries expanded in place. The
//! fixed fields are always written as a 10-value line followed by a 3-value
//! line. Angle arrays and candela rows are wrapped at the configured width,
//! and every candela row starts on a fresh line.

use super::options::IesOptions;
use crate::document::{KeywordValue, PhotometricDocument, Tilt};
use crate::error::FormatError;
use crate::grammar::{format_number, FIRST_FIELD_LINE_LEN, TILT_PREFIX};

pub struct IesSerializer {
    options: IesOptions,
}

impl IesSerializer {
    pub fn new(options: IesOptions) -> Self {
        Self { options }
    }

    pub fn serialize_lines(&self, doc: &PhotometricDocument) -> Result<Vec<String>, FormatError> {
        let mut lines = vec![doc.version.clone()];

        for (name, value) in doc.keywords.iter() {
            match value {
                KeywordValue::Text(text) => lines.push(keyword_line(name, text)),
                KeywordValue::More(more) => {
                    lines.extend(more.iter().map(|text| keyword_line("MORE", text)))
                }
            }
        }

        match &doc.tilt {
            Tilt::None => lines.push(format!("{TILT_PREFIX}NONE")),
            Tilt::Include(tilt) => {
                lines.push(format!("{TILT_PREFIX}INCLUDE"));
                lines.push(format_number(tilt.lamp_to_luminaire_geometry));
                lines.push(format_number(tilt.number_of_tilt_angles));
                lines.push(join(&tilt.tilt_angles));
                lines.push(join(&tilt.multiplying_factors));
            }
            Tilt::ExternalFile { path } => {
                return Err(FormatError::NotSupported(format!(
                    "external TILT file '{path}' cannot be written"
                )))
            }
        }

        let fields = doc.fields.values();
        let (first, rest) = fields.split_at(FIRST_FIELD_LINE_LEN);
        lines.push(join(first));
        lines.push(join(rest));

        let mut wrapper = LineWrapper::new(self.options.line_width, &mut lines);
        wrapper.extend(&doc.vertical_angles);
        wrapper.flush();
        wrapper.extend(&doc.horizontal_angles);
        wrapper.flush();
        for row in &doc.candela {
            wrapper.extend(row);
            wrapper.flush();
        }

        Ok(lines)
    }
}

/// Serializes a document to IES lines with default options.
pub fn serialize_to_ies(doc: &PhotometricDocument) -> Result<Vec<String>, FormatError> {
    IesSerializer::new(IesOptions::default()).serialize_lines(doc)
}

fn keyword_line(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("[{name}]")
    } else {
        format!("[{name}] {value}")
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| format_number(*value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accumulates space separated tokens and emits a line before it would
/// exceed `width`. A token longer than `width` gets a line of its own.
struct LineWrapper<'a> {
    width: usize,
    buffer: String,
    lines: &'a mut Vec<String>,
}

impl<'a> LineWrapper<'a> {
    fn new(width: usize, lines: &'a mut Vec<String>) -> Self {
        Self {
            width,
            buffer: String::new(),
            lines,
        }
    }

    fn extend(&mut self, values: &[f64]) {
        for value in values {
            self.push(&format_number(*value));
        }
    }

    fn push(&mut self, token: &str) {
        if !self.buffer.is_empty() && self.buffer.len() + 1 + token.len() > self.width {
            self.flush();
        }
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(token);
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.lines.push(std::mem::take(&mut self.buffer));
        }
    }
}
