//! CSV serializer
//!
//! Every section becomes one labeled record. The candela table is written as
//! a grid: a header record repeating the vertical angles, then one record per
//! horizontal angle with that angle in the first column.

use crate::document::{FieldName, KeywordValue, PhotometricDocument, Tilt};
use crate::error::FormatError;
use crate::grammar::{
    format_number, CSV_CANDELA_LABEL, CSV_GEOMETRY_LABEL, CSV_HORIZONTAL_ANGLES_LABEL,
    CSV_MULTIPLYING_FACTORS_LABEL, CSV_TILT_ANGLES_LABEL, CSV_TILT_COUNT_LABEL,
    CSV_VERSION_LABEL, CSV_VERTICAL_ANGLES_LABEL, TILT_PREFIX,
};

/// Serializes a document to CSV lines.
pub fn serialize_to_csv(doc: &PhotometricDocument) -> Result<Vec<String>, FormatError> {
    let mut lines = vec![encode([CSV_VERSION_LABEL, doc.version.as_str()])?];

    for (name, value) in doc.keywords.iter() {
        match value {
            KeywordValue::Text(text) => {
                lines.push(encode([format!("[{name}]"), text.clone()])?)
            }
            KeywordValue::More(more) => {
                for text in more {
                    lines.push(encode(["[MORE]", text.as_str()])?);
                }
            }
        }
    }

    match &doc.tilt {
        Tilt::None => lines.push(format!("{TILT_PREFIX}NONE")),
        Tilt::Include(tilt) => {
            lines.push(format!("{TILT_PREFIX}INCLUDE"));
            lines.push(labeled(CSV_GEOMETRY_LABEL, &[tilt.lamp_to_luminaire_geometry])?);
            lines.push(labeled(CSV_TILT_COUNT_LABEL, &[tilt.number_of_tilt_angles])?);
            lines.push(labeled(CSV_TILT_ANGLES_LABEL, &tilt.tilt_angles)?);
            lines.push(labeled(
                CSV_MULTIPLYING_FACTORS_LABEL,
                &tilt.multiplying_factors,
            )?);
        }
        Tilt::ExternalFile { path } => {
            return Err(FormatError::NotSupported(format!(
                "external TILT file '{path}' cannot be written"
            )))
        }
    }

    for name in FieldName::ALL {
        lines.push(labeled(name.as_str(), &[doc.fields.get(name)])?);
    }

    lines.push(labeled(CSV_VERTICAL_ANGLES_LABEL, &doc.vertical_angles)?);
    lines.push(labeled(CSV_HORIZONTAL_ANGLES_LABEL, &doc.horizontal_angles)?);
    lines.push(labeled(CSV_CANDELA_LABEL, &doc.vertical_angles)?);

    for (index, row) in doc.candela.iter().enumerate() {
        let angle = doc
            .horizontal_angles
            .get(index)
            .copied()
            .map(format_number)
            .unwrap_or_default();
        let record = std::iter::once(angle).chain(row.iter().copied().map(format_number));
        lines.push(encode(record)?);
    }

    Ok(lines)
}

fn labeled(label: &str, values: &[f64]) -> Result<String, FormatError> {
    encode(std::iter::once(label.to_string()).chain(values.iter().copied().map(format_number)))
}

/// Writes one record, quoting columns that contain delimiters or quotes.
fn encode<I, T>(record: I) -> Result<String, FormatError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());
    writer
        .write_record(record)
        .map_err(|e| FormatError::SerializationError(format!("CSV write error: {e}")))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| FormatError::SerializationError(format!("CSV flush error: {e}")))?;
    let line = String::from_utf8(bytes)
        .map_err(|e| FormatError::SerializationError(format!("Invalid UTF-8 in CSV output: {e}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
