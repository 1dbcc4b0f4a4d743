//! Error types for format operations
//!
//! Only conditions that must stop a conversion live here. Everything the
//! parsers can recover from is reported as a [`crate::diagnostics::Diagnostic`]
//! instead and never comes back as an `Err`.

use thiserror::Error;

/// Errors that abort a parse, a serialization or a registry lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// `TILT=<filename>`: external tilt files are not supported
    #[error("External TILT file '{reference}' not supported (line {line})")]
    UnsupportedTiltReference { line: usize, reference: String },

    /// The parser was driven from a state it cannot leave
    #[error("Illegal parser state at line {line}")]
    UndefinedParserState { line: usize },

    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Format does not support the requested operation or option
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}
