//! Recoverable conditions found while parsing
//!
//! A diagnostic never stops a parse. Each one is logged through `tracing` as
//! soon as it is raised and is also kept in the [`crate::parser::ParseReport`]
//! so callers can inspect what was tolerated.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// A recoverable parse condition, tagged with its 1-based input line
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// Version line outside the supported set; the version is kept as given
    UnsupportedVersion { version: String },
    /// Bracketed keyword that is neither standard nor `_` prefixed; stored anyway
    UnknownKeyword { name: String },
    /// `[MORE]` before any keyword; attached to the empty parent
    OrphanContinuation,
    /// Keyword line colliding with a `<parent>_MORE` continuation entry; dropped
    ContinuationConflict { key: String },
    /// Line that does not fit the keyword section; skipped
    MalformedStructuralLine { content: String },
    /// CSV field row whose name is not one of the fixed fields; skipped
    UnknownField { name: String },
    /// Token that is not a finite number; stored as `NaN`
    NonNumericValue { token: String },
    /// Tokens past the end of a packed section; dropped
    ExcessValues { section: &'static str, count: usize },
    /// Input ended before the candela table was complete
    TruncatedInput { section: &'static str },
    /// Angle count above [`crate::grammar::MAX_ANGLES`]; clamped to the limit
    ImplausibleCount {
        field: &'static str,
        declared: f64,
        limit: usize,
    },
    /// Array length corrected to its declared count
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    /// Content after the candela table
    TrailingExtraLines,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::TrailingExtraLines => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Logs the diagnostic on the diagnostics channel.
    pub fn emit(&self) {
        match self.severity() {
            Severity::Info => tracing::info!(line = self.line, "{}", self.kind),
            Severity::Warning => tracing::warn!(line = self.line, "{}", self.kind),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnsupportedVersion { version } => {
                write!(f, "Version '{version}' not supported, continuing anyway")
            }
            DiagnosticKind::UnknownKeyword { name } => {
                write!(f, "Unknown keyword '{name}', continuing anyway")
            }
            DiagnosticKind::OrphanContinuation => {
                write!(f, "[MORE] without a preceding keyword")
            }
            DiagnosticKind::ContinuationConflict { key } => {
                write!(f, "'{key}' is both a keyword and a [MORE] continuation, line dropped")
            }
            DiagnosticKind::MalformedStructuralLine { content } => {
                write!(f, "Expected a keyword or 'TILT=' line, got '{content}'")
            }
            DiagnosticKind::UnknownField { name } => write!(f, "Unknown field '{name}' ignored"),
            DiagnosticKind::NonNumericValue { token } => {
                write!(f, "'{token}' is not a number, stored as NaN")
            }
            DiagnosticKind::ExcessValues { section, count } => {
                write!(f, "{count} extra value(s) after {section} dropped")
            }
            DiagnosticKind::TruncatedInput { section } => {
                write!(f, "Input ended while reading {section}")
            }
            DiagnosticKind::ImplausibleCount {
                field,
                declared,
                limit,
            } => write!(f, "{field} {declared} exceeds {limit}, clamped"),
            DiagnosticKind::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what}: expected {expected} value(s), found {found}"),
            DiagnosticKind::TrailingExtraLines => write!(f, "Extra line found"),
        }
    }
}
