//! Conversion between IES (IESNA LM-63-2002) photometric files and CSV
//!
//!     This crate turns a sequence of text lines in one grammar into a sequence of text lines in
//!     the other. It is a pure lib: reading files, splitting bytes into lines, picking the
//!     direction from a file name and printing diagnostics belong to the caller (ies-cli).
//!
//! Architecture
//!
//!     Both directions go through one document model, [`document::PhotometricDocument`]:
//!
//!         lines → Parser<Grammar> → PhotometricDocument → serializer → lines
//!
//!     The parser is a single state machine (./parser.rs) walking the sections of an IES file in
//!     order. The IES and CSV grammars only say how a physical line is cut into records and
//!     whether numeric sections are packed across lines or one record per line. The section
//!     logic lives in one place.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # Fatal errors
//!     ├── diagnostics.rs          # Recoverable conditions
//!     ├── document.rs             # PhotometricDocument and its parts
//!     ├── grammar.rs              # Shared vocabulary and number rules
//!     ├── parser.rs               # State machine and Grammar trait
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── convert.rs              # Direction and one-shot conversion
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # Grammar implementation
//!     │   │   ├── serializer.rs   # Serializer implementation
//!     │   │   └── mod.rs
//!     └── lib.rs
//!
//! Error Policy
//!
//!     Almost everything is recoverable: a malformed line, a non-numeric token or a short table
//!     becomes a [`diagnostics::Diagnostic`], logged through `tracing` and kept in the
//!     [`parser::ParseReport`]. Only two conditions stop a parse: a `TILT=<filename>` reference
//!     (external tilt files are not resolved) and feeding a parser that already stopped.
//!
//!     Every document a parser returns has angle arrays and a candela table matching its declared
//!     counts. Missing values are padded with 0 and surplus values dropped, each correction
//!     reported.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common/mod.rs           # fixture loading
//!     ├── ies/mod.rs
//!     ├── csv/mod.rs
//!     ├── roundtrip/mod.rs        # proptest properties across both grammars
//!     └── fixtures
//!         ├── <docname>.ies
//!         └── <docname>.csv

pub mod convert;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod format;
pub mod formats;
pub mod grammar;
pub mod parser;
pub mod registry;

pub use convert::{convert_lines, Conversion, Direction};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use document::{FieldName, Fields, KeywordValue, Keywords, PhotometricDocument, Tilt, TiltData};
pub use error::FormatError;
pub use format::{join_lines, Format};
pub use parser::{parse_lines, Grammar, ParseReport, Parser, ParserState};
pub use registry::FormatRegistry;
