//! Format implementations
//!
//! Each format pairs a line grammar for the shared parser with a serializer.

pub mod csv;
pub mod ies;

pub use csv::{CsvFormat, CsvGrammar};
pub use ies::{IesFormat, IesGrammar, IesOptions};
