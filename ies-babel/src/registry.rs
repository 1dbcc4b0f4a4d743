//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name or by file extension.

use crate::document::PhotometricDocument;
use crate::error::FormatError;
use crate::format::Format;
use crate::parser::ParseReport;
use std::collections::HashMap;

/// Registry of photometric formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let report = registry.parse(source, "ies")?;
/// let csv = registry.serialize(&report.document, "csv")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<ParseReport, FormatError> {
        self.get(format)?.parse(source)
    }

    /// Serialize a document to text using the specified format
    pub fn serialize(
        &self,
        doc: &PhotometricDocument,
        format: &str,
    ) -> Result<String, FormatError> {
        self.get(format)?.serialize(doc)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::ies::IesFormat::default());
        registry.register(crate::formats::csv::CsvFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
