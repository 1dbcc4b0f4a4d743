//! Line-driven parser state machine
//!
//! Both input grammars walk the same sections in the same order:
//!
//!     Version → Keywords → [LampGeometry → TiltAngleCount → TiltAngles →
//!     MultiplyingFactors] → UnmarkedFields → VerticalAngles →
//!     HorizontalAngles → CandelaTable → ExtraLines
//!
//! The tilt block is only entered after `TILT=INCLUDE`. What differs between
//! IES and CSV is how a physical line is cut into records, and whether numeric
//! sections are packed (a flat token stream spread over as many lines as
//! needed) or tabular (one record per line). A [`Grammar`] supplies exactly
//! those two things, so the transitions below are written once.
//!
//! Recoverable problems become [`Diagnostic`]s and parsing goes on. Two
//! conditions abort: a `TILT=<filename>` reference, and driving a parser that
//! has already aborted.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::document::{
    more_key, FieldName, KeywordValue, PhotometricDocument, Tilt, TiltData,
};
use crate::error::FormatError;
use crate::grammar::{self, KeywordClass, TiltMode, TILT_PREFIX};

/// How numeric sections are laid out over physical lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Values flow across lines; cursors track the position (IES)
    Packed,
    /// One record per line (CSV)
    Tabular,
}

/// Record shapes of one line grammar
///
/// Every method receives a line that is already trimmed and normalized.
pub trait Grammar {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn layout(&self) -> Layout;

    /// Removes grammar-level noise (such as trailing delimiters) from a trimmed line.
    fn normalize<'a>(&self, line: &'a str) -> &'a str {
        line
    }

    /// The version string carried by the first record
    fn version(&self, line: &str) -> String;

    /// Name and value of a bracketed keyword record, or `None` if the
    /// brackets are malformed
    fn keyword(&self, line: &str) -> Option<(String, String)>;

    /// The single value of a scalar record
    fn scalar(&self, line: &str) -> String;

    /// The numeric tokens of an array record
    fn values(&self, line: &str) -> Vec<String>;

    /// `(name, value)` of a fixed-field record. Only tabular grammars have them.
    fn named_value(&self, _line: &str) -> Option<(String, String)> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Version,
    Keywords,
    LampGeometry,
    TiltAngleCount,
    TiltAngles,
    MultiplyingFactors,
    UnmarkedFields,
    VerticalAngles,
    HorizontalAngles,
    CandelaTable,
    ExtraLines,
    /// Entered after a fatal error; nothing can leave it
    Aborted,
}

impl ParserState {
    /// Human readable section name
    pub fn section(self) -> &'static str {
        match self {
            ParserState::Version => "the version line",
            ParserState::Keywords => "the keywords",
            ParserState::LampGeometry => "the lamp-to-luminaire geometry",
            ParserState::TiltAngleCount => "the number of tilt angles",
            ParserState::TiltAngles => "the tilt angles",
            ParserState::MultiplyingFactors => "the multiplying factors",
            ParserState::UnmarkedFields => "the fixed fields",
            ParserState::VerticalAngles => "the vertical angles",
            ParserState::HorizontalAngles => "the horizontal angles",
            ParserState::CandelaTable => "the candela table",
            ParserState::ExtraLines => "trailing lines",
            ParserState::Aborted => "an aborted parse",
        }
    }

    /// An empty line is a record here (an empty tilt array), not noise.
    fn accepts_blank(self) -> bool {
        matches!(
            self,
            ParserState::TiltAngles | ParserState::MultiplyingFactors
        )
    }
}

/// Cursors of one parse run
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// 1-based number of the last line fed
    pub line_number: usize,
    /// Next fixed field to fill (packed layout)
    pub field: usize,
    /// Position inside the current candela row (packed layout)
    pub column: usize,
    /// Current candela row
    pub row: usize,
    /// Last non-`MORE` keyword, the target of `[MORE]` lines
    pub last_key: Option<String>,
    /// Whether the CSV candela header row has been consumed
    pub header_seen: bool,
}

impl ParseContext {
    fn reset_cursors(&mut self) {
        self.field = 0;
        self.column = 0;
        self.row = 0;
        self.header_seen = false;
    }
}

/// A parsed document and every condition tolerated while building it
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    pub document: PhotometricDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds a [`PhotometricDocument`] from lines fed one at a time
pub struct Parser<G> {
    grammar: G,
    state: ParserState,
    ctx: ParseContext,
    document: PhotometricDocument,
    diagnostics: Vec<Diagnostic>,
}

impl<G: Grammar> Parser<G> {
    pub fn new(grammar: G) -> Self {
        Self {
            grammar,
            state: ParserState::Version,
            ctx: ParseContext::default(),
            document: PhotometricDocument::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    pub fn document(&self) -> &PhotometricDocument {
        &self.document
    }

    /// Consumes the next physical line.
    pub fn feed(&mut self, line: &str) -> Result<(), FormatError> {
        self.ctx.line_number += 1;
        let line = self.grammar.normalize(line.trim());
        tracing::trace!(
            grammar = self.grammar.name(),
            line = self.ctx.line_number,
            "{line}"
        );

        if self.state == ParserState::Aborted {
            return Err(FormatError::UndefinedParserState {
                line: self.ctx.line_number,
            });
        }
        if line.is_empty() && !self.state.accepts_blank() {
            return Ok(());
        }

        match self.step(line) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(err) => {
                self.state = ParserState::Aborted;
                Err(err)
            }
        }
    }

    /// Ends the run and returns the document, forced to its declared dimensions.
    pub fn finish(mut self) -> Result<ParseReport, FormatError> {
        match self.state {
            ParserState::Aborted => {
                return Err(FormatError::UndefinedParserState {
                    line: self.ctx.line_number,
                })
            }
            ParserState::ExtraLines => {}
            state => self.report(DiagnosticKind::TruncatedInput {
                section: state.section(),
            }),
        }

        for mismatch in self.document.conform() {
            self.report(DiagnosticKind::DimensionMismatch {
                what: mismatch.what,
                expected: mismatch.expected,
                found: mismatch.found,
            });
        }

        Ok(ParseReport {
            document: self.document,
            diagnostics: self.diagnostics,
        })
    }

    /// One transition: reads `line` in the current state and returns the next state.
    fn step(&mut self, line: &str) -> Result<ParserState, FormatError> {
        let next = match self.state {
            ParserState::Version => {
                let version = self.grammar.version(line);
                if !grammar::is_supported_version(&version) {
                    self.report(DiagnosticKind::UnsupportedVersion {
                        version: version.clone(),
                    });
                }
                self.document.version = version;
                ParserState::Keywords
            }
            ParserState::Keywords => return self.keyword_line(line),
            ParserState::LampGeometry => {
                let value = self.scalar(line);
                self.with_tilt(|tilt| tilt.lamp_to_luminaire_geometry = value);
                ParserState::TiltAngleCount
            }
            ParserState::TiltAngleCount => {
                let value = self.scalar(line);
                self.with_tilt(|tilt| tilt.number_of_tilt_angles = value);
                ParserState::TiltAngles
            }
            ParserState::TiltAngles => {
                let values = self.numbers(line);
                self.with_tilt(|tilt| tilt.tilt_angles = values);
                ParserState::MultiplyingFactors
            }
            ParserState::MultiplyingFactors => {
                let values = self.numbers(line);
                self.with_tilt(|tilt| tilt.multiplying_factors = values);
                self.enter_fields()
            }
            ParserState::UnmarkedFields => {
                if self.read_fields(line) {
                    self.enter_angles()
                } else {
                    ParserState::UnmarkedFields
                }
            }
            ParserState::VerticalAngles => {
                if self.read_angles(line, Axis::Vertical) {
                    self.skip_empty(ParserState::HorizontalAngles)
                } else {
                    ParserState::VerticalAngles
                }
            }
            ParserState::HorizontalAngles => {
                if self.read_angles(line, Axis::Horizontal) {
                    self.ctx.reset_cursors();
                    self.skip_empty(ParserState::CandelaTable)
                } else {
                    ParserState::HorizontalAngles
                }
            }
            ParserState::CandelaTable => {
                if self.read_candela(line) {
                    ParserState::ExtraLines
                } else {
                    ParserState::CandelaTable
                }
            }
            ParserState::ExtraLines => {
                self.report(DiagnosticKind::TrailingExtraLines);
                ParserState::ExtraLines
            }
            ParserState::Aborted => {
                return Err(FormatError::UndefinedParserState {
                    line: self.ctx.line_number,
                })
            }
        };
        Ok(next)
    }

    fn keyword_line(&mut self, line: &str) -> Result<ParserState, FormatError> {
        if line.starts_with('[') {
            match self.grammar.keyword(line) {
                Some((name, value)) => self.store_keyword(name, value),
                None => self.report(DiagnosticKind::MalformedStructuralLine {
                    content: line.to_string(),
                }),
            }
            return Ok(ParserState::Keywords);
        }

        if let Some(mode) = line.strip_prefix(TILT_PREFIX) {
            return match TiltMode::decode(mode) {
                TiltMode::None => {
                    self.document.tilt = Tilt::None;
                    Ok(self.enter_fields())
                }
                TiltMode::Include => {
                    self.document.tilt = Tilt::Include(TiltData::default());
                    Ok(ParserState::LampGeometry)
                }
                TiltMode::File(reference) => Err(FormatError::UnsupportedTiltReference {
                    line: self.ctx.line_number,
                    reference: reference.to_string(),
                }),
            };
        }

        self.report(DiagnosticKind::MalformedStructuralLine {
            content: line.to_string(),
        });
        Ok(ParserState::Keywords)
    }

    fn store_keyword(&mut self, name: String, value: String) {
        match KeywordClass::of(&name) {
            KeywordClass::More => {
                let parent = match &self.ctx.last_key {
                    Some(parent) => parent.clone(),
                    None => {
                        self.report(DiagnosticKind::OrphanContinuation);
                        String::new()
                    }
                };
                if !self.document.keywords.append_more(&parent, value) {
                    self.report(DiagnosticKind::ContinuationConflict {
                        key: more_key(&parent),
                    });
                }
            }
            class => {
                if class == KeywordClass::Unknown {
                    self.report(DiagnosticKind::UnknownKeyword { name: name.clone() });
                }
                if let Some(KeywordValue::More(_)) = self.document.keywords.get(&name) {
                    self.report(DiagnosticKind::ContinuationConflict { key: name.clone() });
                } else {
                    self.document.keywords.set(name.clone(), value);
                }
                self.ctx.last_key = Some(name);
            }
        }
    }

    /// Returns `true` once the last fixed field has been read.
    fn read_fields(&mut self, line: &str) -> bool {
        match self.grammar.layout() {
            Layout::Packed => {
                let tokens = self.grammar.values(line);
                let mut excess = 0;
                for token in &tokens {
                    match FieldName::ALL.get(self.ctx.field) {
                        Some(&name) => {
                            let value = self.number(token);
                            self.document.fields.set(name, value);
                            self.ctx.field += 1;
                        }
                        None => excess += 1,
                    }
                }
                self.report_excess(ParserState::UnmarkedFields, excess);
                self.ctx.field >= FieldName::COUNT
            }
            Layout::Tabular => {
                let Some((label, value)) = self.grammar.named_value(line) else {
                    self.report(DiagnosticKind::UnknownField {
                        name: line.to_string(),
                    });
                    return false;
                };
                match FieldName::from_label(&label) {
                    Some(name) => {
                        let value = self.number(&value);
                        self.document.fields.set(name, value);
                        name == FieldName::InputWatts
                    }
                    None => {
                        self.report(DiagnosticKind::UnknownField { name: label });
                        false
                    }
                }
            }
        }
    }

    /// Returns `true` once the array holds its declared count (packed) or
    /// after its single row (tabular).
    fn read_angles(&mut self, line: &str, axis: Axis) -> bool {
        let values = self.numbers(line);
        let (expected, state) = match axis {
            Axis::Vertical => (self.document.vertical_count(), ParserState::VerticalAngles),
            Axis::Horizontal => (
                self.document.horizontal_count(),
                ParserState::HorizontalAngles,
            ),
        };
        let layout = self.grammar.layout();
        let target = match axis {
            Axis::Vertical => &mut self.document.vertical_angles,
            Axis::Horizontal => &mut self.document.horizontal_angles,
        };

        match layout {
            Layout::Packed => {
                let room = expected.saturating_sub(target.len());
                let take = room.min(values.len());
                target.extend_from_slice(&values[..take]);
                let done = target.len() >= expected;
                self.report_excess(state, values.len() - take);
                done
            }
            Layout::Tabular => {
                *target = values;
                true
            }
        }
    }

    /// Returns `true` once every row of the table has been read.
    fn read_candela(&mut self, line: &str) -> bool {
        let vertical = self.document.vertical_count();
        let horizontal = self.document.horizontal_count();

        match self.grammar.layout() {
            Layout::Packed => {
                let values = self.numbers(line);
                let mut excess = 0;
                for value in values {
                    if self.ctx.row >= horizontal {
                        excess += 1;
                        continue;
                    }
                    if self.document.candela.len() <= self.ctx.row {
                        self.document.candela.push(Vec::new());
                    }
                    self.document.candela[self.ctx.row].push(value);
                    self.ctx.column += 1;
                    if self.ctx.column >= vertical {
                        self.ctx.column = 0;
                        self.ctx.row += 1;
                    }
                }
                self.report_excess(ParserState::CandelaTable, excess);
                self.ctx.row >= horizontal
            }
            Layout::Tabular => {
                if !self.ctx.header_seen {
                    // The header repeats the vertical angles.
                    self.ctx.header_seen = true;
                    return horizontal == 0;
                }
                let row = self.numbers(line);
                self.document.candela.push(row);
                self.ctx.row += 1;
                self.ctx.row >= horizontal
            }
        }
    }

    fn enter_fields(&mut self) -> ParserState {
        self.ctx.reset_cursors();
        ParserState::UnmarkedFields
    }

    fn enter_angles(&mut self) -> ParserState {
        self.clamp_counts();
        self.ctx.reset_cursors();
        self.document.vertical_angles.clear();
        self.document.horizontal_angles.clear();
        self.document.candela.clear();
        self.skip_empty(ParserState::VerticalAngles)
    }

    /// Rewrites angle counts above [`grammar::MAX_ANGLES`] to the limit.
    fn clamp_counts(&mut self) {
        for name in [
            FieldName::NumberOfVerticalAngles,
            FieldName::NumberOfHorizontalAngles,
        ] {
            let declared = self.document.fields.get(name);
            if declared.is_finite() && declared > grammar::MAX_ANGLES as f64 {
                self.report(DiagnosticKind::ImplausibleCount {
                    field: name.as_str(),
                    declared,
                    limit: grammar::MAX_ANGLES,
                });
                self.document.fields.set(name, grammar::MAX_ANGLES as f64);
            }
        }
    }

    /// Packed sections with a declared count of zero have no lines at all.
    fn skip_empty(&mut self, state: ParserState) -> ParserState {
        if self.grammar.layout() == Layout::Tabular {
            return state;
        }
        let vertical = self.document.vertical_count();
        let horizontal = self.document.horizontal_count();
        match state {
            ParserState::VerticalAngles if vertical == 0 => {
                self.skip_empty(ParserState::HorizontalAngles)
            }
            ParserState::HorizontalAngles if horizontal == 0 => {
                self.skip_empty(ParserState::CandelaTable)
            }
            ParserState::CandelaTable if horizontal == 0 || vertical == 0 => {
                self.document.candela = vec![Vec::new(); horizontal];
                ParserState::ExtraLines
            }
            state => state,
        }
    }

    fn with_tilt(&mut self, update: impl FnOnce(&mut TiltData)) {
        if let Tilt::Include(tilt) = &mut self.document.tilt {
            update(tilt);
        }
    }

    fn scalar(&mut self, line: &str) -> f64 {
        let token = self.grammar.scalar(line);
        self.number(&token)
    }

    fn numbers(&mut self, line: &str) -> Vec<f64> {
        let tokens = self.grammar.values(line);
        tokens.iter().map(|token| self.number(token)).collect()
    }

    fn number(&mut self, token: &str) -> f64 {
        match grammar::parse_number(token) {
            Some(value) => value,
            None => {
                self.report(DiagnosticKind::NonNumericValue {
                    token: token.to_string(),
                });
                f64::NAN
            }
        }
    }

    fn report_excess(&mut self, state: ParserState, count: usize) {
        if count > 0 {
            self.report(DiagnosticKind::ExcessValues {
                section: state.section(),
                count,
            });
        }
    }

    fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(self.ctx.line_number, kind);
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Runs a fresh parser over `lines`.
///
/// Stops at the first fatal error; nothing of the partial document is returned.
pub fn parse_lines<G, I, S>(grammar: G, lines: I) -> Result<ParseReport, FormatError>
where
    G: Grammar,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new(grammar);
    for line in lines {
        parser.feed(line.as_ref())?;
    }
    parser.finish()
}
