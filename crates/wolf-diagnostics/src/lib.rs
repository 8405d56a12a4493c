//! Diagnostics shared by every wolf compiler stage.
//!
//! Stages never abort on the first problem. They push into a [`Diagnostics`]
//! sink and return `None` for the fragment they could not build, so a single
//! run reports every problem in the component at once.

mod code;

pub use code::DiagnosticCode;

use smol_str::SmolStr;
use std::fmt;
use wolf_source::Span;

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Blocks code generation.
    Error,
    /// Reported, but output is still produced.
    Warning,
}

impl Severity {
    /// Get the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Where a diagnostic applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Region {
    /// The whole file, identified by its name.
    File { name: SmolStr },
    /// A byte range of the component file.
    Span(Span),
}

impl Region {
    pub fn file(name: impl Into<SmolStr>) -> Self {
        Self::File { name: name.into() }
    }

    /// The span, if the region has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::File { .. } => None,
            Self::Span(span) => Some(*span),
        }
    }
}

impl From<Span> for Region {
    fn from(span: Span) -> Self {
        Self::Span(span)
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub region: Region,
    /// Human-readable explanation. The first paragraph is the headline.
    pub paragraphs: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: DiagnosticCode, region: impl Into<Region>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            region: region.into(),
            paragraphs: vec![message.into()],
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        code: DiagnosticCode,
        region: impl Into<Region>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            region: region.into(),
            paragraphs: vec![message.into()],
        }
    }

    /// Append an explanatory paragraph.
    pub fn with_paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.paragraphs.push(paragraph.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The headline paragraph.
    pub fn message(&self) -> &str {
        self.paragraphs.first().map(String::as_str).unwrap_or_default()
    }

    /// Sort key: file-level diagnostics first, then by position.
    fn sort_key(&self) -> (u8, u32, u32) {
        match &self.region {
            Region::File { .. } => (0, 0, 0),
            Region::Span(span) => (1, span.start, span.end),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity.as_str(), self.code, self.message())
    }
}

/// Accumulates diagnostics across compiler stages.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(code = diagnostic.code.as_str(), "diagnostic reported");
        self.items.push(diagnostic);
    }

    /// Report an error.
    pub fn error(&mut self, code: DiagnosticCode, region: impl Into<Region>, message: impl Into<String>) {
        self.push(Diagnostic::error(code, region, message));
    }

    /// Report a warning.
    pub fn warning(
        &mut self,
        code: DiagnosticCode,
        region: impl Into<Region>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::warning(code, region, message));
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Whether any diagnostic carries `code`.
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    /// Consume the sink, yielding diagnostics ordered by position.
    /// Diagnostics reported at the same position keep their report order.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.items.sort_by_key(Diagnostic::sort_key);
        self.items
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
