//! Pluggable handlers for custom sections.

use crate::Section;
use wolf_diagnostics::Diagnostics;

/// Output of a [`SectionProcessor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSection {
    /// Code appended after the generated component.
    pub code: String,
    /// Runtime names the appended code needs imported.
    pub imports: Vec<String>,
}

/// Handles custom (`#! <name>`) sections.
///
/// Processors are matched by section name. A processor that records an
/// error diagnostic should return `None`.
pub trait SectionProcessor: Send + Sync {
    /// Section name this processor handles.
    fn name(&self) -> &str;

    /// Turn the section body into code.
    fn process(&self, section: &Section, diags: &mut Diagnostics) -> Option<ProcessedSection>;
}
