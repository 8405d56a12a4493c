//! Section types.

use smol_str::SmolStr;
use wolf_source::Span;

/// The role a section plays in the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionKind {
    Template,
    Script,
    Style,
    Custom,
}

impl SectionKind {
    /// Classify a section by its marker name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "template" => Self::Template,
            "script" => Self::Script,
            "style" => Self::Style,
            _ => Self::Custom,
        }
    }
}

/// One section of a component file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub name: SmolStr,
    pub kind: SectionKind,
    /// Value of the `lang="…"` attribute on the marker.
    pub lang: Option<SmolStr>,
    /// Raw body text, from the line after the marker up to the next marker.
    pub content: String,
    /// Span of the marker line, or an empty span for implicit sections.
    pub marker_span: Span,
    /// Span of `content` within the file.
    pub content_span: Span,
}

impl Section {
    /// Offset of the body within the file. Stages add this to their
    /// section-relative spans.
    pub fn base(&self) -> u32 {
        self.content_span.start
    }

    /// Whether the section was synthesized for a marker-less file.
    pub fn is_implicit(&self) -> bool {
        self.marker_span.is_empty() && self.content_span.start == 0
    }
}

/// A component file split into sections.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentFile {
    pub template: Option<Section>,
    pub script: Option<Section>,
    /// Style sections in file order.
    pub styles: Vec<Section>,
    /// Custom sections in file order.
    pub custom: Vec<Section>,
}

impl ComponentFile {
    pub fn section_count(&self) -> usize {
        self.template.iter().count()
            + self.script.iter().count()
            + self.styles.len()
            + self.custom.len()
    }
}
