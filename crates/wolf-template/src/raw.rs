//! Raw syntactic fragments produced by the grammar.
//!
//! Nothing here is validated beyond syntax. The builder turns these into
//! [`ast`](crate::ast) nodes.

use crate::ast::{ClassMeta, Code, TextItem};
use smol_str::SmolStr;
use wolf_source::Span;

/// Prefix of an attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sigil {
    /// Plain binding.
    None,
    /// `:`
    Reactive,
    /// `@`
    Event,
    /// `!`
    Sync,
    /// `(kind)`
    Receiver(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// `"text"`, unescaped.
    Str(String, Span),
    /// `{code}` or a bare identifier.
    Code(Code),
}

impl RawValue {
    pub fn span(&self) -> Span {
        match self {
            Self::Str(_, span) => *span,
            Self::Code(code) => code.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    pub sigil: Sigil,
    /// Empty for receivers.
    pub name: SmolStr,
    pub modifiers: Vec<(SmolStr, Span)>,
    pub value: Option<RawValue>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMeta {
    /// `#name`
    Id(SmolStr, Span),
    Class(ClassMeta, Span),
}

impl RawMeta {
    pub fn span(&self) -> Span {
        match self {
            Self::Id(_, span) | Self::Class(_, span) => *span,
        }
    }
}

/// An element or component line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub name: SmolStr,
    pub metas: Vec<RawMeta>,
    pub attributes: Vec<RawAttribute>,
    pub children: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDirective {
    pub name: SmolStr,
    pub name_span: Span,
    /// Text between the parentheses.
    pub argument: Option<Code>,
    pub children: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKind {
    Tag(RawElement),
    Component(RawElement),
    Text(Vec<TextItem>),
    Directive(RawDirective),
}

/// One line production and the block it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub kind: RawKind,
    /// Span of the header line.
    pub span: Span,
}
