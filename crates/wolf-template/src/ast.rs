//! Validated template AST.
//!
//! Nodes are built once by the [`builder`](crate::builder) and read by code
//! generation. Every node owns its children.

use indexmap::IndexMap;
use smol_str::SmolStr;
use wolf_source::Span;

/// Name of the slot used when `@slot`/`@insert` have no argument.
pub const DEFAULT_SLOT: &str = "def";

/// A fragment of user code embedded in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code {
    /// Trimmed source text.
    pub text: String,
    /// `text` is a single identifier and can be used as a function value.
    pub is_bare: bool,
    pub span: Span,
}

impl Code {
    pub fn new(text: &str, span: Span) -> Self {
        let text = text.trim();
        Self {
            is_bare: is_identifier(text),
            text: text.to_string(),
            span,
        }
    }
}

/// Whether `text` is a single JavaScript identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// How often a value can change.
///
/// Ordered `Static < Dynamic < Reactive`; combining values takes the
/// strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Liveness {
    /// Known at compile time.
    #[default]
    Static,
    /// Computed once when the node is created.
    Dynamic,
    /// Recomputed whenever its dependencies change.
    Reactive,
}

impl Liveness {
    /// Strongest liveness of `items`, `Static` when empty.
    pub fn combine(items: impl IntoIterator<Item = Liveness>) -> Liveness {
        items.into_iter().max().unwrap_or_default()
    }
}

/// Value of a binding attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingValue {
    /// `name`
    Empty,
    /// `name="value"`
    Static(String),
    /// `name={code}`; `initial` reads the value once.
    Dynamic { code: Code, initial: bool },
    /// `:name={code}`
    Reactive(Code),
}

impl BindingValue {
    pub fn liveness(&self) -> Liveness {
        match self {
            Self::Empty | Self::Static(_) => Liveness::Static,
            Self::Dynamic { .. } => Liveness::Dynamic,
            Self::Reactive(_) => Liveness::Reactive,
        }
    }

    /// Inert values never change after creation.
    pub fn is_inert(&self) -> bool {
        !matches!(self, Self::Reactive(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BindingAttribute {
    pub name: SmolStr,
    pub value: BindingValue,
    pub span: Span,
}

/// Modifiers accepted on event attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventModifier {
    /// The code is a complete handler and is not wrapped.
    Handler,
    Once,
    Capture,
    Passive,
    Prevent,
    Stop,
}

impl EventModifier {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "handler" => Self::Handler,
            "once" => Self::Once,
            "capture" => Self::Capture,
            "passive" => Self::Passive,
            "prevent" => Self::Prevent,
            "stop" => Self::Stop,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handler => "handler",
            Self::Once => "once",
            Self::Capture => "capture",
            Self::Passive => "passive",
            Self::Prevent => "prevent",
            Self::Stop => "stop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventAttribute {
    pub name: SmolStr,
    pub code: Code,
    pub modifiers: Vec<EventModifier>,
    pub span: Span,
}

impl EventAttribute {
    pub fn has(&self, modifier: EventModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncAttribute {
    pub name: SmolStr,
    pub code: Code,
    /// Only the initial value is read; writes still go back to the signal.
    pub initial: bool,
    pub span: Span,
}

/// `(node)={fn}`: called with the created element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receiver {
    pub code: Code,
    pub span: Span,
}

/// A validated attribute, before it is sorted into its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Binding(BindingAttribute),
    Event(EventAttribute),
    Sync(SyncAttribute),
    Receiver(Receiver),
}

/// A class contributed by a `.` meta.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassMeta {
    /// `.name`
    Static(SmolStr),
    /// `.{code}`
    Dynamic(Code),
    /// `.:{code}`
    Reactive(Code),
}

impl ClassMeta {
    pub fn liveness(&self) -> Liveness {
        match self {
            Self::Static(_) => Liveness::Static,
            Self::Dynamic(_) => Liveness::Dynamic,
            Self::Reactive(_) => Liveness::Reactive,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagAttributes {
    /// From a `#id` meta.
    pub id: Option<SmolStr>,
    pub classes: Vec<ClassMeta>,
    pub bindings: IndexMap<SmolStr, BindingAttribute>,
    /// Handlers per event, in source order.
    pub events: IndexMap<SmolStr, Vec<EventAttribute>>,
    pub receivers: Vec<Receiver>,
}

impl TagAttributes {
    pub fn class_liveness(&self) -> Liveness {
        Liveness::combine(self.classes.iter().map(ClassMeta::liveness))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub ident: SmolStr,
    pub attributes: TagAttributes,
    pub entities: Vec<Entity>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextItem {
    Static(String),
    /// `{{ code }}`
    Dynamic(Code),
    /// `{{: code }}`
    Reactive(Code),
}

impl TextItem {
    pub fn liveness(&self) -> Liveness {
        match self {
            Self::Static(_) => Liveness::Static,
            Self::Dynamic(_) => Liveness::Dynamic,
            Self::Reactive(_) => Liveness::Reactive,
        }
    }
}

/// A run of adjacent text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSection {
    pub items: Vec<TextItem>,
    pub span: Span,
}

impl TextSection {
    pub fn liveness(&self) -> Liveness {
        Liveness::combine(self.items.iter().map(TextItem::liveness))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentInclusion {
    pub name: SmolStr,
    pub props: IndexMap<SmolStr, BindingAttribute>,
    pub syncs: IndexMap<SmolStr, SyncAttribute>,
    pub events: IndexMap<SmolStr, Vec<EventAttribute>>,
    pub slot_insertions: IndexMap<SmolStr, SlotInsertion>,
    pub span: Span,
}

/// A directive argument; a leading `:` makes it reactive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectiveExpr {
    pub code: Code,
    pub reactive: bool,
}

impl DirectiveExpr {
    pub fn liveness(&self) -> Liveness {
        if self.reactive {
            Liveness::Reactive
        } else {
            Liveness::Dynamic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElseIfBranch {
    pub condition: DirectiveExpr,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfBlock {
    pub condition: DirectiveExpr,
    pub entities: Vec<Entity>,
    pub else_if_branches: Vec<ElseIfBranch>,
    pub else_branch: Option<Vec<Entity>>,
    pub span: Span,
}

impl IfBlock {
    pub fn is_reactive(&self) -> bool {
        self.condition.reactive || self.else_if_branches.iter().any(|b| b.condition.reactive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EachBlock {
    /// Loop variable; may be a destructuring pattern.
    pub pattern: String,
    pub index: Option<SmolStr>,
    pub collection: DirectiveExpr,
    pub entities: Vec<Entity>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchCase {
    pub patterns: Vec<Code>,
    pub entities: Vec<Entity>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchBlock {
    pub value: DirectiveExpr,
    pub cases: Vec<MatchCase>,
    pub default: Option<Vec<Entity>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwitchCase {
    Case {
        value: DirectiveExpr,
        entities: Vec<Entity>,
        is_fallthrough: bool,
        span: Span,
    },
    Default {
        entities: Vec<Entity>,
        is_fallthrough: bool,
        span: Span,
    },
}

impl SwitchCase {
    pub fn span(&self) -> Span {
        match self {
            Self::Case { span, .. } | Self::Default { span, .. } => *span,
        }
    }

    /// Whether control continues into the next case.
    pub fn is_fallthrough(&self) -> bool {
        match self {
            Self::Case { is_fallthrough, .. } | Self::Default { is_fallthrough, .. } => {
                *is_fallthrough
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchBlock {
    pub value: DirectiveExpr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

impl SwitchBlock {
    pub fn has_default(&self) -> bool {
        self.cases
            .iter()
            .any(|case| matches!(case, SwitchCase::Default { .. }))
    }

    pub fn is_reactive(&self) -> bool {
        self.value.reactive
            || self.cases.iter().any(|case| match case {
                SwitchCase::Case { value, .. } => value.reactive,
                SwitchCase::Default { .. } => false,
            })
    }
}

/// `@slot(name)` with an optional fallback body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotUsage {
    pub name: SmolStr,
    pub fallback: Option<Vec<Entity>>,
    pub span: Span,
}

/// `@insert(name)` under a component inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotInsertion {
    pub name: SmolStr,
    pub entities: Vec<Entity>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateDefinition {
    pub name: SmolStr,
    pub params: Vec<String>,
    pub entities: Vec<Entity>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateInclusion {
    pub name: SmolStr,
    pub args: Vec<Code>,
    pub span: Span,
}

/// An element carrying a `!sync` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Synced {
    pub tag: Tag,
    pub sync: SyncAttribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncedSelect {
    pub synced: Synced,
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Entity {
    Tag(Tag),
    Text(TextSection),
    Component(ComponentInclusion),
    If(IfBlock),
    Each(EachBlock),
    Match(MatchBlock),
    Switch(SwitchBlock),
    SlotUsage(SlotUsage),
    SlotInsertion(SlotInsertion),
    TemplateDefinition(TemplateDefinition),
    TemplateInclusion(TemplateInclusion),
    /// `input` (text) or `textarea`
    SyncedTextInput(Synced),
    SyncedCheckboxInput(Synced),
    SyncedRadioInput(Synced),
    SyncedSelect(SyncedSelect),
}

impl Entity {
    pub fn span(&self) -> Span {
        match self {
            Self::Tag(tag) => tag.span,
            Self::Text(text) => text.span,
            Self::Component(component) => component.span,
            Self::If(block) => block.span,
            Self::Each(block) => block.span,
            Self::Match(block) => block.span,
            Self::Switch(block) => block.span,
            Self::SlotUsage(slot) => slot.span,
            Self::SlotInsertion(insertion) => insertion.span,
            Self::TemplateDefinition(template) => template.span,
            Self::TemplateInclusion(inclusion) => inclusion.span,
            Self::SyncedTextInput(synced)
            | Self::SyncedCheckboxInput(synced)
            | Self::SyncedRadioInput(synced) => synced.tag.span,
            Self::SyncedSelect(select) => select.synced.tag.span,
        }
    }
}
