use indexmap::IndexMap;
use smol_str::SmolStr;
use wolf_source::Span;

/// A slot declared in the `slots` section of the `Component` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDecl {
    /// Declared with `?`.
    pub optional: bool,
    /// Span of the member in the script.
    pub span: Span,
}

/// Declared slots by name, in declaration order.
pub type SlotTable = IndexMap<SmolStr, SlotDecl>;

/// How component state is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateFn {
    /// `create` returning an object literal with these keys.
    Names(Vec<SmolStr>),
    /// `createCtx`, bound to a single `ctx` identifier.
    Ctx,
}

/// Everything the template compiler needs to know about a script section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptContract {
    /// Whether a `Component` type alias was found.
    pub has_component: bool,
    pub props: Vec<SmolStr>,
    pub syncs: Vec<SmolStr>,
    pub events: Vec<SmolStr>,
    /// `None` when the `Component` type has no `slots` section.
    pub slots: Option<SlotTable>,
    pub create: Option<CreateFn>,
}
