//! Semantic validation of raw fragments.
//!
//! The builder is the single place where template rules are enforced. It
//! never stops at the first problem: every rule violation is recorded in the
//! [`Diagnostics`] sink and the offending fragment is dropped, so one run
//! reports everything wrong with a template.

mod args;
mod attribute;
mod component;
mod element;

use crate::ast::*;
use crate::raw::{RawDirective, RawItem, RawKind};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use wolf_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Region};
use wolf_script::SlotTable;
use wolf_source::Span;

/// Where a list of fragments appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Top level of the template.
    Root,
    /// Direct children of a component inclusion.
    Component,
    /// Anywhere else.
    Nested,
}

/// Directive chain being stitched from sibling fragments.
///
/// Opened by `@if`, `@match` or `@switch`, extended by continuation
/// directives and pushed as one entity when a non-continuation fragment
/// arrives or the sibling list ends.
enum InProgressDirective {
    If(IfBlock),
    Match(MatchBlock),
    Switch(SwitchBlock),
}

/// Validate `items` into entities.
///
/// `slots` is the `slots` section of the component's script, if it has one.
/// `region` spans the whole template section. Returns `None` when an error
/// was recorded.
pub fn build_template(
    items: Vec<RawItem>,
    slots: Option<&SlotTable>,
    region: Span,
    diags: &mut Diagnostics,
) -> Option<Vec<Entity>> {
    let errors_before = diags.error_count();
    let mut builder = Builder::new(diags, slots);
    let entities = builder.parse_entities(items, Scope::Root);
    builder.finish();

    let failed = diags.error_count() > errors_before;
    if entities.is_empty() && !failed {
        diags.warning(
            DiagnosticCode::TemplateEmpty,
            Region::Span(region),
            "the template renders nothing",
        );
    }
    tracing::debug!(entities = entities.len(), failed, "template built");
    (!failed).then_some(entities)
}

pub(crate) struct Builder<'a> {
    diags: &'a mut Diagnostics,
    slots: Option<&'a SlotTable>,
    slot_uses: FxHashMap<SmolStr, usize>,
    templates: FxHashMap<SmolStr, Span>,
    includes: Vec<(SmolStr, Span)>,
}

impl<'a> Builder<'a> {
    fn new(diags: &'a mut Diagnostics, slots: Option<&'a SlotTable>) -> Self {
        Self {
            diags,
            slots,
            slot_uses: FxHashMap::default(),
            templates: FxHashMap::default(),
            includes: Vec::new(),
        }
    }

    fn error(&mut self, code: DiagnosticCode, span: Span, message: impl Into<String>) {
        self.diags.error(code, span, message);
    }

    fn warning(&mut self, code: DiagnosticCode, span: Span, message: impl Into<String>) {
        self.diags.warning(code, span, message);
    }

    /// Checks that need the whole template.
    fn finish(self) {
        for (name, span) in &self.includes {
            if !self.templates.contains_key(name) {
                self.diags.error(
                    DiagnosticCode::TemplateUnknown,
                    *span,
                    format!("no `@template({name})` is defined"),
                );
            }
        }

        if let Some(table) = self.slots {
            for (name, decl) in table {
                let used = self.slot_uses.get(name).copied().unwrap_or(0);
                if !decl.optional && used == 0 {
                    self.diags.push(
                        Diagnostic::error(
                            DiagnosticCode::SlotRequiredUnused,
                            decl.span,
                            format!("required slot `{name}` is never rendered"),
                        )
                        .with_paragraph(format!(
                            "add `@slot({name})` to the template or declare it as `{name}?`"
                        )),
                    );
                }
            }
        }
    }

    /// Turn a sibling list into entities, stitching directive chains and
    /// merging adjacent text.
    fn parse_entities(&mut self, items: Vec<RawItem>, scope: Scope) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut open: Option<InProgressDirective> = None;

        for item in items {
            let span = item.span;
            match item.kind {
                RawKind::Text(text) => {
                    self.close(&mut open, &mut entities);
                    push_text(&mut entities, text, span);
                }
                RawKind::Tag(element) => {
                    self.close(&mut open, &mut entities);
                    if let Some(entity) = self.parse_html(element, span) {
                        entities.push(entity);
                    }
                }
                RawKind::Component(element) => {
                    self.close(&mut open, &mut entities);
                    let inclusion = self.parse_component_inclusion(element, span);
                    entities.push(Entity::Component(inclusion));
                }
                RawKind::Directive(directive) => {
                    self.directive(directive, span, scope, &mut open, &mut entities)
                }
            }
        }

        self.close(&mut open, &mut entities);
        entities
    }

    fn close(&mut self, open: &mut Option<InProgressDirective>, entities: &mut Vec<Entity>) {
        let Some(directive) = open.take() else {
            return;
        };
        let entity = match directive {
            InProgressDirective::If(block) => Entity::If(block),
            InProgressDirective::Match(block) => {
                if block.cases.is_empty() && block.default.is_none() {
                    self.warning(
                        DiagnosticCode::DirectiveNoCases,
                        block.span,
                        "`@match` has no `@when` or `@default` cases",
                    );
                }
                Entity::Match(block)
            }
            InProgressDirective::Switch(block) => {
                if block.cases.is_empty() {
                    self.warning(
                        DiagnosticCode::DirectiveNoCases,
                        block.span,
                        "`@switch` has no `@case` or `@default` cases",
                    );
                }
                Entity::Switch(block)
            }
        };
        entities.push(entity);
    }

    fn directive(
        &mut self,
        directive: RawDirective,
        span: Span,
        scope: Scope,
        open: &mut Option<InProgressDirective>,
        entities: &mut Vec<Entity>,
    ) {
        match directive.name.as_str() {
            "elseif" => match open {
                Some(InProgressDirective::If(block)) => {
                    if block.else_branch.is_some() {
                        self.error(
                            DiagnosticCode::DirectiveAfterElse,
                            span,
                            "`@elseif` cannot follow `@else`",
                        );
                        return;
                    }
                    let condition = self.require_expr(&directive);
                    let entities = self.parse_entities(directive.children, Scope::Nested);
                    block.else_if_branches.push(ElseIfBranch {
                        condition,
                        entities,
                    });
                    block.span = block.span.merge(span);
                }
                _ => self.unpreceded(&directive, "`@if`"),
            },
            "else" => match open {
                Some(InProgressDirective::If(block)) => {
                    if block.else_branch.is_some() {
                        self.error(
                            DiagnosticCode::DirectiveAfterElse,
                            span,
                            "an `@if` chain has at most one `@else`",
                        );
                        return;
                    }
                    self.forbid_argument(&directive);
                    let entities = self.parse_entities(directive.children, Scope::Nested);
                    block.else_branch = Some(entities);
                    block.span = block.span.merge(span);
                }
                _ => self.unpreceded(&directive, "`@if`"),
            },
            "when" => match open {
                Some(InProgressDirective::Match(block)) => {
                    if block.default.is_some() {
                        self.error(
                            DiagnosticCode::DirectiveAfterDefault,
                            span,
                            "`@when` cannot follow `@default`",
                        );
                        return;
                    }
                    let patterns = self.patterns(&directive);
                    let entities = self.parse_entities(directive.children, Scope::Nested);
                    block.cases.push(MatchCase {
                        patterns,
                        entities,
                        span,
                    });
                    block.span = block.span.merge(span);
                }
                _ => self.unpreceded(&directive, "`@match`"),
            },
            "case" | "fallcase" => match open {
                Some(InProgressDirective::Switch(block)) => {
                    let value = self.require_expr(&directive);
                    let is_fallthrough = directive.name == "fallcase";
                    let entities = self.parse_entities(directive.children, Scope::Nested);
                    block.cases.push(SwitchCase::Case {
                        value,
                        entities,
                        is_fallthrough,
                        span,
                    });
                    block.span = block.span.merge(span);
                }
                _ => self.unpreceded(&directive, "`@switch`"),
            },
            "default" => {
                self.forbid_argument(&directive);
                match open {
                    Some(InProgressDirective::Match(block)) => {
                        if block.default.is_some() {
                            self.duplicate_default(span);
                            return;
                        }
                        let entities = self.parse_entities(directive.children, Scope::Nested);
                        block.default = Some(entities);
                        block.span = block.span.merge(span);
                    }
                    Some(InProgressDirective::Switch(block)) => {
                        if block.has_default() {
                            self.duplicate_default(span);
                            return;
                        }
                        let entities = self.parse_entities(directive.children, Scope::Nested);
                        block.cases.push(SwitchCase::Default {
                            entities,
                            is_fallthrough: false,
                            span,
                        });
                        block.span = block.span.merge(span);
                    }
                    _ => self.unpreceded(&directive, "`@match` or `@switch`"),
                }
            }
            "falldefault" => {
                self.forbid_argument(&directive);
                match open {
                    Some(InProgressDirective::Switch(block)) => {
                        if block.has_default() {
                            self.duplicate_default(span);
                            return;
                        }
                        let entities = self.parse_entities(directive.children, Scope::Nested);
                        block.cases.push(SwitchCase::Default {
                            entities,
                            is_fallthrough: true,
                            span,
                        });
                        block.span = block.span.merge(span);
                    }
                    _ => self.unpreceded(&directive, "`@switch`"),
                }
            }
            _ => {
                self.close(open, entities);
                self.opening_directive(directive, span, scope, open, entities);
            }
        }
    }

    fn opening_directive(
        &mut self,
        directive: RawDirective,
        span: Span,
        scope: Scope,
        open: &mut Option<InProgressDirective>,
        entities: &mut Vec<Entity>,
    ) {
        match directive.name.as_str() {
            "if" => {
                let condition = self.require_expr(&directive);
                let body = self.parse_entities(directive.children, Scope::Nested);
                *open = Some(InProgressDirective::If(IfBlock {
                    condition,
                    entities: body,
                    else_if_branches: Vec::new(),
                    else_branch: None,
                    span,
                }));
            }
            "match" => {
                let value = self.require_expr(&directive);
                *open = Some(InProgressDirective::Match(MatchBlock {
                    value,
                    cases: Vec::new(),
                    default: None,
                    span,
                }));
            }
            "switch" => {
                let value = self.require_expr(&directive);
                *open = Some(InProgressDirective::Switch(SwitchBlock {
                    value,
                    cases: Vec::new(),
                    span,
                }));
            }
            "each" => {
                if let Some(block) = self.each(directive, span) {
                    entities.push(Entity::Each(block));
                }
            }
            "slot" => {
                if let Some(usage) = self.slot_usage(directive, span) {
                    entities.push(Entity::SlotUsage(usage));
                }
            }
            "insert" => {
                if scope != Scope::Component {
                    self.error(
                        DiagnosticCode::SlotInsertOutsideComponent,
                        span,
                        "`@insert` must be a direct child of a component",
                    );
                    return;
                }
                let Some(name) = self.slot_name(&directive) else {
                    return;
                };
                let body = self.parse_entities(directive.children, Scope::Nested);
                entities.push(Entity::SlotInsertion(SlotInsertion {
                    name,
                    entities: body,
                    span,
                }));
            }
            "template" => {
                if scope != Scope::Root {
                    self.error(
                        DiagnosticCode::TemplateNotTopLevel,
                        span,
                        "`@template` is only allowed at the top level",
                    );
                    return;
                }
                if let Some(definition) = self.template_definition(directive, span) {
                    entities.push(Entity::TemplateDefinition(definition));
                }
            }
            "include" => {
                if let Some(inclusion) = self.template_inclusion(&directive, span) {
                    entities.push(Entity::TemplateInclusion(inclusion));
                }
            }
            other => {
                self.error(
                    DiagnosticCode::DirectiveUnknown,
                    directive.name_span,
                    format!("unknown directive `@{other}`"),
                );
            }
        }
    }

    fn unpreceded(&mut self, directive: &RawDirective, expected: &str) {
        self.error(
            DiagnosticCode::DirectiveUnpreceded,
            directive.name_span,
            format!("`@{}` must follow {}", directive.name, expected),
        );
    }

    fn duplicate_default(&mut self, span: Span) {
        self.error(
            DiagnosticCode::DirectiveDuplicateDefault,
            span,
            "only one default case is allowed",
        );
    }

    fn forbid_argument(&mut self, directive: &RawDirective) {
        if let Some(argument) = &directive.argument {
            self.error(
                DiagnosticCode::DirectiveUnexpectedArgument,
                argument.span,
                format!("`@{}` takes no argument", directive.name),
            );
        }
    }

    /// The directive argument as an expression. Records an error and
    /// returns an empty placeholder when it is missing.
    fn require_expr(&mut self, directive: &RawDirective) -> DirectiveExpr {
        match &directive.argument {
            Some(argument) if !argument.text.is_empty() => parse_expr(&argument.text, argument.span),
            _ => {
                self.error(
                    DiagnosticCode::DirectiveMissingArgument,
                    directive.name_span,
                    format!("`@{}` needs an argument", directive.name),
                );
                DirectiveExpr {
                    code: Code::new("", directive.name_span),
                    reactive: false,
                }
            }
        }
    }

    fn patterns(&mut self, directive: &RawDirective) -> Vec<Code> {
        let Some(argument) = &directive.argument else {
            self.error(
                DiagnosticCode::DirectiveMissingArgument,
                directive.name_span,
                "`@when` needs at least one pattern",
            );
            return Vec::new();
        };
        let patterns: Vec<Code> = args::split_top_level(&argument.text, ',')
            .into_iter()
            .filter(|(_, piece)| !piece.trim().is_empty())
            .map(|(_, piece)| Code::new(piece, argument.span))
            .collect();
        if patterns.is_empty() {
            self.error(
                DiagnosticCode::DirectiveMissingArgument,
                argument.span,
                "`@when` needs at least one pattern",
            );
        }
        patterns
    }

    fn each(&mut self, directive: RawDirective, span: Span) -> Option<EachBlock> {
        let Some(argument) = &directive.argument else {
            self.error(
                DiagnosticCode::DirectiveMissingArgument,
                directive.name_span,
                "`@each` needs an argument like `item of items`",
            );
            return None;
        };
        let parsed = match args::parse_each(&argument.text) {
            Ok(parsed) => parsed,
            Err(message) => {
                self.error(DiagnosticCode::DirectiveInvalidArgument, argument.span, message);
                return None;
            }
        };
        let pattern = parsed.pattern.to_string();
        let index = parsed.index.map(SmolStr::from);
        let collection = parse_expr(parsed.collection.1, argument.span);
        let entities = self.parse_entities(directive.children, Scope::Nested);
        Some(EachBlock {
            pattern,
            index,
            collection,
            entities,
            span,
        })
    }

    /// Slot name argument of `@slot`/`@insert`; defaults to the default slot.
    fn slot_name(&mut self, directive: &RawDirective) -> Option<SmolStr> {
        let Some(argument) = directive.argument.as_ref().filter(|a| !a.text.is_empty()) else {
            return Some(SmolStr::new_static(DEFAULT_SLOT));
        };
        if !is_identifier(&argument.text) {
            self.error(
                DiagnosticCode::SlotInvalidName,
                argument.span,
                format!("`{}` is not a valid slot name", argument.text),
            );
            return None;
        }
        Some(SmolStr::from(argument.text.as_str()))
    }

    fn slot_usage(&mut self, directive: RawDirective, span: Span) -> Option<SlotUsage> {
        let name = self.slot_name(&directive)?;
        let fallback = if directive.children.is_empty() {
            None
        } else {
            Some(self.parse_entities(directive.children, Scope::Nested))
        };

        let Some(table) = self.slots else {
            self.error(
                DiagnosticCode::SlotNoSection,
                span,
                "`@slot` requires a `slots` section in the `Component` type",
            );
            return None;
        };
        let Some(decl) = table.get(&name) else {
            self.error(
                DiagnosticCode::SlotUnknown,
                span,
                format!("slot `{name}` is not declared in the `Component` type"),
            );
            return None;
        };
        if !decl.optional && fallback.is_some() {
            self.error(
                DiagnosticCode::SlotRequiredFallback,
                span,
                format!("required slot `{name}` cannot have a fallback"),
            );
        }

        *self.slot_uses.entry(name.clone()).or_default() += 1;
        Some(SlotUsage {
            name,
            fallback,
            span,
        })
    }

    fn template_definition(
        &mut self,
        directive: RawDirective,
        span: Span,
    ) -> Option<TemplateDefinition> {
        let Some(argument) = &directive.argument else {
            self.error(
                DiagnosticCode::DirectiveMissingArgument,
                directive.name_span,
                "`@template` needs a name",
            );
            return None;
        };
        let mut parts = args::split_top_level(&argument.text, ',').into_iter();
        let name = parts.next().map(|(_, piece)| piece.trim()).unwrap_or_default();
        if !is_identifier(name) {
            self.error(
                DiagnosticCode::DirectiveInvalidArgument,
                argument.span,
                "a template name must be an identifier",
            );
            return None;
        }
        let params: Vec<String> = parts
            .map(|(_, piece)| piece.trim().to_string())
            .filter(|param| !param.is_empty())
            .collect();
        let name = SmolStr::from(name);

        if self.templates.contains_key(&name) {
            self.error(
                DiagnosticCode::TemplateDuplicate,
                span,
                format!("template `{name}` is defined more than once"),
            );
            return None;
        }
        self.templates.insert(name.clone(), span);

        let entities = self.parse_entities(directive.children, Scope::Nested);
        if entities.is_empty() {
            self.warning(
                DiagnosticCode::TemplateEmpty,
                span,
                format!("template `{name}` renders nothing"),
            );
        }
        Some(TemplateDefinition {
            name,
            params,
            entities,
            span,
        })
    }

    fn template_inclusion(
        &mut self,
        directive: &RawDirective,
        span: Span,
    ) -> Option<TemplateInclusion> {
        let Some(argument) = &directive.argument else {
            self.error(
                DiagnosticCode::DirectiveMissingArgument,
                directive.name_span,
                "`@include` needs a template name",
            );
            return None;
        };
        let mut parts = args::split_top_level(&argument.text, ',').into_iter();
        let name = parts.next().map(|(_, piece)| piece.trim()).unwrap_or_default();
        if !is_identifier(name) {
            self.error(
                DiagnosticCode::DirectiveInvalidArgument,
                argument.span,
                "a template name must be an identifier",
            );
            return None;
        }
        let args: Vec<Code> = parts
            .filter(|(_, piece)| !piece.trim().is_empty())
            .map(|(_, piece)| Code::new(piece, argument.span))
            .collect();
        let name = SmolStr::from(name);
        self.includes.push((name.clone(), span));
        Some(TemplateInclusion { name, args, span })
    }
}

/// A directive argument, reactive when it starts with `:`.
fn parse_expr(text: &str, span: Span) -> DirectiveExpr {
    let text = text.trim();
    match text.strip_prefix(':') {
        Some(rest) => DirectiveExpr {
            code: Code::new(rest, span),
            reactive: true,
        },
        None => DirectiveExpr {
            code: Code::new(text, span),
            reactive: false,
        },
    }
}

/// Append a text run, merging it into a directly preceding text section.
fn push_text(entities: &mut Vec<Entity>, items: Vec<TextItem>, span: Span) {
    if items.is_empty() {
        return;
    }
    if let Some(Entity::Text(section)) = entities.last_mut() {
        append_item(&mut section.items, TextItem::Static("\n".to_string()));
        for item in items {
            append_item(&mut section.items, item);
        }
        section.span = section.span.merge(span);
        return;
    }
    let mut merged = Vec::with_capacity(items.len());
    for item in items {
        append_item(&mut merged, item);
    }
    entities.push(Entity::Text(TextSection {
        items: merged,
        span,
    }));
}

fn append_item(items: &mut Vec<TextItem>, item: TextItem) {
    if let (Some(TextItem::Static(last)), TextItem::Static(next)) = (items.last_mut(), &item) {
        last.push_str(next);
        return;
    }
    items.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_raw;
    use pretty_assertions::assert_eq;
    use wolf_script::SlotDecl;

    fn build(source: &str, slots: Option<&SlotTable>) -> (Option<Vec<Entity>>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let items = parse_raw(source, 0).unwrap();
        let region = Span::new(0, source.len() as u32);
        let entities = build_template(items, slots, region, &mut diags);
        (entities, diags)
    }

    fn ok(source: &str) -> Vec<Entity> {
        let (entities, diags) = build(source, None);
        assert!(!diags.has_errors(), "{:?}", diags.iter().collect::<Vec<_>>());
        entities.unwrap()
    }

    fn codes(source: &str, slots: Option<&SlotTable>) -> Vec<DiagnosticCode> {
        build(source, slots).1.iter().map(|d| d.code).collect()
    }

    fn slots(decls: &[(&str, bool)]) -> SlotTable {
        decls
            .iter()
            .map(|(name, optional)| {
                (
                    SmolStr::from(*name),
                    SlotDecl {
                        optional: *optional,
                        span: Span::new(100, 110),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_if_chain_is_stitched() {
        let entities = ok("@if(a)\n  p one\n@elseif(:b())\n  p two\n@else\n  p three\np after");
        assert_eq!(entities.len(), 2);
        let Entity::If(block) = &entities[0] else {
            panic!("expected an if block");
        };
        assert_eq!(block.condition.code.text, "a");
        assert!(!block.condition.reactive);
        assert_eq!(block.else_if_branches.len(), 1);
        assert!(block.else_if_branches[0].condition.reactive);
        assert!(block.is_reactive());
        assert!(block.else_branch.is_some());
    }

    #[test]
    fn test_chain_errors() {
        assert_eq!(
            codes("p\n@elseif(a)\n  p", None),
            vec![DiagnosticCode::DirectiveUnpreceded]
        );
        assert_eq!(
            codes("@if(a)\n  p\n@else\n  p\n@elseif(b)\n  p", None),
            vec![DiagnosticCode::DirectiveAfterElse]
        );
        assert_eq!(
            codes("@if\n  p", None),
            vec![DiagnosticCode::DirectiveMissingArgument]
        );
        assert_eq!(
            codes("@if(a)\n  p\n@else(b)\n  p", None),
            vec![DiagnosticCode::DirectiveUnexpectedArgument]
        );
        assert_eq!(
            codes("@repeat(a)\n  p", None),
            vec![DiagnosticCode::DirectiveUnknown]
        );
    }

    #[test]
    fn test_match_and_switch() {
        let entities = ok(
            "@match(kind)\n@when(\"a\", \"b\")\n  p ab\n@default\n  p other\n@switch(:n())\n@case(1)\n  p one\n@fallcase(2)\n  p two\n@falldefault\n  p rest",
        );
        assert_eq!(entities.len(), 2);
        let Entity::Match(block) = &entities[0] else {
            panic!("expected a match block");
        };
        assert_eq!(block.cases[0].patterns.len(), 2);
        assert_eq!(block.cases[0].patterns[1].text, "\"b\"");
        assert!(block.default.is_some());

        let Entity::Switch(block) = &entities[1] else {
            panic!("expected a switch block");
        };
        assert!(block.is_reactive());
        assert_eq!(block.cases.len(), 3);
        assert!(matches!(
            block.cases[1],
            SwitchCase::Case {
                is_fallthrough: true,
                ..
            }
        ));
        assert!(block.has_default());
    }

    #[test]
    fn test_match_errors() {
        assert_eq!(
            codes("@match(x)\n@default\n  p\n@when(1)\n  p", None),
            vec![DiagnosticCode::DirectiveAfterDefault]
        );
        assert_eq!(
            codes("@switch(x)\n@default\n  p\n@falldefault\n  p", None),
            vec![DiagnosticCode::DirectiveDuplicateDefault]
        );
        assert_eq!(
            codes("@match(x)\np", None),
            vec![DiagnosticCode::DirectiveNoCases]
        );
        assert_eq!(
            codes("@if(x)\n  p\n@case(1)\n  p", None),
            vec![DiagnosticCode::DirectiveUnpreceded]
        );
    }

    #[test]
    fn test_each() {
        let entities = ok("ul\n  @each({ id, label }, i of :items())\n    li {{ label }}");
        let Entity::Tag(list) = &entities[0] else {
            panic!("expected a tag");
        };
        let Entity::Each(block) = &list.entities[0] else {
            panic!("expected an each block");
        };
        assert_eq!(block.pattern, "{ id, label }");
        assert_eq!(block.index.as_deref(), Some("i"));
        assert_eq!(block.collection.code.text, "items()");
        assert!(block.collection.reactive);

        assert_eq!(
            codes("@each(item in items)\n  p", None),
            vec![DiagnosticCode::DirectiveInvalidArgument]
        );
    }

    #[test]
    fn test_text_lines_merge() {
        let entities = ok("| Hello\n| {{ name }}!\n| bye");
        assert_eq!(entities.len(), 1);
        let Entity::Text(text) = &entities[0] else {
            panic!("expected text");
        };
        assert_eq!(
            text.items,
            vec![
                TextItem::Static("Hello\n".into()),
                TextItem::Dynamic(Code::new(" name ", Span::new(12, 18))),
                TextItem::Static("!\nbye".into()),
            ]
        );
    }

    #[test]
    fn test_bare_text_lines_are_skipped() {
        assert!(ok("|").is_empty());

        let entities = ok("| one\n|\n| two");
        assert_eq!(entities.len(), 1);
        let Entity::Text(text) = &entities[0] else {
            panic!("expected text");
        };
        assert_eq!(text.items, vec![TextItem::Static("one\ntwo".into())]);
    }

    #[test]
    fn test_element_attributes() {
        let (entities, diags) = build(
            "button#save.primary(type=\"button\", disabled, :title={label()}, @click=save, @click|once={() => log()}, (node)={register})",
            None,
        );
        assert!(diags.is_empty());
        let entities = entities.unwrap();
        let Entity::Tag(tag) = &entities[0] else {
            panic!("expected a tag");
        };
        let attributes = &tag.attributes;
        assert_eq!(attributes.id.as_deref(), Some("save"));
        assert_eq!(attributes.bindings["type"].value, BindingValue::Static("button".into()));
        assert_eq!(attributes.bindings["disabled"].value, BindingValue::Empty);
        assert!(matches!(attributes.bindings["title"].value, BindingValue::Reactive(_)));
        let clicks = &attributes.events["click"];
        assert_eq!(clicks.len(), 2);
        assert!(clicks[0].code.is_bare);
        assert!(clicks[1].has(EventModifier::Once));
        assert_eq!(attributes.receivers.len(), 1);
    }

    #[test]
    fn test_element_errors() {
        assert_eq!(
            codes("p(a=\"1\", a=\"2\")", None),
            vec![DiagnosticCode::AttributeDuplicate]
        );
        assert_eq!(
            codes("p#a(id=\"b\")", None),
            vec![DiagnosticCode::TagDuplicateId]
        );
        assert_eq!(
            codes("p#a#b", None),
            vec![DiagnosticCode::TagDuplicateId]
        );
        assert_eq!(
            codes("br\n  p", None),
            vec![DiagnosticCode::TagLeafChildren]
        );
        assert_eq!(
            codes("p(title|initial={x})", None),
            vec![DiagnosticCode::TagIneffectiveModifier]
        );
        assert_eq!(
            codes("p(@click)", None),
            vec![DiagnosticCode::AttributeMissingValue]
        );
        assert_eq!(
            codes("p(@click=\"go\")", None),
            vec![DiagnosticCode::AttributeExpectedCode]
        );
        assert_eq!(
            codes("p((self)={f})", None),
            vec![DiagnosticCode::AttributeUnknownReceiver]
        );
    }

    #[test]
    fn test_modifier_warnings() {
        let (entities, diags) = build("p(@click|once|once|later={f}, :a|initial={b})", None);
        assert!(entities.is_some());
        let found: Vec<_> = diags.iter().map(|d| d.code).collect();
        assert_eq!(
            found,
            vec![
                DiagnosticCode::AttributeDuplicateModifier,
                DiagnosticCode::AttributeExtraneousModifier,
                DiagnosticCode::AttributeExtraneousModifier,
            ]
        );
    }

    #[test]
    fn test_sync_dispatch() {
        let entities = ok(
            "input(!sync={name})\ninput(type=\"checkbox\", !sync={done})\ninput(type=\"radio\", value=\"a\", !sync={pick})\ntextarea(!sync={body})\nselect(multiple, !sync={tags})",
        );
        assert!(matches!(entities[0], Entity::SyncedTextInput(_)));
        assert!(matches!(entities[1], Entity::SyncedCheckboxInput(_)));
        assert!(matches!(entities[2], Entity::SyncedRadioInput(_)));
        assert!(matches!(entities[3], Entity::SyncedTextInput(_)));
        let Entity::SyncedSelect(select) = &entities[4] else {
            panic!("expected a synced select");
        };
        assert!(select.multiple);
    }

    #[test]
    fn test_sync_legality() {
        let cases = [
            ("div(!sync={x})", DiagnosticCode::SyncUnsupportedTag),
            ("input(type=\"date\", !sync={x})", DiagnosticCode::SyncUnsupportedType),
            ("input(type={t}, !sync={x})", DiagnosticCode::SyncDynamicType),
            ("input(!sync={x}, !sync={y})", DiagnosticCode::SyncMultiple),
            ("input(!value={x})", DiagnosticCode::SyncUnknownName),
            ("input(!sync|initial={x})", DiagnosticCode::SyncModifier),
            ("input(:value={v()}, !sync={x})", DiagnosticCode::SyncReactiveTarget),
            (
                "input(type=\"checkbox\", :checked={c()}, !sync={x})",
                DiagnosticCode::SyncReactiveTarget,
            ),
            (
                "input(type=\"radio\", :value={v()}, !sync={x})",
                DiagnosticCode::SyncReactiveTarget,
            ),
            ("select(:multiple={m()}, !sync={x})", DiagnosticCode::SyncDynamicMultiple),
        ];
        for (source, code) in cases {
            let (entities, diags) = build(source, None);
            assert!(entities.is_none(), "{source}");
            assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![code], "{source}");
        }
    }

    #[test]
    fn test_component_inclusion() {
        let entities = ok(
            "Card(title=\"Hi\", :count={n()}, !open={open}, @close=onClose)\n  p default content\n  @insert(footer)\n    p footer",
        );
        let Entity::Component(card) = &entities[0] else {
            panic!("expected a component");
        };
        assert_eq!(card.name, "Card");
        assert_eq!(card.props.len(), 2);
        assert_eq!(card.syncs.len(), 1);
        assert_eq!(card.events["close"].len(), 1);
        let names: Vec<&str> = card.slot_insertions.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["footer", "def"]);
    }

    #[test]
    fn test_component_errors() {
        assert_eq!(
            codes("Card(a=\"1\", !a={b})", None),
            vec![DiagnosticCode::ComponentAttributeConflict]
        );
        assert_eq!(
            codes("Card(a=\"1\", a=\"2\")", None),
            vec![DiagnosticCode::ComponentDuplicateAttribute]
        );
        assert_eq!(
            codes("Card.big", None),
            vec![DiagnosticCode::ComponentMeta]
        );
        assert_eq!(
            codes("Card((node)={f})", None),
            vec![DiagnosticCode::ComponentReceiver]
        );
        assert_eq!(
            codes("Card(@close|prevent={f})", None),
            vec![DiagnosticCode::AttributeExtraneousModifier]
        );
        assert_eq!(
            codes("Card\n  p\n  @insert\n    p", None),
            vec![DiagnosticCode::SlotDefaultConflict]
        );
        assert_eq!(
            codes("Card\n  @insert(a)\n    p\n  @insert(a)\n    p", None),
            vec![DiagnosticCode::SlotDuplicateInsertion]
        );
        assert_eq!(
            codes("div\n  @insert(a)\n    p", None),
            vec![DiagnosticCode::SlotInsertOutsideComponent]
        );
    }

    #[test]
    fn test_slot_rules() {
        let table = slots(&[("def", false), ("footer", true)]);
        let entities = build("div\n  @slot\n  @slot(footer)\n    p fallback", Some(&table))
            .0
            .unwrap();
        let Entity::Tag(div) = &entities[0] else {
            panic!("expected a tag");
        };
        assert!(matches!(&div.entities[1], Entity::SlotUsage(usage) if usage.fallback.is_some()));

        assert_eq!(
            codes("@slot(footer)", Some(&table)),
            vec![DiagnosticCode::SlotRequiredUnused]
        );
        assert_eq!(
            codes("@slot\n  p\n@slot(footer)", Some(&table)),
            vec![DiagnosticCode::SlotRequiredFallback]
        );
        assert_eq!(
            codes("@slot\n@slot(header)", Some(&table)),
            vec![DiagnosticCode::SlotUnknown]
        );
        assert_eq!(codes("@slot", None), vec![DiagnosticCode::SlotNoSection]);
        assert_eq!(
            codes("@slot(\"x\")", Some(&table)),
            vec![DiagnosticCode::SlotInvalidName, DiagnosticCode::SlotRequiredUnused]
        );
    }

    #[test]
    fn test_templates() {
        let entities = ok("@template(row, label, value)\n  p {{ label }}: {{ value }}\n@include(row, \"a\", f(1, 2))");
        let Entity::TemplateDefinition(definition) = &entities[0] else {
            panic!("expected a template");
        };
        assert_eq!(definition.params, vec!["label", "value"]);
        let Entity::TemplateInclusion(inclusion) = &entities[1] else {
            panic!("expected an include");
        };
        assert_eq!(inclusion.args.len(), 2);
        assert_eq!(inclusion.args[1].text, "f(1, 2)");

        assert_eq!(
            codes("@include(missing)", None),
            vec![DiagnosticCode::TemplateUnknown]
        );
        assert_eq!(
            codes("div\n  @template(a)\n    p", None),
            vec![DiagnosticCode::TemplateNotTopLevel]
        );
        assert_eq!(
            codes("@template(a)\n  p\n@template(a)\n  p", None),
            vec![DiagnosticCode::TemplateDuplicate]
        );
    }

    #[test]
    fn test_empty_template_warns() {
        let (entities, diags) = build("// nothing here\n", None);
        assert_eq!(entities, Some(Vec::new()));
        assert_eq!(diags.warning_count(), 1);
        assert!(diags.contains(DiagnosticCode::TemplateEmpty));
    }
}
