//! Lowering of template entities into DOM construction statements.
//!
//! Every entity is lowered against a [`Parent`]. Temporaries are named after
//! the `_`-joined index path of their node so output is stable across runs.
//! A list whose parent is a real element gets a document fragment when it
//! has two or more children; a single child of an element is *lone* and may
//! write to the element directly.

use crate::context::{CodegenContext, Parent};
use crate::error::CodegenError;
use crate::helpers::{callee, property_key, runtime, string_literal, text_expression};
use wolf_template::ast::*;

type Result<T> = std::result::Result<T, CodegenError>;

/// How a synced element talks to its signal.
enum SyncBinding<'a> {
    /// `bindProperty(el, prop, event, signal)`
    Property {
        prop: &'static str,
        event: &'static str,
        signal: &'a Code,
    },
    Radio(&'a Code),
    MultipleSelect(&'a Code),
}

/// Lower the top level of a component body.
pub fn generate_template(ctx: &mut CodegenContext<'_>, entities: &[Entity]) -> Result<()> {
    for (i, entity) in entities.iter().enumerate() {
        if let Entity::TemplateDefinition(definition) = entity {
            template_definition(ctx, definition, &i.to_string())?;
        }
    }
    lower_list(ctx, entities, "", &Parent::scope())
}

fn child_path(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        index.to_string()
    } else {
        format!("{prefix}_{index}")
    }
}

fn lower_list(
    ctx: &mut CodegenContext<'_>,
    entities: &[Entity],
    prefix: &str,
    parent: &Parent,
) -> Result<()> {
    let rendered: Vec<(usize, &Entity)> = entities
        .iter()
        .enumerate()
        .filter(|(_, entity)| !matches!(entity, Entity::TemplateDefinition(_)))
        .collect();

    if parent.is_real() && rendered.len() >= 2 {
        let fragment = format!("___f{prefix}");
        ctx.writer.line(format!(
            "const {fragment} = document.createDocumentFragment();"
        ));
        let inner = Parent {
            real: parent.real.clone(),
            node: fragment.clone(),
            lone: false,
        };
        for (i, entity) in rendered {
            lower_entity(ctx, entity, &child_path(prefix, i), &inner)?;
        }
        ctx.writer
            .line(format!("{}.appendChild({fragment});", parent.real));
        return Ok(());
    }

    let inner = if rendered.len() == 1 {
        parent.clone()
    } else {
        parent.not_lone()
    };
    for (i, entity) in rendered {
        lower_entity(ctx, entity, &child_path(prefix, i), &inner)?;
    }
    Ok(())
}

fn lower_entity(
    ctx: &mut CodegenContext<'_>,
    entity: &Entity,
    path: &str,
    parent: &Parent,
) -> Result<()> {
    match entity {
        Entity::Tag(tag) => tag_element(ctx, tag, path, parent, None),
        Entity::Text(text) => text_section(ctx, text, path, parent),
        Entity::Component(inclusion) => component_inclusion(ctx, inclusion, path, parent),
        Entity::If(block) => {
            if block.is_reactive() {
                reactive_region(ctx, parent, |ctx, inner| if_chain(ctx, block, path, inner))
            } else {
                if_chain(ctx, block, path, parent)
            }
        }
        Entity::Each(block) => {
            if block.collection.reactive {
                reactive_region(ctx, parent, |ctx, inner| each_loop(ctx, block, path, inner))
            } else {
                each_loop(ctx, block, path, &parent.not_lone())
            }
        }
        Entity::Match(block) => {
            if block.value.reactive {
                reactive_region(ctx, parent, |ctx, inner| match_block(ctx, block, path, inner))
            } else {
                match_block(ctx, block, path, parent)
            }
        }
        Entity::Switch(block) => {
            if block.is_reactive() {
                reactive_region(ctx, parent, |ctx, inner| switch_block(ctx, block, path, inner))
            } else {
                switch_block(ctx, block, path, parent)
            }
        }
        Entity::SlotUsage(usage) => slot_usage(ctx, usage, path, parent),
        Entity::SlotInsertion(insertion) => Err(CodegenError::MisplacedInsertion {
            span: insertion.span,
        }),
        // Hoisted by `generate_template`.
        Entity::TemplateDefinition(_) => Ok(()),
        Entity::TemplateInclusion(inclusion) => {
            let mut args = vec![parent.real.clone(), parent.node.clone()];
            args.extend(inclusion.args.iter().map(|arg| arg.text.clone()));
            ctx.writer.line(format!(
                "___template_{}({});",
                inclusion.name,
                args.join(", ")
            ));
            Ok(())
        }
        Entity::SyncedTextInput(synced) => {
            let binding = SyncBinding::Property {
                prop: "value",
                event: "input",
                signal: &synced.sync.code,
            };
            tag_element(ctx, &synced.tag, path, parent, Some(binding))
        }
        Entity::SyncedCheckboxInput(synced) => {
            let binding = SyncBinding::Property {
                prop: "checked",
                event: "change",
                signal: &synced.sync.code,
            };
            tag_element(ctx, &synced.tag, path, parent, Some(binding))
        }
        Entity::SyncedRadioInput(synced) => {
            let binding = SyncBinding::Radio(&synced.sync.code);
            tag_element(ctx, &synced.tag, path, parent, Some(binding))
        }
        Entity::SyncedSelect(select) => {
            let signal = &select.synced.sync.code;
            let binding = if select.multiple {
                SyncBinding::MultipleSelect(signal)
            } else {
                SyncBinding::Property {
                    prop: "value",
                    event: "change",
                    signal,
                }
            };
            tag_element(ctx, &select.synced.tag, path, parent, Some(binding))
        }
    }
}

/// Wrap a construct that rebuilds its content whenever a dependency changes.
fn reactive_region<F>(ctx: &mut CodegenContext<'_>, parent: &Parent, body: F) -> Result<()>
where
    F: FnOnce(&mut CodegenContext<'_>, &Parent) -> Result<()>,
{
    if parent.lone {
        let helper = ctx.runtime(runtime::CONTENT_EFFECT);
        ctx.writer.open(format!(
            "{helper}({}, (___realParent, ___parent) => {{",
            parent.real
        ));
    } else {
        let helper = ctx.runtime(runtime::RANGE_EFFECT);
        ctx.writer.open(format!(
            "{helper}({}, {}, (___realParent, ___parent) => {{",
            parent.real, parent.node
        ));
    }
    body(ctx, &Parent::scope())?;
    ctx.writer.close("});");
    Ok(())
}

/// Wrap one statement in an effect.
fn effect_line(ctx: &mut CodegenContext<'_>, statement: String) {
    let effect = ctx.runtime(runtime::EFFECT);
    ctx.writer.open(format!("{effect}(() => {{"));
    ctx.writer.line(statement);
    ctx.writer.close("});");
}

fn tag_element(
    ctx: &mut CodegenContext<'_>,
    tag: &Tag,
    path: &str,
    parent: &Parent,
    sync: Option<SyncBinding<'_>>,
) -> Result<()> {
    let var = format!("___e{path}");
    let creation = create_element(ctx, tag);
    ctx.writer.line(format!("const {var} = {creation};"));

    let attributes = &tag.attributes;
    if let Some(id) = &attributes.id {
        ctx.writer
            .line(format!("{var}.id = {};", string_literal(id)));
    }
    for binding in attributes.bindings.values() {
        element_binding(ctx, &var, binding);
    }
    for (name, handlers) in &attributes.events {
        let listener = event_handler(handlers);
        let options = listener_options(handlers);
        ctx.writer.line(format!(
            "{var}.addEventListener({}, {listener}{options});",
            string_literal(name)
        ));
    }

    lower_list(ctx, &tag.entities, path, &Parent::element(&var))?;

    if let Some(sync) = sync {
        sync_binding(ctx, &var, sync);
    }
    for receiver in &attributes.receivers {
        ctx.writer
            .line(format!("{}({var});", callee(&receiver.code)));
    }
    ctx.writer
        .line(format!("{}.appendChild({var});", parent.node));
    Ok(())
}

/// Element creation call, chosen by the liveness of the class metas.
fn create_element(ctx: &mut CodegenContext<'_>, tag: &Tag) -> String {
    let ident = string_literal(&tag.ident);
    let classes = &tag.attributes.classes;
    if classes.is_empty() {
        let helper = ctx.runtime(runtime::CREATE_ELEMENT);
        return format!("{helper}({ident})");
    }

    let fragments: Vec<String> = classes
        .iter()
        .map(|class| match class {
            ClassMeta::Static(name) => string_literal(name),
            ClassMeta::Dynamic(code) | ClassMeta::Reactive(code) => code.text.clone(),
        })
        .collect();

    match tag.attributes.class_liveness() {
        Liveness::Static => {
            let names: Vec<&str> = classes
                .iter()
                .filter_map(|class| match class {
                    ClassMeta::Static(name) => Some(name.as_str()),
                    _ => None,
                })
                .collect();
            let helper = ctx.runtime(runtime::CREATE_ELEMENT_CLASS);
            format!("{helper}({ident}, {})", string_literal(&names.join(" ")))
        }
        Liveness::Dynamic => {
            let helper = ctx.runtime(runtime::CREATE_ELEMENT_CLASSES);
            format!("{helper}({ident}, [{}])", fragments.join(", "))
        }
        Liveness::Reactive => {
            let helper = ctx.runtime(runtime::CREATE_ELEMENT_REACTIVE_CLASSES);
            format!("{helper}({ident}, () => [{}])", fragments.join(", "))
        }
    }
}

fn element_binding(ctx: &mut CodegenContext<'_>, var: &str, binding: &BindingAttribute) {
    let as_attribute = binding.name.contains('-');
    let value = match &binding.value {
        BindingValue::Empty if as_attribute => "\"\"".to_string(),
        BindingValue::Empty => "true".to_string(),
        BindingValue::Static(value) => string_literal(value),
        BindingValue::Dynamic { code, .. } | BindingValue::Reactive(code) => code.text.clone(),
    };
    let statement = if as_attribute {
        format!(
            "{var}.setAttribute({}, {value});",
            string_literal(&binding.name)
        )
    } else {
        format!("{var}.{} = {value};", binding.name)
    };

    if binding.value.liveness() == Liveness::Reactive {
        effect_line(ctx, statement);
    } else {
        ctx.writer.line(statement);
    }
}

/// Listener for one event, folding several handlers into one dispatcher.
fn event_handler(handlers: &[EventAttribute]) -> String {
    if let [handler] = handlers {
        if !handler.has(EventModifier::Prevent) && !handler.has(EventModifier::Stop) {
            return if handler.code.is_bare || handler.has(EventModifier::Handler) {
                handler.code.text.clone()
            } else {
                format!("$event => {}", handler.code.text)
            };
        }
    }

    let mut statements = Vec::new();
    for handler in handlers {
        if handler.has(EventModifier::Prevent) {
            statements.push("$event.preventDefault();".to_string());
        }
        if handler.has(EventModifier::Stop) {
            statements.push("$event.stopPropagation();".to_string());
        }
        statements.push(if handler.code.is_bare || handler.has(EventModifier::Handler) {
            format!("{}($event);", callee(&handler.code))
        } else {
            format!("{};", handler.code.text)
        });
    }
    format!("$event => {{ {} }}", statements.join(" "))
}

/// `addEventListener` options, the union over all handlers.
fn listener_options(handlers: &[EventAttribute]) -> String {
    let options: Vec<String> = [
        (EventModifier::Once, "once"),
        (EventModifier::Capture, "capture"),
        (EventModifier::Passive, "passive"),
    ]
    .into_iter()
    .filter(|(modifier, _)| handlers.iter().any(|h| h.has(*modifier)))
    .map(|(_, name)| format!("{name}: true"))
    .collect();

    if options.is_empty() {
        String::new()
    } else {
        format!(", {{ {} }}", options.join(", "))
    }
}

fn sync_binding(ctx: &mut CodegenContext<'_>, var: &str, sync: SyncBinding<'_>) {
    match sync {
        SyncBinding::Property {
            prop,
            event,
            signal,
        } => {
            let bind = ctx.runtime(runtime::BIND_PROPERTY);
            ctx.writer.line(format!(
                "{bind}({var}, {}, {}, {});",
                string_literal(prop),
                string_literal(event),
                signal.text
            ));
        }
        SyncBinding::Radio(signal) => {
            let signal = callee(signal);
            effect_line(
                ctx,
                format!("{var}.checked = {signal}() === {var}.value;"),
            );
            ctx.writer.line(format!(
                "{var}.addEventListener(\"change\", () => {{ if ({var}.checked) {signal}.set({var}.value); }});"
            ));
        }
        SyncBinding::MultipleSelect(signal) => {
            let signal = callee(signal);
            let effect = ctx.runtime(runtime::EFFECT);
            ctx.writer.open(format!("{effect}(() => {{"));
            ctx.writer.line(format!("const ___selected = {signal}();"));
            ctx.writer
                .open(format!("for (const ___option of Array.from({var}.options)) {{"));
            ctx.writer
                .line("___option.selected = ___selected.includes(___option.value);");
            ctx.writer.close("}");
            ctx.writer.close("});");
            ctx.writer.line(format!(
                "{var}.addEventListener(\"change\", () => {signal}.set(Array.from({var}.selectedOptions, ___option => ___option.value)));"
            ));
        }
    }
}

fn text_section(
    ctx: &mut CodegenContext<'_>,
    text: &TextSection,
    path: &str,
    parent: &Parent,
) -> Result<()> {
    let value = text_expression(&text.items);
    let reactive = text.liveness() == Liveness::Reactive;

    if parent.lone && parent.is_real() {
        let statement = format!("{}.textContent = {value};", parent.real);
        if reactive {
            effect_line(ctx, statement);
        } else {
            ctx.writer.line(statement);
        }
        return Ok(());
    }

    let create = ctx.runtime(runtime::CREATE_TEXT_NODE);
    if reactive {
        let var = format!("___t{path}");
        ctx.writer.line(format!("const {var} = {create}(\"\");"));
        effect_line(ctx, format!("{var}.data = {value};"));
        ctx.writer
            .line(format!("{}.appendChild({var});", parent.node));
    } else {
        ctx.writer.line(format!(
            "{}.appendChild({create}({value}));",
            parent.node
        ));
    }
    Ok(())
}

fn if_chain(ctx: &mut CodegenContext<'_>, block: &IfBlock, path: &str, parent: &Parent) -> Result<()> {
    ctx.writer
        .open(format!("if ({}) {{", block.condition.code.text));
    lower_list(ctx, &block.entities, &format!("{path}_0"), parent)?;

    for (i, branch) in block.else_if_branches.iter().enumerate() {
        ctx.writer
            .close(format!("}} else if ({}) {{", branch.condition.code.text));
        ctx.writer.indent();
        lower_list(ctx, &branch.entities, &format!("{path}_{}", i + 1), parent)?;
    }

    if let Some(entities) = &block.else_branch {
        ctx.writer.close("} else {");
        ctx.writer.indent();
        let index = block.else_if_branches.len() + 1;
        lower_list(ctx, entities, &format!("{path}_{index}"), parent)?;
    }
    ctx.writer.close("}");
    Ok(())
}

fn each_loop(ctx: &mut CodegenContext<'_>, block: &EachBlock, path: &str, parent: &Parent) -> Result<()> {
    let collection = &block.collection.code.text;
    let header = match &block.index {
        Some(index) => format!(
            "for (const [{index}, {}] of Array.from({collection}).entries()) {{",
            block.pattern
        ),
        None => format!("for (const {} of {collection}) {{", block.pattern),
    };
    ctx.writer.open(header);
    lower_list(ctx, &block.entities, path, &parent.not_lone())?;
    ctx.writer.close("}");
    Ok(())
}

fn match_block(
    ctx: &mut CodegenContext<'_>,
    block: &MatchBlock,
    path: &str,
    parent: &Parent,
) -> Result<()> {
    let subject = format!("___m{path}");
    ctx.writer
        .line(format!("const {subject} = {};", block.value.code.text));
    ctx.writer.open(format!("switch ({subject}) {{"));

    for (i, case) in block.cases.iter().enumerate() {
        let Some((last, rest)) = case.patterns.split_last() else {
            continue;
        };
        for pattern in rest {
            ctx.writer.line(format!("case {}:", pattern.text));
        }
        ctx.writer.open(format!("case {}: {{", last.text));
        lower_list(ctx, &case.entities, &format!("{path}_{i}"), parent)?;
        ctx.writer.line("break;");
        ctx.writer.close("}");
    }

    ctx.writer.open("default: {");
    match &block.default {
        Some(entities) => {
            let index = block.cases.len();
            lower_list(ctx, entities, &format!("{path}_{index}"), parent)?;
            ctx.writer.line("break;");
        }
        None => {
            let exhaustive = ctx.runtime(runtime::EXHAUSTIVE);
            ctx.writer.line(format!("{exhaustive}({subject});"));
        }
    }
    ctx.writer.close("}");
    ctx.writer.close("}");
    Ok(())
}

fn switch_block(ctx: &mut CodegenContext<'_>, block: &SwitchBlock, path: &str, parent: &Parent) -> Result<()> {
    let defaults: Vec<&SwitchCase> = block
        .cases
        .iter()
        .filter(|case| matches!(case, SwitchCase::Default { .. }))
        .collect();
    if let [_, second, ..] = defaults.as_slice() {
        return Err(CodegenError::DuplicateDefault {
            span: second.span(),
        });
    }

    let subject = format!("___m{path}");
    ctx.writer
        .line(format!("const {subject} = {};", block.value.code.text));
    ctx.writer.open(format!("switch ({subject}) {{"));

    // A case reached by fallthrough appends to what the previous case rendered.
    let falls_through = block.cases.iter().any(SwitchCase::is_fallthrough);
    let parent = &if falls_through {
        parent.not_lone()
    } else {
        parent.clone()
    };
    let last = block.cases.len().saturating_sub(1);

    for (i, case) in block.cases.iter().enumerate() {
        let (entities, is_fallthrough) = match case {
            SwitchCase::Case {
                value,
                entities,
                is_fallthrough,
                ..
            } => {
                ctx.writer.open(format!("case {}: {{", value.code.text));
                (entities, *is_fallthrough)
            }
            SwitchCase::Default {
                entities,
                is_fallthrough,
                ..
            } => {
                ctx.writer.open("default: {");
                (entities, *is_fallthrough)
            }
        };
        lower_list(ctx, entities, &format!("{path}_{i}"), parent)?;
        // The synthesized default only guards unmatched values.
        if !is_fallthrough || (i == last && defaults.is_empty()) {
            ctx.writer.line("break;");
        }
        ctx.writer.close("}");
    }

    if defaults.is_empty() {
        let exhaustive = ctx.runtime(runtime::EXHAUSTIVE);
        ctx.writer.open("default: {");
        ctx.writer.line(format!("{exhaustive}({subject});"));
        ctx.writer.close("}");
    }
    ctx.writer.close("}");
    Ok(())
}

fn slot_usage(ctx: &mut CodegenContext<'_>, usage: &SlotUsage, path: &str, parent: &Parent) -> Result<()> {
    let Some(&optional) = ctx.slots.get(&usage.name) else {
        return Err(CodegenError::UnknownSlot {
            name: usage.name.clone(),
            span: usage.span,
        });
    };
    let slot = format!("$slots.{}", usage.name);
    let args = format!("{}, {}", parent.real, parent.node);

    if !optional {
        if usage.fallback.is_some() {
            return Err(CodegenError::RequiredSlotFallback {
                name: usage.name.clone(),
                span: usage.span,
            });
        }
        ctx.writer.line(format!("{slot}({args});"));
        return Ok(());
    }

    match &usage.fallback {
        None => {
            let noop = ctx.runtime(runtime::NOOP);
            ctx.writer.line(format!("({slot} ?? {noop})({args});"));
        }
        Some(fallback) => {
            ctx.writer
                .open(format!("({slot} ?? ((___realParent, ___parent) => {{"));
            lower_list(ctx, fallback, path, &Parent::scope())?;
            ctx.writer.close(format!("}}))({args});"));
        }
    }
    Ok(())
}

fn component_inclusion(
    ctx: &mut CodegenContext<'_>,
    inclusion: &ComponentInclusion,
    path: &str,
    parent: &Parent,
) -> Result<()> {
    let props: Vec<(String, String)> = inclusion
        .props
        .iter()
        .map(|(name, binding)| (property_key(name), prop_value(ctx, &binding.value)))
        .collect();
    let syncs: Vec<(String, String)> = inclusion
        .syncs
        .iter()
        .map(|(name, sync)| {
            let value = if sync.initial {
                let fake = ctx.runtime(runtime::FAKE_MUTABLE);
                format!("{fake}({})", sync.code.text)
            } else {
                sync.code.text.clone()
            };
            (property_key(name), value)
        })
        .collect();
    let events: Vec<(String, String)> = inclusion
        .events
        .iter()
        .map(|(name, handlers)| (property_key(name), event_handler(handlers)))
        .collect();

    let props = object_literal(ctx, &props);
    let syncs = object_literal(ctx, &syncs);
    let events = object_literal(ctx, &events);
    let head = format!(
        "{}({}, {}, {props}, {syncs}, {events}",
        inclusion.name, parent.real, parent.node,
    );

    if inclusion.slot_insertions.is_empty() {
        let empty = ctx.runtime(runtime::EMPTY_OBJECT);
        ctx.writer.line(format!("{head}, {empty});"));
        return Ok(());
    }

    ctx.writer.open(format!("{head}, {{"));
    for (i, (name, insertion)) in inclusion.slot_insertions.iter().enumerate() {
        ctx.writer.open(format!(
            "{}: (___realParent, ___parent) => {{",
            property_key(name)
        ));
        lower_list(
            ctx,
            &insertion.entities,
            &format!("{path}_{i}"),
            &Parent::scope(),
        )?;
        ctx.writer.close("},");
    }
    ctx.writer.close("});");
    Ok(())
}

fn prop_value(ctx: &mut CodegenContext<'_>, value: &BindingValue) -> String {
    match value {
        BindingValue::Empty => {
            let fake = ctx.runtime(runtime::FAKE_INITIAL);
            format!("{fake}(true)")
        }
        BindingValue::Static(text) => {
            let fake = ctx.runtime(runtime::FAKE_INITIAL);
            format!("{fake}({})", string_literal(text))
        }
        BindingValue::Dynamic {
            code,
            initial: false,
        } => code.text.clone(),
        BindingValue::Dynamic {
            code,
            initial: true,
        } => {
            let fake = ctx.runtime(runtime::FAKE_INITIAL);
            format!("{fake}({})", code.text)
        }
        BindingValue::Reactive(code) => {
            let fake = ctx.runtime(runtime::FAKE_IMMUTABLE);
            format!("{fake}(() => {})", code.text)
        }
    }
}

/// `{ key: value, ... }`, or the shared empty object.
fn object_literal(ctx: &mut CodegenContext<'_>, entries: &[(String, String)]) -> String {
    if entries.is_empty() {
        return ctx.runtime(runtime::EMPTY_OBJECT).to_string();
    }
    let fields: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect();
    format!("{{ {} }}", fields.join(", "))
}

fn template_definition(
    ctx: &mut CodegenContext<'_>,
    definition: &TemplateDefinition,
    path: &str,
) -> Result<()> {
    let mut params = vec!["___realParent: Node".to_string(), "___parent: Node".to_string()];
    params.extend(definition.params.iter().cloned());
    ctx.writer.open(format!(
        "function ___template_{}({}) {{",
        definition.name,
        params.join(", ")
    ));
    lower_list(ctx, &definition.entities, path, &Parent::scope())?;
    ctx.writer.close("}");
    Ok(())
}
