use super::{Builder, Scope};
use crate::ast::*;
use crate::raw::{RawElement, RawMeta};
use wolf_diagnostics::{Diagnostic, DiagnosticCode};
use wolf_source::Span;

/// Elements that cannot have content.
const LEAF_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// How a synced element is kept in step with its signal.
enum SyncKind {
    Text,
    Checkbox,
    Radio,
    Select,
}

impl Builder<'_> {
    pub(super) fn parse_html(&mut self, element: RawElement, span: Span) -> Option<Entity> {
        let RawElement {
            name,
            metas,
            attributes: raw_attributes,
            children,
        } = element;

        let mut attributes = TagAttributes::default();
        let mut failed = false;
        for meta in metas {
            match meta {
                RawMeta::Id(id, meta_span) => {
                    if attributes.id.is_some() {
                        self.error(
                            DiagnosticCode::TagDuplicateId,
                            meta_span,
                            "an element has at most one `#id`",
                        );
                        failed = true;
                    } else {
                        attributes.id = Some(id);
                    }
                }
                RawMeta::Class(class, _) => attributes.classes.push(class),
            }
        }

        let mut syncs = Vec::new();
        for raw in raw_attributes {
            let Some(attribute) = self.parse_attribute(raw) else {
                failed = true;
                continue;
            };
            match attribute {
                Attribute::Binding(binding) => {
                    if binding.name == "id" && attributes.id.is_some() {
                        self.error(
                            DiagnosticCode::TagDuplicateId,
                            binding.span,
                            "`id` is already set by a `#id` meta",
                        );
                        failed = true;
                        continue;
                    }
                    if attributes.bindings.contains_key(&binding.name) {
                        self.error(
                            DiagnosticCode::AttributeDuplicate,
                            binding.span,
                            format!("attribute `{}` is set more than once", binding.name),
                        );
                        failed = true;
                        continue;
                    }
                    if let BindingValue::Dynamic { initial: true, .. } = binding.value {
                        self.warning(
                            DiagnosticCode::TagIneffectiveModifier,
                            binding.span,
                            "`initial` has no effect on an element attribute",
                        );
                    }
                    attributes.bindings.insert(binding.name.clone(), binding);
                }
                Attribute::Event(event) => {
                    attributes
                        .events
                        .entry(event.name.clone())
                        .or_default()
                        .push(event);
                }
                Attribute::Sync(sync) => syncs.push(sync),
                Attribute::Receiver(receiver) => attributes.receivers.push(receiver),
            }
        }

        let entities = self.parse_entities(children, Scope::Nested);
        if !entities.is_empty() && LEAF_TAGS.contains(&name.as_str()) {
            self.warning(
                DiagnosticCode::TagLeafChildren,
                span,
                format!("`{name}` cannot have children; they will be ignored by the browser"),
            );
        }

        let tag = Tag {
            ident: name,
            attributes,
            entities,
            span,
        };

        if syncs.is_empty() {
            return (!failed).then_some(Entity::Tag(tag));
        }
        let entity = self.synced(tag, syncs)?;
        (!failed).then_some(entity)
    }

    /// Turn a tag with `!` attributes into a synced entity.
    fn synced(&mut self, tag: Tag, mut syncs: Vec<SyncAttribute>) -> Option<Entity> {
        if syncs.len() > 1 {
            for extra in &syncs[1..] {
                self.error(
                    DiagnosticCode::SyncMultiple,
                    extra.span,
                    "an element has at most one `!sync`",
                );
            }
            return None;
        }
        let sync = syncs.pop()?;
        if sync.name != "sync" {
            self.diags.push(
                Diagnostic::error(
                    DiagnosticCode::SyncUnknownName,
                    sync.span,
                    format!("`!{}` is not supported on elements", sync.name),
                )
                .with_paragraph("elements only accept `!sync`"),
            );
            return None;
        }
        if sync.initial {
            self.error(
                DiagnosticCode::SyncModifier,
                sync.span,
                "`!sync` on an element takes no modifiers",
            );
            return None;
        }

        let kind = self.sync_kind(&tag, &sync)?;
        let bindings = &tag.attributes.bindings;
        let conflict = match kind {
            SyncKind::Text | SyncKind::Select => bindings
                .get("value")
                .filter(|b| !b.value.is_inert())
                .map(|b| (b.span, "a reactive `value` conflicts with `!sync`")),
            SyncKind::Checkbox => bindings
                .get("checked")
                .filter(|b| !b.value.is_inert())
                .map(|b| (b.span, "a reactive `checked` conflicts with `!sync`")),
            SyncKind::Radio => bindings
                .get("value")
                .filter(|b| !b.value.is_inert())
                .map(|b| (b.span, "a synced radio needs an inert `value`")),
        };
        if let Some((span, message)) = conflict {
            self.error(DiagnosticCode::SyncReactiveTarget, span, message);
            return None;
        }

        let entity = match kind {
            SyncKind::Text => Entity::SyncedTextInput(Synced { tag, sync }),
            SyncKind::Checkbox => Entity::SyncedCheckboxInput(Synced { tag, sync }),
            SyncKind::Radio => Entity::SyncedRadioInput(Synced { tag, sync }),
            SyncKind::Select => {
                let multiple = self.select_multiple(&tag)?;
                Entity::SyncedSelect(SyncedSelect {
                    synced: Synced { tag, sync },
                    multiple,
                })
            }
        };
        Some(entity)
    }

    fn sync_kind(&mut self, tag: &Tag, sync: &SyncAttribute) -> Option<SyncKind> {
        match tag.ident.as_str() {
            "textarea" => Some(SyncKind::Text),
            "select" => Some(SyncKind::Select),
            "input" => {
                let Some(binding) = tag.attributes.bindings.get("type") else {
                    return Some(SyncKind::Text);
                };
                match &binding.value {
                    BindingValue::Static(ty) if ty == "text" => Some(SyncKind::Text),
                    BindingValue::Static(ty) if ty == "checkbox" => Some(SyncKind::Checkbox),
                    BindingValue::Static(ty) if ty == "radio" => Some(SyncKind::Radio),
                    BindingValue::Static(ty) => {
                        self.diags.push(
                            Diagnostic::error(
                                DiagnosticCode::SyncUnsupportedType,
                                binding.span,
                                format!("`!sync` is not supported on `input type=\"{ty}\"`"),
                            )
                            .with_paragraph("supported types are `text`, `checkbox` and `radio`"),
                        );
                        None
                    }
                    BindingValue::Empty => {
                        self.error(
                            DiagnosticCode::SyncUnsupportedType,
                            binding.span,
                            "`type` needs a value on a synced input",
                        );
                        None
                    }
                    BindingValue::Dynamic { .. } | BindingValue::Reactive(_) => {
                        self.error(
                            DiagnosticCode::SyncDynamicType,
                            binding.span,
                            "the `type` of a synced input must be a string literal",
                        );
                        None
                    }
                }
            }
            other => {
                self.error(
                    DiagnosticCode::SyncUnsupportedTag,
                    sync.span,
                    format!("`!sync` is not supported on `{other}`"),
                );
                None
            }
        }
    }

    fn select_multiple(&mut self, tag: &Tag) -> Option<bool> {
        match tag.attributes.bindings.get("multiple") {
            None => Some(false),
            Some(binding) => match binding.value {
                BindingValue::Empty | BindingValue::Static(_) => Some(true),
                _ => {
                    self.error(
                        DiagnosticCode::SyncDynamicMultiple,
                        binding.span,
                        "`multiple` on a synced select must be static",
                    );
                    None
                }
            },
        }
    }
}
