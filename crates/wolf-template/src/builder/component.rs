use super::{Builder, Scope};
use crate::ast::*;
use crate::raw::{RawElement, Sigil};
use indexmap::IndexMap;
use smol_str::SmolStr;
use wolf_diagnostics::DiagnosticCode;
use wolf_source::Span;

impl Builder<'_> {
    pub(super) fn parse_component_inclusion(
        &mut self,
        element: RawElement,
        span: Span,
    ) -> ComponentInclusion {
        let RawElement {
            name,
            metas,
            attributes,
            children,
        } = element;

        for meta in &metas {
            self.error(
                DiagnosticCode::ComponentMeta,
                meta.span(),
                format!("`#id` and `.class` metas cannot be used on component `{name}`"),
            );
        }

        let mut props: IndexMap<SmolStr, BindingAttribute> = IndexMap::new();
        let mut syncs: IndexMap<SmolStr, SyncAttribute> = IndexMap::new();
        let mut events: IndexMap<SmolStr, Vec<EventAttribute>> = IndexMap::new();
        // Kind each name was first used as.
        let mut kinds: IndexMap<SmolStr, &'static str> = IndexMap::new();

        for raw in attributes {
            if let Sigil::Receiver(kind) = &raw.sigil {
                self.error(
                    DiagnosticCode::ComponentReceiver,
                    raw.span,
                    format!("`({kind})` cannot be used on component `{name}`"),
                );
                continue;
            }
            let Some(attribute) = self.parse_attribute(raw) else {
                continue;
            };
            let (attr_name, attr_span, kind) = match &attribute {
                Attribute::Binding(b) => (b.name.clone(), b.span, "prop"),
                Attribute::Sync(s) => (s.name.clone(), s.span, "sync"),
                Attribute::Event(e) => (e.name.clone(), e.span, "event"),
                Attribute::Receiver(r) => (SmolStr::default(), r.span, "receiver"),
            };
            match kinds.get(&attr_name) {
                Some(&previous) if previous != kind => {
                    self.error(
                        DiagnosticCode::ComponentAttributeConflict,
                        attr_span,
                        format!("`{attr_name}` is already passed as a {previous}"),
                    );
                    continue;
                }
                Some(_) if kind != "event" => {
                    self.error(
                        DiagnosticCode::ComponentDuplicateAttribute,
                        attr_span,
                        format!("{kind} `{attr_name}` is passed more than once"),
                    );
                    continue;
                }
                _ => {
                    kinds.insert(attr_name.clone(), kind);
                }
            }

            match attribute {
                Attribute::Binding(binding) => {
                    props.insert(attr_name, binding);
                }
                Attribute::Sync(sync) => {
                    syncs.insert(attr_name, sync);
                }
                Attribute::Event(mut event) => {
                    self.strip_component_modifiers(&mut event);
                    events.entry(attr_name).or_default().push(event);
                }
                Attribute::Receiver(_) => {}
            }
        }

        let entities = self.parse_entities(children, Scope::Component);
        let slot_insertions = self.group_insertions(entities);

        ComponentInclusion {
            name,
            props,
            syncs,
            events,
            slot_insertions,
            span,
        }
    }

    /// Components only see the handler, so DOM listener modifiers do nothing.
    fn strip_component_modifiers(&mut self, event: &mut EventAttribute) {
        let mut ignored = Vec::new();
        event.modifiers.retain(|modifier| {
            let keep = *modifier == EventModifier::Handler;
            if !keep {
                ignored.push(*modifier);
            }
            keep
        });
        for modifier in ignored {
            self.warning(
                DiagnosticCode::AttributeExtraneousModifier,
                event.span,
                format!(
                    "modifier `{}` has no effect on a component event",
                    modifier.as_str()
                ),
            );
        }
    }

    /// Collect `@insert` children by name; everything else becomes the
    /// default insertion.
    fn group_insertions(&mut self, entities: Vec<Entity>) -> IndexMap<SmolStr, SlotInsertion> {
        let mut insertions: IndexMap<SmolStr, SlotInsertion> = IndexMap::new();
        let mut orphans: Vec<Entity> = Vec::new();

        for entity in entities {
            match entity {
                Entity::SlotInsertion(insertion) => {
                    if insertions.contains_key(&insertion.name) {
                        self.error(
                            DiagnosticCode::SlotDuplicateInsertion,
                            insertion.span,
                            format!("slot `{}` is filled more than once", insertion.name),
                        );
                        continue;
                    }
                    insertions.insert(insertion.name.clone(), insertion);
                }
                other => orphans.push(other),
            }
        }

        if let Some(first) = orphans.first() {
            let span = orphans
                .iter()
                .fold(first.span(), |span, entity| span.merge(entity.span()));
            if insertions.contains_key(DEFAULT_SLOT) {
                self.error(
                    DiagnosticCode::SlotDefaultConflict,
                    span,
                    format!(
                        "children outside `@insert` conflict with the explicit `@insert({DEFAULT_SLOT})`"
                    ),
                );
            } else {
                insertions.insert(
                    SmolStr::new_static(DEFAULT_SLOT),
                    SlotInsertion {
                        name: SmolStr::new_static(DEFAULT_SLOT),
                        entities: orphans,
                        span,
                    },
                );
            }
        }

        insertions
    }
}
