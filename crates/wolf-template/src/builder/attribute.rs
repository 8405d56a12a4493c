use super::Builder;
use crate::ast::*;
use crate::raw::{RawAttribute, RawValue, Sigil};
use smol_str::SmolStr;
use wolf_diagnostics::{Diagnostic, DiagnosticCode};
use wolf_source::Span;

const EVENT_MODIFIERS: &[&str] = &["handler", "once", "capture", "passive", "prevent", "stop"];

/// Modifiers accepted after an attribute of the given kind.
fn allowed_modifiers(sigil: &Sigil) -> &'static [&'static str] {
    match sigil {
        Sigil::None | Sigil::Sync => &["initial"],
        Sigil::Event => EVENT_MODIFIERS,
        Sigil::Reactive | Sigil::Receiver(_) => &[],
    }
}

fn describe(raw: &RawAttribute) -> String {
    match &raw.sigil {
        Sigil::None => format!("`{}`", raw.name),
        Sigil::Reactive => format!("`:{}`", raw.name),
        Sigil::Event => format!("`@{}`", raw.name),
        Sigil::Sync => format!("`!{}`", raw.name),
        Sigil::Receiver(kind) => format!("`({kind})`"),
    }
}

impl Builder<'_> {
    /// Validate one attribute. Modifier problems are warnings and the
    /// modifier is dropped; value problems drop the attribute.
    pub(super) fn parse_attribute(&mut self, raw: RawAttribute) -> Option<Attribute> {
        let modifiers = self.check_modifiers(&raw);
        let initial = modifiers.iter().any(|m| m == "initial");

        match raw.sigil.clone() {
            Sigil::None => {
                let is_code = matches!(raw.value, Some(RawValue::Code(_)));
                if initial && !is_code {
                    self.ignore_initial(&raw);
                }
                let value = match raw.value {
                    None => BindingValue::Empty,
                    Some(RawValue::Str(text, _)) => BindingValue::Static(text),
                    Some(RawValue::Code(code)) => BindingValue::Dynamic { code, initial },
                };
                Some(Attribute::Binding(BindingAttribute {
                    name: raw.name,
                    value,
                    span: raw.span,
                }))
            }
            Sigil::Reactive => {
                let code = self.require_code(&raw)?;
                Some(Attribute::Binding(BindingAttribute {
                    name: raw.name,
                    value: BindingValue::Reactive(code),
                    span: raw.span,
                }))
            }
            Sigil::Event => {
                let code = self.require_code(&raw)?;
                let modifiers = modifiers
                    .iter()
                    .filter_map(|m| EventModifier::parse(m))
                    .collect();
                Some(Attribute::Event(EventAttribute {
                    name: raw.name,
                    code,
                    modifiers,
                    span: raw.span,
                }))
            }
            Sigil::Sync => {
                let code = self.require_code(&raw)?;
                Some(Attribute::Sync(SyncAttribute {
                    name: raw.name,
                    code,
                    initial,
                    span: raw.span,
                }))
            }
            Sigil::Receiver(kind) => {
                if kind != "node" {
                    self.diags.push(
                        Diagnostic::error(
                            DiagnosticCode::AttributeUnknownReceiver,
                            raw.span,
                            format!("unknown receiver `({kind})`"),
                        )
                        .with_paragraph("the only receiver is `(node)`"),
                    );
                    return None;
                }
                let code = self.require_code(&raw)?;
                Some(Attribute::Receiver(Receiver {
                    code,
                    span: raw.span,
                }))
            }
        }
    }

    /// Accepted modifier names, in source order and without duplicates.
    fn check_modifiers(&mut self, raw: &RawAttribute) -> Vec<SmolStr> {
        let allowed = allowed_modifiers(&raw.sigil);
        let mut accepted: Vec<SmolStr> = Vec::new();
        for (modifier, span) in &raw.modifiers {
            if accepted.contains(modifier) {
                self.warning(
                    DiagnosticCode::AttributeDuplicateModifier,
                    *span,
                    format!("modifier `{modifier}` is repeated"),
                );
            } else if !allowed.contains(&modifier.as_str()) {
                self.extraneous(raw, modifier, *span);
            } else {
                accepted.push(modifier.clone());
            }
        }
        accepted
    }

    fn extraneous(&mut self, raw: &RawAttribute, modifier: &str, span: Span) {
        self.warning(
            DiagnosticCode::AttributeExtraneousModifier,
            span,
            format!("modifier `{modifier}` has no effect on {}", describe(raw)),
        );
    }

    fn ignore_initial(&mut self, raw: &RawAttribute) {
        let span = raw
            .modifiers
            .iter()
            .find(|(name, _)| name == "initial")
            .map_or(raw.span, |(_, span)| *span);
        self.extraneous(raw, "initial", span);
    }

    fn require_code(&mut self, raw: &RawAttribute) -> Option<Code> {
        match &raw.value {
            Some(RawValue::Code(code)) => Some(code.clone()),
            Some(RawValue::Str(_, span)) => {
                self.error(
                    DiagnosticCode::AttributeExpectedCode,
                    *span,
                    format!("{} needs code in braces, not a string", describe(raw)),
                );
                None
            }
            None => {
                self.error(
                    DiagnosticCode::AttributeMissingValue,
                    raw.span,
                    format!("{} needs a value", describe(raw)),
                );
                None
            }
        }
    }
}
