//! Walks the swc syntax tree of a script section.

use crate::contract::{CreateFn, ScriptContract, SlotDecl, SlotTable};
use smol_str::SmolStr;
use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    Decl, EsVersion, Expr, FnDecl, Lit, Module, ModuleDecl, ModuleItem, Prop, PropName,
    PropOrSpread, Stmt, TsType, TsTypeAliasDecl, TsTypeElement, TsTypeLit,
};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use wolf_diagnostics::{DiagnosticCode, Diagnostics};
use wolf_source::Span;

/// swc reserves position 0 for dummy spans.
const START: u32 = 1;

/// Inspect a script section.
///
/// `base` is the offset of the section within the component file. Problems
/// are reported into `diags`; the returned contract holds whatever could be
/// recovered.
pub fn inspect(source: &str, base: u32, diags: &mut Diagnostics) -> ScriptContract {
    let Some(module) = parse_module(source, base, diags) else {
        return ScriptContract::default();
    };

    let mut inspector = Inspector {
        base,
        diags,
        contract: ScriptContract::default(),
    };
    for item in &module.body {
        let (decl, exported) = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => (&export.decl, true),
            ModuleItem::Stmt(Stmt::Decl(decl)) => (decl, false),
            _ => continue,
        };
        inspector.declaration(decl, exported);
    }

    tracing::debug!(
        props = inspector.contract.props.len(),
        syncs = inspector.contract.syncs.len(),
        events = inspector.contract.events.len(),
        "script inspected"
    );
    inspector.contract
}

fn parse_module(source: &str, base: u32, diags: &mut Diagnostics) -> Option<Module> {
    let input = StringInput::new(
        source,
        BytePos(START),
        BytePos(START + source.len() as u32),
    );
    let lexer = Lexer::new(
        Syntax::Typescript(TsSyntax::default()),
        EsVersion::EsNext,
        input,
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let result = parser.parse_module();

    let mut failed = false;
    for err in parser.take_errors() {
        diags.error(
            DiagnosticCode::ScriptSyntax,
            convert_span(err.span(), base),
            err.kind().msg().to_string(),
        );
        failed = true;
    }
    match result {
        Ok(module) if !failed => Some(module),
        Ok(_) => None,
        Err(err) => {
            diags.error(
                DiagnosticCode::ScriptSyntax,
                convert_span(err.span(), base),
                err.kind().msg().to_string(),
            );
            None
        }
    }
}

fn convert_span(span: swc_common::Span, base: u32) -> Span {
    Span::new(
        span.lo.0.saturating_sub(START) + base,
        span.hi.0.saturating_sub(START) + base,
    )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SectionName {
    Props,
    Syncs,
    Events,
    Slots,
}

impl SectionName {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "props" => Some(Self::Props),
            "syncs" => Some(Self::Syncs),
            "events" => Some(Self::Events),
            "slots" => Some(Self::Slots),
            _ => None,
        }
    }
}

struct Member {
    name: SmolStr,
    optional: bool,
    span: Span,
}

struct Inspector<'d> {
    base: u32,
    diags: &'d mut Diagnostics,
    contract: ScriptContract,
}

impl Inspector<'_> {
    fn span(&self, span: swc_common::Span) -> Span {
        convert_span(span, self.base)
    }

    fn declaration(&mut self, decl: &Decl, exported: bool) {
        match decl {
            Decl::TsTypeAlias(alias) if &*alias.id.sym == "Component" => {
                self.component(alias, exported)
            }
            Decl::TsInterface(iface) if &*iface.id.sym == "Component" => {
                let span = self.span(iface.id.span);
                self.diags.error(
                    DiagnosticCode::ComponentTypeNotLiteral,
                    span,
                    "`Component` must be a type alias of an object type literal",
                );
            }
            Decl::Fn(func) if matches!(&*func.ident.sym, "create" | "createCtx") => {
                self.create(func, exported)
            }
            _ => {}
        }
    }

    fn component(&mut self, alias: &TsTypeAliasDecl, exported: bool) {
        let id_span = self.span(alias.id.span);
        if self.contract.has_component {
            self.diags.error(
                DiagnosticCode::ComponentDuplicateType,
                id_span,
                "`Component` is declared more than once",
            );
            return;
        }
        self.contract.has_component = true;

        if !exported {
            self.diags.warning(
                DiagnosticCode::ComponentNotExported,
                id_span,
                "`Component` type is not exported",
            );
        }

        let TsType::TsTypeLit(lit) = &*alias.type_ann else {
            let span = self.span(alias.type_ann.span());
            self.diags.error(
                DiagnosticCode::ComponentTypeNotLiteral,
                span,
                "`Component` must be an object type literal",
            );
            return;
        };

        let mut seen: Vec<SectionName> = Vec::new();
        for member in &lit.members {
            let member_span = self.span(member.span());
            let TsTypeElement::TsPropertySignature(sig) = member else {
                self.diags.error(
                    DiagnosticCode::ComponentInvalidMember,
                    member_span,
                    "expected a section: `props`, `syncs`, `events` or `slots`",
                );
                continue;
            };
            let Some(name) = property_name(&sig.key, sig.computed) else {
                self.diags.error(
                    DiagnosticCode::ComponentInvalidMember,
                    member_span,
                    "section names must be plain identifiers",
                );
                continue;
            };
            let Some(section) = SectionName::parse(&name) else {
                self.diags.error(
                    DiagnosticCode::ComponentUnknownSection,
                    member_span,
                    format!("unknown `Component` section `{name}`"),
                );
                continue;
            };
            if seen.contains(&section) {
                self.diags.error(
                    DiagnosticCode::ComponentDuplicateSection,
                    member_span,
                    format!("section `{name}` is declared more than once"),
                );
                continue;
            }
            seen.push(section);

            if sig.optional {
                self.diags.warning(
                    DiagnosticCode::ComponentOptionalSection,
                    member_span,
                    format!("marking section `{name}` optional has no effect"),
                );
            }

            let body = match sig.type_ann.as_ref().map(|ann| &*ann.type_ann) {
                Some(TsType::TsTypeLit(body)) => body,
                _ => {
                    self.diags.error(
                        DiagnosticCode::ComponentSectionNotLiteral,
                        member_span,
                        format!("section `{name}` must be an object type literal"),
                    );
                    continue;
                }
            };
            let members = self.members(body);

            match section {
                SectionName::Props => {
                    self.contract.props = members.into_iter().map(|m| m.name).collect()
                }
                SectionName::Syncs => {
                    self.contract.syncs = members.into_iter().map(|m| m.name).collect()
                }
                SectionName::Events => {
                    self.contract.events = members.into_iter().map(|m| m.name).collect()
                }
                SectionName::Slots => {
                    let table: SlotTable = members
                        .into_iter()
                        .map(|m| {
                            (
                                m.name,
                                SlotDecl {
                                    optional: m.optional,
                                    span: m.span,
                                },
                            )
                        })
                        .collect();
                    self.contract.slots = Some(table);
                }
            }
        }
    }

    fn members(&mut self, body: &TsTypeLit) -> Vec<Member> {
        let mut members: Vec<Member> = Vec::new();
        for member in &body.members {
            let span = self.span(member.span());
            let name = match member {
                TsTypeElement::TsPropertySignature(sig) => property_name(&sig.key, sig.computed)
                    .map(|name| (name, sig.optional)),
                _ => None,
            };
            let Some((name, optional)) = name else {
                self.diags.error(
                    DiagnosticCode::ComponentInvalidMember,
                    span,
                    "expected a simple property signature",
                );
                continue;
            };
            if members.iter().any(|m| m.name == name) {
                self.diags.error(
                    DiagnosticCode::ComponentDuplicateMember,
                    span,
                    format!("`{name}` is declared more than once"),
                );
                continue;
            }
            members.push(Member {
                name,
                optional,
                span,
            });
        }
        members
    }

    fn create(&mut self, func: &FnDecl, exported: bool) {
        let name = &*func.ident.sym;
        let id_span = self.span(func.ident.span);

        if self.contract.create.is_some() {
            self.diags.error(
                DiagnosticCode::ComponentConflictingCreate,
                id_span,
                "a component declares at most one `create` or `createCtx` function",
            );
            return;
        }
        if !exported {
            self.diags.warning(
                DiagnosticCode::CreateNotExported,
                id_span,
                format!("`{name}` is not exported"),
            );
        }

        if name == "createCtx" {
            self.contract.create = Some(CreateFn::Ctx);
            return;
        }
        // Claim the slot early so a later duplicate still conflicts.
        self.contract.create = Some(CreateFn::Names(Vec::new()));

        let Some(body) = &func.function.body else {
            self.diags.error(
                DiagnosticCode::CreateMissingBody,
                id_span,
                "`create` must have a body",
            );
            return;
        };
        let Some(Stmt::Return(ret)) = body.stmts.last() else {
            let span = self.span(body.span);
            self.diags.error(
                DiagnosticCode::CreateMissingReturn,
                span,
                "the last statement of `create` must return an object literal",
            );
            return;
        };
        let object = match ret.arg.as_deref().map(unwrap_expr) {
            Some(Expr::Object(object)) => object,
            _ => {
                let span = self.span(ret.span);
                self.diags.error(
                    DiagnosticCode::CreateReturnNotObject,
                    span,
                    "`create` must return an object literal",
                );
                return;
            }
        };

        let mut names: Vec<SmolStr> = Vec::new();
        for prop in &object.props {
            let name = match prop {
                PropOrSpread::Spread(_) => None,
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::Shorthand(ident) => Some(SmolStr::from(&*ident.sym)),
                    Prop::KeyValue(kv) => prop_name(&kv.key),
                    Prop::Assign(assign) => Some(SmolStr::from(&*assign.key.sym)),
                    Prop::Method(method) => prop_name(&method.key),
                    _ => None,
                },
            };
            match name {
                Some(name) if !names.contains(&name) => names.push(name),
                Some(_) => {}
                None => {
                    let span = self.span(prop.span());
                    self.diags.error(
                        DiagnosticCode::CreateInvalidMember,
                        span,
                        "returned members must have static names; spreads and accessors are not supported",
                    );
                }
            }
        }
        self.contract.create = Some(CreateFn::Names(names));
    }
}

fn unwrap_expr(mut expr: &Expr) -> &Expr {
    loop {
        expr = match expr {
            Expr::Paren(paren) => &paren.expr,
            Expr::TsConstAssertion(assertion) => &assertion.expr,
            Expr::TsSatisfies(satisfies) => &satisfies.expr,
            _ => return expr,
        };
    }
}

fn property_name(key: &Expr, computed: bool) -> Option<SmolStr> {
    if computed {
        return None;
    }
    match key {
        Expr::Ident(ident) => Some(SmolStr::from(&*ident.sym)),
        Expr::Lit(Lit::Str(s)) => s.raw.as_deref().and_then(unquote),
        _ => None,
    }
}

fn prop_name(key: &PropName) -> Option<SmolStr> {
    match key {
        PropName::Ident(ident) => Some(SmolStr::from(&*ident.sym)),
        PropName::Str(s) => s.raw.as_deref().and_then(unquote),
        _ => None,
    }
}

fn unquote(raw: &str) -> Option<SmolStr> {
    raw.get(1..raw.len().checked_sub(1)?).map(SmolStr::from)
}
