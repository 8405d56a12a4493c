//! Wolf component compiler.
//!
//! [`compile`] runs the whole pipeline on one component file: the file is cut
//! into sections, the script contract is inspected, the template is parsed
//! and validated against it, and the validated tree is lowered into a
//! TypeScript module that builds the component's DOM through the runtime.

pub mod context;
pub mod definition;
pub mod error;
pub mod helpers;
pub mod template;

pub use context::CodegenContext;
pub use definition::ComponentDefinition;
pub use error::{CodegenError, CompileError};
pub use helpers::DEFAULT_RUNTIME_MODULE;
pub use template::generate_template;

use helpers::string_literal;
use wolf_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Region};
use wolf_script::{inspect, CreateFn, ScriptContract};
use wolf_sections::{cut_sections, ProcessedSection, Section, SectionProcessor};
use wolf_source::CodeWriter;
use wolf_template::parse_template;

/// Options for [`compile`].
pub struct CompileOptions {
    /// Name used in file-level diagnostics.
    pub filename: String,
    /// Module the generated code imports runtime helpers from.
    pub runtime_module: String,
    /// Handlers for custom sections.
    pub processors: Vec<Box<dyn SectionProcessor>>,
}

impl CompileOptions {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            processors: Vec::new(),
        }
    }

    pub fn with_runtime_module(mut self, module: impl Into<String>) -> Self {
        self.runtime_module = module.into();
        self
    }

    pub fn with_processor(mut self, processor: impl SectionProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new("component.iron")
    }
}

impl std::fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let processors: Vec<&str> = self.processors.iter().map(|p| p.name()).collect();
        f.debug_struct("CompileOptions")
            .field("filename", &self.filename)
            .field("runtime_module", &self.runtime_module)
            .field("processors", &processors)
            .finish()
    }
}

/// A compiled component.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The generated TypeScript module.
    pub code: String,
    /// `style` sections, untouched.
    pub styles: Vec<Section>,
    /// Warnings, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile one component file.
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let filename = options.filename.as_str();
    let _span = tracing::debug_span!("compile", file = filename).entered();

    let mut diags = Diagnostics::new();
    let file = cut_sections(source, filename, &mut diags);

    let contract = match &file.script {
        Some(script) => inspect(&script.content, script.base(), &mut diags),
        None => ScriptContract::default(),
    };

    let entities = match &file.template {
        Some(template) => {
            let parsed = parse_template(
                &template.content,
                template.base(),
                contract.slots.as_ref(),
                &mut diags,
            );
            match parsed {
                Ok(entities) => entities,
                Err(error) => {
                    return Err(CompileError::Syntax {
                        filename: filename.to_string(),
                        error,
                        diagnostics: diags.into_sorted(),
                    })
                }
            }
        }
        None => {
            diags.warning(
                DiagnosticCode::TemplateEmpty,
                Region::file(filename),
                "component has no template section",
            );
            Some(Vec::new())
        }
    };

    let appended = process_custom_sections(&file.custom, options, &mut diags);

    let entities = match entities {
        Some(entities) if !diags.has_errors() => entities,
        _ => {
            tracing::debug!(errors = diags.error_count(), "compilation failed");
            return Err(CompileError::Invalid {
                filename: filename.to_string(),
                diagnostics: diags.into_sorted(),
            });
        }
    };

    let definition = ComponentDefinition::new(contract, entities);
    let script = file.script.as_ref().map(|script| script.content.as_str());
    let code = generate(&definition, script, &appended, &options.runtime_module)?;

    tracing::debug!(
        bytes = code.len(),
        warnings = diags.warning_count(),
        "compiled"
    );
    Ok(CompileOutput {
        code,
        styles: file.styles,
        diagnostics: diags.into_sorted(),
    })
}

fn process_custom_sections(
    sections: &[Section],
    options: &CompileOptions,
    diags: &mut Diagnostics,
) -> Vec<ProcessedSection> {
    let mut processed = Vec::new();
    for section in sections {
        let processor = options
            .processors
            .iter()
            .find(|processor| section.name == processor.name());
        match processor {
            Some(processor) => {
                if let Some(output) = processor.process(section, diags) {
                    processed.push(output);
                }
            }
            None => diags.warning(
                DiagnosticCode::SectionUnhandled,
                section.marker_span,
                format!("no processor handles `{}` sections", section.name),
            ),
        }
    }
    processed
}

/// Generate the TypeScript module for a validated component.
///
/// `script` is emitted verbatim above the component; `appended` sections are
/// emitted after its default export.
pub fn generate(
    definition: &ComponentDefinition,
    script: Option<&str>,
    appended: &[ProcessedSection],
    runtime_module: &str,
) -> Result<String, CodegenError> {
    let mut ctx = CodegenContext::new(&definition.slots);
    ctx.writer.indent();
    create_binding(&mut ctx, definition.create.as_ref());
    generate_template(&mut ctx, &definition.entities)?;
    for section in appended {
        for import in &section.imports {
            ctx.add_import(import.clone());
        }
    }

    let module = string_literal(runtime_module);
    let imports: Vec<&str> = ctx.imports().collect();
    let mut out = CodeWriter::new();
    if !imports.is_empty() {
        out.line(format!(
            "import {{ {} }} from {module};",
            imports.join(", ")
        ));
    }
    out.line(format!(
        "import type {{ ComponentDefinition as ___ComponentDefinition }} from {module};"
    ));
    out.newline();

    if let Some(script) = script.map(str::trim).filter(|s| !s.is_empty()) {
        out.push_str(script);
        out.newline();
        out.newline();
    }

    out.line(format!(
        "const ___Component: ___ComponentDefinition<{}> = (___realParent, ___parent, $props, $syncs, $events, $slots) => {{",
        definition.type_argument()
    ));
    out.push_str(&ctx.writer.finish());
    out.line("};");
    out.newline();
    out.line("export default ___Component;");

    for section in appended {
        let code = section.code.trim();
        if !code.is_empty() {
            out.newline();
            out.push_str(code);
            out.newline();
        }
    }
    Ok(out.finish())
}

fn create_binding(ctx: &mut CodegenContext<'_>, create: Option<&CreateFn>) {
    match create {
        None => {}
        Some(CreateFn::Ctx) => {
            ctx.writer
                .line("const ctx = createCtx($props, $syncs, $events);");
        }
        Some(CreateFn::Names(names)) if names.is_empty() => {
            ctx.writer.line("create($props, $syncs, $events);");
        }
        Some(CreateFn::Names(names)) => {
            ctx.writer.line(format!(
                "const {{ {} }} = create($props, $syncs, $events);",
                names.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wolf_source::Span;
    use smol_str::SmolStr;
    use wolf_template::ast::{Code, DirectiveExpr, Entity, SlotUsage, SwitchBlock, SwitchCase};

    fn compile_ok(source: &str) -> CompileOutput {
        compile(source, &CompileOptions::default()).unwrap()
    }

    fn compile_template(template: &str) -> String {
        compile_ok(&format!("#! template\n{template}\n")).code
    }

    struct Docs;

    impl SectionProcessor for Docs {
        fn name(&self) -> &str {
            "docs"
        }

        fn process(&self, section: &Section, _diags: &mut Diagnostics) -> Option<ProcessedSection> {
            Some(ProcessedSection {
                code: format!("export const docs = {};", string_literal(section.content.trim())),
                imports: vec!["noop".to_string()],
            })
        }
    }

    #[test]
    fn test_lone_children_write_directly() {
        let output = compile_ok("#! template\ndiv: span hello\n");
        assert!(output.diagnostics.is_empty());
        insta::assert_snapshot!(output.code, @r#"
import { createElement } from "project-f/runtime";
import type { ComponentDefinition as ___ComponentDefinition } from "project-f/runtime";

const ___Component: ___ComponentDefinition<{}> = (___realParent, ___parent, $props, $syncs, $events, $slots) => {
    const ___e0 = createElement("div");
    const ___e0_0 = createElement("span");
    ___e0_0.textContent = "hello";
    ___e0.appendChild(___e0_0);
    ___parent.appendChild(___e0);
};

export default ___Component;
"#);
    }

    #[test]
    fn test_siblings_use_a_fragment() {
        let code = compile_template("div\n  span hello\n  div");
        let body: Vec<&str> = code
            .lines()
            .skip_while(|line| !line.starts_with("const ___Component"))
            .skip(1)
            .take_while(|line| *line != "};")
            .map(str::trim)
            .collect();
        assert_eq!(
            body,
            vec![
                "const ___e0 = createElement(\"div\");",
                "const ___f0 = document.createDocumentFragment();",
                "const ___e0_0 = createElement(\"span\");",
                "___e0_0.textContent = \"hello\";",
                "___f0.appendChild(___e0_0);",
                "const ___e0_1 = createElement(\"div\");",
                "___f0.appendChild(___e0_1);",
                "___e0.appendChild(___f0);",
                "___parent.appendChild(___e0);",
            ]
        );
    }

    #[test]
    fn test_root_siblings_append_to_parent() {
        let code = compile_template("p one\np two");
        assert!(!code.contains("createDocumentFragment"));
        assert!(code.contains("    ___parent.appendChild(___e0);\n"));
        assert!(code.contains("    ___parent.appendChild(___e1);\n"));
    }

    #[test]
    fn test_classes_select_creation_helper() {
        let code = compile_template("div.a.b\nspan.a.{ extra }\np.:{ active() }");
        assert!(code.contains("const ___e0 = createElementClass(\"div\", \"a b\");"));
        assert!(code.contains("const ___e1 = createElementClasses(\"span\", [\"a\", extra]);"));
        assert!(code.contains("const ___e2 = createElementReactiveClasses(\"p\", () => [active()]);"));
    }

    #[test]
    fn test_attribute_bindings() {
        let code = compile_template("input#name(title=\"Name\", aria-label=\"n\", disabled, :value={ v() })");
        assert!(code.contains("___e0.id = \"name\";"));
        assert!(code.contains("___e0.title = \"Name\";"));
        assert!(code.contains("___e0.setAttribute(\"aria-label\", \"n\");"));
        assert!(code.contains("___e0.disabled = true;"));
        assert!(code.contains("effect(() => {\n        ___e0.value = v();\n    });"));
    }

    #[test]
    fn test_event_handlers_fold() {
        let code = compile_template("button(@click=doit, @click|handler={ e => handle(e) })");
        assert!(code.contains(
            "___e0.addEventListener(\"click\", $event => { doit($event); (e => handle(e))($event); });"
        ));

        let code = compile_template("form(@submit|prevent|once=save)");
        assert!(code.contains(
            "___e0.addEventListener(\"submit\", $event => { $event.preventDefault(); save($event); }, { once: true });"
        ));

        let code = compile_template("a(@click={ count.set(1) })");
        assert!(code.contains("___e0.addEventListener(\"click\", $event => count.set(1));"));
    }

    #[test]
    fn test_receiver_called_with_element() {
        let code = compile_template("canvas((node)=draw)");
        assert!(code.contains("    draw(___e0);\n    ___parent.appendChild(___e0);\n"));
    }

    #[test]
    fn test_text_nodes() {
        let code = compile_template("div\n  | Hello {{ name }}\n  br\n  | Count {{: count() }}");
        assert!(code.contains("___f0.appendChild(createTextNode(`Hello ${name}`));"));
        assert!(code.contains("const ___t0_2 = createTextNode(\"\");"));
        assert!(code.contains("___t0_2.data = `Count ${count()}`;"));
        assert!(code.contains("___f0.appendChild(___t0_2);"));
    }

    #[test]
    fn test_static_if_chain() {
        let code = compile_template("@if(a)\n  p one\n@elseif(b)\n  p two\n@else\n  p three");
        assert!(code.contains("    if (a) {\n        const ___e0_0_0 = createElement(\"p\");"));
        assert!(code.contains("    } else if (b) {\n        const ___e0_1_0 = createElement(\"p\");"));
        assert!(code.contains("    } else {\n        const ___e0_2_0 = createElement(\"p\");"));
        assert!(!code.contains("Effect"));
    }

    #[test]
    fn test_reactive_if_under_element() {
        let code = compile_template("div\n  @if(:open())\n    p yes\n  @else\n    p no");
        assert!(code.contains("contentEffect(___e0, (___realParent, ___parent) => {"));
        assert!(code.contains("if (open()) {"));
        assert!(code.contains("const ___e0_0_0_0 = createElement(\"p\");"));
        assert!(code.contains("const ___e0_0_1_0 = createElement(\"p\");"));
        assert!(code.contains("___parent.appendChild(___e0_0_0_0);"));
    }

    #[test]
    fn test_reactive_if_at_root() {
        let code = compile_template("@if(:open())\n  p yes");
        assert!(code.contains("rangeEffect(___realParent, ___parent, (___realParent, ___parent) => {"));
        assert!(code.contains("import { createElement, rangeEffect } from \"project-f/runtime\";"));
    }

    #[test]
    fn test_each_loops() {
        let code = compile_template("ul\n  @each(item, i of items)\n    li {{ item }}");
        assert!(code.contains("for (const [i, item] of Array.from(items).entries()) {"));
        assert!(code.contains("const ___e0_0_0 = createElement(\"li\");"));
        assert!(code.contains("___e0.appendChild(___e0_0_0);"));

        let code = compile_template("ul\n  @each(item of :items())\n    li {{ item }}");
        assert!(code.contains("contentEffect(___e0, (___realParent, ___parent) => {"));
        assert!(code.contains("for (const item of items()) {"));
    }

    #[test]
    fn test_match_is_exhaustive_without_default() {
        let code = compile_template("@match(kind)\n@when(\"a\", \"b\")\n  p ab");
        assert!(code.contains("const ___m0 = kind;"));
        assert!(code.contains("case \"a\":\n"));
        assert!(code.contains("case \"b\": {"));
        assert!(code.contains("exhaustive(___m0);"));

        let code = compile_template("@match(kind)\n@when(\"a\")\n  p a\n@default\n  p other");
        assert!(!code.contains("exhaustive"));
        assert!(code.contains("const ___e0_1_0 = createElement(\"p\");"));
    }

    #[test]
    fn test_switch_fallthrough() {
        let code = compile_template("@switch(n)\n@fallcase(1)\n  p one\n@case(2)\n  p two");
        let one = code.find("case 1: {").unwrap();
        let two = code.find("case 2: {").unwrap();
        assert!(!code[one..two].contains("break;"));
        assert!(code[two..].contains("break;"));
        assert!(code.contains("exhaustive(___m0);"));
    }

    #[test]
    fn test_switch_fallthrough_appends_under_element() {
        let code = compile_template("div\n  @switch(n)\n  @fallcase(1)\n    | one\n  @case(2)\n    | two");
        assert!(!code.contains("textContent"));
        assert!(code.contains("___e0.appendChild(createTextNode(\"one\"));"));
        assert!(code.contains("___e0.appendChild(createTextNode(\"two\"));"));
    }

    #[test]
    fn test_switch_without_fallthrough_keeps_text_content() {
        let code = compile_template("div\n  @switch(n)\n  @case(1)\n    | one\n  @default\n    | other");
        assert!(code.contains("___e0.textContent = \"one\";"));
        assert!(code.contains("___e0.textContent = \"other\";"));
    }

    #[test]
    fn test_trailing_fallcase_stops_before_exhaustive() {
        let code = compile_template("@switch(n)\n@case(1)\n  p one\n@fallcase(2)\n  p two");
        let two = code.find("case 2: {").unwrap();
        let default = code.find("default: {").unwrap();
        assert!(code[two..default].contains("break;"));
        assert!(code[default..].contains("exhaustive(___m0);"));
    }

    #[test]
    fn test_switch_reactive_through_case_value() {
        let code = compile_template("div\n  @switch(n)\n  @case(:current())\n    p now\n  @default\n    p later");
        assert!(code.contains("contentEffect(___e0, (___realParent, ___parent) => {"));
        assert!(code.contains("const ___m0_0 = n;"));
        assert!(code.contains("case current(): {"));
        assert!(!code.contains("exhaustive"));
    }

    #[test]
    fn test_synced_inputs() {
        let code = compile_template("input(type=\"text\", !sync=name)");
        assert!(code.contains("___e0.type = \"text\";"));
        assert!(code.contains("bindProperty(___e0, \"value\", \"input\", name);"));

        let code = compile_template("input(type=\"checkbox\", !sync=done)");
        assert!(code.contains("bindProperty(___e0, \"checked\", \"change\", done);"));

        let code = compile_template("select(!sync=choice)");
        assert!(code.contains("bindProperty(___e0, \"value\", \"change\", choice);"));

        let code = compile_template("input(type=\"radio\", value=\"a\", !sync=pick)");
        assert!(code.contains("___e0.checked = pick() === ___e0.value;"));
        assert!(code.contains("pick.set(___e0.value)"));

        let code = compile_template("select(multiple, !sync=tags)");
        assert!(code.contains("const ___selected = tags();"));
        assert!(code.contains("tags.set(Array.from(___e0.selectedOptions, ___option => ___option.value))"));
    }

    #[test]
    fn test_component_with_slots() {
        let source = r#"#! script lang="ts"
export type Component = {
    props: { title: string };
    slots: { def: any; footer?: any };
};
export function create($props: any) {
    const count = 1;
    return { count };
}
#! template
section.card
  h1 {{: title() }}
  @slot
  @slot(footer)
"#;
        let output = compile_ok(source);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let code = output.code;
        assert!(code.starts_with(
            "import { createElement, createElementClass, effect, noop } from \"project-f/runtime\";\n"
        ));
        assert!(code.contains("export type Component = {"));
        assert!(code.contains("___ComponentDefinition<Component>"));
        assert!(code.contains("    const { count } = create($props, $syncs, $events);\n"));
        assert!(code.contains("effect(() => {\n        ___e0_0.textContent = `${title()}`;\n    });"));
        assert!(code.contains("    $slots.def(___e0, ___f0);\n"));
        assert!(code.contains("    ($slots.footer ?? noop)(___e0, ___f0);\n"));
        assert!(code.ends_with("export default ___Component;\n"));
    }

    #[test]
    fn test_optional_slot_fallback() {
        let source = "#! script\nexport type Component = { slots: { icon?: any } };\n#! template\n@slot(icon)\n  | *\n";
        let code = compile_ok(source).code;
        assert!(code.contains("($slots.icon ?? ((___realParent, ___parent) => {"));
        assert!(code.contains("___parent.appendChild(createTextNode(\"*\"));"));
        assert!(code.contains("}))(___realParent, ___parent);"));
    }

    #[test]
    fn test_slot_arity() {
        let script = "#! script\nexport type Component = { slots: { def: any; aside?: any } };\n";

        let err = compile(&format!("{script}#! template\np nothing\n"), &CompileOptions::default())
            .unwrap_err();
        assert!(err
            .diagnostics()
            .iter()
            .any(|d| d.code == DiagnosticCode::SlotRequiredUnused));

        let err = compile(
            &format!("{script}#! template\n@slot\n  p fallback\n"),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert!(err
            .diagnostics()
            .iter()
            .any(|d| d.code == DiagnosticCode::SlotRequiredFallback));

        // The optional slot may go unused.
        let output = compile_ok(&format!("{script}#! template\n@slot\n"));
        assert!(output.code.contains("$slots.def(___realParent, ___parent);"));
        assert!(!output.code.contains("$slots.aside"));
    }

    #[test]
    fn test_component_inclusion() {
        let code = compile_template(
            "Card(title=\"Hi\", :count={ n() }, !open=open, !shown|initial=s, @close=onClose)\n  p body",
        );
        assert!(code.contains(
            "Card(___realParent, ___parent, { title: fakeInitial(\"Hi\"), count: fakeImmutable(() => n()) }, { open: open, shown: fakeMutable(s) }, { close: onClose }, {"
        ));
        assert!(code.contains("        def: (___realParent, ___parent) => {\n"));
        assert!(code.contains("            ___e0_0_0.textContent = \"body\";\n"));
        assert!(code.contains("            ___parent.appendChild(___e0_0_0);\n        },\n    });\n"));

        let code = compile_template("Icon");
        assert!(code.contains(
            "Icon(___realParent, ___parent, EMPTYOBJECT, EMPTYOBJECT, EMPTYOBJECT, EMPTYOBJECT);"
        ));
    }

    #[test]
    fn test_named_insertions() {
        let code = compile_template("Dialog\n  @insert(footer)\n    button Close\n  p Body");
        let footer = code.find("footer: (___realParent, ___parent) => {").unwrap();
        let def = code.find("def: (___realParent, ___parent) => {").unwrap();
        assert!(footer < def);
    }

    #[test]
    fn test_templates_are_hoisted() {
        let code = compile_template("@template(row, label)\n  li {{ label }}\nul\n  @include(row, \"a\")");
        let definition = code.find("function ___template_row(___realParent: Node, ___parent: Node, label) {").unwrap();
        let element = code.find("const ___e1 = createElement(\"ul\");").unwrap();
        assert!(definition < element);
        assert!(code.contains("___template_row(___e1, ___e1, \"a\");"));
    }

    #[test]
    fn test_create_ctx_binding() {
        let source = "#! script\nexport function createCtx() { return {}; }\n#! template\np hi\n";
        let code = compile_ok(source).code;
        assert!(code.contains("    const ctx = createCtx($props, $syncs, $events);\n"));
    }

    #[test]
    fn test_runtime_module_option() {
        let options = CompileOptions::default().with_runtime_module("@app/runtime");
        let output = compile("#! template\np hi\n", &options).unwrap();
        assert!(output.code.contains("import { createElement } from \"@app/runtime\";"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let source = "#! template\ndiv\n  @if(:a())\n    p {{: b() }}\n  Card(@go=go)\n";
        assert_eq!(compile_ok(source).code, compile_ok(source).code);
    }

    #[test]
    fn test_invalid_component() {
        let err = compile("#! template\n@frobnicate\n", &CompileOptions::new("bad.iron")).unwrap_err();
        assert!(matches!(err, CompileError::Invalid { .. }));
        assert_eq!(err.to_string(), "bad.iron: compilation failed with 1 error(s)");
        assert!(err
            .diagnostics()
            .iter()
            .any(|d| d.code == DiagnosticCode::DirectiveUnknown));
    }

    #[test]
    fn test_syntax_error() {
        let err = compile("#! template\ndiv(\n", &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::Syntax { .. }));
        assert!(err.to_string().starts_with("component.iron: "));
    }

    #[test]
    fn test_custom_sections() {
        let source = "#! template\np hi\n#! docs\nA card.\n#! notes\nignored\n";
        let options = CompileOptions::default().with_processor(Docs);
        let output = compile(source, &options).unwrap();
        assert!(output
            .code
            .ends_with("export default ___Component;\n\nexport const docs = \"A card.\";\n"));
        assert!(output.code.starts_with("import { createElement, noop }"));
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, DiagnosticCode::SectionUnhandled);
    }

    #[test]
    fn test_styles_pass_through() {
        let output = compile_ok("#! template\np hi\n#! style\np { color: red; }\n");
        assert_eq!(output.styles.len(), 1);
        assert_eq!(output.styles[0].content, "p { color: red; }\n");
    }

    #[test]
    fn test_generate_rejects_unknown_slot() {
        let span = Span::new(0, 5);
        let definition = ComponentDefinition {
            entities: vec![Entity::SlotUsage(SlotUsage {
                name: "missing".into(),
                fallback: None,
                span,
            })],
            ..ComponentDefinition::default()
        };
        let err = generate(&definition, None, &[], DEFAULT_RUNTIME_MODULE).unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnknownSlot {
                name: "missing".into(),
                span
            }
        );
    }

    #[test]
    fn test_generate_rejects_required_slot_fallback() {
        let span = Span::new(3, 9);
        let definition = ComponentDefinition {
            slots: [(SmolStr::new("body"), false)].into_iter().collect(),
            entities: vec![Entity::SlotUsage(SlotUsage {
                name: "body".into(),
                fallback: Some(Vec::new()),
                span,
            })],
            ..ComponentDefinition::default()
        };
        let err = generate(&definition, None, &[], DEFAULT_RUNTIME_MODULE).unwrap_err();
        assert_eq!(
            err,
            CodegenError::RequiredSlotFallback {
                name: "body".into(),
                span
            }
        );
    }

    #[test]
    fn test_generate_rejects_duplicate_default() {
        let default = |span| SwitchCase::Default {
            entities: Vec::new(),
            is_fallthrough: false,
            span,
        };
        let definition = ComponentDefinition {
            entities: vec![Entity::Switch(SwitchBlock {
                value: DirectiveExpr {
                    code: Code::new("n", Span::new(8, 9)),
                    reactive: false,
                },
                cases: vec![default(Span::new(11, 19)), default(Span::new(20, 28))],
                span: Span::new(0, 28),
            })],
            ..ComponentDefinition::default()
        };
        let err = generate(&definition, None, &[], DEFAULT_RUNTIME_MODULE).unwrap_err();
        assert_eq!(
            err,
            CodegenError::DuplicateDefault {
                span: Span::new(20, 28)
            }
        );
    }
}
