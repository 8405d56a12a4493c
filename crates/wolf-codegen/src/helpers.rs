//! Runtime names and literal formatting.

use wolf_template::ast::{Code, TextItem};

/// Default module the generated code imports its runtime from.
pub const DEFAULT_RUNTIME_MODULE: &str = "project-f/runtime";

/// Names exported by the runtime module.
pub mod runtime {
    pub const CREATE_ELEMENT: &str = "createElement";
    pub const CREATE_ELEMENT_CLASS: &str = "createElementClass";
    pub const CREATE_ELEMENT_CLASSES: &str = "createElementClasses";
    pub const CREATE_ELEMENT_REACTIVE_CLASSES: &str = "createElementReactiveClasses";
    pub const CREATE_TEXT_NODE: &str = "createTextNode";
    pub const EFFECT: &str = "effect";
    pub const RANGE_EFFECT: &str = "rangeEffect";
    pub const CONTENT_EFFECT: &str = "contentEffect";
    pub const BIND_PROPERTY: &str = "bindProperty";
    pub const FAKE_IMMUTABLE: &str = "fakeImmutable";
    pub const FAKE_INITIAL: &str = "fakeInitial";
    pub const FAKE_MUTABLE: &str = "fakeMutable";
    pub const EXHAUSTIVE: &str = "exhaustive";
    pub const NOOP: &str = "noop";
    pub const EMPTY_OBJECT: &str = "EMPTYOBJECT";
}

/// A double-quoted string literal.
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Object key for `name`, quoted unless it is an identifier.
pub fn property_key(name: &str) -> String {
    if wolf_template::ast::is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// `code` in a position where it is called or accessed.
pub fn callee(code: &Code) -> String {
    if code.is_bare {
        code.text.clone()
    } else {
        format!("({})", code.text)
    }
}

/// Expression producing the text of `items`.
///
/// Fully static text becomes a string literal, anything else a template
/// literal.
pub fn text_expression(items: &[TextItem]) -> String {
    if items.iter().all(|item| matches!(item, TextItem::Static(_))) {
        let text: String = items
            .iter()
            .filter_map(|item| match item {
                TextItem::Static(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        return string_literal(&text);
    }

    let mut out = String::from("`");
    for item in items {
        match item {
            TextItem::Static(text) => {
                let mut chars = text.chars().peekable();
                while let Some(c) = chars.next() {
                    match c {
                        '`' | '\\' => {
                            out.push('\\');
                            out.push(c);
                        }
                        '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
                        _ => out.push(c),
                    }
                }
            }
            TextItem::Dynamic(code) | TextItem::Reactive(code) => {
                out.push_str("${");
                out.push_str(&code.text);
                out.push('}');
            }
        }
    }
    out.push('`');
    out
}
