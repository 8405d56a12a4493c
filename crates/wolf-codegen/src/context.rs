//! Code generation context.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use smol_str::SmolStr;
use wolf_source::CodeWriter;

/// State shared by every lowering function.
#[derive(Debug)]
pub struct CodegenContext<'a> {
    pub writer: CodeWriter,
    /// Runtime names referenced so far.
    imports: BTreeSet<String>,
    /// Declared slots and whether each is optional.
    pub slots: &'a IndexMap<SmolStr, bool>,
}

impl<'a> CodegenContext<'a> {
    pub fn new(slots: &'a IndexMap<SmolStr, bool>) -> Self {
        Self {
            writer: CodeWriter::new(),
            imports: BTreeSet::new(),
            slots,
        }
    }

    /// Record a runtime import and return its name.
    pub fn runtime(&mut self, name: &'static str) -> &'static str {
        if !self.imports.contains(name) {
            self.imports.insert(name.to_string());
        }
        name
    }

    pub fn add_import(&mut self, name: impl Into<String>) {
        self.imports.insert(name.into());
    }

    /// Imports in sorted order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }
}

/// Where generated nodes are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    /// Nearest real DOM element.
    pub real: String,
    /// Node children are appended to; a fragment or `real` itself.
    pub node: String,
    /// The entity list being lowered is the entire content of `real`.
    pub lone: bool,
}

impl Parent {
    /// The parameters of the component, a slot or an effect body.
    pub fn scope() -> Self {
        Self {
            real: "___realParent".to_string(),
            node: "___parent".to_string(),
            lone: false,
        }
    }

    /// Content of a freshly created element.
    pub fn element(var: &str) -> Self {
        Self {
            real: var.to_string(),
            node: var.to_string(),
            lone: true,
        }
    }

    /// Children are appended straight to a real element.
    pub fn is_real(&self) -> bool {
        self.real == self.node
    }

    pub fn not_lone(&self) -> Self {
        Self {
            lone: false,
            ..self.clone()
        }
    }
}
