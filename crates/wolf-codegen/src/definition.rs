//! The validated component handed to code generation.

use indexmap::IndexMap;
use smol_str::SmolStr;
use wolf_script::{CreateFn, ScriptContract};
use wolf_template::ast::Entity;

/// A component whose script contract and template have both been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentDefinition {
    /// Whether the script declares a `Component` type.
    pub has_component: bool,
    /// Slot name to whether it is optional.
    pub slots: IndexMap<SmolStr, bool>,
    pub create: Option<CreateFn>,
    pub entities: Vec<Entity>,
}

impl ComponentDefinition {
    pub fn new(contract: ScriptContract, entities: Vec<Entity>) -> Self {
        let slots = contract
            .slots
            .iter()
            .flatten()
            .map(|(name, decl)| (name.clone(), decl.optional))
            .collect();
        Self {
            has_component: contract.has_component,
            slots,
            create: contract.create,
            entities,
        }
    }

    /// Type argument of the generated `ComponentDefinition`.
    pub fn type_argument(&self) -> &'static str {
        if self.has_component {
            "Component"
        } else {
            "{}"
        }
    }
}
