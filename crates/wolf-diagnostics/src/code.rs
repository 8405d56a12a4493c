//! Stable diagnostic titles.

use std::fmt;

/// Machine-readable diagnostic codes.
///
/// The string form returned by [`DiagnosticCode::as_str`] is part of the
/// public contract and must not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    // Sections
    /// The file has no `#!` section markers.
    SectionNoMarkers,
    /// A `template` or `script` section appears twice.
    SectionDuplicate,
    /// A section declares a language the compiler cannot read.
    SectionUnsupportedLang,
    /// A custom section has no registered processor.
    SectionUnhandled,
    /// Non-blank text before the first section marker.
    SectionStrayContent,

    // Script inspection
    ScriptSyntax,
    ComponentDuplicateType,
    ComponentTypeNotLiteral,
    ComponentUnknownSection,
    ComponentDuplicateSection,
    ComponentSectionNotLiteral,
    ComponentInvalidMember,
    ComponentDuplicateMember,
    ComponentOptionalSection,
    ComponentNotExported,
    ComponentConflictingCreate,
    CreateNotExported,
    CreateMissingBody,
    CreateMissingReturn,
    CreateReturnNotObject,
    CreateInvalidMember,

    // Attributes
    AttributeDuplicateModifier,
    AttributeExtraneousModifier,
    AttributeMissingValue,
    AttributeExpectedCode,
    AttributeUnknownReceiver,
    AttributeDuplicate,

    // Tags
    TagDuplicateId,
    TagLeafChildren,
    TagIneffectiveModifier,

    // Synced inputs
    SyncUnsupportedTag,
    SyncMultiple,
    SyncModifier,
    SyncUnknownName,
    SyncUnsupportedType,
    SyncDynamicType,
    SyncReactiveTarget,
    SyncDynamicMultiple,

    // Component inclusions
    ComponentMeta,
    ComponentReceiver,
    ComponentAttributeConflict,
    ComponentDuplicateAttribute,

    // Slots
    SlotDefaultConflict,
    SlotDuplicateInsertion,
    SlotInsertOutsideComponent,
    SlotUnknown,
    SlotRequiredFallback,
    SlotRequiredUnused,
    SlotNoSection,
    SlotInvalidName,

    // Directives
    DirectiveUnknown,
    DirectiveUnpreceded,
    DirectiveMissingArgument,
    DirectiveUnexpectedArgument,
    DirectiveInvalidArgument,
    DirectiveAfterElse,
    DirectiveAfterDefault,
    DirectiveDuplicateDefault,
    DirectiveNoCases,

    // Local templates
    TemplateDuplicate,
    TemplateUnknown,
    TemplateNotTopLevel,
    TemplateEmpty,
}

impl DiagnosticCode {
    /// Get the code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SectionNoMarkers => "SECTION_NO_MARKERS",
            Self::SectionDuplicate => "SECTION_DUPLICATE",
            Self::SectionUnsupportedLang => "SECTION_UNSUPPORTED_LANG",
            Self::SectionUnhandled => "SECTION_UNHANDLED",
            Self::SectionStrayContent => "SECTION_STRAY_CONTENT",
            Self::ScriptSyntax => "SCRIPT_SYNTAX",
            Self::ComponentDuplicateType => "COMPONENT_DUPLICATE_TYPE",
            Self::ComponentTypeNotLiteral => "COMPONENT_TYPE_NOT_LITERAL",
            Self::ComponentUnknownSection => "COMPONENT_UNKNOWN_SECTION",
            Self::ComponentDuplicateSection => "COMPONENT_DUPLICATE_SECTION",
            Self::ComponentSectionNotLiteral => "COMPONENT_SECTION_NOT_LITERAL",
            Self::ComponentInvalidMember => "COMPONENT_INVALID_MEMBER",
            Self::ComponentDuplicateMember => "COMPONENT_DUPLICATE_MEMBER",
            Self::ComponentOptionalSection => "COMPONENT_OPTIONAL_SECTION",
            Self::ComponentNotExported => "COMPONENT_NOT_EXPORTED",
            Self::ComponentConflictingCreate => "COMPONENT_CONFLICTING_CREATE",
            Self::CreateNotExported => "CREATE_NOT_EXPORTED",
            Self::CreateMissingBody => "CREATE_MISSING_BODY",
            Self::CreateMissingReturn => "CREATE_MISSING_RETURN",
            Self::CreateReturnNotObject => "CREATE_RETURN_NOT_OBJECT",
            Self::CreateInvalidMember => "CREATE_INVALID_MEMBER",
            Self::AttributeDuplicateModifier => "ATTRIBUTE_DUPLICATE_MODIFIER",
            Self::AttributeExtraneousModifier => "ATTRIBUTE_EXTRANEOUS_MODIFIER",
            Self::AttributeMissingValue => "ATTRIBUTE_MISSING_VALUE",
            Self::AttributeExpectedCode => "ATTRIBUTE_EXPECTED_CODE",
            Self::AttributeUnknownReceiver => "ATTRIBUTE_UNKNOWN_RECEIVER",
            Self::AttributeDuplicate => "ATTRIBUTE_DUPLICATE",
            Self::TagDuplicateId => "TAG_DUPLICATE_ID",
            Self::TagLeafChildren => "TAG_LEAF_CHILDREN",
            Self::TagIneffectiveModifier => "TAG_INEFFECTIVE_MODIFIER",
            Self::SyncUnsupportedTag => "SYNC_UNSUPPORTED_TAG",
            Self::SyncMultiple => "SYNC_MULTIPLE",
            Self::SyncModifier => "SYNC_MODIFIER",
            Self::SyncUnknownName => "SYNC_UNKNOWN_NAME",
            Self::SyncUnsupportedType => "SYNC_UNSUPPORTED_TYPE",
            Self::SyncDynamicType => "SYNC_DYNAMIC_TYPE",
            Self::SyncReactiveTarget => "SYNC_REACTIVE_TARGET",
            Self::SyncDynamicMultiple => "SYNC_DYNAMIC_MULTIPLE",
            Self::ComponentMeta => "COMPONENT_META",
            Self::ComponentReceiver => "COMPONENT_RECEIVER",
            Self::ComponentAttributeConflict => "COMPONENT_ATTRIBUTE_CONFLICT",
            Self::ComponentDuplicateAttribute => "COMPONENT_DUPLICATE_ATTRIBUTE",
            Self::SlotDefaultConflict => "SLOT_DEFAULT_CONFLICT",
            Self::SlotDuplicateInsertion => "SLOT_DUPLICATE_INSERTION",
            Self::SlotInsertOutsideComponent => "SLOT_INSERT_OUTSIDE_COMPONENT",
            Self::SlotUnknown => "SLOT_UNKNOWN",
            Self::SlotRequiredFallback => "SLOT_REQUIRED_FALLBACK",
            Self::SlotRequiredUnused => "SLOT_REQUIRED_UNUSED",
            Self::SlotNoSection => "SLOT_NO_SECTION",
            Self::SlotInvalidName => "SLOT_INVALID_NAME",
            Self::DirectiveUnknown => "DIRECTIVE_UNKNOWN",
            Self::DirectiveUnpreceded => "DIRECTIVE_UNPRECEDED",
            Self::DirectiveMissingArgument => "DIRECTIVE_MISSING_ARGUMENT",
            Self::DirectiveUnexpectedArgument => "DIRECTIVE_UNEXPECTED_ARGUMENT",
            Self::DirectiveInvalidArgument => "DIRECTIVE_INVALID_ARGUMENT",
            Self::DirectiveAfterElse => "DIRECTIVE_AFTER_ELSE",
            Self::DirectiveAfterDefault => "DIRECTIVE_AFTER_DEFAULT",
            Self::DirectiveDuplicateDefault => "DIRECTIVE_DUPLICATE_DEFAULT",
            Self::DirectiveNoCases => "DIRECTIVE_NO_CASES",
            Self::TemplateDuplicate => "TEMPLATE_DUPLICATE",
            Self::TemplateUnknown => "TEMPLATE_UNKNOWN",
            Self::TemplateNotTopLevel => "TEMPLATE_NOT_TOP_LEVEL",
            Self::TemplateEmpty => "TEMPLATE_EMPTY",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
