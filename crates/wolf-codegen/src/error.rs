//! Failures of code generation and of the compile driver.

use smol_str::SmolStr;
use thiserror::Error;
use wolf_diagnostics::Diagnostic;
use wolf_source::Span;
use wolf_template::SyntaxError;

/// An entity tree the builder should have rejected.
///
/// The builder validates slots, defaults and insertions before generation,
/// so these only surface when an AST is constructed by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("slot `{name}` is not declared by the component")]
    UnknownSlot { name: SmolStr, span: Span },

    #[error("required slot `{name}` cannot have a fallback")]
    RequiredSlotFallback { name: SmolStr, span: Span },

    #[error("a switch has more than one default case")]
    DuplicateDefault { span: Span },

    #[error("`@insert` outside of a component inclusion")]
    MisplacedInsertion { span: Span },
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnknownSlot { span, .. }
            | Self::RequiredSlotFallback { span, .. }
            | Self::DuplicateDefault { span }
            | Self::MisplacedInsertion { span } => *span,
        }
    }
}

/// Why a component could not be compiled.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The template is not syntactically valid.
    #[error("{filename}: {error}")]
    Syntax {
        filename: String,
        #[source]
        error: SyntaxError,
        /// Diagnostics recorded before the syntax error.
        diagnostics: Vec<Diagnostic>,
    },

    /// At least one error diagnostic was recorded.
    #[error(
        "{filename}: compilation failed with {} error(s)",
        .diagnostics.iter().filter(|d| d.is_error()).count()
    )]
    Invalid {
        filename: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    /// Diagnostics collected before compilation stopped, sorted.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Syntax { diagnostics, .. } | Self::Invalid { diagnostics, .. } => diagnostics,
            Self::Codegen(_) => &[],
        }
    }
}
