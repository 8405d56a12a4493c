//! Syntax failures.
//!
//! The grammar does not attempt recovery: the first failure ends parsing of
//! the template section.

use thiserror::Error;
use wolf_source::Span;

/// Result type for grammar operations.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// A terminal syntax failure in a template section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected {found}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("unterminated {what}")]
    Unterminated { what: &'static str, span: Span },

    #[error("mismatched bracket: expected `{expected}`, found `{found}`")]
    MismatchedBracket {
        expected: char,
        found: char,
        span: Span,
    },

    #[error("indentation does not match any enclosing level")]
    InconsistentDedent { span: Span },

    #[error("unexpected indentation: the previous line does not take a block")]
    UnexpectedIndent { span: Span },

    #[error("unterminated `{{{{` interpolation")]
    UnterminatedInterpolation { span: Span },
}

impl SyntaxError {
    /// The span where the failure occurred.
    pub fn span(&self) -> Span {
        match self {
            Self::Unexpected { span, .. }
            | Self::Unterminated { span, .. }
            | Self::MismatchedBracket { span, .. }
            | Self::InconsistentDedent { span }
            | Self::UnexpectedIndent { span }
            | Self::UnterminatedInterpolation { span } => *span,
        }
    }

    /// Stable title, in the same style as diagnostic codes.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Unexpected { .. } => "SYNTAX_UNEXPECTED",
            Self::Unterminated { .. } => "SYNTAX_UNTERMINATED",
            Self::MismatchedBracket { .. } => "SYNTAX_MISMATCHED_BRACKET",
            Self::InconsistentDedent { .. } => "SYNTAX_INCONSISTENT_DEDENT",
            Self::UnexpectedIndent { .. } => "SYNTAX_UNEXPECTED_INDENT",
            Self::UnterminatedInterpolation { .. } => "SYNTAX_UNTERMINATED_INTERPOLATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SyntaxError::UnterminatedInterpolation {
            span: Span::new(3, 5),
        };
        assert_eq!(err.to_string(), "unterminated `{{` interpolation");
        assert_eq!(err.span(), Span::new(3, 5));

        let err = SyntaxError::MismatchedBracket {
            expected: ')',
            found: ']',
            span: Span::new(0, 1),
        };
        assert_eq!(err.to_string(), "mismatched bracket: expected `)`, found `]`");
        assert_eq!(err.title(), "SYNTAX_MISMATCHED_BRACKET");
    }
}
