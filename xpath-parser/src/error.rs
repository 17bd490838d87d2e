//! Syntax error types
//!
//! Errors never abort a parse. The lexer turns unlexable input into error
//! tokens and the parser turns recovery points into [`SyntaxError`] values
//! alongside error nodes in the tree, so a parse always returns both.

use thiserror::Error;
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode, TextRange};

/// A problem found while lexing or parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that cannot start any XPath token.
    #[error("Illegal character '{character}'")]
    IllegalCharacter {
        /// The offending character
        character: char,
        /// Where it occurs
        range: TextRange,
    },

    /// A name followed by `::` that is not one of the thirteen axes.
    #[error("'{name}' is not a valid XPath axis")]
    InvalidAxisName {
        /// The text written before `::`
        name: String,
        /// Where it occurs
        range: TextRange,
    },

    /// A string literal with no closing quote.
    #[error("Unclosed string literal")]
    UnclosedLiteral {
        /// The literal from its opening quote to the end of input
        range: TextRange,
    },

    /// A token that no production accepts at this point.
    #[error("Unexpected token '{token}'")]
    UnexpectedToken {
        /// Source text of the token
        token: String,
        /// Where it occurs
        range: TextRange,
    },

    /// A specific token or construct was required.
    #[error("Expected {expected}")]
    ExpectedToken {
        /// Description of what was required
        expected: String,
        /// Where it was required
        range: TextRange,
    },

    /// Input ended in the middle of a production.
    #[error("Unexpected end of expression")]
    UnexpectedEof {
        /// Offset of the end of input
        offset: usize,
    },
}

impl SyntaxError {
    /// The source range the error is anchored at.
    pub fn range(&self) -> TextRange {
        match self {
            SyntaxError::IllegalCharacter { range, .. }
            | SyntaxError::InvalidAxisName { range, .. }
            | SyntaxError::UnclosedLiteral { range }
            | SyntaxError::UnexpectedToken { range, .. }
            | SyntaxError::ExpectedToken { range, .. } => *range,
            SyntaxError::UnexpectedEof { offset } => TextRange::empty_at(*offset),
        }
    }

    /// Convert to a host-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let builder = match self {
            SyntaxError::IllegalCharacter { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::IllegalCharacter)
            }
            SyntaxError::InvalidAxisName { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::BadAxisName)
            }
            SyntaxError::UnclosedLiteral { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::UnclosedString)
            }
            SyntaxError::UnexpectedToken { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::UnexpectedToken)
            }
            SyntaxError::ExpectedToken { expected, .. } => {
                DiagnosticBuilder::error(DiagnosticCode::ExpectedToken(expected.clone()))
            }
            SyntaxError::UnexpectedEof { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::UnexpectedEof)
            }
        };
        builder
            .with_message(self.to_string())
            .with_range(self.range())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn diagnostics_carry_range_and_message() {
        let error = SyntaxError::ExpectedToken {
            expected: "']'".to_string(),
            range: TextRange::new(4, 5),
        };
        let diagnostic = error.to_diagnostic();
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.message, "Expected ']'");
        assert_eq!(diagnostic.range, TextRange::new(4, 5));
    }

    #[test]
    fn eof_error_has_empty_range() {
        let error = SyntaxError::UnexpectedEof { offset: 7 };
        assert_eq!(error.range(), TextRange::empty_at(7));
        assert!(error.range().is_empty());
    }
}
