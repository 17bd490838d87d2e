//! Core diagnostic types

use crate::location::TextRange;
use std::fmt;

/// Diagnostic severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Subtle suggestion for improvement
    Hint,
    /// Helpful information
    #[default]
    Info,
    /// Likely a problem, but the expression still evaluates
    Warning,
    /// Prevents meaningful evaluation
    Error,
}

/// Stable codes identifying the kind of problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    // Lexical problems
    /// A character that cannot start any XPath token
    IllegalCharacter,
    /// A name followed by `::` that is not a known axis
    BadAxisName,
    /// String literal without a closing quote
    UnclosedString,
    /// Malformed number literal
    InvalidNumber,

    // Syntax problems
    /// Token that no production accepts at this point
    UnexpectedToken,
    /// A specific token was required
    ExpectedToken(String),
    /// Input ended in the middle of a production
    UnexpectedEof,

    // Type problems
    /// Expression type silently converted to the expected type
    ImplicitConversion {
        /// Type the syntactic position demands
        expected: String,
        /// Type the expression actually has
        actual: String,
    },
    /// Explicit conversion that does not change the type
    RedundantConversion(String),

    // Semantic problems
    /// Numeric predicate literally `0` (predicates are 1-indexed)
    IndexZeroPredicate,
    /// `position()` compared against `0`
    PositionComparedToZero,
    /// `name(..) = 'prefix:local'` string comparison
    HardwiredNamespacePrefix,
    /// Name test not found in the set of known element names
    UnknownElementName,
    /// Name test not found in the set of known attribute names
    UnknownAttributeName,
    /// Variable reference that resolves to nothing
    UndefinedVariable,
    /// Function call that resolves to nothing
    UnknownFunction,
    /// Function called with an unsupported number of arguments
    InvalidArity,

    /// Escape hatch for host-defined checks
    Custom(String),
}

impl DiagnosticCode {
    /// Short machine-readable code, stable across releases.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::IllegalCharacter => "XP0001",
            DiagnosticCode::BadAxisName => "XP0002",
            DiagnosticCode::UnclosedString => "XP0003",
            DiagnosticCode::InvalidNumber => "XP0004",
            DiagnosticCode::UnexpectedToken => "XP0101",
            DiagnosticCode::ExpectedToken(_) => "XP0102",
            DiagnosticCode::UnexpectedEof => "XP0103",
            DiagnosticCode::ImplicitConversion { .. } => "XP0201",
            DiagnosticCode::RedundantConversion(_) => "XP0202",
            DiagnosticCode::IndexZeroPredicate => "XP0301",
            DiagnosticCode::PositionComparedToZero => "XP0302",
            DiagnosticCode::HardwiredNamespacePrefix => "XP0303",
            DiagnosticCode::UnknownElementName => "XP0304",
            DiagnosticCode::UnknownAttributeName => "XP0305",
            DiagnosticCode::UndefinedVariable => "XP0306",
            DiagnosticCode::UnknownFunction => "XP0307",
            DiagnosticCode::InvalidArity => "XP0308",
            DiagnosticCode::Custom(_) => "XP9999",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::IllegalCharacter => write!(f, "illegal character"),
            DiagnosticCode::BadAxisName => write!(f, "bad axis name"),
            DiagnosticCode::UnclosedString => write!(f, "unclosed string literal"),
            DiagnosticCode::InvalidNumber => write!(f, "invalid number literal"),
            DiagnosticCode::UnexpectedToken => write!(f, "unexpected token"),
            DiagnosticCode::ExpectedToken(token) => write!(f, "expected '{}'", token),
            DiagnosticCode::UnexpectedEof => write!(f, "unexpected end of expression"),
            DiagnosticCode::ImplicitConversion { expected, actual } => {
                write!(f, "implicit conversion from {} to {}", actual, expected)
            }
            DiagnosticCode::RedundantConversion(ty) => {
                write!(f, "redundant conversion to {}", ty)
            }
            DiagnosticCode::IndexZeroPredicate => write!(f, "index 0 used in predicate"),
            DiagnosticCode::PositionComparedToZero => write!(f, "position() compared to 0"),
            DiagnosticCode::HardwiredNamespacePrefix => write!(f, "hardwired namespace prefix"),
            DiagnosticCode::UnknownElementName => write!(f, "unknown element name"),
            DiagnosticCode::UnknownAttributeName => write!(f, "unknown attribute name"),
            DiagnosticCode::UndefinedVariable => write!(f, "undefined variable"),
            DiagnosticCode::UnknownFunction => write!(f, "unknown function"),
            DiagnosticCode::InvalidArity => write!(f, "invalid number of arguments"),
            DiagnosticCode::Custom(code) => write!(f, "{}", code),
        }
    }
}

/// A proposed textual fix for a diagnostic.
///
/// The replacement is plain XPath source; the host splices it over `range`
/// in the original expression. The core never mutates a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    /// Human-readable description of the fix
    pub message: String,
    /// Replacement source text, if the fix is automatic
    pub replacement: Option<String>,
    /// Range the replacement applies to
    pub range: TextRange,
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// How severe the problem is
    pub severity: Severity,
    /// Stable problem code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Where in the expression the problem is anchored
    pub range: TextRange,
    /// Optional quick-fixes
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    /// Create a new diagnostic without suggestions.
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        range: TextRange,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            range,
            suggestions: Vec::new(),
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this diagnostic is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} at {}",
            self.severity,
            self.code.as_str(),
            self.message,
            self.range
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Hint);
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(
            Severity::Warning,
            DiagnosticCode::IndexZeroPredicate,
            "Use of 0 as predicate index",
            TextRange::new(4, 5),
        );
        assert!(d.is_warning());
        assert_eq!(
            d.to_string(),
            "warning [XP0301] Use of 0 as predicate index at 4..5"
        );
    }
}
