//! Builder pattern for constructing diagnostics

use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity, Suggestion};
use crate::location::TextRange;

/// Fluent builder for [`Diagnostic`] values.
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    range: TextRange,
    suggestions: Vec<Suggestion>,
}

impl DiagnosticBuilder {
    fn new(severity: Severity, code: DiagnosticCode) -> Self {
        Self {
            severity,
            code,
            message: String::new(),
            range: TextRange::default(),
            suggestions: Vec::new(),
        }
    }

    /// Start an error diagnostic.
    pub fn error(code: DiagnosticCode) -> Self {
        Self::new(Severity::Error, code)
    }

    /// Start a warning diagnostic.
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::new(Severity::Warning, code)
    }

    /// Start an info diagnostic.
    pub fn info(code: DiagnosticCode) -> Self {
        Self::new(Severity::Info, code)
    }

    /// Start a hint diagnostic.
    pub fn hint(code: DiagnosticCode) -> Self {
        Self::new(Severity::Hint, code)
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the text range the diagnostic is anchored at.
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    /// Add a suggestion anchored at the diagnostic's own range.
    pub fn suggest(mut self, message: impl Into<String>, replacement: Option<String>) -> Self {
        self.suggestions.push(Suggestion {
            message: message.into(),
            replacement,
            range: self.range,
        });
        self
    }

    /// Add a suggestion replacing a specific range.
    pub fn suggest_at(
        mut self,
        message: impl Into<String>,
        replacement: impl Into<String>,
        range: TextRange,
    ) -> Self {
        self.suggestions.push(Suggestion {
            message: message.into(),
            replacement: Some(replacement.into()),
            range,
        });
        self
    }

    /// Build the diagnostic.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            severity: self.severity,
            code: self.code,
            message: self.message,
            range: self.range,
            suggestions: self.suggestions,
        }
    }
}

// Convenience constructors for diagnostics reported by multiple callers.
impl DiagnosticBuilder {
    /// An "unknown function" error.
    pub fn unknown_function(name: &str) -> Self {
        Self::error(DiagnosticCode::UnknownFunction)
            .with_message(format!("Unknown function '{}'", name))
    }

    /// An "undefined variable" error.
    pub fn undefined_variable(name: &str) -> Self {
        Self::error(DiagnosticCode::UndefinedVariable)
            .with_message(format!("Undefined variable '${}'", name))
    }

    /// An "expected token" syntax error.
    pub fn expected_token(token: &str) -> Self {
        Self::error(DiagnosticCode::ExpectedToken(token.to_string()))
            .with_message(format!("Expected '{}'", token))
    }

    /// An "implicit conversion" warning.
    pub fn implicit_conversion(expected: &str, actual: &str) -> Self {
        Self::warning(DiagnosticCode::ImplicitConversion {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
        .with_message(format!("Expression should be of type '{}'", expected))
    }

    /// A "redundant conversion" warning.
    pub fn redundant_conversion(type_name: &str) -> Self {
        Self::warning(DiagnosticCode::RedundantConversion(type_name.to_string()))
            .with_message(format!("Redundant conversion to type '{}'", type_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_collects_fields() {
        let d = DiagnosticBuilder::unknown_function("positon")
            .with_range(TextRange::new(0, 7))
            .suggest("Did you mean 'position'?", Some("position".to_string()))
            .build();

        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "Unknown function 'positon'");
        assert_eq!(d.suggestions.len(), 1);
        assert_eq!(d.suggestions[0].range, TextRange::new(0, 7));
    }

    #[test]
    fn implicit_conversion_message() {
        let d = DiagnosticBuilder::implicit_conversion("boolean", "string").build();
        assert_eq!(d.message, "Expression should be of type 'boolean'");
        assert!(d.is_warning());
    }
}
