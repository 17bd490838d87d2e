//! Flags name tests outside the host's vocabulary
//!
//! When the host knows which element and attribute names can occur (from a
//! schema, a DTD, or the documents it has seen), a name test that matches
//! none of them is usually a typo.

use crate::context::AnalysisContext;
use crate::inspections::Inspection;
use std::collections::HashSet;
use xpath_ast::{walk, ExprNode, NodeTest, PrincipalNodeType, QName, Step, StepKind, Visitor};
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};

/// The vocabulary [`UnknownNodeTest`] checks against.
///
/// An empty name set disables checking for that node kind; the host may
/// know its elements but not its attributes, or vice versa.
#[derive(Debug, Clone, Default)]
pub struct UnknownNodeTestOptions {
    /// Element names that can occur in the host's documents.
    pub known_elements: HashSet<QName>,
    /// Attribute names that can occur in the host's documents.
    pub known_attributes: HashSet<QName>,
}

impl UnknownNodeTestOptions {
    /// Build a vocabulary from name iterators.
    pub fn with_names<E, A>(elements: E, attributes: A) -> Self
    where
        E: IntoIterator<Item = QName>,
        A: IntoIterator<Item = QName>,
    {
        Self {
            known_elements: elements.into_iter().collect(),
            known_attributes: attributes.into_iter().collect(),
        }
    }
}

/// Reports name tests that match nothing in the host's vocabulary.
/// Wildcard tests and node-type tests are never flagged.
#[derive(Debug, Clone, Default)]
pub struct UnknownNodeTest {
    /// The inspection's vocabulary.
    pub options: UnknownNodeTestOptions,
}

impl UnknownNodeTest {
    /// Create the inspection with the given vocabulary.
    pub fn new(options: UnknownNodeTestOptions) -> Self {
        Self { options }
    }
}

impl Inspection for UnknownNodeTest {
    fn id(&self) -> &'static str {
        "unknown-node-test"
    }

    fn check(&self, root: &ExprNode, _context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let mut scanner = Scanner {
            options: &self.options,
            diagnostics: Vec::new(),
        };
        walk(&mut scanner, root);
        scanner.diagnostics
    }
}

struct Scanner<'a> {
    options: &'a UnknownNodeTestOptions,
    diagnostics: Vec<Diagnostic>,
}

impl Visitor for Scanner<'_> {
    fn visit_node_test(&mut self, test: &NodeTest, step: &Step) {
        let Some(name) = test.qname() else {
            return;
        };
        if name.is_any_local() || name.is_any_prefix() {
            return;
        }
        let StepKind::Axis { test_range, .. } = &step.kind else {
            return;
        };

        let (known, code, kind) = match step.principal_node_type() {
            PrincipalNodeType::Element => (
                &self.options.known_elements,
                DiagnosticCode::UnknownElementName,
                "element",
            ),
            PrincipalNodeType::Attribute => (
                &self.options.known_attributes,
                DiagnosticCode::UnknownAttributeName,
                "attribute",
            ),
            PrincipalNodeType::Namespace => return,
        };
        if known.is_empty() || known.contains(name) {
            return;
        }

        self.diagnostics.push(
            DiagnosticBuilder::warning(code)
                .with_message(format!("Unknown {} name '{}'", kind, name))
                .with_range(*test_range)
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspections::test_support::TestContext;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xpath_parser::{parse, XPathVersion};

    fn vocabulary() -> UnknownNodeTestOptions {
        UnknownNodeTestOptions::with_names(
            [
                QName::local("book"),
                QName::local("title"),
                QName::prefixed("svg", "rect"),
            ],
            [QName::local("id"), QName::local("lang")],
        )
    }

    fn check(input: &str) -> Vec<Diagnostic> {
        let support = TestContext::new();
        let root = parse(input, XPathVersion::V1).root;
        UnknownNodeTest::new(vocabulary()).check(&root, &support.context())
    }

    #[rstest]
    #[case("book/title")]
    #[case("//book/@id")]
    #[case("svg:rect")]
    #[case("book/*")]
    #[case("*:rect")]
    #[case("book/text()")]
    #[case("ancestor::book")]
    fn known_and_wildcard_tests_pass(#[case] input: &str) {
        assert_eq!(check(input), vec![]);
    }

    #[rstest]
    #[case("book/titel", DiagnosticCode::UnknownElementName)]
    #[case("chapter", DiagnosticCode::UnknownElementName)]
    #[case("book/@idx", DiagnosticCode::UnknownAttributeName)]
    #[case("attribute::class", DiagnosticCode::UnknownAttributeName)]
    fn unknown_names_are_flagged(#[case] input: &str, #[case] code: DiagnosticCode) {
        let diagnostics = check(input);
        assert_eq!(diagnostics.len(), 1, "{} should be flagged", input);
        assert_eq!(diagnostics[0].code, code);
    }

    #[test]
    fn an_empty_vocabulary_disables_the_check() {
        let support = TestContext::new();
        let root = parse("anything/@at-all", XPathVersion::V1).root;
        let inspection = UnknownNodeTest::default();
        assert_eq!(inspection.check(&root, &support.context()), vec![]);
    }

    #[test]
    fn the_diagnostic_covers_the_name_test_only() {
        let diagnostics = check("book/titel[1]");
        assert_eq!(diagnostics[0].range.start, 5);
        assert_eq!(diagnostics[0].range.end, 10);
    }
}
