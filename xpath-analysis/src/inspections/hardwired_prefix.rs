//! Flags string comparisons against prefixed names
//!
//! `name(.) = 'xsl:template'` breaks as soon as a document binds the
//! namespace to a different prefix. Matching on local-name() and
//! namespace-uri() is prefix-agnostic.

use crate::context::AnalysisContext;
use crate::inspections::Inspection;
use xpath_ast::{walk, BinaryOp, Expr, ExprNode, Visitor};
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};

/// Reports equality comparisons of `name()` with a literal that hardwires
/// a namespace prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwiredNamespacePrefix;

impl Inspection for HardwiredNamespacePrefix {
    fn id(&self) -> &'static str {
        "hardwired-namespace-prefix"
    }

    fn check(&self, root: &ExprNode, _context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let mut scanner = Scanner {
            diagnostics: Vec::new(),
        };
        walk(&mut scanner, root);
        scanner.diagnostics
    }
}

struct Scanner {
    diagnostics: Vec<Diagnostic>,
}

impl Visitor for Scanner {
    fn visit_expression(&mut self, node: &ExprNode) {
        let Expr::Binary { op, left, right } = &node.expr else {
            return;
        };
        if !matches!(op, BinaryOp::Eq | BinaryOp::NotEq) {
            return;
        }
        for (call, literal) in [(left, right), (right, left)] {
            if is_name_call(call) {
                if let Some(range) = prefixed_literal(literal) {
                    self.diagnostics.push(
                        DiagnosticBuilder::warning(DiagnosticCode::HardwiredNamespacePrefix)
                            .with_message(
                                "Comparison of name() with a literal containing a \
                                 hardwired namespace prefix",
                            )
                            .with_range(range)
                            .suggest(
                                "Compare local-name() and namespace-uri() instead",
                                None,
                            )
                            .build(),
                    );
                }
            }
        }
    }
}

fn is_name_call(node: &ExprNode) -> bool {
    match &node.unparenthesize().expr {
        Expr::FunctionCall { name, arguments } => {
            name.prefix.is_none() && name.local == "name" && arguments.len() <= 1
        }
        _ => false,
    }
}

/// The range of a string literal whose value contains a prefix colon.
fn prefixed_literal(node: &ExprNode) -> Option<xpath_diagnostics::TextRange> {
    let inner = node.unparenthesize();
    let literal = inner.as_literal()?;
    literal.value().contains(':').then_some(inner.range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspections::test_support::TestContext;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xpath_parser::{parse, XPathVersion};

    fn check(input: &str) -> Vec<Diagnostic> {
        let support = TestContext::new();
        let root = parse(input, XPathVersion::V1).root;
        HardwiredNamespacePrefix.check(&root, &support.context())
    }

    #[rstest]
    #[case("name() = 'xsl:template'")]
    #[case("name(.) != 'svg:rect'")]
    #[case("'xsl:template' = name()")]
    #[case("a[name() = 'xsl:for-each']")]
    fn prefixed_name_comparisons_are_flagged(#[case] input: &str) {
        let diagnostics = check(input);
        assert_eq!(diagnostics.len(), 1, "{} should be flagged", input);
        assert_eq!(
            diagnostics[0].code,
            DiagnosticCode::HardwiredNamespacePrefix
        );
    }

    #[rstest]
    #[case("name() = 'template'")]
    #[case("local-name() = 'xsl:template'")]
    #[case("name() < 'xsl:template'")]
    #[case("@id = 'svg:rect'")]
    fn other_comparisons_are_left_alone(#[case] input: &str) {
        assert_eq!(check(input), vec![]);
    }

    #[test]
    fn the_diagnostic_is_anchored_at_the_literal() {
        let diagnostics = check("name() = 'xsl:template'");
        assert_eq!(diagnostics[0].range.start, 9);
        assert_eq!(diagnostics[0].range.end, 23);
    }
}
