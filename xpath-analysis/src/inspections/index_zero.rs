//! Flags predicates that can never select anything
//!
//! XPath predicates are 1-based: `item[0]` selects nothing, and
//! `position()` never returns 0. Both almost always mean the author was
//! thinking in 0-based indices.

use crate::context::AnalysisContext;
use crate::inspections::Inspection;
use xpath_ast::{walk, BinaryOp, Expr, ExprNode, Visitor};
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};

/// Reports `[0]` predicates and comparisons of `position()` against 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexZero;

impl Inspection for IndexZero {
    fn id(&self) -> &'static str {
        "index-zero-predicate"
    }

    fn check(&self, root: &ExprNode, _context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let mut checker = PredicateChecker {
            diagnostics: Vec::new(),
        };
        walk(&mut checker, root);
        checker.diagnostics
    }
}

struct PredicateChecker {
    diagnostics: Vec<Diagnostic>,
}

impl Visitor for PredicateChecker {
    fn visit_predicate(&mut self, predicate: &ExprNode) {
        let inner = predicate.unparenthesize();
        if is_zero(inner) {
            self.diagnostics.push(
                DiagnosticBuilder::warning(DiagnosticCode::IndexZeroPredicate)
                    .with_message("Use of 0 as predicate index; predicates are 1-based")
                    .with_range(inner.range)
                    .build(),
            );
            return;
        }
        if let Expr::Binary { op, left, right } = &inner.expr {
            if compares_position_to_zero(*op, left, right) {
                self.diagnostics.push(
                    DiagnosticBuilder::warning(DiagnosticCode::PositionComparedToZero)
                        .with_message("position() is 1-based and can never be 0")
                        .with_range(inner.range)
                        .build(),
                );
            }
        }
    }
}

fn is_zero(node: &ExprNode) -> bool {
    node.unparenthesize()
        .as_number()
        .is_some_and(|number| number.value() == 0.0)
}

fn is_position_call(node: &ExprNode) -> bool {
    match &node.unparenthesize().expr {
        Expr::FunctionCall { name, arguments } => {
            name.prefix.is_none() && name.local == "position" && arguments.is_empty()
        }
        _ => false,
    }
}

/// True for the comparisons that are always false (or always true) because
/// position() starts at 1: `position() = 0`, `position() <= 0`,
/// `position() < 0` and their mirrored forms.
fn compares_position_to_zero(op: BinaryOp, left: &ExprNode, right: &ExprNode) -> bool {
    if is_position_call(left) && is_zero(right) {
        return matches!(op, BinaryOp::Eq | BinaryOp::Lt | BinaryOp::LtEq);
    }
    if is_zero(left) && is_position_call(right) {
        return matches!(op, BinaryOp::Eq | BinaryOp::Gt | BinaryOp::GtEq);
    }
    false
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
        IndexZero.check(&root, &support.context())
    }

    #[rstest]
    #[case("item[0]")]
    #[case("item[(0)]")]
    #[case("item[0.0]")]
    #[case("$items[0]")]
    #[case("a/b[0]/c")]
    fn zero_index_predicates_are_flagged(#[case] input: &str) {
        let diagnostics = check(input);
        assert_eq!(diagnostics.len(), 1, "{} should be flagged", input);
        assert_eq!(diagnostics[0].code, DiagnosticCode::IndexZeroPredicate);
    }

    #[rstest]
    #[case("item[position() = 0]")]
    #[case("item[0 = position()]")]
    #[case("item[position() <= 0]")]
    #[case("item[0 >= position()]")]
    #[case("item[position() < 0]")]
    fn position_compared_to_zero_is_flagged(#[case] input: &str) {
        let diagnostics = check(input);
        assert_eq!(diagnostics.len(), 1, "{} should be flagged", input);
        assert_eq!(diagnostics[0].code, DiagnosticCode::PositionComparedToZero);
    }

    #[rstest]
    #[case("item[1]")]
    #[case("item[last()]")]
    #[case("item[position() > 0]")]
    #[case("item[position() != 0]")]
    #[case("item[position() = 1]")]
    #[case("substring(a, 0)")]
    fn valid_predicates_are_left_alone(#[case] input: &str) {
        assert_eq!(check(input), vec![]);
    }

    #[test]
    fn the_diagnostic_is_anchored_at_the_literal() {
        let diagnostics = check("chapter[0]");
        assert_eq!(diagnostics[0].range.start, 8);
        assert_eq!(diagnostics[0].range.end, 9);
    }
}
