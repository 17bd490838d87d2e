//! Flags explicit conversions that do not change anything

use crate::context::AnalysisContext;
use crate::inspections::Inspection;
use crate::typing::{conversion_target, TypeEngine};
use xpath_ast::{Expr, ExprNode};
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder};
use xpath_types::XPathType;

/// Configuration of [`RedundantConversion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedundantConversionOptions {
    /// Also flag conversions in positions that accept any type, where the
    /// conversion cannot matter regardless of the argument's type.
    pub check_any: bool,
}

/// Reports `string()`/`number()`/`boolean()` calls whose argument already
/// has the target type. Offers a quick-fix that unwraps the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantConversion {
    /// The inspection's configuration.
    pub options: RedundantConversionOptions,
}

impl RedundantConversion {
    /// Create the inspection with the given options.
    pub fn new(options: RedundantConversionOptions) -> Self {
        Self { options }
    }
}

impl Inspection for RedundantConversion {
    fn id(&self) -> &'static str {
        "redundant-conversion"
    }

    fn check(&self, root: &ExprNode, context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let engine = TypeEngine::from_context(context);
        let mut diagnostics = Vec::new();
        self.visit(root, root, None, &engine, &mut diagnostics);
        diagnostics
    }
}

impl RedundantConversion {
    fn visit(
        &self,
        root: &ExprNode,
        node: &ExprNode,
        parent: Option<&ExprNode>,
        engine: &TypeEngine<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if let Some(target) = conversion_target(node) {
            self.check_conversion(root, node, parent, target, engine, diagnostics);
        }
        for child in node.child_expressions() {
            self.visit(root, child, Some(node), engine, diagnostics);
        }
    }

    fn check_conversion(
        &self,
        root: &ExprNode,
        node: &ExprNode,
        parent: Option<&ExprNode>,
        target: XPathType,
        engine: &TypeEngine<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Expr::FunctionCall { arguments, .. } = &node.expr else {
            return;
        };
        let argument = &arguments[0];
        let actual = engine.type_in_tree(root, argument).value_category();
        let expected = match parent {
            Some(parent) => engine.expected_type(parent, node),
            None => XPathType::Any,
        };

        let redundant = actual == target
            || (self.options.check_any && expected == XPathType::Any);
        if !redundant {
            return;
        }

        diagnostics.push(
            DiagnosticBuilder::redundant_conversion(&target.name())
                .with_range(node.range)
                .suggest(
                    "Remove redundant conversion",
                    Some(unwrapped(argument, parent)),
                )
                .build(),
        );
    }
}

/// The conversion's argument as replacement text. A binary argument spliced
/// into a binary parent needs parentheses to keep its precedence.
fn unwrapped(argument: &ExprNode, parent: Option<&ExprNode>) -> String {
    let needs_parens = matches!(argument.expr, Expr::Binary { .. })
        && matches!(parent.map(|p| &p.expr), Some(Expr::Binary { .. }));
    if needs_parens {
        format!("({})", argument)
    } else {
        argument.to_string()
    }
}
