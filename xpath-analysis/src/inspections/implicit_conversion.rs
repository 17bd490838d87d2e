//! Flags expressions silently coerced to the type their position demands

use crate::context::AnalysisContext;
use crate::inspections::Inspection;
use crate::typing::{is_explicit_conversion, TypeEngine};
use xpath_ast::{Expr, ExprNode};
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder};
use xpath_types::{ConversionMatrix, XPathType};

/// Configuration of [`ImplicitConversion`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImplicitConversionOptions {
    /// Which (actual, expected) pairs are reported.
    pub matrix: ConversionMatrix,
    /// Also report explicit `string()`/`number()`/`boolean()` calls whose
    /// result type still diverges from the expected type.
    pub flag_explicit_conversions: bool,
    /// Suppress `string(nodeset)` in a boolean position. The idiom tests a
    /// node's string value for emptiness and is usually intentional.
    pub ignore_nodeset_to_boolean_via_string: bool,
}

impl Default for ImplicitConversionOptions {
    fn default() -> Self {
        Self {
            matrix: ConversionMatrix::default(),
            flag_explicit_conversions: true,
            ignore_nodeset_to_boolean_via_string: true,
        }
    }
}

/// Reports expressions whose static type diverges from the type their
/// syntactic position expects, where the conversion pair is enabled in the
/// matrix. Offers a quick-fix that makes the conversion explicit.
#[derive(Debug, Clone, Default)]
pub struct ImplicitConversion {
    /// The inspection's configuration.
    pub options: ImplicitConversionOptions,
}

impl ImplicitConversion {
    /// Create the inspection with the given options.
    pub fn new(options: ImplicitConversionOptions) -> Self {
        Self { options }
    }
}

impl Inspection for ImplicitConversion {
    fn id(&self) -> &'static str {
        "implicit-conversion"
    }

    fn check(&self, root: &ExprNode, context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let engine = TypeEngine::from_context(context);
        let mut diagnostics = Vec::new();
        self.visit(root, root, XPathType::Any, &engine, &mut diagnostics);
        diagnostics
    }
}

impl ImplicitConversion {
    fn visit(
        &self,
        root: &ExprNode,
        node: &ExprNode,
        expected: XPathType,
        engine: &TypeEngine<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        self.check_node(root, node, &expected, engine, diagnostics);
        for child in node.child_expressions() {
            // parentheses do not change what the position expects
            let child_expected = match &node.expr {
                Expr::Parenthesized { .. } => expected.clone(),
                _ => engine.expected_type(node, child),
            };
            self.visit(root, child, child_expected, engine, diagnostics);
        }
    }

    fn check_node(
        &self,
        root: &ExprNode,
        node: &ExprNode,
        expected: &XPathType,
        engine: &TypeEngine<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        // the inner expression carries the expectation instead
        if matches!(node.expr, Expr::Parenthesized { .. }) {
            return;
        }
        let expected = expected.value_category();
        if expected.is_abstract() || expected == XPathType::NodeSet {
            return;
        }
        let explicit = is_explicit_conversion(node);
        if explicit && !self.options.flag_explicit_conversions {
            return;
        }
        let actual = engine.type_in_tree(root, node).value_category();
        if !self.options.matrix.is_checked(&actual, &expected) {
            return;
        }
        if explicit
            && self.options.ignore_nodeset_to_boolean_via_string
            && actual == XPathType::String
            && expected == XPathType::Boolean
            && self.converts_a_nodeset(root, node, engine)
        {
            return;
        }

        let replacement = make_explicit(node, &expected, &actual);
        diagnostics.push(
            DiagnosticBuilder::implicit_conversion(&expected.name(), &actual.name())
                .with_range(node.range)
                .suggest("Make conversion explicit", Some(replacement))
                .build(),
        );
    }

    fn converts_a_nodeset(
        &self,
        root: &ExprNode,
        node: &ExprNode,
        engine: &TypeEngine<'_>,
    ) -> bool {
        match &node.expr {
            Expr::FunctionCall { arguments, .. } => arguments.first().is_some_and(|argument| {
                engine.type_in_tree(root, argument).value_category() == XPathType::NodeSet
            }),
            _ => false,
        }
    }
}

/// The replacement text that spells the conversion out. For an explicit
/// conversion call the inner argument is re-converted instead of wrapping
/// the call itself.
fn make_explicit(node: &ExprNode, expected: &XPathType, actual: &XPathType) -> String {
    let source = match &node.expr {
        Expr::FunctionCall { arguments, .. } if is_explicit_conversion(node) => {
            arguments[0].to_string()
        }
        _ => node.to_string(),
    };
    match (expected, actual) {
        (XPathType::Boolean, XPathType::String) => format!("string-length({}) > 0", source),
        (XPathType::Boolean, XPathType::NodeSet) => format!("count({}) > 0", source),
        (XPathType::Boolean, _) => format!("boolean({})", source),
        (XPathType::Number, _) => format!("number({})", source),
        _ => format!("string({})", source),
    }
}
