//! Flags references that resolve to nothing

use crate::context::AnalysisContext;
use crate::inspections::Inspection;
use xpath_ast::{Binding, Expr, ExprNode};
use xpath_diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};

/// Reports variable references and function calls that neither the
/// expression's own bindings nor the host context can resolve.
///
/// Prefixed function names are only checked for arity; the host may support
/// extension functions it does not enumerate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnresolvedNames;

impl Inspection for UnresolvedNames {
    fn id(&self) -> &'static str {
        "unresolved-names"
    }

    fn check(&self, root: &ExprNode, context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        visit(root, context, &mut Vec::new(), &mut diagnostics);
        diagnostics
    }
}

fn visit<'t>(
    node: &'t ExprNode,
    context: &AnalysisContext<'_>,
    scope: &mut Vec<&'t Binding>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match &node.expr {
        Expr::VariableReference { name } => {
            let bound = scope.iter().any(|binding| &binding.name == name);
            if !bound && context.variables.resolve(name).is_none() {
                diagnostics.push(
                    DiagnosticBuilder::undefined_variable(&name.to_string())
                        .with_range(node.range)
                        .build(),
                );
            }
        }
        Expr::FunctionCall { name, arguments } => {
            if context.functions.resolve(name, arguments.len()).is_none() {
                check_call(node, context, diagnostics);
            }
            for argument in arguments {
                visit(argument, context, scope, diagnostics);
            }
        }
        Expr::For { bindings, body } => {
            let depth = scope.len();
            for binding in bindings {
                visit(&binding.sequence, context, scope, diagnostics);
                scope.push(binding);
            }
            visit(body, context, scope, diagnostics);
            scope.truncate(depth);
        }
        Expr::Quantified { bindings, test, .. } => {
            let depth = scope.len();
            for binding in bindings {
                visit(&binding.sequence, context, scope, diagnostics);
                scope.push(binding);
            }
            visit(test, context, scope, diagnostics);
            scope.truncate(depth);
        }
        _ => {
            for child in node.child_expressions() {
                visit(child, context, scope, diagnostics);
            }
        }
    }
}

fn check_call(
    node: &ExprNode,
    context: &AnalysisContext<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Expr::FunctionCall { name, arguments } = &node.expr else {
        return;
    };
    // known name, wrong argument count
    let declared = context
        .functions
        .functions()
        .into_iter()
        .find(|function| &function.name == name);
    if let Some(function) = declared {
        diagnostics.push(
            DiagnosticBuilder::error(DiagnosticCode::InvalidArity)
                .with_message(format!(
                    "'{}' does not take {} argument(s); its signature is {}",
                    name,
                    arguments.len(),
                    function.build_signature()
                ))
                .with_range(node.range)
                .build(),
        );
        return;
    }
    if name.prefix.is_none() {
        diagnostics.push(
            DiagnosticBuilder::unknown_function(&name.to_string())
                .with_range(node.range)
                .build(),
        );
    }
}
