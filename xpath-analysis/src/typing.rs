//! Static type computation
//!
//! `type_of` is total: every tree node has a type, with `Unknown` standing
//! in for anything unresolvable. Expected types describe what a syntactic
//! position demands and drive the conversion inspections.

use crate::context::{AnalysisContext, FunctionContext, VariableContext};
use xpath_ast::{BinaryOp, Binding, Expr, ExprNode};
use xpath_types::{AtomicType, Cardinality, XPathType};

/// Whether the node is a call to `string()`, `number()` or `boolean()`
/// with a single argument, i.e. a conversion applied to change a value's
/// type rather than to compute something.
pub fn is_explicit_conversion(node: &ExprNode) -> bool {
    conversion_target(node).is_some()
}

/// The target type of an explicit conversion call, if the node is one.
pub fn conversion_target(node: &ExprNode) -> Option<XPathType> {
    match &node.expr {
        Expr::FunctionCall { name, arguments }
            if name.prefix.is_none() && arguments.len() == 1 =>
        {
            match name.local.as_str() {
                "string" => Some(XPathType::String),
                "number" => Some(XPathType::Number),
                "boolean" => Some(XPathType::Boolean),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Variable bindings of `for` and quantified expressions that are visible
/// at `target`, outermost first. `target` must be a node inside `root`.
pub fn bindings_in_scope<'t>(root: &'t ExprNode, target: &ExprNode) -> Vec<&'t Binding> {
    let mut scope = Vec::new();
    find_scope(root, target, &mut scope);
    scope
}

fn find_scope<'t>(node: &'t ExprNode, target: &ExprNode, scope: &mut Vec<&'t Binding>) -> bool {
    if std::ptr::eq(node, target) {
        return true;
    }
    match &node.expr {
        Expr::For { bindings, body } => {
            let depth = scope.len();
            for binding in bindings {
                // a binding sequence sees only the bindings before it
                if find_scope(&binding.sequence, target, scope) {
                    return true;
                }
                scope.push(binding);
            }
            if find_scope(body, target, scope) {
                return true;
            }
            scope.truncate(depth);
            false
        }
        Expr::Quantified { bindings, test, .. } => {
            let depth = scope.len();
            for binding in bindings {
                if find_scope(&binding.sequence, target, scope) {
                    return true;
                }
                scope.push(binding);
            }
            if find_scope(test, target, scope) {
                return true;
            }
            scope.truncate(depth);
            false
        }
        _ => {
            for child in node.child_expressions() {
                if find_scope(child, target, scope) {
                    return true;
                }
            }
            false
        }
    }
}

/// Computes static types against the host's resolution contracts.
pub struct TypeEngine<'a> {
    functions: &'a dyn FunctionContext,
    variables: &'a dyn VariableContext,
}

impl<'a> TypeEngine<'a> {
    /// Create an engine over the given contexts.
    pub fn new(
        functions: &'a dyn FunctionContext,
        variables: &'a dyn VariableContext,
    ) -> Self {
        Self {
            functions,
            variables,
        }
    }

    /// Create an engine from a bundled analysis context.
    pub fn from_context(context: &AnalysisContext<'a>) -> Self {
        Self::new(context.functions, context.variables)
    }

    /// The static type of a node, ignoring any enclosing `for`/quantifier
    /// bindings. Free variables resolve against the host context only.
    pub fn type_of(&self, node: &ExprNode) -> XPathType {
        let mut scope = Vec::new();
        self.type_of_scoped(node, &mut scope)
    }

    /// The static type of `node` as it appears inside `root`, with
    /// enclosing binding scopes in effect.
    pub fn type_in_tree(&self, root: &ExprNode, node: &ExprNode) -> XPathType {
        let mut scope = bindings_in_scope(root, node);
        self.type_of_scoped(node, &mut scope)
    }

    fn type_of_scoped<'t>(
        &self,
        node: &'t ExprNode,
        scope: &mut Vec<&'t Binding>,
    ) -> XPathType {
        match &node.expr {
            Expr::Number(_) => XPathType::Number,
            Expr::Literal(_) => XPathType::String,
            Expr::Binary { op, .. } => {
                if op.is_logical() || op.is_comparison() {
                    XPathType::Boolean
                } else if op.is_arithmetic() {
                    XPathType::Number
                } else {
                    XPathType::NodeSet
                }
            }
            Expr::Negation { .. } => XPathType::Number,
            Expr::Parenthesized { inner } => self.type_of_scoped(inner, scope),
            Expr::Filter { primary, .. } => self.type_of_scoped(primary, scope),
            Expr::FunctionCall { name, arguments } => self
                .functions
                .resolve(name, arguments.len())
                .map(|f| f.return_type.clone())
                .unwrap_or(XPathType::Unknown),
            Expr::Path(_) => XPathType::NodeSet,
            Expr::VariableReference { name } => {
                if let Some(index) = scope.iter().rposition(|b| &b.name == name) {
                    let binding = scope[index];
                    let mut outer: Vec<&Binding> = scope[..index].to_vec();
                    let sequence_type = self.type_of_scoped(&binding.sequence, &mut outer);
                    return binding_item_type(sequence_type);
                }
                self.variables
                    .resolve(name)
                    .map(|v| v.ty)
                    .unwrap_or(XPathType::Unknown)
            }
            Expr::For { bindings, body } => {
                let depth = scope.len();
                scope.extend(bindings.iter());
                let body_type = self.type_of_scoped(body, scope);
                scope.truncate(depth);
                body_type
            }
            Expr::Quantified { .. } => XPathType::Boolean,
            Expr::If {
                then_branch,
                else_branch,
                ..
            } => {
                let then_type = self.type_of_scoped(then_branch, scope);
                let else_type = self.type_of_scoped(else_branch, scope);
                if then_type == else_type {
                    then_type
                } else {
                    XPathType::Any
                }
            }
            Expr::Range { .. } => XPathType::sequence(
                XPathType::Atomic(AtomicType::Integer),
                Cardinality::ZeroOrMore,
            ),
            Expr::Sequence { items } => {
                let mut item_type: Option<XPathType> = None;
                for item in items {
                    let ty = self.type_of_scoped(item, scope);
                    match &item_type {
                        None => item_type = Some(ty),
                        Some(seen) if *seen == ty => {}
                        Some(_) => {
                            item_type = Some(XPathType::Any);
                            break;
                        }
                    }
                }
                XPathType::sequence(
                    item_type.unwrap_or(XPathType::Any),
                    Cardinality::ZeroOrMore,
                )
            }
            Expr::TypeExpr { op, target, .. } => match op {
                xpath_ast::TypeOp::InstanceOf | xpath_ast::TypeOp::CastableAs => {
                    XPathType::Boolean
                }
                xpath_ast::TypeOp::CastAs | xpath_ast::TypeOp::TreatAs => {
                    target.declared_type()
                }
            },
            Expr::Error { .. } => XPathType::Unknown,
        }
    }

    /// The type a child position demands. `child` must be one of
    /// `parent`'s direct child expressions; positions with no constraint
    /// yield `Any`.
    pub fn expected_type(&self, parent: &ExprNode, child: &ExprNode) -> XPathType {
        match &parent.expr {
            Expr::Binary { op, .. } => match op {
                BinaryOp::And | BinaryOp::Or => XPathType::Boolean,
                BinaryOp::Eq | BinaryOp::NotEq => XPathType::Any,
                BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                    XPathType::Number
                }
                BinaryOp::Plus
                | BinaryOp::Minus
                | BinaryOp::Mult
                | BinaryOp::Div
                | BinaryOp::Mod => XPathType::Number,
                BinaryOp::Union => XPathType::NodeSet,
            },
            Expr::Negation { .. } => XPathType::Number,
            Expr::Filter {
                primary,
                predicates,
            } => {
                if std::ptr::eq(primary.as_ref(), child) {
                    XPathType::Any
                } else if predicates.iter().any(|p| std::ptr::eq(p, child)) {
                    self.predicate_expected(child)
                } else {
                    XPathType::Any
                }
            }
            Expr::FunctionCall { name, arguments } => {
                let index = arguments.iter().position(|a| std::ptr::eq(a, child));
                match (index, self.functions.resolve(name, arguments.len())) {
                    (Some(index), Some(function)) => function
                        .parameter_type(index)
                        .cloned()
                        .unwrap_or(XPathType::Unknown),
                    _ => XPathType::Unknown,
                }
            }
            Expr::Path(path) => {
                let is_predicate = path
                    .steps
                    .iter()
                    .flat_map(|s| s.predicates.iter())
                    .any(|p| std::ptr::eq(p, child));
                if is_predicate {
                    self.predicate_expected(child)
                } else {
                    XPathType::Any
                }
            }
            Expr::Quantified { test, .. } => {
                if std::ptr::eq(test.as_ref(), child) {
                    XPathType::Boolean
                } else {
                    XPathType::Any
                }
            }
            Expr::If { condition, .. } => {
                if std::ptr::eq(condition.as_ref(), child) {
                    XPathType::Boolean
                } else {
                    XPathType::Any
                }
            }
            Expr::Range { .. } => XPathType::Number,
            _ => XPathType::Any,
        }
    }

    /// Predicates are numeric position filters or boolean filters; a
    /// numeric expression keeps its numeric expectation, everything else is
    /// expected to be boolean.
    fn predicate_expected(&self, predicate: &ExprNode) -> XPathType {
        if self.type_of(predicate).value_category() == XPathType::Number {
            XPathType::Number
        } else {
            XPathType::Boolean
        }
    }
}

/// A `for`/quantifier variable ranges over its sequence's items.
fn binding_item_type(sequence_type: XPathType) -> XPathType {
    match sequence_type {
        XPathType::Sequence { item, .. } => *item,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleVariableContext;
    use crate::functions::CoreFunctionContext;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xpath_ast::QName;
    use xpath_parser::{parse, XPathVersion};

    fn engine_type(input: &str, version: XPathVersion) -> XPathType {
        let functions = CoreFunctionContext::new();
        let mut variables = SimpleVariableContext::new();
        variables.define(QName::local("nodes"), XPathType::NodeSet);
        let engine = TypeEngine::new(&functions, &variables);
        let result = parse(input, version);
        engine.type_of(&result.root)
    }

    #[rstest]
    #[case("42", XPathType::Number)]
    #[case("'text'", XPathType::String)]
    #[case("1 + 2", XPathType::Number)]
    #[case("a and b", XPathType::Boolean)]
    #[case("a = b", XPathType::Boolean)]
    #[case("a < b", XPathType::Boolean)]
    #[case("a | b", XPathType::NodeSet)]
    #[case("-x", XPathType::Number)]
    #[case("//a/b", XPathType::NodeSet)]
    #[case("count(//a)", XPathType::Number)]
    #[case("string(1)", XPathType::String)]
    #[case("$nodes", XPathType::NodeSet)]
    #[case("$undefined", XPathType::Unknown)]
    #[case("unknown-fn(1)", XPathType::Unknown)]
    #[case("(string(1))", XPathType::String)]
    #[case("$nodes[1]", XPathType::NodeSet)]
    fn xpath1_types(#[case] input: &str, #[case] expected: XPathType) {
        assert_eq!(engine_type(input, XPathVersion::V1), expected);
    }

    #[rstest]
    #[case("some $x in //a satisfies $x", XPathType::Boolean)]
    #[case("if (a) then 1 else 2", XPathType::Number)]
    #[case("if (a) then 1 else 'b'", XPathType::Any)]
    #[case("$x cast as xs:string", XPathType::Atomic(AtomicType::String))]
    #[case("$x castable as xs:string", XPathType::Boolean)]
    #[case("$x instance of xs:integer", XPathType::Boolean)]
    fn xpath2_types(#[case] input: &str, #[case] expected: XPathType) {
        assert_eq!(engine_type(input, XPathVersion::V2), expected);
    }

    #[test]
    fn range_is_an_integer_sequence() {
        assert_eq!(
            engine_type("1 to 5", XPathVersion::V2),
            XPathType::sequence(
                XPathType::Atomic(AtomicType::Integer),
                Cardinality::ZeroOrMore
            )
        );
    }

    #[test]
    fn for_expression_takes_the_body_type() {
        assert_eq!(
            engine_type("for $x in //a return count($x)", XPathVersion::V2),
            XPathType::Number
        );
    }

    #[test]
    fn bound_variables_resolve_to_the_binding() {
        let functions = CoreFunctionContext::new();
        let variables = SimpleVariableContext::new();
        let engine = TypeEngine::new(&functions, &variables);
        let result = parse("for $x in //a return $x", XPathVersion::V2);
        // the body's type is the binding's item type, a node set
        assert_eq!(engine.type_of(&result.root), XPathType::NodeSet);
    }

    #[test]
    fn scope_aware_typing_from_the_root() {
        let functions = CoreFunctionContext::new();
        let variables = SimpleVariableContext::new();
        let engine = TypeEngine::new(&functions, &variables);
        let result = parse("some $n in //a satisfies $n = 1", XPathVersion::V2);
        let Expr::Quantified { test, .. } = &result.root.expr else {
            panic!("expected quantified expression");
        };
        let Expr::Binary { left, .. } = &test.expr else {
            panic!("expected comparison");
        };
        // $n is Unknown without scope, NodeSet with it
        assert_eq!(engine.type_of(left), XPathType::Unknown);
        assert_eq!(engine.type_in_tree(&result.root, left), XPathType::NodeSet);
    }

    #[test]
    fn type_function_is_total_on_error_trees() {
        let functions = CoreFunctionContext::new();
        let variables = SimpleVariableContext::new();
        let engine = TypeEngine::new(&functions, &variables);
        for input in ["", "1 +", "a[", "::", "string("] {
            let result = parse(input, XPathVersion::V1);
            let _ = engine.type_of(&result.root);
        }
    }

    #[test]
    fn explicit_conversion_detection() {
        let string_call = parse("string(a)", XPathVersion::V1).root;
        assert!(is_explicit_conversion(&string_call));
        assert_eq!(
            conversion_target(&string_call),
            Some(XPathType::String)
        );

        // two arguments make it an ordinary call
        let concat = parse("concat(a, b)", XPathVersion::V1).root;
        assert!(!is_explicit_conversion(&concat));
        // zero arguments too
        let bare = parse("string()", XPathVersion::V1).root;
        assert!(!is_explicit_conversion(&bare));
    }

    #[test]
    fn function_arguments_expect_parameter_types() {
        let functions = CoreFunctionContext::new();
        let variables = SimpleVariableContext::new();
        let engine = TypeEngine::new(&functions, &variables);
        let root = parse("contains(a, b)", XPathVersion::V1).root;
        let Expr::FunctionCall { arguments, .. } = &root.expr else {
            panic!("expected call");
        };
        assert_eq!(
            engine.expected_type(&root, &arguments[0]),
            XPathType::String
        );
    }

    #[test]
    fn predicates_expect_number_or_boolean() {
        let functions = CoreFunctionContext::new();
        let variables = SimpleVariableContext::new();
        let engine = TypeEngine::new(&functions, &variables);

        let root = parse("a[1]", XPathVersion::V1).root;
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        let predicate = &path.steps[0].predicates[0];
        assert_eq!(engine.expected_type(&root, predicate), XPathType::Number);

        let root = parse("a[b = 'c']", XPathVersion::V1).root;
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        let predicate = &path.steps[0].predicates[0];
        assert_eq!(engine.expected_type(&root, predicate), XPathType::Boolean);
    }
}
