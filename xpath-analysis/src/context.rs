//! Resolution contracts supplied by the host
//!
//! The core never decides what functions, variables or namespaces exist;
//! the embedding application does. These traits are the seams it plugs
//! into. Resolution failure is an ordinary state, not an error: callers
//! treat an unresolved name as having type `Unknown`.

use std::collections::HashMap;
use xpath_ast::QName;
use xpath_types::XPathType;

/// Whether a function parameter must be present, may be omitted, or may
/// repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Exactly one argument
    Required,
    /// Zero or one argument
    Optional,
    /// Zero or more trailing arguments
    Variadic,
}

/// One declared parameter of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The argument type the function expects here
    pub ty: XPathType,
    /// Required, optional or variadic
    pub kind: ParameterKind,
}

impl Parameter {
    /// A required parameter.
    pub fn required(ty: XPathType) -> Self {
        Self {
            ty,
            kind: ParameterKind::Required,
        }
    }

    /// An optional parameter.
    pub fn optional(ty: XPathType) -> Self {
        Self {
            ty,
            kind: ParameterKind::Optional,
        }
    }

    /// A variadic tail parameter.
    pub fn variadic(ty: XPathType) -> Self {
        Self {
            ty,
            kind: ParameterKind::Variadic,
        }
    }
}

/// A function declaration: name, ordered parameters and return type.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// The function's qualified name
    pub name: QName,
    /// Declared parameters, in order
    pub parameters: Vec<Parameter>,
    /// Static return type
    pub return_type: XPathType,
}

impl Function {
    /// Create a function declaration.
    pub fn new(name: QName, parameters: Vec<Parameter>, return_type: XPathType) -> Self {
        Self {
            name,
            parameters,
            return_type,
        }
    }

    /// The smallest number of arguments a call may pass.
    pub fn min_arity(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Required)
            .count()
    }

    /// Whether the function accepts `arity` arguments.
    pub fn accepts_arity(&self, arity: usize) -> bool {
        if arity < self.min_arity() {
            return false;
        }
        let variadic = self
            .parameters
            .last()
            .is_some_and(|p| p.kind == ParameterKind::Variadic);
        variadic || arity <= self.parameters.len()
    }

    /// The declared type of the argument at `index`, with the variadic tail
    /// parameter covering all trailing positions.
    pub fn parameter_type(&self, index: usize) -> Option<&XPathType> {
        if let Some(parameter) = self.parameters.get(index) {
            return Some(&parameter.ty);
        }
        match self.parameters.last() {
            Some(last) if last.kind == ParameterKind::Variadic => Some(&last.ty),
            _ => None,
        }
    }

    /// Render the signature the way completion shows it, e.g.
    /// `concat(string, string, ...)`.
    pub fn build_signature(&self) -> String {
        let mut signature = format!("{}(", self.name);
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                signature.push_str(", ");
            }
            signature.push_str(&parameter.ty.name());
            match parameter.kind {
                ParameterKind::Optional => signature.push('?'),
                ParameterKind::Variadic => signature.push_str(", ..."),
                ParameterKind::Required => {}
            }
        }
        signature.push(')');
        signature
    }
}

/// A variable visible to the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The variable's qualified name
    pub name: QName,
    /// Its static type, `Unknown` when the host cannot tell
    pub ty: XPathType,
}

impl Variable {
    /// Create a variable declaration.
    pub fn new(name: QName, ty: XPathType) -> Self {
        Self { name, ty }
    }
}

/// Resolves function calls by qualified name and argument count.
pub trait FunctionContext {
    /// Resolve a call; `None` means unknown, which is not an error.
    fn resolve(&self, name: &QName, arity: usize) -> Option<&Function>;

    /// All known functions, for completion.
    fn functions(&self) -> Vec<&Function>;
}

/// Resolves free variable references.
pub trait VariableContext {
    /// Resolve a `$name` reference; `None` means unknown.
    fn resolve(&self, name: &QName) -> Option<Variable>;

    /// All variables visible at the expression, for completion.
    fn variables_in_scope(&self) -> Vec<Variable>;
}

/// Maps namespace prefixes to URIs and back. Policy is entirely host-owned.
pub trait NamespaceContext {
    /// The URI bound to `prefix`, if any.
    fn namespace_uri(&self, prefix: &str) -> Option<String>;

    /// A prefix bound to `uri`, if any.
    fn prefix_for_uri(&self, uri: &str) -> Option<String>;

    /// The default element namespace, if one is declared.
    fn default_namespace(&self) -> Option<String> {
        None
    }
}

/// A variable context backed by a plain map, for hosts with a fixed set of
/// variables and for tests.
#[derive(Debug, Clone, Default)]
pub struct SimpleVariableContext {
    variables: HashMap<QName, XPathType>,
}

impl SimpleVariableContext {
    /// An empty context; every reference is unresolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn define(&mut self, name: QName, ty: XPathType) -> &mut Self {
        self.variables.insert(name, ty);
        self
    }
}

impl VariableContext for SimpleVariableContext {
    fn resolve(&self, name: &QName) -> Option<Variable> {
        self.variables
            .get(name)
            .map(|ty| Variable::new(name.clone(), ty.clone()))
    }

    fn variables_in_scope(&self) -> Vec<Variable> {
        self.variables
            .iter()
            .map(|(name, ty)| Variable::new(name.clone(), ty.clone()))
            .collect()
    }
}

/// A namespace context that knows nothing, for hosts without namespace
/// declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyNamespaceContext;

impl NamespaceContext for EmptyNamespaceContext {
    fn namespace_uri(&self, _prefix: &str) -> Option<String> {
        None
    }

    fn prefix_for_uri(&self, _uri: &str) -> Option<String> {
        None
    }
}

/// The three resolution contracts bundled for analysis entry points.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// Function resolution
    pub functions: &'a dyn FunctionContext,
    /// Variable resolution
    pub variables: &'a dyn VariableContext,
    /// Namespace resolution
    pub namespaces: &'a dyn NamespaceContext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arity_with_optional_and_variadic_parameters() {
        let substring = Function::new(
            QName::local("substring"),
            vec![
                Parameter::required(XPathType::String),
                Parameter::required(XPathType::Number),
                Parameter::optional(XPathType::Number),
            ],
            XPathType::String,
        );
        assert_eq!(substring.min_arity(), 2);
        assert!(!substring.accepts_arity(1));
        assert!(substring.accepts_arity(2));
        assert!(substring.accepts_arity(3));
        assert!(!substring.accepts_arity(4));

        let concat = Function::new(
            QName::local("concat"),
            vec![
                Parameter::required(XPathType::String),
                Parameter::required(XPathType::String),
                Parameter::variadic(XPathType::String),
            ],
            XPathType::String,
        );
        assert!(concat.accepts_arity(2));
        assert!(concat.accepts_arity(7));
        assert_eq!(
            concat.parameter_type(6),
            Some(&XPathType::String),
        );
    }

    #[test]
    fn signatures_render_like_completion_tails() {
        let substring = Function::new(
            QName::local("substring"),
            vec![
                Parameter::required(XPathType::String),
                Parameter::required(XPathType::Number),
                Parameter::optional(XPathType::Number),
            ],
            XPathType::String,
        );
        assert_eq!(
            substring.build_signature(),
            "substring(string, number, number?)"
        );
    }

    #[test]
    fn simple_variable_context_resolves_defined_names() {
        let mut context = SimpleVariableContext::new();
        context.define(QName::local("count"), XPathType::Number);

        assert_eq!(
            context.resolve(&QName::local("count")),
            Some(Variable::new(QName::local("count"), XPathType::Number))
        );
        assert_eq!(context.resolve(&QName::local("other")), None);
    }
}
