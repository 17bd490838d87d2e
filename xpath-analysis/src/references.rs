//! Reference extraction
//!
//! Hosts that embed XPath in documents (match attributes, select
//! attributes, config files) want go-to-definition, find-usages and rename
//! on the names inside an expression. [`references`] extracts every
//! referring occurrence with its range; resolution goes through the host's
//! [`AnalysisContext`].

use crate::completion::{function_candidates, variable_candidates, CompletionCandidate};
use crate::context::{AnalysisContext, Function, Variable};
use crate::error::AnalysisError;
use xpath_ast::{walk, Expr, ExprNode, NodeTest, QName, Step, StepKind, Visitor};
use xpath_diagnostics::TextRange;

/// What a reference refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A `$name` variable reference
    Variable,
    /// A function name in a call
    Function,
    /// A namespace prefix in a variable, function or name-test QName
    NamespacePrefix,
}

/// One referring occurrence of a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// What kind of name this refers to
    pub kind: ReferenceKind,
    /// The referenced name (without the `$` sigil; the bare prefix for
    /// namespace references)
    pub text: String,
    /// Source range of the occurrence. Variable references cover the
    /// sigil; prefix references cover the prefix only.
    pub range: TextRange,
}

/// What a reference resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A variable declaration
    Variable(Variable),
    /// A function declaration
    Function(Function),
    /// A namespace URI
    Namespace(String),
}

impl Reference {
    /// Resolve against the host context. `None` means the host does not
    /// know the name, which analysis treats as ordinary.
    pub fn resolve(&self, context: &AnalysisContext<'_>) -> Option<Resolution> {
        match self.kind {
            ReferenceKind::Variable => context
                .variables
                .resolve(&parse_qname(&self.text))
                .map(Resolution::Variable),
            ReferenceKind::Function => {
                let name = parse_qname(&self.text);
                context
                    .functions
                    .functions()
                    .into_iter()
                    .find(|function| function.name == name)
                    .cloned()
                    .map(Resolution::Function)
            }
            ReferenceKind::NamespacePrefix => context
                .namespaces
                .namespace_uri(&self.text)
                .map(Resolution::Namespace),
        }
    }

    /// The candidates that could replace this reference.
    pub fn completion_variants(&self, context: &AnalysisContext<'_>) -> Vec<CompletionCandidate> {
        match self.kind {
            ReferenceKind::Variable => variable_candidates(context.variables),
            ReferenceKind::Function => function_candidates(context.functions),
            // prefix declarations live in the host document
            ReferenceKind::NamespacePrefix => Vec::new(),
        }
    }

    /// The replacement text for renaming the referenced name.
    ///
    /// Only variable references support rename; function names belong to
    /// the library and prefixes are declared in the host document.
    pub fn rename(&self, new_name: &str) -> Result<String, AnalysisError> {
        match self.kind {
            ReferenceKind::Variable => Ok(format!("${}", new_name)),
            ReferenceKind::Function => Err(AnalysisError::UnsupportedOperation(
                "renaming function references",
            )),
            ReferenceKind::NamespacePrefix => Err(AnalysisError::UnsupportedOperation(
                "renaming namespace prefixes",
            )),
        }
    }
}

/// Extract all references from a tree, in source order.
pub fn references(root: &ExprNode) -> Vec<Reference> {
    let mut collector = Collector {
        references: Vec::new(),
    };
    walk(&mut collector, root);
    collector.references.sort_by_key(|r| (r.range.start, r.range.end));
    collector.references
}

fn parse_qname(text: &str) -> QName {
    match text.split_once(':') {
        Some((prefix, local)) => QName::prefixed(prefix, local),
        None => QName::local(text),
    }
}

struct Collector {
    references: Vec<Reference>,
}

impl Collector {
    fn prefix_reference(&mut self, name: &QName, start: usize) {
        let Some(prefix) = &name.prefix else {
            return;
        };
        if prefix == "*" {
            return;
        }
        self.references.push(Reference {
            kind: ReferenceKind::NamespacePrefix,
            text: prefix.clone(),
            range: TextRange::new(start, start + prefix.len()),
        });
    }
}

impl Visitor for Collector {
    fn visit_expression(&mut self, node: &ExprNode) {
        match &node.expr {
            Expr::VariableReference { name } => {
                self.references.push(Reference {
                    kind: ReferenceKind::Variable,
                    text: name.to_string(),
                    range: node.range,
                });
                // the prefix sits right after the sigil
                self.prefix_reference(name, node.range.start + 1);
            }
            Expr::FunctionCall { name, .. } => {
                let text = name.to_string();
                self.references.push(Reference {
                    kind: ReferenceKind::Function,
                    text: text.clone(),
                    range: TextRange::new(node.range.start, node.range.start + text.len()),
                });
                self.prefix_reference(name, node.range.start);
            }
            _ => {}
        }
    }

    fn visit_node_test(&mut self, test: &NodeTest, step: &Step) {
        let Some(name) = test.qname() else {
            return;
        };
        if let StepKind::Axis { test_range, .. } = &step.kind {
            self.prefix_reference(name, test_range.start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EmptyNamespaceContext, NamespaceContext, SimpleVariableContext};
    use crate::functions::CoreFunctionContext;
    use pretty_assertions::assert_eq;
    use xpath_parser::{parse, XPathVersion};
    use xpath_types::XPathType;

    fn extract(input: &str) -> Vec<Reference> {
        references(&parse(input, XPathVersion::V1).root)
    }

    #[test]
    fn variables_functions_and_prefixes_are_extracted() {
        let refs = extract("concat($a, b/c:d)");
        assert_eq!(
            refs,
            vec![
                Reference {
                    kind: ReferenceKind::Function,
                    text: "concat".to_string(),
                    range: TextRange::new(0, 6),
                },
                Reference {
                    kind: ReferenceKind::Variable,
                    text: "a".to_string(),
                    range: TextRange::new(7, 9),
                },
                Reference {
                    kind: ReferenceKind::NamespacePrefix,
                    text: "c".to_string(),
                    range: TextRange::new(13, 14),
                },
            ]
        );
    }

    #[test]
    fn prefixed_variables_yield_both_references() {
        let refs = extract("$p:v");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].kind, ReferenceKind::Variable);
        assert_eq!(refs[0].text, "p:v");
        assert_eq!(refs[0].range, TextRange::new(0, 4));
        assert_eq!(refs[1].kind, ReferenceKind::NamespacePrefix);
        assert_eq!(refs[1].range, TextRange::new(1, 2));
    }

    #[test]
    fn wildcard_prefixes_are_not_references() {
        assert_eq!(extract("*:rect"), vec![]);
    }

    #[test]
    fn references_resolve_through_the_context() {
        let functions = CoreFunctionContext::new();
        let mut variables = SimpleVariableContext::new();
        variables.define(QName::local("a"), XPathType::Number);
        let namespaces = EmptyNamespaceContext;
        let context = AnalysisContext {
            functions: &functions,
            variables: &variables,
            namespaces: &namespaces,
        };

        let refs = extract("concat($a, b/c:d)");
        assert_eq!(
            refs[1].resolve(&context),
            Some(Resolution::Variable(Variable::new(
                QName::local("a"),
                XPathType::Number
            )))
        );
        assert!(matches!(
            refs[0].resolve(&context),
            Some(Resolution::Function(_))
        ));
        // the empty namespace context knows no prefixes
        assert_eq!(refs[2].resolve(&context), None);
        assert_eq!(namespaces.namespace_uri("c"), None);
    }

    #[test]
    fn only_variables_support_rename() {
        let refs = extract("concat($a, b/c:d)");
        assert_eq!(refs[1].rename("total"), Ok("$total".to_string()));
        assert!(refs[0].rename("x").is_err());
        assert!(refs[2].rename("x").is_err());
    }

    #[test]
    fn completion_variants_match_the_reference_kind() {
        let functions = CoreFunctionContext::new();
        let variables = SimpleVariableContext::new();
        let namespaces = EmptyNamespaceContext;
        let context = AnalysisContext {
            functions: &functions,
            variables: &variables,
            namespaces: &namespaces,
        };

        let refs = extract("count($x)");
        assert_eq!(refs[0].completion_variants(&context).len(), 27);
        assert_eq!(refs[1].completion_variants(&context), vec![]);
    }
}
