//! Completion candidates
//!
//! The core produces candidates as plain data; presentation (icons,
//! filtering against the typed prefix, insertion handlers) is the host's
//! job.

use crate::context::{FunctionContext, VariableContext};
use xpath_ast::{Axis, NodeTypeKind};

/// One completion item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// The text to insert, e.g. `child::`, `text()`, `count`, `$item`.
    pub text: String,
    /// Trailing presentation text, e.g. a function's parameter list.
    pub tail: Option<String>,
    /// Type shown next to the candidate, e.g. a function's return type.
    pub type_hint: Option<String>,
    /// Whether the candidate is a function (hosts append parentheses).
    pub is_function: bool,
    /// Whether the candidate is language syntax rather than a name.
    pub is_keyword: bool,
}

impl CompletionCandidate {
    fn keyword(text: String) -> Self {
        Self {
            text,
            tail: None,
            type_hint: None,
            is_function: false,
            is_keyword: true,
        }
    }
}

/// All axes, rendered with their `::` separator.
pub fn axis_candidates() -> Vec<CompletionCandidate> {
    Axis::ALL
        .iter()
        .map(|axis| CompletionCandidate::keyword(format!("{}::", axis.name())))
        .collect()
}

/// The node-type tests, rendered with their parentheses.
pub fn node_type_candidates() -> Vec<CompletionCandidate> {
    NodeTypeKind::ALL
        .iter()
        .map(|kind| CompletionCandidate::keyword(format!("{}()", kind.name())))
        .collect()
}

/// All functions the context knows, with signature tails and return-type
/// hints, sorted by name.
pub fn function_candidates(functions: &dyn FunctionContext) -> Vec<CompletionCandidate> {
    functions
        .functions()
        .into_iter()
        .map(|function| {
            let name = function.name.to_string();
            let signature = function.build_signature();
            CompletionCandidate {
                tail: Some(signature[name.len()..].to_string()),
                type_hint: Some(function.return_type.name()),
                text: name,
                is_function: true,
                is_keyword: false,
            }
        })
        .collect()
}

/// All variables in scope, rendered with their `$` sigil, sorted by name.
pub fn variable_candidates(variables: &dyn VariableContext) -> Vec<CompletionCandidate> {
    let mut candidates: Vec<CompletionCandidate> = variables
        .variables_in_scope()
        .into_iter()
        .map(|variable| CompletionCandidate {
            text: format!("${}", variable.name),
            tail: None,
            type_hint: Some(variable.ty.name()),
            is_function: false,
            is_keyword: false,
        })
        .collect();
    candidates.sort_by(|a, b| a.text.cmp(&b.text));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleVariableContext;
    use crate::functions::CoreFunctionContext;
    use pretty_assertions::assert_eq;
    use xpath_ast::QName;
    use xpath_types::XPathType;

    #[test]
    fn axes_render_with_separator() {
        let candidates = axis_candidates();
        assert_eq!(candidates.len(), 13);
        assert!(candidates.iter().any(|c| c.text == "child::"));
        assert!(candidates.iter().any(|c| c.text == "ancestor-or-self::"));
        assert!(candidates.iter().all(|c| c.is_keyword));
    }

    #[test]
    fn node_types_render_with_parens() {
        let texts: Vec<String> = node_type_candidates()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(
            texts,
            ["node()", "text()", "comment()", "processing-instruction()"]
        );
    }

    #[test]
    fn function_candidates_carry_signature_and_return_type() {
        let functions = CoreFunctionContext::new();
        let candidates = function_candidates(&functions);
        let substring = candidates
            .iter()
            .find(|c| c.text == "substring")
            .expect("substring should be offered");

        assert_eq!(
            substring.tail.as_deref(),
            Some("(string, number, number?)")
        );
        assert_eq!(substring.type_hint.as_deref(), Some("string"));
        assert!(substring.is_function);
        assert!(!substring.is_keyword);
    }

    #[test]
    fn variable_candidates_carry_the_sigil() {
        let mut variables = SimpleVariableContext::new();
        variables.define(QName::local("page"), XPathType::Number);
        variables.define(QName::local("doc"), XPathType::NodeSet);

        let candidates = variable_candidates(&variables);
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["$doc", "$page"]);
        assert_eq!(candidates[1].type_hint.as_deref(), Some("number"));
    }
}
