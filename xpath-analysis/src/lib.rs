//! Static analysis for parsed XPath expressions
//!
//! Everything here operates on trees from `xpath-parser` and the host's
//! resolution contexts; nothing evaluates an expression against a
//! document. The pieces:
//!
//! - [`context`] — the [`FunctionContext`]/[`VariableContext`]/
//!   [`NamespaceContext`] traits the host implements
//! - [`functions`] — the XPath 1.0 core function library
//! - [`typing`] — static types and expected-type propagation
//! - [`inspections`] — the lint rules, each producing [`Diagnostic`]s
//! - [`completion`] — completion candidates as plain data
//! - [`references`] — name occurrences for navigation and rename
//!
//! ```
//! use xpath_analysis::{analyze, AnalysisContext, CoreFunctionContext,
//!     EmptyNamespaceContext, SimpleVariableContext};
//! use xpath_parser::{parse, XPathVersion};
//!
//! let functions = CoreFunctionContext::new();
//! let variables = SimpleVariableContext::new();
//! let namespaces = EmptyNamespaceContext;
//! let context = AnalysisContext {
//!     functions: &functions,
//!     variables: &variables,
//!     namespaces: &namespaces,
//! };
//!
//! let result = parse("item[0]", XPathVersion::V1);
//! let diagnostics = analyze(&result.root, &context);
//! assert_eq!(diagnostics.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod completion;
pub mod context;
pub mod error;
pub mod functions;
pub mod inspections;
pub mod references;
pub mod typing;

pub use completion::{
    axis_candidates, function_candidates, node_type_candidates, variable_candidates,
    CompletionCandidate,
};
pub use context::{
    AnalysisContext, EmptyNamespaceContext, Function, FunctionContext, NamespaceContext,
    Parameter, ParameterKind, SimpleVariableContext, Variable, VariableContext,
};
pub use error::AnalysisError;
pub use functions::CoreFunctionContext;
pub use inspections::{default_inspections, Inspection};
pub use references::{references, Reference, ReferenceKind, Resolution};
pub use typing::{bindings_in_scope, conversion_target, is_explicit_conversion, TypeEngine};

use xpath_ast::ExprNode;
use xpath_diagnostics::Diagnostic;

/// Run the default inspections over a tree.
///
/// Hosts that want to configure rules build their own set and call
/// [`inspections::run`] directly.
pub fn analyze(root: &ExprNode, context: &AnalysisContext<'_>) -> Vec<Diagnostic> {
    inspections::run(&default_inspections(), root, context)
}
