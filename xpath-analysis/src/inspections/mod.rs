//! Inspection rules over parsed expressions
//!
//! Each inspection is a pure function from a tree and an
//! [`AnalysisContext`] to diagnostics; none of them mutates the tree or
//! caches state between runs. Hosts pick the set they want, configure the
//! ones with options, and splice the suggested replacements themselves.

mod hardwired_prefix;
mod implicit_conversion;
mod index_zero;
mod node_test;
mod redundant_conversion;
mod resolution;

pub use hardwired_prefix::HardwiredNamespacePrefix;
pub use implicit_conversion::{ImplicitConversion, ImplicitConversionOptions};
pub use index_zero::IndexZero;
pub use node_test::{UnknownNodeTest, UnknownNodeTestOptions};
pub use redundant_conversion::{RedundantConversion, RedundantConversionOptions};
pub use resolution::UnresolvedNames;

use crate::context::AnalysisContext;
use xpath_ast::ExprNode;
use xpath_diagnostics::Diagnostic;

/// A single inspection rule.
pub trait Inspection {
    /// Stable identifier, used by hosts to enable and configure rules.
    fn id(&self) -> &'static str;

    /// Check a tree, returning all findings.
    fn check(&self, root: &ExprNode, context: &AnalysisContext<'_>) -> Vec<Diagnostic>;
}

/// The inspections enabled when the host does not configure its own set.
///
/// [`UnknownNodeTest`] is not included; it needs a vocabulary of known
/// names and does nothing useful without one.
pub fn default_inspections() -> Vec<Box<dyn Inspection>> {
    vec![
        Box::new(ImplicitConversion::default()),
        Box::new(RedundantConversion::default()),
        Box::new(IndexZero),
        Box::new(HardwiredNamespacePrefix),
        Box::new(UnresolvedNames),
    ]
}

/// Run a set of inspections over a tree and sort the findings by source
/// position.
pub fn run(
    inspections: &[Box<dyn Inspection>],
    root: &ExprNode,
    context: &AnalysisContext<'_>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for inspection in inspections {
        log::debug!("running inspection '{}'", inspection.id());
        diagnostics.extend(inspection.check(root, context));
    }
    diagnostics.sort_by_key(|d| (d.range.start, d.range.end));
    diagnostics
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::{AnalysisContext, EmptyNamespaceContext, SimpleVariableContext};
    use crate::functions::CoreFunctionContext;

    /// Bundles owned contexts so tests can borrow an [`AnalysisContext`].
    pub struct TestContext {
        pub functions: CoreFunctionContext,
        pub variables: SimpleVariableContext,
        pub namespaces: EmptyNamespaceContext,
    }

    impl TestContext {
        pub fn new() -> Self {
            Self {
                functions: CoreFunctionContext::new(),
                variables: SimpleVariableContext::new(),
                namespaces: EmptyNamespaceContext,
            }
        }

        pub fn context(&self) -> AnalysisContext<'_> {
            AnalysisContext {
                functions: &self.functions,
                variables: &self.variables,
                namespaces: &self.namespaces,
            }
        }
    }
}
