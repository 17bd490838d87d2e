//! XPath 1.0/2.0 language core
//!
//! A host-embeddable implementation of the XPath expression language's
//! front end: context-sensitive lexer, recovering recursive-descent
//! parser, typed syntax tree, static type system, inspections, completion
//! candidates and reference extraction. There is no evaluator; the crate
//! exists for tooling that reads, checks and transforms XPath expressions
//! embedded in XSLT, configuration or query strings.
//!
//! The workspace crates are re-exported here under one roof:
//!
//! - [`diagnostics`] — severities, codes, ranges and the fluent builder
//! - [`ast`] — the expression tree and its renderer
//! - [`types`] — the value-type lattice and the conversion matrix
//! - [`parser`] — [`parse`] and the tokenizer behind it
//! - [`analysis`] — typing, inspections, completion and references
//!
//! ```
//! use xpath_lang::{parse, XPathVersion};
//!
//! let result = parse("book[@lang = 'en']/title", XPathVersion::V1);
//! assert!(result.is_clean());
//! assert_eq!(result.root.to_string(), "book[@lang = 'en']/title");
//! ```

#![warn(missing_docs)]

pub use xpath_analysis as analysis;
pub use xpath_ast as ast;
pub use xpath_diagnostics as diagnostics;
pub use xpath_parser as parser;
pub use xpath_types as types;

pub use xpath_analysis::{analyze, AnalysisContext, CoreFunctionContext, TypeEngine};
pub use xpath_ast::{Expr, ExprNode};
pub use xpath_diagnostics::{Diagnostic, Severity, TextRange};
pub use xpath_parser::{ParseResult, SyntaxError, XPathVersion};
pub use xpath_types::{ConversionMatrix, XPathType};

/// Parse an XPath expression under the given grammar version.
///
/// Parsing always produces a tree; syntax problems are collected on the
/// [`ParseResult`] and malformed regions appear as error nodes.
pub fn parse(input: &str, version: XPathVersion) -> ParseResult {
    log::trace!("parsing {} expression ({} bytes)", version, input.len());
    xpath_parser::parse(input, version)
}
