//! XPath 1.0/2.0 expression parser
//!
//! This crate turns XPath source text into the typed syntax tree defined by
//! `xpath-ast`. Lexing is context-sensitive (the same text can be an axis
//! keyword, a node-type keyword, an operator word or a plain name depending
//! on its neighbors) and parsing is recursive descent with error recovery:
//! a parse always returns a tree, with malformed regions represented as
//! error nodes alongside a list of [`SyntaxError`]s.

#![warn(missing_docs)]

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

use std::fmt;

pub use error::SyntaxError;
pub use lexer::Lexer;
pub use parser::{ParseResult, Parser};
pub use token::{SpannedToken, Token};

/// Which grammar the lexer and parser operate under.
///
/// Under [`XPathVersion::V1`] the 2.0-only token kinds and productions
/// (`for`, quantifiers, `if`, `to`, type operators, sequences) are not
/// recognized and never appear in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum XPathVersion {
    /// XPath 1.0
    #[default]
    V1,
    /// XPath 1.0 + 2.0
    V2,
}

impl XPathVersion {
    /// Whether the 2.0 grammar extensions are enabled.
    pub const fn xpath2(self) -> bool {
        matches!(self, XPathVersion::V2)
    }
}

impl fmt::Display for XPathVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathVersion::V1 => write!(f, "1.0"),
            XPathVersion::V2 => write!(f, "2.0"),
        }
    }
}

/// Parse an XPath expression. Always returns a tree; syntax problems are
/// listed on the result.
pub fn parse(input: &str, version: XPathVersion) -> ParseResult {
    Parser::new(input, version).parse()
}
