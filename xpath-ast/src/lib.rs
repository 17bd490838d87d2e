//! Abstract Syntax Tree (AST) definitions for XPath 1.0/2.0 expressions
//!
//! The tree is an owned, immutable structure produced by `xpath-parser`.
//! Every node carries its source [`TextRange`](xpath_diagnostics::TextRange)
//! so diagnostics and references can be anchored without a parent pointer.
//! Rendering a tree with `Display` regenerates source text with normalized
//! whitespace.

#![warn(missing_docs)]

mod axis;
mod display;
mod expression;
mod operator;
mod visitor;

pub use axis::{Axis, PrincipalNodeType};
pub use expression::*;
pub use operator::BinaryOp;
pub use visitor::{walk, Visitor};
