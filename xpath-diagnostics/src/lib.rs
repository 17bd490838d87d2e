//! Diagnostic system for XPath parsing and analysis problems
//!
//! Diagnostics carry a severity, a stable code, a message and a text range
//! within the analyzed expression. Inspections attach optional replacement
//! suggestions that a host editor can apply as quick-fixes.

#![warn(missing_docs)]

pub mod builder;
pub mod diagnostic;
pub mod location;

pub use builder::DiagnosticBuilder;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Suggestion};
pub use location::{Position, TextRange};
