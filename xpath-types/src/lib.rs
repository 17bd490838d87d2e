//! Static value types for XPath expressions
//!
//! XPath 1.0 knows four concrete value types (node-set, string, number,
//! boolean) plus the abstract `any` and `unknown`. XPath 2.0 layers atomic
//! schema types (`xs:integer`, `xs:date`, ...) and sequence types with a
//! cardinality on top. This crate defines that lattice together with the
//! configurable conversion-compatibility matrix consumed by the
//! implicit-conversion inspection.

#![warn(missing_docs)]

pub mod conversion;
pub mod types;

pub use conversion::ConversionMatrix;
pub use types::{AtomicType, Cardinality, XPathType};
