//! Analysis errors

use thiserror::Error;

/// Errors from analysis operations.
///
/// Almost everything in this crate treats failure as an ordinary result
/// (unresolved names type as `Unknown`); this enum covers the few
/// operations that can genuinely refuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The operation is not supported for this kind of target.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}
