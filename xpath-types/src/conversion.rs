//! The configurable implicit-conversion matrix

use crate::types::XPathType;

/// Which implicit conversions the implicit-conversion inspection flags.
///
/// The matrix has one cell per (source, target) pair over the four concrete
/// XPath 1.0 value categories, with node-set excluded as a target
/// (converting *to* a node-set is impossible and reported separately).
/// That leaves 4 x 3 = 12 cells. The three identity cells (string to
/// string and so on) are permanently disabled; [`ConversionMatrix::set`]
/// ignores attempts to enable them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionMatrix {
    // cells[target][source]; targets: string, number, boolean
    // sources: nodeset, string, number, boolean
    cells: [[bool; 4]; 3],
}

fn source_index(ty: &XPathType) -> Option<usize> {
    match ty {
        XPathType::NodeSet => Some(0),
        XPathType::String => Some(1),
        XPathType::Number => Some(2),
        XPathType::Boolean => Some(3),
        _ => None,
    }
}

fn target_index(ty: &XPathType) -> Option<usize> {
    match ty {
        XPathType::String => Some(0),
        XPathType::Number => Some(1),
        XPathType::Boolean => Some(2),
        _ => None,
    }
}

impl ConversionMatrix {
    /// A matrix with every cell disabled.
    pub fn none() -> Self {
        Self {
            cells: [[false; 4]; 3],
        }
    }

    /// A matrix with every non-identity cell enabled.
    pub fn all() -> Self {
        let mut matrix = Self::none();
        for source in Self::sources() {
            for target in Self::targets() {
                matrix.set(&source, &target, true);
            }
        }
        matrix
    }

    /// The four source categories, in matrix order.
    pub fn sources() -> [XPathType; 4] {
        [
            XPathType::NodeSet,
            XPathType::String,
            XPathType::Number,
            XPathType::Boolean,
        ]
    }

    /// The three target categories, in matrix order.
    pub fn targets() -> [XPathType; 3] {
        [XPathType::String, XPathType::Number, XPathType::Boolean]
    }

    /// Enable or disable flagging of the `from` -> `to` conversion.
    ///
    /// Identity cells and pairs outside the matrix are ignored.
    pub fn set(&mut self, from: &XPathType, to: &XPathType, flagged: bool) {
        if from == to {
            return;
        }
        if let (Some(source), Some(target)) = (source_index(from), target_index(to)) {
            self.cells[target][source] = flagged;
        }
    }

    /// Whether the `from` -> `to` conversion is flagged.
    ///
    /// Abstract types and pairs outside the matrix are never flagged.
    pub fn is_checked(&self, from: &XPathType, to: &XPathType) -> bool {
        if from == to {
            return false;
        }
        match (source_index(from), target_index(to)) {
            (Some(source), Some(target)) => self.cells[target][source],
            _ => false,
        }
    }
}

impl Default for ConversionMatrix {
    /// The default set of flagged conversions.
    ///
    /// These are the conversions that most often hide a mistake: anything
    /// silently coerced to a number, strings and numbers used as booleans,
    /// and booleans rendered as strings. Node-set to string and number to
    /// string are left off; they are the bread and butter of `select`
    /// attributes.
    fn default() -> Self {
        let mut matrix = Self::none();
        matrix.set(&XPathType::Boolean, &XPathType::String, true);
        matrix.set(&XPathType::NodeSet, &XPathType::Number, true);
        matrix.set(&XPathType::String, &XPathType::Number, true);
        matrix.set(&XPathType::Boolean, &XPathType::Number, true);
        matrix.set(&XPathType::String, &XPathType::Boolean, true);
        matrix.set(&XPathType::Number, &XPathType::Boolean, true);
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_cells_stay_disabled() {
        let mut matrix = ConversionMatrix::none();
        matrix.set(&XPathType::String, &XPathType::String, true);
        assert!(!matrix.is_checked(&XPathType::String, &XPathType::String));

        let all = ConversionMatrix::all();
        assert!(!all.is_checked(&XPathType::Number, &XPathType::Number));
        assert!(all.is_checked(&XPathType::NodeSet, &XPathType::Number));
    }

    #[test]
    fn default_matches_shipped_configuration() {
        let matrix = ConversionMatrix::default();

        assert!(matrix.is_checked(&XPathType::Boolean, &XPathType::String));
        assert!(matrix.is_checked(&XPathType::NodeSet, &XPathType::Number));
        assert!(matrix.is_checked(&XPathType::String, &XPathType::Number));
        assert!(matrix.is_checked(&XPathType::Boolean, &XPathType::Number));
        assert!(matrix.is_checked(&XPathType::String, &XPathType::Boolean));
        assert!(matrix.is_checked(&XPathType::Number, &XPathType::Boolean));

        assert!(!matrix.is_checked(&XPathType::NodeSet, &XPathType::String));
        assert!(!matrix.is_checked(&XPathType::Number, &XPathType::String));
        assert!(!matrix.is_checked(&XPathType::NodeSet, &XPathType::Boolean));
    }

    #[test]
    fn abstract_types_are_never_checked() {
        let matrix = ConversionMatrix::all();
        assert!(!matrix.is_checked(&XPathType::Any, &XPathType::Boolean));
        assert!(!matrix.is_checked(&XPathType::String, &XPathType::Unknown));
        assert!(!matrix.is_checked(&XPathType::String, &XPathType::NodeSet));
    }
}
