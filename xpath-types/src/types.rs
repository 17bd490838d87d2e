//! The XPath type lattice

use std::fmt;

/// Occurrence indicator of an XPath 2.0 sequence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cardinality {
    /// Exactly one item (no indicator)
    ExactlyOne,
    /// Zero or one item (`?`)
    ZeroOrOne,
    /// Any number of items (`*`)
    ZeroOrMore,
    /// At least one item (`+`)
    OneOrMore,
}

impl Cardinality {
    /// The occurrence indicator as written in a sequence type.
    pub const fn indicator(self) -> &'static str {
        match self {
            Cardinality::ExactlyOne => "",
            Cardinality::ZeroOrOne => "?",
            Cardinality::ZeroOrMore => "*",
            Cardinality::OneOrMore => "+",
        }
    }
}

/// XPath 2.0 atomic schema types.
///
/// Only the types named by the XPath 2.0 grammar's `SingleType`/`SequenceType`
/// productions are distinguished; anything else is carried verbatim as
/// [`AtomicType::Other`] so an unknown `xs:` name never aborts parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicType {
    /// `xs:anyAtomicType`
    AnyAtomic,
    /// `xs:untypedAtomic`
    UntypedAtomic,
    /// `xs:string`
    String,
    /// `xs:boolean`
    Boolean,
    /// `xs:decimal`
    Decimal,
    /// `xs:integer`
    Integer,
    /// `xs:double`
    Double,
    /// `xs:float`
    Float,
    /// `xs:date`
    Date,
    /// `xs:time`
    Time,
    /// `xs:dateTime`
    DateTime,
    /// `xs:duration`
    Duration,
    /// `xs:yearMonthDuration`
    YearMonthDuration,
    /// `xs:dayTimeDuration`
    DayTimeDuration,
    /// `xs:QName`
    QName,
    /// `xs:anyURI`
    AnyUri,
    /// Any other named type, kept as written
    Other(String),
}

impl AtomicType {
    /// Look up an atomic type by its local name (without the `xs:` prefix).
    pub fn from_local_name(name: &str) -> AtomicType {
        match name {
            "anyAtomicType" => AtomicType::AnyAtomic,
            "untypedAtomic" => AtomicType::UntypedAtomic,
            "string" => AtomicType::String,
            "boolean" => AtomicType::Boolean,
            "decimal" => AtomicType::Decimal,
            "integer" => AtomicType::Integer,
            "double" => AtomicType::Double,
            "float" => AtomicType::Float,
            "date" => AtomicType::Date,
            "time" => AtomicType::Time,
            "dateTime" => AtomicType::DateTime,
            "duration" => AtomicType::Duration,
            "yearMonthDuration" => AtomicType::YearMonthDuration,
            "dayTimeDuration" => AtomicType::DayTimeDuration,
            "QName" => AtomicType::QName,
            "anyURI" => AtomicType::AnyUri,
            other => AtomicType::Other(other.to_string()),
        }
    }

    /// The qualified name as written in source.
    pub fn name(&self) -> String {
        let local = match self {
            AtomicType::AnyAtomic => "anyAtomicType",
            AtomicType::UntypedAtomic => "untypedAtomic",
            AtomicType::String => "string",
            AtomicType::Boolean => "boolean",
            AtomicType::Decimal => "decimal",
            AtomicType::Integer => "integer",
            AtomicType::Double => "double",
            AtomicType::Float => "float",
            AtomicType::Date => "date",
            AtomicType::Time => "time",
            AtomicType::DateTime => "dateTime",
            AtomicType::Duration => "duration",
            AtomicType::YearMonthDuration => "yearMonthDuration",
            AtomicType::DayTimeDuration => "dayTimeDuration",
            AtomicType::QName => "QName",
            AtomicType::AnyUri => "anyURI",
            AtomicType::Other(name) => return format!("xs:{}", name),
        };
        format!("xs:{}", local)
    }

    /// Whether this type holds numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AtomicType::Decimal | AtomicType::Integer | AtomicType::Double | AtomicType::Float
        )
    }
}

/// The static type of an XPath expression.
///
/// `Unknown` and `Any` are abstract: they mean "cannot tell" and "anything
/// goes" respectively, and no inspection flags a conversion involving them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XPathType {
    /// Type could not be determined (unresolved reference, error node)
    Unknown,
    /// Any type is acceptable
    Any,
    /// An XPath 1.0 node-set (node sequence in 2.0)
    NodeSet,
    /// A string value
    String,
    /// A double-precision number
    Number,
    /// A boolean value
    Boolean,
    /// An XPath 2.0 atomic value
    Atomic(AtomicType),
    /// An XPath 2.0 sequence of an item type with a cardinality
    Sequence {
        /// The item type
        item: Box<XPathType>,
        /// How many items the sequence may hold
        cardinality: Cardinality,
    },
}

impl XPathType {
    /// Construct a sequence type.
    pub fn sequence(item: XPathType, cardinality: Cardinality) -> XPathType {
        XPathType::Sequence {
            item: Box::new(item),
            cardinality,
        }
    }

    /// Whether this is one of the abstract types (`Unknown`, `Any`).
    pub fn is_abstract(&self) -> bool {
        matches!(self, XPathType::Unknown | XPathType::Any)
    }

    /// Strip any number of sequence wrappers, yielding the item type.
    pub fn unwrap_sequence(&self) -> &XPathType {
        match self {
            XPathType::Sequence { item, .. } => item.unwrap_sequence(),
            other => other,
        }
    }

    /// Reduce to the XPath 1.0 value category used by the conversion rules.
    ///
    /// Atomic and sequence types collapse onto `String`/`Number`/`Boolean`
    /// where a mapping exists; a cast to `xs:string` is the same category as
    /// a `string()` call. Types without a 1.0 counterpart map to `Any`.
    pub fn value_category(&self) -> XPathType {
        match self.unwrap_sequence() {
            XPathType::Atomic(atomic) => {
                if atomic.is_numeric() {
                    XPathType::Number
                } else {
                    match atomic {
                        AtomicType::String | AtomicType::UntypedAtomic => XPathType::String,
                        AtomicType::Boolean => XPathType::Boolean,
                        _ => XPathType::Any,
                    }
                }
            }
            other => other.clone(),
        }
    }

    /// The display name, matching how the type is written in messages.
    pub fn name(&self) -> String {
        match self {
            XPathType::Unknown => "unknown".to_string(),
            XPathType::Any => "any".to_string(),
            XPathType::NodeSet => "nodeset".to_string(),
            XPathType::String => "string".to_string(),
            XPathType::Number => "number".to_string(),
            XPathType::Boolean => "boolean".to_string(),
            XPathType::Atomic(atomic) => atomic.name(),
            XPathType::Sequence { item, cardinality } => {
                format!("{}{}", item.name(), cardinality.indicator())
            }
        }
    }
}

impl fmt::Display for XPathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn sequence_unwraps_recursively() {
        let ty = XPathType::sequence(
            XPathType::sequence(XPathType::Atomic(AtomicType::Integer), Cardinality::ExactlyOne),
            Cardinality::ZeroOrMore,
        );
        assert_eq!(ty.unwrap_sequence(), &XPathType::Atomic(AtomicType::Integer));
        assert_eq!(ty.name(), "xs:integer*");
    }

    #[rstest]
    #[case(AtomicType::Integer, XPathType::Number)]
    #[case(AtomicType::Double, XPathType::Number)]
    #[case(AtomicType::String, XPathType::String)]
    #[case(AtomicType::UntypedAtomic, XPathType::String)]
    #[case(AtomicType::Boolean, XPathType::Boolean)]
    #[case(AtomicType::Date, XPathType::Any)]
    fn atomic_value_categories(#[case] atomic: AtomicType, #[case] expected: XPathType) {
        assert_eq!(XPathType::Atomic(atomic).value_category(), expected);
    }

    #[test]
    fn sequence_category_uses_item_type() {
        let ty = XPathType::sequence(
            XPathType::Atomic(AtomicType::Integer),
            Cardinality::ZeroOrMore,
        );
        assert_eq!(ty.value_category(), XPathType::Number);
    }

    #[test]
    fn atomic_round_trips_by_name() {
        assert_eq!(AtomicType::from_local_name("dateTime"), AtomicType::DateTime);
        assert_eq!(AtomicType::DateTime.name(), "xs:dateTime");
        assert_eq!(
            AtomicType::from_local_name("gYearMonth"),
            AtomicType::Other("gYearMonth".to_string())
        );
    }
}
