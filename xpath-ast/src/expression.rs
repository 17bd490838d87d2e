//! Expression AST node definitions

use crate::axis::{Axis, PrincipalNodeType};
use crate::operator::BinaryOp;
use std::fmt;
use xpath_diagnostics::TextRange;
use xpath_types::{AtomicType, Cardinality, XPathType};

/// A possibly-prefixed name (`local` or `prefix:local`).
///
/// In name tests either part may be the wildcard `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QName {
    /// The namespace prefix, if written
    pub prefix: Option<String>,
    /// The local part
    pub local: String,
}

impl QName {
    /// A name without a prefix.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// A prefixed name.
    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Whether the local part is the wildcard `*`.
    pub fn is_any_local(&self) -> bool {
        self.local == "*"
    }

    /// Whether the prefix is the wildcard `*`.
    pub fn is_any_prefix(&self) -> bool {
        self.prefix.as_deref() == Some("*")
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A number literal, keeping its lexeme so rendering round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberLit {
    /// The literal exactly as written
    pub text: String,
}

impl NumberLit {
    /// Create a number literal from its source text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The numeric value. XPath numbers are IEEE doubles.
    pub fn value(&self) -> f64 {
        self.text.parse().unwrap_or(f64::NAN)
    }
}

/// A string literal, keeping its quotes and doubled-quote escapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringLit {
    /// The literal including its surrounding quotes
    pub raw: String,
}

impl StringLit {
    /// Create a string literal from its raw source text (with quotes).
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The string value with quotes stripped and doubled quotes collapsed.
    pub fn value(&self) -> String {
        let quote = self.raw.chars().next().unwrap_or('\'');
        let inner = self
            .raw
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
            .unwrap_or(&self.raw);
        match quote {
            '\'' => inner.replace("''", "'"),
            '"' => inner.replace("\"\"", "\""),
            _ => inner.to_string(),
        }
    }
}

/// The four XPath 2.0 postfix type operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeOp {
    /// `instance of` — boolean type test
    InstanceOf,
    /// `cast as` — value conversion
    CastAs,
    /// `castable as` — boolean conversion test
    CastableAs,
    /// `treat as` — static type assertion
    TreatAs,
}

impl TypeOp {
    /// The operator keywords as written in source.
    pub const fn keywords(self) -> &'static str {
        match self {
            TypeOp::InstanceOf => "instance of",
            TypeOp::CastAs => "cast as",
            TypeOp::CastableAs => "castable as",
            TypeOp::TreatAs => "treat as",
        }
    }
}

/// `some` or `every` in a quantified expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantifier {
    /// `some $v in e satisfies t`
    Some,
    /// `every $v in e satisfies t`
    Every,
}

impl Quantifier {
    /// The keyword as written in source.
    pub const fn keyword(self) -> &'static str {
        match self {
            Quantifier::Some => "some",
            Quantifier::Every => "every",
        }
    }
}

/// A `$variable in sequence` binding of a `for` or quantified expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binding {
    /// The bound variable's name
    pub name: QName,
    /// The sequence the variable ranges over
    pub sequence: ExprNode,
    /// Source range of the whole binding
    pub range: TextRange,
}

/// A sequence type (or single type) as written after a type operator,
/// e.g. `xs:integer`, `xs:string?`, `xs:double*`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceTypeElement {
    /// The type name as written
    pub name: QName,
    /// The resolved atomic type
    pub atomic: AtomicType,
    /// The occurrence indicator, if written
    pub cardinality: Option<Cardinality>,
    /// Source range
    pub range: TextRange,
}

impl SequenceTypeElement {
    /// The static type this element declares.
    pub fn declared_type(&self) -> XPathType {
        let item = XPathType::Atomic(self.atomic.clone());
        match self.cardinality {
            None | Some(Cardinality::ExactlyOne) => item,
            Some(cardinality) => XPathType::sequence(item, cardinality),
        }
    }
}

/// How a step selects along its axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeTest {
    /// A name test: `para`, `svg:rect`, `*`, `xsl:*`, `*:rect`
    Name(QName),
    /// A node-type test: `node()`, `text()`, `comment()`,
    /// `processing-instruction('name')`
    NodeType {
        /// Which node kind the test matches
        kind: NodeTypeKind,
        /// The target literal of `processing-instruction(...)`, if any
        literal: Option<StringLit>,
    },
}

impl NodeTest {
    /// Whether this is a name test (as opposed to a node-type test).
    pub fn is_name_test(&self) -> bool {
        matches!(self, NodeTest::Name(_))
    }

    /// The qualified name of a name test.
    pub fn qname(&self) -> Option<&QName> {
        match self {
            NodeTest::Name(name) => Some(name),
            NodeTest::NodeType { .. } => None,
        }
    }
}

/// The four node-type tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeTypeKind {
    /// `node()`
    Node,
    /// `text()`
    Text,
    /// `comment()`
    Comment,
    /// `processing-instruction()`
    ProcessingInstruction,
}

impl NodeTypeKind {
    /// Look up a node-type test by name.
    pub fn from_name(name: &str) -> Option<NodeTypeKind> {
        Some(match name {
            "node" => NodeTypeKind::Node,
            "text" => NodeTypeKind::Text,
            "comment" => NodeTypeKind::Comment,
            "processing-instruction" => NodeTypeKind::ProcessingInstruction,
            _ => return None,
        })
    }

    /// The test name as written in source.
    pub const fn name(self) -> &'static str {
        match self {
            NodeTypeKind::Node => "node",
            NodeTypeKind::Text => "text",
            NodeTypeKind::Comment => "comment",
            NodeTypeKind::ProcessingInstruction => "processing-instruction",
        }
    }

    /// All node-type tests, as offered by completion.
    pub const ALL: [NodeTypeKind; 4] = [
        NodeTypeKind::Node,
        NodeTypeKind::Text,
        NodeTypeKind::Comment,
        NodeTypeKind::ProcessingInstruction,
    ];
}

/// The axis of a step together with how it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSpecifier {
    /// The traversal axis
    pub axis: Axis,
    /// Whether the axis was written out (`child::a` rather than `a`)
    pub explicit: bool,
}

impl AxisSpecifier {
    /// The implied `child::` axis of a bare name test.
    pub const DEFAULT: AxisSpecifier = AxisSpecifier {
        axis: Axis::Child,
        explicit: false,
    };

    /// The `@` abbreviation for `attribute::`.
    pub const AT: AxisSpecifier = AxisSpecifier {
        axis: Axis::Attribute,
        explicit: false,
    };

    /// An explicitly written axis.
    pub const fn explicit(axis: Axis) -> Self {
        Self {
            axis,
            explicit: true,
        }
    }

    /// Whether the step relies on the default `child` axis (neither an
    /// explicit axis nor `@` was written).
    pub const fn is_default(&self) -> bool {
        !self.explicit && matches!(self.axis, Axis::Child)
    }
}

/// What a location step consists of.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepKind {
    /// An axis step: `axis::test`, `@test` or a bare `test`
    Axis {
        /// The axis, explicit or implied
        specifier: AxisSpecifier,
        /// The node test
        test: NodeTest,
        /// Source range of the node test alone, for anchoring diagnostics
        test_range: TextRange,
    },
    /// The abbreviated context-node step `.`
    Current,
    /// The abbreviated parent step `..`
    Parent,
    /// A filter/primary expression heading a path (`$v/a`, `id('x')/b`)
    Primary(Box<ExprNode>),
}

/// One step of a location path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// What the step selects
    pub kind: StepKind,
    /// Predicates filtering the step's node set
    pub predicates: Vec<ExprNode>,
    /// Whether the step is preceded by `//` (descendant-or-self shorthand)
    pub double_slash: bool,
    /// Source range of the step including predicates
    pub range: TextRange,
}

impl Step {
    /// The effective axis of the step.
    pub fn axis(&self) -> Axis {
        match &self.kind {
            StepKind::Axis { specifier, .. } => specifier.axis,
            StepKind::Current => Axis::Self_,
            StepKind::Parent => Axis::Parent,
            StepKind::Primary(_) => Axis::Self_,
        }
    }

    /// The node test, for axis steps.
    pub fn node_test(&self) -> Option<&NodeTest> {
        match &self.kind {
            StepKind::Axis { test, .. } => Some(test),
            _ => None,
        }
    }

    /// The node kind this step's name test matches, fixed by the axis.
    pub fn principal_node_type(&self) -> PrincipalNodeType {
        self.axis().principal_node_type()
    }
}

/// A location path: a sequence of steps, optionally rooted at `/`.
///
/// `/` on its own is `absolute: true` with no steps; a relative path always
/// has at least one step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationPath {
    /// Whether the path starts at the document root
    pub absolute: bool,
    /// The steps, in document order
    pub steps: Vec<Step>,
}

/// An XPath expression together with its source range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprNode {
    /// The expression itself
    pub expr: Expr,
    /// The source range the expression covers
    pub range: TextRange,
}

/// AST representation of XPath expressions.
///
/// Variants marked *2.0* are only produced when parsing under the XPath 2.0
/// grammar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A number literal
    Number(NumberLit),

    /// A string literal
    Literal(StringLit),

    /// A binary operation
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        left: Box<ExprNode>,
        /// Right operand
        right: Box<ExprNode>,
    },

    /// Unary minus
    Negation {
        /// The negated operand
        operand: Box<ExprNode>,
    },

    /// A parenthesized expression, kept so rendering preserves the parens
    Parenthesized {
        /// The inner expression
        inner: Box<ExprNode>,
    },

    /// A primary expression filtered by predicates: `$v[1]`, `(a|b)[last()]`
    Filter {
        /// The filtered primary expression
        primary: Box<ExprNode>,
        /// The predicates, applied left to right
        predicates: Vec<ExprNode>,
    },

    /// A function call
    FunctionCall {
        /// The function's qualified name
        name: QName,
        /// The arguments, in call order
        arguments: Vec<ExprNode>,
    },

    /// A location path
    Path(LocationPath),

    /// A variable reference `$name`
    VariableReference {
        /// The variable's qualified name
        name: QName,
    },

    /// *2.0* — `for $v in e, ... return body`
    For {
        /// The variable bindings, in declaration order
        bindings: Vec<Binding>,
        /// The return expression
        body: Box<ExprNode>,
    },

    /// *2.0* — `some`/`every $v in e satisfies test`
    Quantified {
        /// `some` or `every`
        quantifier: Quantifier,
        /// The variable bindings, in declaration order
        bindings: Vec<Binding>,
        /// The satisfies expression
        test: Box<ExprNode>,
    },

    /// *2.0* — `if (cond) then t else e`
    If {
        /// The condition
        condition: Box<ExprNode>,
        /// The `then` branch
        then_branch: Box<ExprNode>,
        /// The `else` branch
        else_branch: Box<ExprNode>,
    },

    /// *2.0* — the range expression `from to to`
    Range {
        /// First value of the range
        from: Box<ExprNode>,
        /// Last value of the range
        to: Box<ExprNode>,
    },

    /// *2.0* — a comma-separated sequence; `()` is the empty sequence
    Sequence {
        /// The sequence items
        items: Vec<ExprNode>,
    },

    /// *2.0* — `instance of` / `cast as` / `castable as` / `treat as`
    TypeExpr {
        /// Which type operator
        op: TypeOp,
        /// The tested or converted operand
        operand: Box<ExprNode>,
        /// The target type
        target: SequenceTypeElement,
    },

    /// A region the parser could not make sense of
    Error {
        /// Human-readable description of what went wrong
        message: String,
    },
}

impl ExprNode {
    /// Create a node.
    pub fn new(expr: Expr, range: TextRange) -> Self {
        Self { expr, range }
    }

    /// Create a binary operation covering both operands.
    pub fn binary(op: BinaryOp, left: ExprNode, right: ExprNode) -> Self {
        let range = left.range.cover(right.range);
        Self::new(
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            range,
        )
    }

    /// Whether this node is an error marker.
    pub fn is_error(&self) -> bool {
        matches!(self.expr, Expr::Error { .. })
    }

    /// The number literal, if this is one.
    pub fn as_number(&self) -> Option<&NumberLit> {
        match &self.expr {
            Expr::Number(lit) => Some(lit),
            _ => None,
        }
    }

    /// The string literal, if this is one.
    pub fn as_literal(&self) -> Option<&StringLit> {
        match &self.expr {
            Expr::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Strip any number of parentheses, yielding the innermost expression.
    pub fn unparenthesize(&self) -> &ExprNode {
        match &self.expr {
            Expr::Parenthesized { inner } => inner.unparenthesize(),
            _ => self,
        }
    }

    /// All direct child expression nodes, including step predicates and
    /// binding sequences.
    pub fn child_expressions(&self) -> Vec<&ExprNode> {
        let mut children = Vec::new();
        match &self.expr {
            Expr::Number(_)
            | Expr::Literal(_)
            | Expr::VariableReference { .. }
            | Expr::Error { .. } => {}
            Expr::Binary { left, right, .. } => {
                children.push(left.as_ref());
                children.push(right.as_ref());
            }
            Expr::Negation { operand } => children.push(operand.as_ref()),
            Expr::Parenthesized { inner } => children.push(inner.as_ref()),
            Expr::Filter {
                primary,
                predicates,
            } => {
                children.push(primary.as_ref());
                children.extend(predicates.iter());
            }
            Expr::FunctionCall { arguments, .. } => children.extend(arguments.iter()),
            Expr::Path(path) => {
                for step in &path.steps {
                    if let StepKind::Primary(primary) = &step.kind {
                        children.push(primary.as_ref());
                    }
                    children.extend(step.predicates.iter());
                }
            }
            Expr::For { bindings, body } => {
                children.extend(bindings.iter().map(|b| &b.sequence));
                children.push(body.as_ref());
            }
            Expr::Quantified { bindings, test, .. } => {
                children.extend(bindings.iter().map(|b| &b.sequence));
                children.push(test.as_ref());
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                children.push(condition.as_ref());
                children.push(then_branch.as_ref());
                children.push(else_branch.as_ref());
            }
            Expr::Range { from, to } => {
                children.push(from.as_ref());
                children.push(to.as_ref());
            }
            Expr::Sequence { items } => children.extend(items.iter()),
            Expr::TypeExpr { operand, .. } => children.push(operand.as_ref()),
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_literal_value_collapses_doubled_quotes() {
        assert_eq!(StringLit::new("'it''s'").value(), "it's");
        assert_eq!(StringLit::new("\"a\"\"b\"").value(), "a\"b");
        assert_eq!(StringLit::new("'plain'").value(), "plain");
    }

    #[test]
    fn number_literal_keeps_lexeme() {
        let lit = NumberLit::new("1.50");
        assert_eq!(lit.text, "1.50");
        assert_eq!(lit.value(), 1.5);
    }

    #[test]
    fn default_axis_is_child_only() {
        assert!(AxisSpecifier::DEFAULT.is_default());
        assert!(!AxisSpecifier::AT.is_default());
        assert!(!AxisSpecifier::explicit(Axis::Child).is_default());
    }

    #[test]
    fn binary_covers_operand_ranges() {
        let left = ExprNode::new(Expr::Number(NumberLit::new("1")), TextRange::new(0, 1));
        let right = ExprNode::new(Expr::Number(NumberLit::new("2")), TextRange::new(4, 5));
        let node = ExprNode::binary(BinaryOp::Plus, left, right);
        assert_eq!(node.range, TextRange::new(0, 5));
        assert_eq!(node.child_expressions().len(), 2);
    }

    #[test]
    fn unparenthesize_strips_nested_parens() {
        let number = ExprNode::new(Expr::Number(NumberLit::new("0")), TextRange::new(2, 3));
        let inner = ExprNode::new(
            Expr::Parenthesized {
                inner: Box::new(number.clone()),
            },
            TextRange::new(1, 4),
        );
        let outer = ExprNode::new(
            Expr::Parenthesized {
                inner: Box::new(inner),
            },
            TextRange::new(0, 5),
        );
        assert_eq!(outer.unparenthesize(), &number);
    }
}
