//! Token kinds produced by the lexer

use std::fmt;
use xpath_ast::{Axis, NodeTypeKind};
use xpath_diagnostics::TextRange;

/// Tokens of the XPath lexical grammar.
///
/// Keyword classification is context-sensitive and happens in the lexer: a
/// name becomes [`Token::AxisName`] only before `::`, a node-type keyword
/// only before `(`, and an operator word (`and`, `or`, `div`, `mod`) only in
/// operator position. Everywhere else the same text is a plain
/// [`Token::Name`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer or decimal literal, kept as written
    Number(String),
    /// String literal including its quotes; `terminated` is false when the
    /// closing quote is missing
    Literal {
        /// Raw source text including the opening (and closing) quote
        raw: String,
        /// Whether the closing quote was present
        terminated: bool,
    },
    /// An NCName that is not a contextual keyword here
    Name(String),
    /// An axis keyword, seen only before `::`
    AxisName(Axis),
    /// A node-type keyword, seen only before `(`
    NodeType(NodeTypeKind),

    /// `and` in operator position
    And,
    /// `or` in operator position
    Or,
    /// `div` in operator position
    Div,
    /// `mod` in operator position
    Mod,
    /// `*` in operator position (multiplication)
    Mult,
    /// `*` as a wildcard name test
    Star,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `|`
    Union,
    /// `/`
    Slash,
    /// `//`
    DoubleSlash,

    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `@`
    At,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `$`
    Dollar,
    /// `?` occurrence indicator (XPath 2.0 only)
    Question,

    /// A character that cannot start any token
    BadCharacter(char),
    /// A name followed by `::` that is not a known axis
    BadAxisName(String),
}

impl Token {
    /// Whether this token is a binary or path operator. After an operator
    /// the lexer expects an operand, so names are not reclassified as
    /// operator words there.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::And
                | Token::Or
                | Token::Div
                | Token::Mod
                | Token::Mult
                | Token::Plus
                | Token::Minus
                | Token::Eq
                | Token::NotEq
                | Token::Lt
                | Token::LtEq
                | Token::Gt
                | Token::GtEq
                | Token::Union
                | Token::Slash
                | Token::DoubleSlash
        )
    }

    /// Whether this token marks a lexical error.
    pub fn is_error(&self) -> bool {
        matches!(self, Token::BadCharacter(_) | Token::BadAxisName(_))
    }

    /// Short description for syntax-error messages.
    pub fn description(&self) -> String {
        match self {
            Token::Number(text) => format!("number '{}'", text),
            Token::Literal { raw, .. } => format!("literal {}", raw),
            Token::Name(name) => format!("'{}'", name),
            Token::AxisName(axis) => format!("'{}'", axis.name()),
            Token::NodeType(kind) => format!("'{}'", kind.name()),
            Token::BadCharacter(ch) => format!("'{}'", ch),
            Token::BadAxisName(name) => format!("'{}'", name),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) => write!(f, "{}", text),
            Token::Literal { raw, .. } => write!(f, "{}", raw),
            Token::Name(name) => write!(f, "{}", name),
            Token::AxisName(axis) => write!(f, "{}", axis.name()),
            Token::NodeType(kind) => write!(f, "{}", kind.name()),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Div => write!(f, "div"),
            Token::Mod => write!(f, "mod"),
            Token::Mult | Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Eq => write!(f, "="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
            Token::Union => write!(f, "|"),
            Token::Slash => write!(f, "/"),
            Token::DoubleSlash => write!(f, "//"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Dot => write!(f, "."),
            Token::DotDot => write!(f, ".."),
            Token::At => write!(f, "@"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::ColonColon => write!(f, "::"),
            Token::Dollar => write!(f, "$"),
            Token::Question => write!(f, "?"),
            Token::BadCharacter(ch) => write!(f, "{}", ch),
            Token::BadAxisName(name) => write!(f, "{}", name),
        }
    }
}

/// A token together with its source range.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token
    pub token: Token,
    /// Byte range in the source text
    pub range: TextRange,
}

impl SpannedToken {
    /// Create a spanned token.
    pub fn new(token: Token, range: TextRange) -> Self {
        Self { token, range }
    }
}
