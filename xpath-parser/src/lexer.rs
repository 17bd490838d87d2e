//! Context-sensitive tokenizer for XPath expressions
//!
//! The same lexical text can be a keyword or a plain name depending on its
//! surroundings: `child` before `::` is an axis, `text` before `(` is a
//! node-type test, `div` after an operand is the division operator. The
//! lexer resolves all of that with one token of history plus bounded
//! lookahead, so the parser never reinterprets token kinds.

use crate::token::{SpannedToken, Token};
use crate::XPathVersion;
use unicode_xid::UnicodeXID;
use xpath_ast::{Axis, NodeTypeKind};
use xpath_diagnostics::TextRange;

/// Whether a character can start an NCName.
pub fn is_name_start(c: char) -> bool {
    UnicodeXID::is_xid_start(c) || c == '_'
}

/// Whether a character can continue an NCName.
pub fn is_name_continue(c: char) -> bool {
    UnicodeXID::is_xid_continue(c) || c == '-' || c == '.'
}

fn is_xpath_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Words that start or continue an XPath 2.0 clause. After one of these a
/// name is an operand, not an operator word.
const XPATH2_CLAUSE_KEYWORDS: [&str; 16] = [
    "for",
    "in",
    "return",
    "some",
    "every",
    "satisfies",
    "if",
    "then",
    "else",
    "to",
    "instance",
    "of",
    "cast",
    "castable",
    "treat",
    "as",
];

/// The XPath tokenizer. Bounded by input length, never panics, and never
/// fails: unlexable characters come back as [`Token::BadCharacter`].
pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
    version: XPathVersion,
    tokens: Vec<SpannedToken>,
}

impl<'input> Lexer<'input> {
    /// Tokenize a whole expression.
    pub fn tokenize(input: &'input str, version: XPathVersion) -> Vec<SpannedToken> {
        let lexer = Lexer {
            input,
            pos: 0,
            version,
            tokens: Vec::new(),
        };
        lexer.run()
    }

    fn run(mut self) -> Vec<SpannedToken> {
        while let Some(c) = self.peek_char() {
            if is_xpath_whitespace(c) {
                self.pos += c.len_utf8();
                continue;
            }
            let start = self.pos;
            let token = self.scan(c);
            self.tokens
                .push(SpannedToken::new(token, TextRange::new(start, self.pos)));
        }
        self.tokens
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn scan(&mut self, c: char) -> Token {
        match c {
            '(' => self.single(c, Token::LeftParen),
            ')' => self.single(c, Token::RightParen),
            '[' => self.single(c, Token::LeftBracket),
            ']' => self.single(c, Token::RightBracket),
            ',' => self.single(c, Token::Comma),
            '@' => self.single(c, Token::At),
            '$' => self.single(c, Token::Dollar),
            '+' => self.single(c, Token::Plus),
            '-' => self.single(c, Token::Minus),
            '=' => self.single(c, Token::Eq),
            '|' => self.single(c, Token::Union),
            '*' => {
                self.bump(c);
                if self.in_operator_position() {
                    Token::Mult
                } else {
                    Token::Star
                }
            }
            '/' => {
                self.bump(c);
                if self.eat('/') {
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            ':' => {
                self.bump(c);
                if self.eat(':') {
                    Token::ColonColon
                } else {
                    Token::Colon
                }
            }
            '!' => {
                self.bump(c);
                if self.eat('=') {
                    Token::NotEq
                } else {
                    Token::BadCharacter('!')
                }
            }
            '<' => {
                self.bump(c);
                if self.eat('=') {
                    Token::LtEq
                } else {
                    Token::Lt
                }
            }
            '>' => {
                self.bump(c);
                if self.eat('=') {
                    Token::GtEq
                } else {
                    Token::Gt
                }
            }
            '?' if self.version.xpath2() => self.single(c, Token::Question),
            '.' => {
                if self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.bump(c);
                    if self.eat('.') {
                        Token::DotDot
                    } else {
                        Token::Dot
                    }
                }
            }
            '\'' | '"' => self.scan_literal(c),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_name_start(c) => self.scan_name(),
            c => self.single(c, Token::BadCharacter(c)),
        }
    }

    fn single(&mut self, c: char, token: Token) -> Token {
        self.bump(c);
        token
    }

    // Number ::= Digits ('.' Digits?)? | '.' Digits
    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek_char() == Some('.') {
            self.pos += 1;
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        Token::Number(self.input[start..self.pos].to_string())
    }

    // A doubled quote inside the literal stands for the quote itself.
    fn scan_literal(&mut self, quote: char) -> Token {
        let start = self.pos;
        self.bump(quote);
        let mut terminated = false;
        while let Some(c) = self.peek_char() {
            self.bump(c);
            if c == quote {
                if self.peek_char() == Some(quote) {
                    self.bump(quote);
                } else {
                    terminated = true;
                    break;
                }
            }
        }
        Token::Literal {
            raw: self.input[start..self.pos].to_string(),
            terminated,
        }
    }

    fn scan_name(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !is_name_continue(c) {
                break;
            }
            self.bump(c);
        }
        let text = &self.input[start..self.pos];

        if self.in_operator_position() {
            match text {
                "and" => return Token::And,
                "or" => return Token::Or,
                "div" => return Token::Div,
                "mod" => return Token::Mod,
                _ => {}
            }
        }

        let rest = self.input[self.pos..].trim_start_matches(is_xpath_whitespace);
        if rest.starts_with("::") {
            return match Axis::from_name(text) {
                Some(axis) => Token::AxisName(axis),
                None => Token::BadAxisName(text.to_string()),
            };
        }
        if rest.starts_with('(') {
            if let Some(kind) = NodeTypeKind::from_name(text) {
                return Token::NodeType(kind);
            }
        }
        Token::Name(text.to_string())
    }

    /// Whether the next name or `*` sits in operator position: some token
    /// precedes it and that token completes an operand.
    fn in_operator_position(&self) -> bool {
        match self.tokens.last() {
            Some(spanned) => !self.expects_operand(&spanned.token),
            None => false,
        }
    }

    fn expects_operand(&self, token: &Token) -> bool {
        if token.is_operator() {
            return true;
        }
        match token {
            Token::At
            | Token::ColonColon
            | Token::LeftParen
            | Token::LeftBracket
            | Token::Comma
            | Token::Colon
            | Token::Dollar
            | Token::BadCharacter(_) => true,
            Token::Name(name) => {
                self.version.xpath2() && XPATH2_CLAUSE_KEYWORDS.contains(&name.as_str())
            }
            _ => false,
        }
    }
}
