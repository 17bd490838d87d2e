//! Recursive-descent parser with error recovery
//!
//! The parser follows the XPath precedence ladder and never gives up: a
//! missing or unexpected token is recorded as a [`SyntaxError`] and replaced
//! by an error node in the tree, so every parse returns a usable tree for
//! highlighting, completion and inspection.

use crate::error::SyntaxError;
use crate::lexer::Lexer;
use crate::token::{SpannedToken, Token};
use crate::XPathVersion;
use log::debug;
use xpath_ast::{
    AxisSpecifier, BinaryOp, Binding, Expr, ExprNode, LocationPath, NodeTest, NumberLit, QName,
    Quantifier, SequenceTypeElement, Step, StepKind, StringLit, TypeOp,
};
use xpath_diagnostics::{Diagnostic, TextRange};
use xpath_types::{AtomicType, Cardinality};

/// The outcome of a parse: a best-effort tree plus everything that went
/// wrong while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// The root expression; malformed regions appear as error nodes
    pub root: ExprNode,
    /// Lexical and syntactic problems, in source order of discovery
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    /// Whether the parse completed without any problem.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors as host-facing diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(SyntaxError::to_diagnostic).collect()
    }

    /// The tree if the parse was clean, otherwise the first error.
    pub fn into_expression(self) -> Result<ExprNode, SyntaxError> {
        let ParseResult { root, mut errors } = self;
        if errors.is_empty() {
            Ok(root)
        } else {
            Err(errors.remove(0))
        }
    }
}

/// XPath parser over a lexed token stream.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    version: XPathVersion,
    errors: Vec<SyntaxError>,
    input_len: usize,
}

impl Parser {
    /// Lex `input` and set up a parser for it. Lexical problems are
    /// collected immediately; the error tokens stay in the stream so ranges
    /// line up.
    pub fn new(input: &str, version: XPathVersion) -> Self {
        let tokens = Lexer::tokenize(input, version);
        let mut errors = Vec::new();
        for spanned in &tokens {
            match &spanned.token {
                Token::BadCharacter(c) => errors.push(SyntaxError::IllegalCharacter {
                    character: *c,
                    range: spanned.range,
                }),
                Token::BadAxisName(name) => errors.push(SyntaxError::InvalidAxisName {
                    name: name.clone(),
                    range: spanned.range,
                }),
                Token::Literal {
                    terminated: false, ..
                } => errors.push(SyntaxError::UnclosedLiteral {
                    range: spanned.range,
                }),
                _ => {}
            }
        }
        Self {
            tokens,
            pos: 0,
            version,
            errors,
            input_len: input.len(),
        }
    }

    /// Parse the whole input. Always returns a tree.
    pub fn parse(mut self) -> ParseResult {
        debug!(
            "parsing XPath {} expression, {} tokens",
            self.version,
            self.tokens.len()
        );
        let root = if self.tokens.is_empty() {
            self.errors.push(SyntaxError::UnexpectedEof {
                offset: self.input_len,
            });
            ExprNode::new(
                Expr::Error {
                    message: "Empty expression".to_string(),
                },
                TextRange::empty_at(0),
            )
        } else {
            let expr = self.parse_expr();
            if let Some(spanned) = self.tokens.get(self.pos) {
                // lexical errors were already reported by the pre-pass
                if !spanned.token.is_error() {
                    self.errors.push(SyntaxError::UnexpectedToken {
                        token: spanned.token.to_string(),
                        range: spanned.range,
                    });
                }
            }
            expr
        };
        ParseResult {
            root,
            errors: self.errors,
        }
    }

    // --- token-stream helpers ---

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    fn current_range(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty_at(self.input_len))
    }

    fn previous_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].range.end
        }
    }

    fn advance_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|t| t.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_token(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, description: &str) {
        if !self.eat_token(&token) {
            self.errors.push(SyntaxError::ExpectedToken {
                expected: format!("'{}'", description),
                range: self.current_range(),
            });
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.version.xpath2()
            && matches!(self.peek(), Some(Token::Name(name)) if name == keyword)
    }

    fn at_keyword_pair(&self, first: &str, second: &str) -> bool {
        self.at_keyword(first)
            && matches!(self.peek_at(1), Some(Token::Name(name)) if name == second)
    }

    fn expect_keyword(&mut self, keyword: &str) {
        if self.at_keyword(keyword) {
            self.pos += 1;
        } else {
            self.errors.push(SyntaxError::ExpectedToken {
                expected: format!("'{}'", keyword),
                range: self.current_range(),
            });
        }
    }

    fn span_from(&self, start: usize) -> TextRange {
        TextRange::new(start, self.previous_end().max(start))
    }

    // --- grammar ---

    /// Expr: in XPath 2.0 a comma-separated sequence, otherwise a single
    /// expression.
    fn parse_expr(&mut self) -> ExprNode {
        let first = self.parse_expr_single();
        if !self.version.xpath2() || self.peek() != Some(&Token::Comma) {
            return first;
        }
        let mut items = vec![first];
        while self.eat_token(&Token::Comma) {
            items.push(self.parse_expr_single());
        }
        let range = match (items.first(), items.last()) {
            (Some(first), Some(last)) => first.range.cover(last.range),
            _ => TextRange::empty_at(0),
        };
        ExprNode::new(Expr::Sequence { items }, range)
    }

    fn parse_expr_single(&mut self) -> ExprNode {
        if self.at_keyword("for") && self.peek_at(1) == Some(&Token::Dollar) {
            return self.parse_for();
        }
        if (self.at_keyword("some") || self.at_keyword("every"))
            && self.peek_at(1) == Some(&Token::Dollar)
        {
            return self.parse_quantified();
        }
        if self.at_keyword("if") && self.peek_at(1) == Some(&Token::LeftParen) {
            return self.parse_if();
        }
        self.parse_or()
    }

    fn parse_for(&mut self) -> ExprNode {
        let start = self.current_range().start;
        self.pos += 1; // for
        let bindings = self.parse_bindings();
        self.expect_keyword("return");
        let body = self.parse_expr_single();
        let range = self.span_from(start);
        ExprNode::new(
            Expr::For {
                bindings,
                body: Box::new(body),
            },
            range,
        )
    }

    fn parse_quantified(&mut self) -> ExprNode {
        let start = self.current_range().start;
        let quantifier = if self.at_keyword("some") {
            Quantifier::Some
        } else {
            Quantifier::Every
        };
        self.pos += 1; // some / every
        let bindings = self.parse_bindings();
        self.expect_keyword("satisfies");
        let test = self.parse_expr_single();
        let range = self.span_from(start);
        ExprNode::new(
            Expr::Quantified {
                quantifier,
                bindings,
                test: Box::new(test),
            },
            range,
        )
    }

    fn parse_bindings(&mut self) -> Vec<Binding> {
        let mut bindings = Vec::new();
        loop {
            let start = self.current_range().start;
            self.expect(Token::Dollar, "$");
            let name = if matches!(self.peek(), Some(Token::Name(_))) {
                self.parse_qname()
            } else {
                self.errors.push(SyntaxError::ExpectedToken {
                    expected: "a variable name".to_string(),
                    range: self.current_range(),
                });
                QName::local("")
            };
            self.expect_keyword("in");
            let sequence = self.parse_expr_single();
            let range = self.span_from(start);
            bindings.push(Binding {
                name,
                sequence,
                range,
            });
            if !self.eat_token(&Token::Comma) {
                break;
            }
            if self.peek() != Some(&Token::Dollar) {
                self.errors.push(SyntaxError::ExpectedToken {
                    expected: "'$'".to_string(),
                    range: self.current_range(),
                });
                break;
            }
        }
        bindings
    }

    fn parse_if(&mut self) -> ExprNode {
        let start = self.current_range().start;
        self.pos += 1; // if
        self.expect(Token::LeftParen, "(");
        let condition = self.parse_expr();
        self.expect(Token::RightParen, ")");
        self.expect_keyword("then");
        let then_branch = self.parse_expr_single();
        self.expect_keyword("else");
        let else_branch = self.parse_expr_single();
        let range = self.span_from(start);
        ExprNode::new(
            Expr::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            range,
        )
    }

    fn parse_or(&mut self) -> ExprNode {
        let mut left = self.parse_and();
        while self.eat_token(&Token::Or) {
            let right = self.parse_and();
            left = ExprNode::binary(BinaryOp::Or, left, right);
        }
        left
    }

    fn parse_and(&mut self) -> ExprNode {
        let mut left = self.parse_equality();
        while self.eat_token(&Token::And) {
            let right = self.parse_equality();
            left = ExprNode::binary(BinaryOp::And, left, right);
        }
        left
    }

    fn parse_equality(&mut self) -> ExprNode {
        let mut left = self.parse_relational();
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::NotEq,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_relational();
            left = ExprNode::binary(op, left, right);
        }
        left
    }

    fn parse_relational(&mut self) -> ExprNode {
        let mut left = self.parse_range();
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::LtEq) => BinaryOp::LtEq,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::GtEq) => BinaryOp::GtEq,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_range();
            left = ExprNode::binary(op, left, right);
        }
        left
    }

    /// XPath 2.0 range expression `from to to`.
    fn parse_range(&mut self) -> ExprNode {
        let from = self.parse_additive();
        if !self.at_keyword("to") {
            return from;
        }
        self.pos += 1;
        let to = self.parse_additive();
        let range = from.range.cover(to.range);
        ExprNode::new(
            Expr::Range {
                from: Box::new(from),
                to: Box::new(to),
            },
            range,
        )
    }

    fn parse_additive(&mut self) -> ExprNode {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Plus,
                Some(Token::Minus) => BinaryOp::Minus,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_multiplicative();
            left = ExprNode::binary(op, left, right);
        }
        left
    }

    fn parse_multiplicative(&mut self) -> ExprNode {
        let mut left = self.parse_unary();
        loop {
            let op = match self.peek() {
                Some(Token::Mult) => BinaryOp::Mult,
                Some(Token::Div) => BinaryOp::Div,
                Some(Token::Mod) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary();
            left = ExprNode::binary(op, left, right);
        }
        left
    }

    fn parse_unary(&mut self) -> ExprNode {
        if self.peek() == Some(&Token::Minus) {
            let start = self.current_range().start;
            self.pos += 1;
            let operand = self.parse_unary();
            let range = self.span_from(start);
            return ExprNode::new(
                Expr::Negation {
                    operand: Box::new(operand),
                },
                range,
            );
        }
        self.parse_type_expr()
    }

    /// XPath 2.0 postfix type operators, lowest-binding of the unary level.
    fn parse_type_expr(&mut self) -> ExprNode {
        let mut operand = self.parse_union();
        if !self.version.xpath2() {
            return operand;
        }
        loop {
            let op = if self.at_keyword_pair("instance", "of") {
                TypeOp::InstanceOf
            } else if self.at_keyword_pair("cast", "as") {
                TypeOp::CastAs
            } else if self.at_keyword_pair("castable", "as") {
                TypeOp::CastableAs
            } else if self.at_keyword_pair("treat", "as") {
                TypeOp::TreatAs
            } else {
                break;
            };
            self.pos += 2;
            let target = self.parse_sequence_type();
            let range = operand.range.cover(target.range);
            operand = ExprNode::new(
                Expr::TypeExpr {
                    op,
                    operand: Box::new(operand),
                    target,
                },
                range,
            );
        }
        operand
    }

    fn parse_sequence_type(&mut self) -> SequenceTypeElement {
        let start = self.current_range().start;
        let name = if matches!(self.peek(), Some(Token::Name(_))) {
            self.parse_qname()
        } else {
            self.errors.push(SyntaxError::ExpectedToken {
                expected: "a type name".to_string(),
                range: self.current_range(),
            });
            QName::local("")
        };
        let cardinality = match self.peek() {
            Some(Token::Question) => Some(Cardinality::ZeroOrOne),
            Some(Token::Mult) | Some(Token::Star) => Some(Cardinality::ZeroOrMore),
            Some(Token::Plus) => Some(Cardinality::OneOrMore),
            _ => None,
        };
        if cardinality.is_some() {
            self.pos += 1;
        }
        let atomic = AtomicType::from_local_name(&name.local);
        SequenceTypeElement {
            name,
            atomic,
            cardinality,
            range: self.span_from(start),
        }
    }

    fn parse_union(&mut self) -> ExprNode {
        let mut left = self.parse_path();
        while self.eat_token(&Token::Union) {
            let right = self.parse_path();
            left = ExprNode::binary(BinaryOp::Union, left, right);
        }
        left
    }

    fn parse_path(&mut self) -> ExprNode {
        let start = self.current_range().start;
        let mut absolute = false;
        let mut pending_double = false;
        match self.peek() {
            Some(Token::Slash) => {
                absolute = true;
                self.pos += 1;
                if !self.at_step_start() {
                    // `/` alone selects the document root
                    return ExprNode::new(
                        Expr::Path(LocationPath {
                            absolute: true,
                            steps: Vec::new(),
                        }),
                        self.span_from(start),
                    );
                }
            }
            Some(Token::DoubleSlash) => {
                absolute = true;
                pending_double = true;
                self.pos += 1;
            }
            _ => {}
        }

        let mut steps = Vec::new();
        loop {
            steps.push(self.parse_step(pending_double));
            pending_double = false;
            match self.peek() {
                Some(Token::Slash) => {
                    self.pos += 1;
                }
                Some(Token::DoubleSlash) => {
                    self.pos += 1;
                    pending_double = true;
                }
                _ => break,
            }
            if !self.at_step_start() {
                self.errors.push(SyntaxError::ExpectedToken {
                    expected: "a step".to_string(),
                    range: self.current_range(),
                });
                break;
            }
        }

        // a lone filter expression is not a location path
        if !absolute && steps.len() == 1 && !steps[0].double_slash {
            if matches!(steps[0].kind, StepKind::Primary(_)) {
                let step = steps.remove(0);
                if let StepKind::Primary(primary) = step.kind {
                    return if step.predicates.is_empty() {
                        *primary
                    } else {
                        ExprNode::new(
                            Expr::Filter {
                                primary,
                                predicates: step.predicates,
                            },
                            step.range,
                        )
                    };
                }
            }
        }

        ExprNode::new(
            Expr::Path(LocationPath { absolute, steps }),
            self.span_from(start),
        )
    }

    fn at_step_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Name(_)
                    | Token::AxisName(_)
                    | Token::NodeType(_)
                    | Token::BadAxisName(_)
                    | Token::Star
                    | Token::At
                    | Token::Dot
                    | Token::DotDot
                    | Token::Number(_)
                    | Token::Literal { .. }
                    | Token::Dollar
                    | Token::LeftParen
            )
        )
    }

    fn parse_step(&mut self, double_slash: bool) -> Step {
        let start = self.current_range().start;
        let kind = match self.peek() {
            Some(Token::Dot) => {
                self.pos += 1;
                StepKind::Current
            }
            Some(Token::DotDot) => {
                self.pos += 1;
                StepKind::Parent
            }
            Some(Token::At) => {
                self.pos += 1;
                let test_start = self.current_range().start;
                let test = self.parse_node_test();
                StepKind::Axis {
                    specifier: AxisSpecifier::AT,
                    test,
                    test_range: self.span_from(test_start),
                }
            }
            Some(Token::AxisName(axis)) => {
                let axis = *axis;
                self.pos += 1;
                self.expect(Token::ColonColon, "::");
                let test_start = self.current_range().start;
                let test = self.parse_node_test();
                StepKind::Axis {
                    specifier: AxisSpecifier::explicit(axis),
                    test,
                    test_range: self.span_from(test_start),
                }
            }
            Some(Token::BadAxisName(name)) => {
                // already reported by the lexical pre-pass; skip the whole
                // malformed step so parsing resumes at the next separator
                let message = format!("'{}' is not a valid XPath axis", name);
                let range = self.current_range();
                self.pos += 1;
                self.eat_token(&Token::ColonColon);
                if self.at_node_test_start() {
                    let _ = self.parse_node_test();
                }
                StepKind::Primary(Box::new(ExprNode::new(Expr::Error { message }, range)))
            }
            Some(Token::Star | Token::NodeType(_)) => {
                let test = self.parse_node_test();
                StepKind::Axis {
                    specifier: AxisSpecifier::DEFAULT,
                    test,
                    test_range: self.span_from(start),
                }
            }
            Some(Token::Name(_)) => {
                if self.name_starts_function_call() {
                    StepKind::Primary(Box::new(self.parse_primary()))
                } else {
                    let test = self.parse_node_test();
                    StepKind::Axis {
                        specifier: AxisSpecifier::DEFAULT,
                        test,
                        test_range: self.span_from(start),
                    }
                }
            }
            _ => StepKind::Primary(Box::new(self.parse_primary())),
        };
        let predicates = self.parse_predicates();
        Step {
            kind,
            predicates,
            double_slash,
            range: self.span_from(start),
        }
    }

    fn at_node_test_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Name(_) | Token::Star | Token::NodeType(_))
        )
    }

    fn name_starts_function_call(&self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (Some(Token::Name(_)), Some(Token::LeftParen)) => true,
            (Some(Token::Name(_)), Some(Token::Colon)) => matches!(
                (self.peek_at(2), self.peek_at(3)),
                (Some(Token::Name(_)), Some(Token::LeftParen))
            ),
            _ => false,
        }
    }

    fn parse_node_test(&mut self) -> NodeTest {
        match self.peek() {
            Some(Token::Star) => {
                self.pos += 1;
                if self.peek() == Some(&Token::Colon)
                    && matches!(self.peek_at(1), Some(Token::Name(_)))
                {
                    self.pos += 1;
                    if let Some(Token::Name(local)) = self.advance_token() {
                        return NodeTest::Name(QName::prefixed("*", local));
                    }
                }
                NodeTest::Name(QName::local("*"))
            }
            Some(Token::NodeType(kind)) => {
                let kind = *kind;
                self.pos += 1;
                self.expect(Token::LeftParen, "(");
                let literal = match self.peek() {
                    Some(Token::Literal { raw, .. }) => {
                        let raw = raw.clone();
                        self.pos += 1;
                        Some(StringLit::new(raw))
                    }
                    _ => None,
                };
                self.expect(Token::RightParen, ")");
                NodeTest::NodeType { kind, literal }
            }
            Some(Token::Name(_)) => NodeTest::Name(self.parse_qname()),
            _ => {
                self.errors.push(SyntaxError::ExpectedToken {
                    expected: "a node test".to_string(),
                    range: self.current_range(),
                });
                NodeTest::Name(QName::local("*"))
            }
        }
    }

    fn parse_predicates(&mut self) -> Vec<ExprNode> {
        let mut predicates = Vec::new();
        while self.eat_token(&Token::LeftBracket) {
            let predicate = self.parse_expr();
            self.expect(Token::RightBracket, "]");
            predicates.push(predicate);
        }
        predicates
    }

    fn parse_qname(&mut self) -> QName {
        let first = match self.advance_token() {
            Some(Token::Name(name)) => name,
            // callers check for a leading name token
            _ => return QName::local(""),
        };
        if self.peek() == Some(&Token::Colon) {
            match self.peek_at(1) {
                Some(Token::Name(_)) => {
                    self.pos += 1;
                    if let Some(Token::Name(local)) = self.advance_token() {
                        return QName::prefixed(first, local);
                    }
                }
                Some(Token::Star) => {
                    self.pos += 2;
                    return QName::prefixed(first, "*");
                }
                _ => {}
            }
        }
        QName::local(first)
    }

    fn parse_primary(&mut self) -> ExprNode {
        match self.peek() {
            Some(Token::Number(text)) => {
                let text = text.clone();
                let range = self.current_range();
                self.pos += 1;
                ExprNode::new(Expr::Number(NumberLit::new(text)), range)
            }
            Some(Token::Literal { raw, .. }) => {
                let raw = raw.clone();
                let range = self.current_range();
                self.pos += 1;
                ExprNode::new(Expr::Literal(StringLit::new(raw)), range)
            }
            Some(Token::Dollar) => self.parse_variable_reference(),
            Some(Token::LeftParen) => self.parse_parenthesized(),
            Some(Token::Name(_)) if self.name_starts_function_call() => {
                self.parse_function_call()
            }
            Some(Token::BadCharacter(c)) => {
                let message = format!("Illegal character '{}'", c);
                let range = self.current_range();
                self.pos += 1;
                ExprNode::new(Expr::Error { message }, range)
            }
            Some(Token::BadAxisName(name)) => {
                let message = format!("'{}' is not a valid XPath axis", name);
                let range = self.current_range();
                self.pos += 1;
                ExprNode::new(Expr::Error { message }, range)
            }
            Some(other) => {
                let range = self.current_range();
                let text = other.to_string();
                // leave closers for the enclosing production to consume
                let is_closer = matches!(
                    other,
                    Token::RightParen | Token::RightBracket | Token::Comma
                );
                self.errors.push(SyntaxError::UnexpectedToken {
                    token: text.clone(),
                    range,
                });
                if !is_closer {
                    self.pos += 1;
                }
                ExprNode::new(
                    Expr::Error {
                        message: format!("Unexpected token '{}'", text),
                    },
                    range,
                )
            }
            None => {
                self.errors.push(SyntaxError::UnexpectedEof {
                    offset: self.input_len,
                });
                ExprNode::new(
                    Expr::Error {
                        message: "Unexpected end of expression".to_string(),
                    },
                    TextRange::empty_at(self.input_len),
                )
            }
        }
    }

    fn parse_variable_reference(&mut self) -> ExprNode {
        let start = self.current_range().start;
        self.pos += 1; // $
        if matches!(self.peek(), Some(Token::Name(_))) {
            let name = self.parse_qname();
            ExprNode::new(
                Expr::VariableReference { name },
                self.span_from(start),
            )
        } else {
            self.errors.push(SyntaxError::ExpectedToken {
                expected: "a variable name".to_string(),
                range: self.current_range(),
            });
            ExprNode::new(
                Expr::Error {
                    message: "Expected a variable name after '$'".to_string(),
                },
                self.span_from(start),
            )
        }
    }

    fn parse_parenthesized(&mut self) -> ExprNode {
        let start = self.current_range().start;
        self.pos += 1; // (
        if self.version.xpath2() && self.eat_token(&Token::RightParen) {
            return ExprNode::new(Expr::Sequence { items: Vec::new() }, self.span_from(start));
        }
        let inner = self.parse_expr();
        self.expect(Token::RightParen, ")");
        ExprNode::new(
            Expr::Parenthesized {
                inner: Box::new(inner),
            },
            self.span_from(start),
        )
    }

    fn parse_function_call(&mut self) -> ExprNode {
        let start = self.current_range().start;
        let name = self.parse_qname();
        self.expect(Token::LeftParen, "(");
        let mut arguments = Vec::new();
        if !self.eat_token(&Token::RightParen) {
            loop {
                arguments.push(self.parse_expr_single());
                if self.eat_token(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RightParen, ")");
                break;
            }
        }
        ExprNode::new(
            Expr::FunctionCall { name, arguments },
            self.span_from(start),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xpath_ast::Axis;

    fn parse1(input: &str) -> ParseResult {
        Parser::new(input, XPathVersion::V1).parse()
    }

    fn parse2(input: &str) -> ParseResult {
        Parser::new(input, XPathVersion::V2).parse()
    }

    fn clean(input: &str) -> ExprNode {
        let result = parse1(input);
        assert_eq!(result.errors, vec![], "unexpected errors for {:?}", input);
        result.root
    }

    fn clean2(input: &str) -> ExprNode {
        let result = parse2(input);
        assert_eq!(result.errors, vec![], "unexpected errors for {:?}", input);
        result.root
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let root = clean("1 + 2 * 3");
        match &root.expr {
            Expr::Binary { op, left, right } => {
                assert_eq!(*op, BinaryOp::Plus);
                assert!(matches!(left.expr, Expr::Number(_)));
                assert!(
                    matches!(&right.expr, Expr::Binary { op, .. } if *op == BinaryOp::Mult)
                );
            }
            other => panic!("expected binary node, got {:?}", other),
        }
    }

    #[test]
    fn parentheses_invert_precedence() {
        let root = clean("(1 + 2) * 3");
        match &root.expr {
            Expr::Binary { op, left, .. } => {
                assert_eq!(*op, BinaryOp::Mult);
                assert!(matches!(left.expr, Expr::Parenthesized { .. }));
            }
            other => panic!("expected binary node, got {:?}", other),
        }
    }

    #[test]
    fn second_step_defaults_to_child_axis() {
        let root = clean("a/b");
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        assert!(!path.absolute);
        assert_eq!(path.steps.len(), 2);
        let StepKind::Axis { specifier, .. } = &path.steps[1].kind else {
            panic!("expected axis step");
        };
        assert!(specifier.is_default());
        assert_eq!(specifier.axis, Axis::Child);
    }

    #[test]
    fn at_sign_selects_attribute_axis() {
        let root = clean("a/@b");
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        assert_eq!(path.steps[1].axis(), Axis::Attribute);
        let StepKind::Axis { specifier, .. } = &path.steps[1].kind else {
            panic!("expected axis step");
        };
        assert!(!specifier.is_default());
    }

    #[test]
    fn bare_slash_is_the_document_root() {
        let root = clean("/");
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        assert!(path.absolute);
        assert!(path.steps.is_empty());
    }

    #[test]
    fn double_slash_marks_descendant_steps() {
        let root = clean("//a/b");
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        assert!(path.absolute);
        assert!(path.steps[0].double_slash);
        assert!(!path.steps[1].double_slash);
    }

    #[test]
    fn explicit_axis_and_node_type() {
        let root = clean("ancestor-or-self::node()");
        let Expr::Path(path) = &root.expr else {
            panic!("expected path");
        };
        assert_eq!(path.steps[0].axis(), Axis::AncestorOrSelf);
        assert!(matches!(
            path.steps[0].node_test(),
            Some(NodeTest::NodeType { .. })
        ));
    }

    #[test]
    fn filter_expression_keeps_predicates() {
        let root = clean("$items[3]");
        let Expr::Filter {
            primary,
            predicates,
        } = &root.expr
        else {
            panic!("expected filter");
        };
        assert!(matches!(primary.expr, Expr::VariableReference { .. }));
        assert_eq!(predicates.len(), 1);
    }

    #[test]
    fn function_call_with_prefixed_name() {
        let root = clean("my:lookup('key', 2)");
        let Expr::FunctionCall { name, arguments } = &root.expr else {
            panic!("expected function call");
        };
        assert_eq!(name, &QName::prefixed("my", "lookup"));
        assert_eq!(arguments.len(), 2);
    }

    #[test]
    fn union_of_paths() {
        let root = clean("a | b | c");
        let Expr::Binary { op, left, .. } = &root.expr else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Union);
        assert!(matches!(&left.expr, Expr::Binary { op, .. } if *op == BinaryOp::Union));
    }

    #[test]
    fn idempotent_parse() {
        let input = "//book[@id = $wanted]/title | //article/title";
        assert_eq!(parse1(input), parse1(input));
    }

    #[rstest]
    #[case("1 + 2 * 3", "1 + 2 * 3")]
    #[case("( 1+2 ) *3", "(1 + 2) * 3")]
    #[case("a/@b[1]", "a/@b[1]")]
    #[case("//a[0]", "//a[0]")]
    #[case("child::node()", "child::node()")]
    #[case("string( foo )='x'", "string(foo) = 'x'")]
    #[case("-  3", "-3")]
    fn rendering_round_trips_modulo_whitespace(#[case] input: &str, #[case] rendered: &str) {
        assert_eq!(clean(input).to_string(), rendered);
    }

    #[test]
    fn xpath2_for_expression() {
        let root = clean2("for $x in //item, $y in $x/part return $y/@price");
        let Expr::For { bindings, body } = &root.expr else {
            panic!("expected for");
        };
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].name, QName::local("x"));
        assert!(matches!(body.expr, Expr::Path(_)));
    }

    #[test]
    fn xpath2_quantified_expression() {
        let root = clean2("some $x in //a satisfies $x > 3");
        let Expr::Quantified {
            quantifier,
            bindings,
            ..
        } = &root.expr
        else {
            panic!("expected quantified");
        };
        assert_eq!(*quantifier, Quantifier::Some);
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn xpath2_if_expression() {
        let root = clean2("if ($a) then 1 else 2");
        assert!(matches!(root.expr, Expr::If { .. }));
    }

    #[test]
    fn xpath2_range_and_sequence() {
        let root = clean2("1 to 5");
        assert!(matches!(root.expr, Expr::Range { .. }));

        let root = clean2("1, 2, 3");
        let Expr::Sequence { items } = &root.expr else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn xpath2_instance_of() {
        let root = clean2("$x instance of xs:integer+");
        let Expr::TypeExpr {
            op,
            target,
            ..
        } = &root.expr
        else {
            panic!("expected type expression");
        };
        assert_eq!(*op, TypeOp::InstanceOf);
        assert_eq!(target.atomic, AtomicType::Integer);
        assert_eq!(target.cardinality, Some(Cardinality::OneOrMore));
    }

    #[test]
    fn xpath2_cast_as_optional_type() {
        let root = clean2("$x cast as xs:string?");
        let Expr::TypeExpr { op, target, .. } = &root.expr else {
            panic!("expected type expression");
        };
        assert_eq!(*op, TypeOp::CastAs);
        assert_eq!(target.cardinality, Some(Cardinality::ZeroOrOne));
    }

    #[test]
    fn xpath2_keywords_stay_names_in_xpath1() {
        // `to` is not an operator under the 1.0 grammar
        let result = parse1("1 to 5");
        assert!(matches!(result.root.expr, Expr::Number(_)));
        assert!(!result.errors.is_empty());
    }

    #[test]
    fn recovery_missing_bracket() {
        let result = parse1("a[1");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            SyntaxError::ExpectedToken { .. }
        ));
        // the tree still has the step and its predicate
        let Expr::Path(path) = &result.root.expr else {
            panic!("expected path");
        };
        assert_eq!(path.steps[0].predicates.len(), 1);
    }

    #[test]
    fn recovery_produces_error_node_not_panic() {
        let result = parse1("1 +");
        assert!(!result.is_clean());
        let Expr::Binary { right, .. } = &result.root.expr else {
            panic!("expected binary");
        };
        assert!(right.is_error());
    }

    #[test]
    fn empty_input_yields_error_tree() {
        let result = parse1("");
        assert!(result.root.is_error());
        assert_eq!(
            result.errors,
            vec![SyntaxError::UnexpectedEof { offset: 0 }]
        );
    }

    #[test]
    fn lexical_errors_surface_once() {
        let result = parse1("a # b");
        let illegal = result
            .errors
            .iter()
            .filter(|e| matches!(e, SyntaxError::IllegalCharacter { .. }))
            .count();
        assert_eq!(illegal, 1);
    }

    #[test]
    fn unclosed_literal_is_reported_with_tree() {
        let result = parse1("'abc");
        assert!(matches!(result.root.expr, Expr::Literal(_)));
        assert!(matches!(
            result.errors[0],
            SyntaxError::UnclosedLiteral { .. }
        ));
    }

    #[test]
    fn bad_axis_is_reported_once_and_recovered() {
        let result = parse1("sibling::a/b");
        let bad = result
            .errors
            .iter()
            .filter(|e| matches!(e, SyntaxError::InvalidAxisName { .. }))
            .count();
        assert_eq!(bad, 1);
        assert!(matches!(result.root.expr, Expr::Path(_)));
    }
}
