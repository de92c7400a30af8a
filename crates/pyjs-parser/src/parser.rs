use pyjs_common::Loc;
use pyjs_lexer::{Literal, Token, TokenKind};

use crate::ast::{AssignOp, BinaryOp, Expr, ForStep, LambdaBody, LitValue, LogicalOp, Stmt, UnaryOp};
use crate::error::{ParseError, ParseErrorKind};

/// Recursive-descent parser with precedence-climbing expression parsing,
/// matching the fixed 10-level operator table: each level is one method
/// that calls the next-tighter level, bottoming out at `primary`.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(tokens: Vec<Token>) -> (Vec<Stmt>, Vec<ParseError>) {
        let mut parser = Self::new(tokens);
        let stmts = parser.parse_program();
        (stmts, parser.errors)
    }

    // ── Token stream helpers ───────────────────────────────────────────

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            self.error_unexpected();
            None
        }
    }

    fn expect_colon(&mut self) {
        if self.at(TokenKind::Colon) {
            self.advance();
        } else {
            self.errors
                .push(ParseError::new(ParseErrorKind::MissingColon, self.current().loc));
        }
    }

    fn expect_closing(&mut self, kind: TokenKind, delim: char) {
        if self.at(kind) {
            self.advance();
        } else {
            self.errors.push(ParseError::new(
                ParseErrorKind::MissingClosingBracket { delim },
                self.current().loc,
            ));
        }
    }

    fn error_unexpected(&mut self) {
        let tok = self.current();
        self.errors.push(ParseError::new(
            ParseErrorKind::UnexpectedToken {
                found: format!("{:?}", tok.kind),
            },
            tok.loc,
        ));
    }

    /// Discard tokens until the next `NEWLINE`/`INDENT`/`DEDENT`/`EOF`,
    /// without consuming the boundary token itself.
    fn synchronize(&mut self) {
        while !matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof
        ) {
            self.advance();
        }
    }

    // ── Program / statements ────────────────────────────────────────────

    fn parse_program(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.at(TokenKind::Eof) {
            stmts.push(self.parse_statement());
            self.skip_newlines();
        }
        stmts
    }

    fn parse_block(&mut self) -> Vec<Stmt> {
        if self.at(TokenKind::Newline) {
            self.advance();
        } else {
            self.error_unexpected();
        }
        if self.expect(TokenKind::Indent).is_none() {
            return Vec::new();
        }
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !matches!(self.kind(), TokenKind::Dedent | TokenKind::Eof) {
            stmts.push(self.parse_statement());
            self.skip_newlines();
        }
        self.expect(TokenKind::Dedent);
        stmts
    }

    fn parse_statement(&mut self) -> Stmt {
        let loc = self.current().loc;
        match self.kind() {
            TokenKind::Global => self.parse_global_stmt(),
            TokenKind::Def => self.parse_function_stmt(),
            TokenKind::Class => self.parse_class_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => {
                self.advance();
                self.finish_simple(Stmt::Break { loc })
            }
            TokenKind::Pass => {
                self.advance();
                self.finish_simple(Stmt::Pass { loc })
            }
            _ => self.parse_simple_stmt(),
        }
    }

    fn finish_simple(&mut self, stmt: Stmt) -> Stmt {
        if !matches!(self.kind(), TokenKind::Newline | TokenKind::Eof) {
            self.error_unexpected();
            self.synchronize();
        }
        if self.at(TokenKind::Newline) {
            self.advance();
        }
        stmt
    }

    fn parse_global_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `global`
        let name = self.expect_identifier_name();
        self.expect(TokenKind::Eq);
        let value = self.parse_expression();
        self.finish_simple(Stmt::Variable {
            name,
            value,
            is_local: false,
            loc,
        })
    }

    fn expect_identifier_name(&mut self) -> String {
        if self.at(TokenKind::Identifier) {
            self.advance().lexeme
        } else {
            self.error_unexpected();
            String::new()
        }
    }

    fn parse_params(&mut self) -> Vec<String> {
        let mut params = Vec::new();
        if self.at(TokenKind::RParen) {
            return params;
        }
        loop {
            params.push(self.expect_identifier_name());
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        params
    }

    fn parse_function_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `def`
        let name = self.expect_identifier_name();
        self.expect(TokenKind::LParen);
        let params = self.parse_params();
        self.expect_closing(TokenKind::RParen, ')');
        self.expect_colon();
        let body = self.parse_block();
        Stmt::Function {
            name,
            params,
            body,
            is_local: true,
            is_reserved: false,
            loc,
        }
    }

    fn parse_class_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `class`
        let name = self.expect_identifier_name();
        let parent = if self.at(TokenKind::Implements) {
            self.advance();
            Some(self.expect_identifier_name())
        } else {
            None
        };
        self.expect_colon();

        if self.at(TokenKind::Newline) {
            self.advance();
        } else {
            self.error_unexpected();
        }
        let mut members = Vec::new();
        if self.expect(TokenKind::Indent).is_some() {
            self.skip_newlines();
            if self.at(TokenKind::Pass) {
                self.advance();
                self.finish_simple(Stmt::Pass { loc });
            } else {
                let mut seen_init = false;
                while !matches!(self.kind(), TokenKind::Dedent | TokenKind::Eof) {
                    if self.at(TokenKind::Def) {
                        let member = self.parse_function_stmt();
                        if let Stmt::Function { name, loc: mloc, .. } = &member {
                            if name == "init" {
                                if seen_init {
                                    self.errors.push(ParseError::new(
                                        ParseErrorKind::DuplicateInit {
                                            class_name: name.clone(),
                                        },
                                        *mloc,
                                    ));
                                }
                                seen_init = true;
                            }
                        }
                        members.push(member);
                    } else {
                        self.error_unexpected();
                        self.synchronize();
                    }
                    self.skip_newlines();
                }
            }
            self.expect(TokenKind::Dedent);
        }

        Stmt::Class {
            name,
            parent,
            members,
            is_local: true,
            loc,
        }
    }

    fn parse_if_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `if`
        let cond = self.parse_expression();
        self.expect_colon();
        let body = self.parse_block();
        let mut branches = vec![(cond, body)];

        loop {
            self.skip_newlines();
            if self.at(TokenKind::Elif) {
                self.advance();
                let cond = self.parse_expression();
                self.expect_colon();
                let body = self.parse_block();
                branches.push((cond, body));
            } else {
                break;
            }
        }

        let else_body = if self.at(TokenKind::Else) {
            self.advance();
            self.expect_colon();
            Some(self.parse_block())
        } else {
            None
        };

        Stmt::If {
            branches,
            else_body,
            loc,
        }
    }

    fn parse_while_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `while`
        let cond = self.parse_expression();
        self.expect_colon();
        let body = self.parse_block();
        Stmt::While { cond, body, loc }
    }

    fn parse_for_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `for`
        let init_is_local = if self.at(TokenKind::Global) {
            self.advance();
            false
        } else {
            true
        };
        let init_name = self.expect_identifier_name();
        self.expect(TokenKind::Eq);
        let init_value = self.parse_expression();
        self.expect(TokenKind::Comma);
        let cond = self.parse_expression();
        self.expect(TokenKind::Comma);
        let step = self.parse_for_step();
        self.expect_colon();
        let body = self.parse_block();
        Stmt::For {
            init_name,
            init_value,
            init_is_local,
            cond,
            step,
            body,
            loc,
        }
    }

    /// A `for` step clause: a plain expression, or an assignment/augmented
    /// assignment shorthand (`i += 1`) that is otherwise only legal as a
    /// top-level statement.
    fn parse_for_step(&mut self) -> ForStep {
        let loc = self.current().loc;
        let expr = self.parse_expression();
        let Some(op) = self.assign_op_for_current() else {
            return ForStep::Expr(expr);
        };
        if !matches!(expr, Expr::Var { .. } | Expr::Member { .. } | Expr::Index { .. }) {
            self.errors
                .push(ParseError::new(ParseErrorKind::InvalidAssignmentTarget, loc));
        }
        self.advance(); // the assignment operator
        let value = self.parse_expression();
        ForStep::Assign {
            target: Box::new(expr),
            op,
            value: Box::new(value),
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        self.advance(); // `return`
        let value = if matches!(self.kind(), TokenKind::Newline | TokenKind::Eof) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.finish_simple(Stmt::Return { value, loc })
    }

    /// The assignment operator `self.current()` names, if any, without consuming it.
    fn assign_op_for_current(&self) -> Option<AssignOp> {
        match self.kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            TokenKind::StarEq => Some(AssignOp::MulAssign),
            TokenKind::SlashEq => Some(AssignOp::DivAssign),
            TokenKind::PercentEq => Some(AssignOp::ModAssign),
            _ => None,
        }
    }

    fn parse_simple_stmt(&mut self) -> Stmt {
        let loc = self.current().loc;
        let expr = self.parse_expression();
        let op = self.assign_op_for_current();

        if let Some(op) = op {
            if !matches!(expr, Expr::Var { .. } | Expr::Member { .. } | Expr::Index { .. }) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::InvalidAssignmentTarget,
                    expr.loc(),
                ));
            }
            self.advance(); // the assignment operator
            let value = self.parse_expression();
            self.finish_simple(Stmt::Assign {
                target: expr,
                op,
                value,
                loc,
            })
        } else {
            self.finish_simple(Stmt::Expression {
                expression: expr,
                loc,
            })
        }
    }

    // ── Expressions: precedence levels 1 (lowest) .. 10 (primary) ───────

    fn parse_expression(&mut self) -> Expr {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_and();
        while self.at(TokenKind::Or) {
            let loc = self.current().loc;
            self.advance();
            let right = self.parse_and();
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOp::Or,
                right: Box::new(right),
                loc,
            };
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let mut left = self.parse_not();
        while self.at(TokenKind::And) {
            let loc = self.current().loc;
            self.advance();
            let right = self.parse_not();
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOp::And,
                right: Box::new(right),
                loc,
            };
        }
        left
    }

    fn parse_not(&mut self) -> Expr {
        if self.at(TokenKind::Not) {
            let loc = self.current().loc;
            self.advance();
            let operand = self.parse_not();
            Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                loc,
            }
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Expr {
        let mut left = self.parse_additive();
        loop {
            let op = match self.kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            let loc = self.current().loc;
            self.advance();
            let right = self.parse_additive();
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                loc,
            };
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let loc = self.current().loc;
            self.advance();
            let right = self.parse_multiplicative();
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                loc,
            };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_power();
        loop {
            let op = match self.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            let loc = self.current().loc;
            self.advance();
            let right = self.parse_power();
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                loc,
            };
        }
        left
    }

    /// Right-associative.
    fn parse_power(&mut self) -> Expr {
        let left = self.parse_unary();
        if self.at(TokenKind::StarStar) {
            let loc = self.current().loc;
            self.advance();
            let right = self.parse_power();
            Expr::Binary {
                left: Box::new(left),
                op: BinaryOp::Pow,
                right: Box::new(right),
                loc,
            }
        } else {
            left
        }
    }

    fn parse_unary(&mut self) -> Expr {
        if self.at(TokenKind::Minus) {
            let loc = self.current().loc;
            self.advance();
            let operand = self.parse_unary();
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                loc,
            }
        } else {
            self.parse_postfix()
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.kind() {
                TokenKind::LParen => {
                    let loc = self.current().loc;
                    self.advance();
                    let args = self.parse_args();
                    self.expect_closing(TokenKind::RParen, ')');
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        loc,
                    };
                }
                TokenKind::Dot => {
                    let loc = self.current().loc;
                    self.advance();
                    let name = self.expect_identifier_name();
                    expr = Expr::Member {
                        object: Box::new(expr),
                        name,
                        loc,
                    };
                }
                TokenKind::LBracket => {
                    let loc = self.current().loc;
                    self.advance();
                    let index = self.parse_expression();
                    self.expect_closing(TokenKind::RBracket, ']');
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        loc,
                    };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_args(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        if self.at(TokenKind::RParen) {
            return args;
        }
        loop {
            args.push(self.parse_expression());
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        args
    }

    fn parse_primary(&mut self) -> Expr {
        let loc = self.current().loc;
        match self.kind() {
            TokenKind::Number => {
                let tok = self.advance();
                let value = match tok.literal {
                    Some(Literal::Number(n)) => n,
                    _ => 0.0,
                };
                Expr::Literal {
                    value: LitValue::Number(value),
                    loc,
                }
            }
            TokenKind::String => {
                let tok = self.advance();
                let value = match tok.literal {
                    Some(Literal::Str(s)) => s,
                    _ => String::new(),
                };
                Expr::Literal {
                    value: LitValue::Str(value),
                    loc,
                }
            }
            TokenKind::True => {
                self.advance();
                Expr::Literal {
                    value: LitValue::Bool(true),
                    loc,
                }
            }
            TokenKind::False => {
                self.advance();
                Expr::Literal {
                    value: LitValue::Bool(false),
                    loc,
                }
            }
            TokenKind::None => {
                self.advance();
                Expr::Literal {
                    value: LitValue::Null,
                    loc,
                }
            }
            TokenKind::SelfRef => {
                self.advance();
                Expr::SelfRef { loc }
            }
            TokenKind::Identifier => {
                let tok = self.advance();
                Expr::Var {
                    name: tok.lexeme,
                    loc,
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect_closing(TokenKind::RParen, ')');
                Expr::Group {
                    inner: Box::new(inner),
                    loc,
                }
            }
            TokenKind::LBrace => self.parse_brace_expr(loc),
            TokenKind::Lambda => {
                self.advance();
                let mut params = Vec::new();
                if !self.at(TokenKind::Colon) {
                    loop {
                        params.push(self.expect_identifier_name());
                        if self.at(TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect_colon();
                let body = self.parse_expression();
                Expr::Lambda {
                    params,
                    body: LambdaBody::Expr(Box::new(body)),
                    loc,
                }
            }
            TokenKind::Def => {
                self.advance();
                self.expect(TokenKind::LParen);
                let params = self.parse_params();
                self.expect_closing(TokenKind::RParen, ')');
                self.expect_colon();
                let body = self.parse_block();
                Expr::Lambda {
                    params,
                    body: LambdaBody::Block(body),
                    loc,
                }
            }
            _ => {
                self.error_unexpected();
                self.synchronize();
                Expr::Literal {
                    value: LitValue::Null,
                    loc,
                }
            }
        }
    }

    /// Disambiguate `{}` between an empty/object literal and a list literal
    /// by a bounded, non-backtracking lookahead: scan forward (without
    /// mutating parser state) for an `IDENT =` pattern at brace-top-level,
    /// skipping over any balanced nested brackets.
    fn parse_brace_expr(&mut self, loc: Loc) -> Expr {
        self.advance(); // `{`
        self.skip_newlines();

        if self.at(TokenKind::RBrace) {
            self.advance();
            return Expr::ObjectLiteral {
                entries: Vec::new(),
                loc,
            };
        }

        if self.looks_like_object_entry() {
            self.parse_object_entries(loc)
        } else {
            self.parse_list_entries(loc)
        }
    }

    fn looks_like_object_entry(&self) -> bool {
        let mut i = self.pos;
        let mut depth: i32 = 0;
        while i < self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth -= 1,
                TokenKind::RBrace if depth == 0 => return false,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Comma if depth == 0 => return false,
                TokenKind::Identifier if depth == 0 => {
                    return matches!(
                        self.tokens.get(i + 1).map(|t| t.kind),
                        Some(TokenKind::Eq)
                    );
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parse_object_entries(&mut self, loc: Loc) -> Expr {
        let mut entries = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::RBrace) {
                break;
            }
            if !self.at(TokenKind::Identifier) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::MixedListAndObjectEntries,
                    self.current().loc,
                ));
                self.advance();
                continue;
            }
            let key = self.expect_identifier_name();
            if !self.at(TokenKind::Eq) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::MixedListAndObjectEntries,
                    self.current().loc,
                ));
            } else {
                self.advance(); // `=`
            }
            let value = self.parse_expression();
            entries.push((key, value));
            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
            } else {
                break;
            }
        }
        self.expect_closing(TokenKind::RBrace, '}');
        Expr::ObjectLiteral { entries, loc }
    }

    fn parse_list_entries(&mut self, loc: Loc) -> Expr {
        let mut elements = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::RBrace) {
                break;
            }
            let element = self.parse_expression();
            if self.at(TokenKind::Eq) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::MixedListAndObjectEntries,
                    self.current().loc,
                ));
                self.advance();
                let _ = self.parse_expression();
            }
            elements.push(element);
            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
            } else {
                break;
            }
        }
        self.expect_closing(TokenKind::RBrace, '}');
        Expr::ListLiteral { elements, loc }
    }
}
