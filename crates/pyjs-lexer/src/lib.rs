//! Tokenizer for the pyjs DSL: indentation-significant, single-pass,
//! never aborts -- lexical errors are recorded and scanning continues.

mod cursor;
mod error;
mod token;

use cursor::Cursor;
use pyjs_common::Loc;

pub use error::{LexError, LexErrorKind};
pub use token::{keyword_from_str, Dialect, Literal, Token, TokenKind};

/// Converts source text into tokens plus lexical diagnostics. Never panics
/// on malformed input; use [`Lexer::tokenize`] to run it to completion.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    dialect: Dialect,
    pending: Vec<Token>,
    indent_stack: Vec<u32>,
    bracket_depth: u32,
    at_line_start: bool,
    errors: Vec<LexError>,
    emitted_eof: bool,
}

enum IndentOutcome {
    /// Blank or comment-only line; caller should retry at the next line.
    Blank,
    /// Indentation measured; any `INDENT`/`DEDENT` tokens are queued.
    Ready,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, dialect: Dialect) -> Self {
        Self {
            cursor: Cursor::new(source),
            dialect,
            pending: Vec::new(),
            indent_stack: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            errors: Vec::new(),
            emitted_eof: false,
        }
    }

    /// Tokenize `source` to completion, returning tokens (including the
    /// trailing `Eof`) and any lexical errors encountered along the way.
    pub fn tokenize(source: &'src str, dialect: Dialect) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Self::new(source, dialect);
        let mut tokens = Vec::new();
        while let Some(tok) = lexer.next_token() {
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, lexer.errors)
    }

    fn next_token(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        if !self.pending.is_empty() {
            return Some(self.pending.remove(0));
        }

        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                match self.handle_indentation() {
                    IndentOutcome::Blank => continue,
                    IndentOutcome::Ready => {
                        if !self.pending.is_empty() {
                            return Some(self.pending.remove(0));
                        }
                        // Same indentation level as before: fall through and
                        // lex the rest of this line normally.
                    }
                }
            }

            self.skip_intraline_whitespace();

            let line = self.cursor.line();
            let col = self.cursor.col();

            let Some(c) = self.cursor.peek() else {
                return Some(self.handle_eof());
            };

            match c {
                '\n' | '\r' => {
                    self.consume_newline();
                    if self.bracket_depth > 0 {
                        continue;
                    }
                    self.at_line_start = true;
                    return Some(Token::new(TokenKind::Newline, "", Loc::synthetic(line, col)));
                }
                '#' => {
                    self.cursor.eat_while(|c| c != '\n' && c != '\r');
                    continue;
                }
                '(' => return Some(self.bracket_token(TokenKind::LParen, 1, line, col)),
                ')' => return Some(self.bracket_token(TokenKind::RParen, -1, line, col)),
                '[' => return Some(self.bracket_token(TokenKind::LBracket, 1, line, col)),
                ']' => return Some(self.bracket_token(TokenKind::RBracket, -1, line, col)),
                '{' => return Some(self.bracket_token(TokenKind::LBrace, 1, line, col)),
                '}' => return Some(self.bracket_token(TokenKind::RBrace, -1, line, col)),
                ',' => return Some(self.single(TokenKind::Comma, line, col)),
                ':' => return Some(self.single(TokenKind::Colon, line, col)),
                '.' => return Some(self.single(TokenKind::Dot, line, col)),
                '+' => return Some(self.lex_plus_minus_star_slash_percent('+', TokenKind::Plus, TokenKind::PlusEq, line, col)),
                '-' => return Some(self.lex_plus_minus_star_slash_percent('-', TokenKind::Minus, TokenKind::MinusEq, line, col)),
                '%' => return Some(self.lex_plus_minus_star_slash_percent('%', TokenKind::Percent, TokenKind::PercentEq, line, col)),
                '/' => return Some(self.lex_plus_minus_star_slash_percent('/', TokenKind::Slash, TokenKind::SlashEq, line, col)),
                '*' => return Some(self.lex_star(line, col)),
                '=' => return Some(self.lex_eq(line, col)),
                '!' => return Some(self.lex_bang(line, col)),
                '<' => return Some(self.lex_lt(line, col)),
                '>' => return Some(self.lex_gt(line, col)),
                '0'..='9' => return Some(self.lex_number(line, col)),
                '"' | '\'' => return Some(self.lex_string(c, line, col)),
                c if is_ident_start(c) => return Some(self.lex_ident(line, col)),
                other => {
                    self.cursor.advance();
                    self.errors.push(LexError::new(
                        LexErrorKind::UnknownCharacter(other),
                        Loc::new(line, col, 1),
                    ));
                    continue;
                }
            }
        }
    }

    // ── Indentation ────────────────────────────────────────────────────

    fn handle_indentation(&mut self) -> IndentOutcome {
        let line = self.cursor.line();
        let mut level = 0u32;
        while matches!(self.cursor.peek(), Some(' ') | Some('\t')) {
            self.cursor.advance();
            level += 1;
        }

        match self.cursor.peek() {
            None => {
                // EOF at start of (blank) line; let handle_eof drain dedents.
                return IndentOutcome::Ready;
            }
            Some('\n') | Some('\r') => {
                self.consume_newline();
                return IndentOutcome::Blank;
            }
            Some('#') => {
                self.cursor.eat_while(|c| c != '\n' && c != '\r');
                if !self.cursor.is_eof() {
                    self.consume_newline();
                }
                return IndentOutcome::Blank;
            }
            _ => {}
        }

        let top = *self.indent_stack.last().expect("indent stack never empty");
        if level > top {
            self.indent_stack.push(level);
            self.pending.push(Token::new(TokenKind::Indent, "", Loc::synthetic(line, 0)));
        } else if level < top {
            while *self.indent_stack.last().unwrap() > level {
                self.indent_stack.pop();
                self.pending.push(Token::new(TokenKind::Dedent, "", Loc::synthetic(line, 0)));
            }
            if *self.indent_stack.last().unwrap() != level {
                self.errors.push(LexError::new(
                    LexErrorKind::InconsistentDedent,
                    Loc::new(line, 0, 0),
                ));
                // Resynchronize onto this level so scanning can continue.
                self.indent_stack.push(level);
            }
        }
        self.at_line_start = false;
        IndentOutcome::Ready
    }

    fn handle_eof(&mut self) -> Token {
        let line = self.cursor.line();
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.pending.push(Token::new(TokenKind::Dedent, "", Loc::synthetic(line, 0)));
        }
        self.pending.push(Token::new(TokenKind::Eof, "", Loc::synthetic(line, 0)));
        self.emitted_eof = true;
        self.pending.remove(0)
    }

    fn consume_newline(&mut self) {
        self.cursor.advance();
        if self.cursor.peek() == Some('\n') {
            self.cursor.advance();
        }
    }

    fn skip_intraline_whitespace(&mut self) {
        self.cursor.eat_while(|c| c == ' ' || c == '\t');
    }

    // ── Single/multi-char tokens ─────────────────────────────────────

    fn single(&mut self, kind: TokenKind, line: u32, col: u32) -> Token {
        let lexeme = self.cursor.advance().unwrap();
        Token::new(kind, lexeme.to_string(), Loc::new(line, col, 1))
    }

    fn bracket_token(&mut self, kind: TokenKind, delta: i32, line: u32, col: u32) -> Token {
        let tok = self.single(kind, line, col);
        if delta > 0 {
            self.bracket_depth += 1;
        } else {
            self.bracket_depth = self.bracket_depth.saturating_sub(1);
        }
        tok
    }

    fn lex_eq(&mut self, line: u32, col: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::EqEq, "==", Loc::new(line, col, 2))
        } else {
            Token::new(TokenKind::Eq, "=", Loc::new(line, col, 1))
        }
    }

    fn lex_bang(&mut self, line: u32, col: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::BangEq, "!=", Loc::new(line, col, 2))
        } else {
            self.errors.push(LexError::new(
                LexErrorKind::UnknownCharacter('!'),
                Loc::new(line, col, 1),
            ));
            Token::new(TokenKind::BangEq, "!", Loc::new(line, col, 1))
        }
    }

    fn lex_lt(&mut self, line: u32, col: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::Le, "<=", Loc::new(line, col, 2))
        } else {
            Token::new(TokenKind::Lt, "<", Loc::new(line, col, 1))
        }
    }

    fn lex_gt(&mut self, line: u32, col: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::Ge, ">=", Loc::new(line, col, 2))
        } else {
            Token::new(TokenKind::Gt, ">", Loc::new(line, col, 1))
        }
    }

    fn lex_star(&mut self, line: u32, col: u32) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('*') => {
                self.cursor.advance();
                Token::new(TokenKind::StarStar, "**", Loc::new(line, col, 2))
            }
            Some('=') => {
                self.cursor.advance();
                Token::new(TokenKind::StarEq, "*=", Loc::new(line, col, 2))
            }
            _ => Token::new(TokenKind::Star, "*", Loc::new(line, col, 1)),
        }
    }

    fn lex_plus_minus_star_slash_percent(
        &mut self,
        ch: char,
        plain: TokenKind,
        augmented: TokenKind,
        line: u32,
        col: u32,
    ) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(augmented, format!("{ch}="), Loc::new(line, col, 2))
        } else {
            Token::new(plain, ch.to_string(), Loc::new(line, col, 1))
        }
    }

    // ── Numbers ────────────────────────────────────────────────────────

    fn lex_number(&mut self, line: u32, col: u32) -> Token {
        let start = self.cursor.byte_pos();
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        let end = self.cursor.byte_pos();
        let text = self.cursor.slice(start, end);
        let value: f64 = text.parse().unwrap_or(0.0);
        let len = (end - start).max(1);
        Token::with_literal(
            TokenKind::Number,
            text,
            Literal::Number(value),
            Loc::new(line, col, len),
        )
    }

    // ── Strings ────────────────────────────────────────────────────────

    fn lex_string(&mut self, quote: char, line: u32, col: u32) -> Token {
        let start = self.cursor.byte_pos();
        self.cursor.advance(); // opening quote

        let triple = quote == '"'
            && self.cursor.peek() == Some('"')
            && self.cursor.peek_next() == Some('"');
        if triple {
            self.cursor.advance();
            self.cursor.advance();
        }

        let mut decoded = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    self.errors.push(LexError::new(
                        LexErrorKind::UnterminatedString,
                        Loc::new(line, col, 1),
                    ));
                    break;
                }
                Some('"') if triple => {
                    if self.cursor.peek_next() == Some('"') {
                        let save_line = self.cursor.line();
                        let save_col = self.cursor.col();
                        self.cursor.advance();
                        self.cursor.advance();
                        if self.cursor.peek() == Some('"') {
                            self.cursor.advance();
                            break;
                        }
                        decoded.push('"');
                        decoded.push('"');
                        let _ = (save_line, save_col);
                    } else {
                        decoded.push('"');
                        self.cursor.advance();
                    }
                }
                Some(c) if c == quote && !triple => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some('n') => {
                            decoded.push('\n');
                            self.cursor.advance();
                        }
                        Some('t') => {
                            decoded.push('\t');
                            self.cursor.advance();
                        }
                        Some('r') => {
                            decoded.push('\r');
                            self.cursor.advance();
                        }
                        Some('\\') => {
                            decoded.push('\\');
                            self.cursor.advance();
                        }
                        Some('"') => {
                            decoded.push('"');
                            self.cursor.advance();
                        }
                        Some('\'') => {
                            decoded.push('\'');
                            self.cursor.advance();
                        }
                        Some('0') => {
                            decoded.push('\0');
                            self.cursor.advance();
                        }
                        Some('a') => {
                            decoded.push('\u{07}');
                            self.cursor.advance();
                        }
                        Some('b') => {
                            decoded.push('\u{08}');
                            self.cursor.advance();
                        }
                        Some('f') => {
                            decoded.push('\u{0C}');
                            self.cursor.advance();
                        }
                        Some('v') => {
                            decoded.push('\u{0B}');
                            self.cursor.advance();
                        }
                        Some(other) => {
                            decoded.push('\\');
                            decoded.push(other);
                            self.cursor.advance();
                        }
                        None => {
                            decoded.push('\\');
                        }
                    }
                }
                Some('\n') if !triple => {
                    self.errors.push(LexError::new(
                        LexErrorKind::UnterminatedString,
                        Loc::new(line, col, 1),
                    ));
                    break;
                }
                Some(c) => {
                    decoded.push(c);
                    self.cursor.advance();
                }
            }
        }

        let end = self.cursor.byte_pos();
        let text = self.cursor.slice(start, end);
        let len = (end - start).max(1);
        Token::with_literal(
            TokenKind::String,
            text,
            Literal::Str(decoded),
            Loc::new(line, col, len),
        )
    }

    // ── Identifiers / keywords ──────────────────────────────────────────

    fn lex_ident(&mut self, line: u32, col: u32) -> Token {
        let start = self.cursor.byte_pos();
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.byte_pos();
        let text = self.cursor.slice(start, end);
        let len = (end - start).max(1);

        match keyword_from_str(text, self.dialect) {
            Some(TokenKind::True) => {
                Token::with_literal(TokenKind::True, text, Literal::Bool(true), Loc::new(line, col, len))
            }
            Some(TokenKind::False) => {
                Token::with_literal(TokenKind::False, text, Literal::Bool(false), Loc::new(line, col, len))
            }
            Some(TokenKind::None) => {
                Token::with_literal(TokenKind::None, text, Literal::Null, Loc::new(line, col, len))
            }
            Some(kind) => Token::new(kind, text, Loc::new(line, col, len)),
            None => Token::new(TokenKind::Identifier, text, Loc::new(line, col, len)),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
