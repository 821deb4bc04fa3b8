//! Core parser infrastructure: token cursor, error reporting, program rule.

use tai_lexer::token::{Token, TokenKind};
use tai_types::ast::{Ident, Program, ProgramStartStmt, Stmt};
use tai_types::{ErrorCode, SourceFile, Span, TaiError};

/// The TaiScript parser.
///
/// Consumes a token stream produced by the lexer and builds a [`Program`].
/// Parsing stops at the first error.
pub struct Parser<'src> {
    /// The token stream, always terminated by `Eof`.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(mut tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let span = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Check if the token after the current one matches the given kind.
    pub(crate) fn check_next(&self, kind: &TokenKind) -> bool {
        self.tokens
            .get(self.pos + 1)
            .map_or(*kind == TokenKind::Eof, |t| t.kind == *kind)
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(idx) => self.tokens[idx].span,
            None => Span::point(1, 1),
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> tai_types::Result<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    /// Expect an identifier token.
    pub(crate) fn expect_identifier(&mut self) -> tai_types::Result<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Expect a string literal token. Returns the string value.
    pub(crate) fn expect_string(&mut self) -> tai_types::Result<String> {
        match self.peek_kind().clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    /// Expect a number literal token.
    pub(crate) fn expect_number(&mut self) -> tai_types::Result<f64> {
        match self.peek_kind() {
            TokenKind::NumberLit(n) => {
                let n = *n;
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected("number")),
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an error at a specific span.
    pub(crate) fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> TaiError {
        let source_line = self.source_file.line(span.line).unwrap_or("");
        TaiError::new(&self.source_file.name, code, message, span, source_line)
    }

    /// Build an error at the current token.
    pub(crate) fn error_at_current(&self, code: ErrorCode, message: impl Into<String>) -> TaiError {
        self.error_at(code, message, self.current_span())
    }

    /// "expected X, got Y" at the current token. Running out of tokens gets
    /// its own code.
    pub(crate) fn unexpected(&self, expected: &str) -> TaiError {
        let code = if self.at_end() {
            ErrorCode::UNEXPECTED_END
        } else {
            ErrorCode::UNEXPECTED_TOKEN
        };
        self.error_at_current(code, format!("expected {expected}, got '{}'", self.peek_kind()))
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Program`].
    pub fn parse(mut self) -> tai_types::Result<Program> {
        let mut stmts = Vec::new();
        let has_start = self.check(&TokenKind::ProgramStart);
        if has_start {
            stmts.push(self.parse_program_start()?);
        }

        while !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        let has_end = stmts.iter().any(|stmt| matches!(stmt, Stmt::ProgramEnd(_)));
        if has_start && !has_end {
            return Err(self
                .error_at_current(
                    ErrorCode::MISSING_PROGRAM_END,
                    "program opened with 'yojna shuru' is never closed",
                )
                .with_suggestion("add 'yojna band' at the end of the program"));
        }

        tracing::debug!(statements = stmts.len(), "parsed program");
        Ok(Program { stmts })
    }

    /// `yojna shuru "name"`
    fn parse_program_start(&mut self) -> tai_types::Result<Stmt> {
        let start = self.advance().span; // eat `yojna shuru`
        let name = self.expect_string()?;
        Ok(Stmt::ProgramStart(ProgramStartStmt {
            name,
            span: start.to(self.previous_span()),
        }))
    }
}
