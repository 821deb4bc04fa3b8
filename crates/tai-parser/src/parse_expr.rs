//! Expression parsing.
//!
//! There is no precedence: a primary term is followed by an optional
//! operator and a recursively parsed right operand, so chains associate to
//! the right (`a me jodo b se ghatao c` is `a + (b - c)`).
//!
//! Comparisons only appear as `agar` conditions and never nest.

use tai_lexer::token::TokenKind;
use tai_types::ast::*;
use tai_types::{ErrorCode, TaiError};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse an arithmetic expression.
    pub(crate) fn parse_expression(&mut self) -> tai_types::Result<Expr> {
        let left = self.parse_primary()?;

        if self.check(&TokenKind::StructAccess) {
            return Err(self.field_access_error());
        }

        let &TokenKind::Operator(op) = self.peek_kind() else {
            return Ok(left);
        };
        let op_span = self.advance().span;
        if matches!(
            self.peek_kind(),
            TokenKind::Eof | TokenKind::RBrace | TokenKind::LoopEnd
        ) {
            return Err(self
                .error_at(
                    ErrorCode::DANGLING_OPERATOR,
                    format!("operator '{op}' has no right operand"),
                    op_span,
                )
                .with_suggestion(format!("add a value after '{op}'")));
        }
        let right = self.parse_expression()?;
        let span = left.span.to(right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// `left cmp right`
    pub(crate) fn parse_condition(&mut self) -> tai_types::Result<Expr> {
        let left = self.parse_expression()?;
        let op = match self.peek_kind() {
            TokenKind::Comparison(op) => *op,
            _ => return Err(self.unexpected("comparison")),
        };
        self.advance();
        let right = self.parse_expression()?;
        if matches!(self.peek_kind(), TokenKind::Comparison(_)) {
            return Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "comparisons cannot be chained",
            ));
        }
        let span = left.span.to(right.span);
        Ok(Expr::new(
            ExprKind::Comparison {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// A number, string or identifier.
    fn parse_primary(&mut self) -> tai_types::Result<Expr> {
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::NumberLit(n), span))
            }
            TokenKind::StringLit(s) => {
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::StringLit(s), span))
            }
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::Identifier(name), span))
            }
            TokenKind::Operator(op) => Err(self.error_at_current(
                ErrorCode::DANGLING_OPERATOR,
                format!("operator '{op}' has no left operand"),
            )),
            TokenKind::StructAccess => Err(self.field_access_error()),
            _ => Err(self.unexpected("expression")),
        }
    }

    pub(crate) fn field_access_error(&self) -> TaiError {
        self.error_at_current(
            ErrorCode::FIELD_ACCESS_UNSUPPORTED,
            "field access with 'ka' is not supported",
        )
    }
}
