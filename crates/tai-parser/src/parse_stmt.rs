//! Statement parsing. One rule per leading keyword.

use crate::parser::Parser;
use tai_lexer::token::TokenKind;
use tai_types::ast::*;
use tai_types::ErrorCode;

impl<'src> Parser<'src> {
    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> tai_types::Result<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            stmts.push(self.parse_statement()?);
        }
        self.advance(); // eat `}`
        Ok(Block {
            stmts,
            span: start.to(self.previous_span()),
        })
    }

    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> tai_types::Result<Stmt> {
        match self.peek_kind() {
            TokenKind::VarDecl => self.parse_var_decl(),
            TokenKind::Print => self.parse_print(),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::LoopStart => self.parse_loop().map(Stmt::Loop),
            TokenKind::StructDecl => self.parse_struct_decl().map(Stmt::StructDecl),
            TokenKind::FileOpen => self.parse_file_open().map(Stmt::FileOpen),
            TokenKind::FileClose => self.parse_file_close_prefix().map(Stmt::FileClose),
            TokenKind::Identifier(_) => self.parse_alias_stmt(),
            TokenKind::Input => {
                let start = self.advance().span;
                let name = self.expect_identifier()?;
                Ok(Stmt::Input(InputStmt {
                    span: start.to(name.span),
                    name,
                }))
            }
            TokenKind::Profile => {
                let start = self.advance().span;
                let profile = self.expect_string()?;
                Ok(Stmt::Profile(ProfileStmt {
                    profile,
                    span: start.to(self.previous_span()),
                }))
            }
            TokenKind::Payment => {
                let start = self.advance().span;
                let amount = self.expect_number()?;
                Ok(Stmt::Payment(PaymentStmt {
                    amount,
                    span: start.to(self.previous_span()),
                }))
            }
            TokenKind::Break => Ok(Stmt::Break(self.advance().span)),
            TokenKind::Return => Ok(Stmt::Return(self.advance().span)),
            TokenKind::ProgramStart => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "'yojna shuru' may only open the program",
            )),
            TokenKind::ProgramEnd => Ok(Stmt::ProgramEnd(self.advance().span)),
            TokenKind::Operator(op) => Err(self.error_at_current(
                ErrorCode::DANGLING_OPERATOR,
                format!("operator '{op}' has no left operand"),
            )),
            TokenKind::StructAccess => Err(self.field_access_error()),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// `likho name [expr]` or `likho name aur usko banao Type`
    fn parse_var_decl(&mut self) -> tai_types::Result<Stmt> {
        let start = self.advance().span; // eat `likho`
        let name = self.expect_identifier()?;

        if self.check(&TokenKind::StructInstance) {
            self.advance();
            let struct_type = match self.peek_kind().clone() {
                TokenKind::StructType(type_name) => Ident::new(type_name, self.advance().span),
                TokenKind::Identifier(type_name) => {
                    return Err(self
                        .error_at_current(
                            ErrorCode::UNDECLARED_STRUCT,
                            format!("undeclared struct type '{type_name}'"),
                        )
                        .with_suggestion(format!(
                            "declare it first with 'dhacha banao {type_name} {{ ... }}'"
                        )));
                }
                _ => return Err(self.unexpected("struct type name")),
            };
            return Ok(Stmt::StructInstance(StructInstanceStmt {
                span: start.to(struct_type.span),
                name,
                struct_type,
            }));
        }

        // `f me likho ...` and `f band karo` open a new statement.
        let alias_stmt_follows = matches!(self.peek_kind(), TokenKind::Identifier(_))
            && (self.check_next(&TokenKind::FileWrite) || self.check_next(&TokenKind::FileClose));
        let value = if self.peek_kind().starts_expression() && !alias_stmt_follows {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::VarDecl(VarDeclStmt {
            span: start.to(self.previous_span()),
            name,
            value,
        }))
    }

    /// `ghoshna expr [isi line pe]`
    fn parse_print(&mut self) -> tai_types::Result<Stmt> {
        let start = self.advance().span; // eat `ghoshna`
        let value = self.parse_expression()?;
        let newline = !self.eat(&TokenKind::NoNewline);
        Ok(Stmt::Print(PrintStmt {
            value,
            newline,
            span: start.to(self.previous_span()),
        }))
    }

    /// `agar left cmp right { ... } [warna { ... }]`
    fn parse_if(&mut self) -> tai_types::Result<IfStmt> {
        let start = self.advance().span; // eat `agar`
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(&TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(IfStmt {
            condition,
            then_block,
            else_block,
            span: start.to(self.previous_span()),
        })
    }

    /// `ginti karo var start end [badhao n | ghatao n] { ... } ginti band`
    fn parse_loop(&mut self) -> tai_types::Result<LoopStmt> {
        let start_span = self.advance().span; // eat `ginti karo`
        let variable = self.expect_identifier()?;

        let start_value = self.expect_number()?;
        let start = Expr::new(ExprKind::NumberLit(start_value), self.previous_span());

        let end = match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => Expr::new(ExprKind::NumberLit(n), self.advance().span),
            TokenKind::Identifier(name) => {
                Expr::new(ExprKind::Identifier(name), self.advance().span)
            }
            _ => return Err(self.unexpected("number or identifier for the loop end")),
        };

        let step = match self.peek_kind() {
            TokenKind::Increment | TokenKind::Decrement => {
                let sign = if self.check(&TokenKind::Decrement) {
                    -1.0
                } else {
                    1.0
                };
                let keyword = self.advance().span;
                let magnitude = self.expect_number()?;
                Expr::new(
                    ExprKind::NumberLit(sign * magnitude),
                    keyword.to(self.previous_span()),
                )
            }
            _ => Expr::new(ExprKind::NumberLit(1.0), end.span),
        };

        let body = self.parse_block()?;
        self.expect(&TokenKind::LoopEnd)?;
        Ok(LoopStmt {
            variable,
            start,
            end,
            step,
            body,
            span: start_span.to(self.previous_span()),
        })
    }

    /// `dhacha banao Name { likho field ... }`
    fn parse_struct_decl(&mut self) -> tai_types::Result<StructDeclStmt> {
        let start = self.advance().span; // eat `dhacha banao`
        let name = match self.peek_kind().clone() {
            TokenKind::StructType(name) => Ident::new(name, self.advance().span),
            _ => return Err(self.unexpected("struct name")),
        };
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            self.expect(&TokenKind::VarDecl)?;
            fields.push(self.expect_identifier()?);
        }
        self.advance(); // eat `}`
        Ok(StructDeclStmt {
            name,
            fields,
            span: start.to(self.previous_span()),
        })
    }

    /// `file kholo "path" aur naam do alias`
    fn parse_file_open(&mut self) -> tai_types::Result<FileOpenStmt> {
        let start = self.advance().span; // eat `file kholo`
        let path = self.expect_string()?;
        self.expect(&TokenKind::FileAlias)?;
        let alias = self.expect_identifier()?;
        Ok(FileOpenStmt {
            path,
            span: start.to(alias.span),
            alias,
        })
    }

    /// `band karo alias`
    fn parse_file_close_prefix(&mut self) -> tai_types::Result<FileCloseStmt> {
        let start = self.advance().span; // eat `band karo`
        let alias = self.expect_identifier()?;
        Ok(FileCloseStmt {
            span: start.to(alias.span),
            alias,
        })
    }

    /// Statements led by a file alias: `alias me likho expr [isi line pe]`
    /// or `alias band karo`.
    fn parse_alias_stmt(&mut self) -> tai_types::Result<Stmt> {
        if self.check_next(&TokenKind::FileWrite) {
            let alias = self.expect_identifier()?;
            self.advance(); // eat `me likho`
            let value = self.parse_expression()?;
            let newline = !self.eat(&TokenKind::NoNewline);
            return Ok(Stmt::FileWrite(FileWriteStmt {
                span: alias.span.to(self.previous_span()),
                alias,
                value,
                newline,
            }));
        }
        if self.check_next(&TokenKind::FileClose) {
            let alias = self.expect_identifier()?;
            self.advance(); // eat `band karo`
            return Ok(Stmt::FileClose(FileCloseStmt {
                span: alias.span.to(self.previous_span()),
                alias,
            }));
        }
        if self.check_next(&TokenKind::StructAccess) {
            self.advance(); // report at `ka`
            return Err(self.field_access_error());
        }
        Err(self
            .error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("unexpected identifier '{}' at start of statement", self.peek_kind()),
            )
            .with_suggestion("declare variables with 'likho'"))
    }
}
