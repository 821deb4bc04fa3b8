//! AST node types for TaiScript.
//!
//! Every node carries a [`Span`]. Each statement variant has a payload
//! struct with fixed named fields so shape errors surface in the parser,
//! never in the interpreter.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed program: its statements in source order.
///
/// Program-start and program-end markers are kept as ordinary statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Program {
    /// The name given after `yojna shuru`, if the program has a start marker.
    pub fn name(&self) -> Option<&str> {
        match self.stmts.first() {
            Some(Stmt::ProgramStart(start)) => Some(&start.name),
            _ => None,
        }
    }
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `yojna shuru "name"`
    ProgramStart(ProgramStartStmt),
    /// `yojna band`
    ProgramEnd(Span),
    /// `likho name [expr]`
    VarDecl(VarDeclStmt),
    /// `ghoshna expr [isi line pe]`
    Print(PrintStmt),
    /// `agar cond { ... } [warna { ... }]`
    If(IfStmt),
    /// `ginti karo i start end [badhao n | ghatao n] { ... } ginti band`
    Loop(LoopStmt),
    /// `dhacha banao Name { likho field ... }`
    StructDecl(StructDeclStmt),
    /// `likho name aur usko banao Name`
    StructInstance(StructInstanceStmt),
    /// `file kholo "path" aur naam do alias`
    FileOpen(FileOpenStmt),
    /// `band karo alias` or `alias band karo`
    FileClose(FileCloseStmt),
    /// `alias me likho expr [isi line pe]`
    FileWrite(FileWriteStmt),
    /// `pucho name`
    Input(InputStmt),
    /// `parichay "PROFILE"`
    Profile(ProfileStmt),
    /// `ghoos lo amount`
    Payment(PaymentStmt),
    /// `bijli chali gayi`
    Break(Span),
    /// `sarkar gir gayi`
    Return(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::ProgramStart(s) => s.span,
            Stmt::ProgramEnd(span) | Stmt::Break(span) | Stmt::Return(span) => *span,
            Stmt::VarDecl(s) => s.span,
            Stmt::Print(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::Loop(s) => s.span,
            Stmt::StructDecl(s) => s.span,
            Stmt::StructInstance(s) => s.span,
            Stmt::FileOpen(s) => s.span,
            Stmt::FileClose(s) => s.span,
            Stmt::FileWrite(s) => s.span,
            Stmt::Input(s) => s.span,
            Stmt::Profile(s) => s.span,
            Stmt::Payment(s) => s.span,
        }
    }

    /// Short name used in logs and internal diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::ProgramStart(_) => "program-start",
            Stmt::ProgramEnd(_) => "program-end",
            Stmt::VarDecl(_) => "variable-declaration",
            Stmt::Print(_) => "print",
            Stmt::If(_) => "conditional",
            Stmt::Loop(_) => "loop",
            Stmt::StructDecl(_) => "struct-declaration",
            Stmt::StructInstance(_) => "struct-instance",
            Stmt::FileOpen(_) => "file-open",
            Stmt::FileClose(_) => "file-close",
            Stmt::FileWrite(_) => "file-write",
            Stmt::Input(_) => "input",
            Stmt::Profile(_) => "profile-declaration",
            Stmt::Payment(_) => "payment",
            Stmt::Break(_) => "break",
            Stmt::Return(_) => "return",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramStartStmt {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub name: Ident,
    /// `None` binds the empty value.
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
    /// `false` when the statement ends with `isi line pe`.
    pub newline: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Always an [`ExprKind::Comparison`].
    pub condition: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStmt {
    pub variable: Ident,
    /// A number literal.
    pub start: Expr,
    /// A number literal or an identifier resolved at run time.
    pub end: Expr,
    /// Signed step; `+1` unless `badhao`/`ghatao` is given.
    pub step: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDeclStmt {
    pub name: Ident,
    pub fields: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructInstanceStmt {
    pub name: Ident,
    pub struct_type: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileOpenStmt {
    pub path: String,
    pub alias: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileCloseStmt {
    pub alias: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileWriteStmt {
    pub alias: Ident,
    pub value: Expr,
    pub newline: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputStmt {
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStmt {
    pub profile: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStmt {
    pub amount: f64,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLit(f64),
    /// Raw text; `{name}` placeholders are resolved at evaluation.
    StringLit(String),
    Identifier(String),
    /// Right-associative: `a op (b op c)`.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Comparison {
        left: Box<Expr>,
        op: CmpOp,
        right: Box<Expr>,
    },
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    /// The source phrase for this operator.
    pub fn phrase(self) -> &'static str {
        match self {
            BinOp::Add => "me jodo",
            BinOp::Sub => "se ghatao",
            BinOp::Mul => "me guna karo",
            BinOp::Div => "ka bhag karo",
            BinOp::Rem => "ka shesh bhag karo",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    NotEq,
    Greater,
    Less,
    GreaterEq,
    LessEq,
}

impl CmpOp {
    pub fn phrase(self) -> &'static str {
        match self {
            CmpOp::Eq => "barabar hai",
            CmpOp::NotEq => "alag hai",
            CmpOp::Greater => "bada hai",
            CmpOp::Less => "chota hai",
            CmpOp::GreaterEq => "bada ya barabar hai",
            CmpOp::LessEq => "chota ya barabar hai",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}
