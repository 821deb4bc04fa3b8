//! Token types for the TaiScript lexer.
//!
//! Defines [`TokenKind`], the keyword phrase table, and [`Token`], which
//! pairs a kind with a source [`Span`].

use tai_types::ast::{BinOp, CmpOp};
use tai_types::Span;
use std::fmt;

/// Every keyword phrase, in matching priority order.
///
/// A phrase that is a prefix of another phrase (by whole words) must come
/// after it, so the lexer always takes the longest match.
pub const ALL_PHRASES: &[&str] = &[
    // Program structure
    "yojna shuru", "yojna band", "parichay", "ghoos lo", "pucho",
    // Declarations and output
    "me likho", "likho", "ghoshna", "isi line pe",
    // Arithmetic
    "me jodo", "se ghatao", "me guna karo", "ka shesh bhag karo", "ka bhag karo",
    // Field access (no grammar rule)
    "ka",
    // Loop steps
    "badhao", "ghatao",
    // Comparisons
    "bada ya barabar hai", "chota ya barabar hai", "bada hai", "chota hai", "barabar hai",
    "alag hai",
    // Control flow
    "agar", "warna", "ginti karo", "ginti band", "bijli chali gayi", "sarkar gir gayi",
    // Files
    "file kholo", "aur naam do", "band karo",
    // Structs
    "dhacha banao", "aur usko banao",
];

/// Words matched and then dropped. Tried only after [`ALL_PHRASES`].
pub const FILLER_WORDS: &[&str] = &["se", "toh", "tak"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals & names ─────────────────────────────────────

    /// Integer literal, stored as `f64`.
    NumberLit(f64),
    /// String literal without the quotes.
    StringLit(String),
    Identifier(String),
    /// An identifier the lexer resolved as a declared struct type name.
    StructType(String),

    // ── Keyword phrases ──────────────────────────────────────

    /// `yojna shuru`
    ProgramStart,
    /// `yojna band`
    ProgramEnd,
    /// `parichay`
    Profile,
    /// `ghoos lo`
    Payment,
    /// `pucho`
    Input,
    /// `likho`
    VarDecl,
    /// `me likho`
    FileWrite,
    /// `ghoshna`
    Print,
    /// `isi line pe`
    NoNewline,
    /// `me jodo`, `se ghatao`, `me guna karo`, `ka bhag karo`, `ka shesh bhag karo`
    Operator(BinOp),
    /// `ka`
    StructAccess,
    /// `badhao`
    Increment,
    /// `ghatao`
    Decrement,
    /// `barabar hai`, `alag hai`, `bada hai`, ...
    Comparison(CmpOp),
    /// `agar`
    If,
    /// `warna`
    Else,
    /// `ginti karo`
    LoopStart,
    /// `ginti band`
    LoopEnd,
    /// `bijli chali gayi`
    Break,
    /// `sarkar gir gayi`
    Return,
    /// `file kholo`
    FileOpen,
    /// `aur naam do`
    FileAlias,
    /// `band karo`
    FileClose,
    /// `dhacha banao`
    StructDecl,
    /// `aur usko banao`
    StructInstance,

    // ── Punctuation ──────────────────────────────────────────

    LBrace,
    RBrace,
    Eof,
}

impl TokenKind {
    /// Look up a keyword phrase (words separated by single spaces).
    pub fn from_phrase(phrase: &str) -> Option<TokenKind> {
        Some(match phrase {
            "yojna shuru" => TokenKind::ProgramStart,
            "yojna band" => TokenKind::ProgramEnd,
            "parichay" => TokenKind::Profile,
            "ghoos lo" => TokenKind::Payment,
            "pucho" => TokenKind::Input,
            "likho" => TokenKind::VarDecl,
            "me likho" => TokenKind::FileWrite,
            "ghoshna" => TokenKind::Print,
            "isi line pe" => TokenKind::NoNewline,
            "me jodo" => TokenKind::Operator(BinOp::Add),
            "se ghatao" => TokenKind::Operator(BinOp::Sub),
            "me guna karo" => TokenKind::Operator(BinOp::Mul),
            "ka bhag karo" => TokenKind::Operator(BinOp::Div),
            "ka shesh bhag karo" => TokenKind::Operator(BinOp::Rem),
            "ka" => TokenKind::StructAccess,
            "badhao" => TokenKind::Increment,
            "ghatao" => TokenKind::Decrement,
            "barabar hai" => TokenKind::Comparison(CmpOp::Eq),
            "alag hai" => TokenKind::Comparison(CmpOp::NotEq),
            "bada hai" => TokenKind::Comparison(CmpOp::Greater),
            "chota hai" => TokenKind::Comparison(CmpOp::Less),
            "bada ya barabar hai" => TokenKind::Comparison(CmpOp::GreaterEq),
            "chota ya barabar hai" => TokenKind::Comparison(CmpOp::LessEq),
            "agar" => TokenKind::If,
            "warna" => TokenKind::Else,
            "ginti karo" => TokenKind::LoopStart,
            "ginti band" => TokenKind::LoopEnd,
            "bijli chali gayi" => TokenKind::Break,
            "sarkar gir gayi" => TokenKind::Return,
            "file kholo" => TokenKind::FileOpen,
            "aur naam do" => TokenKind::FileAlias,
            "band karo" => TokenKind::FileClose,
            "dhacha banao" => TokenKind::StructDecl,
            "aur usko banao" => TokenKind::StructInstance,
            _ => return None,
        })
    }

    /// Returns `true` if this token can begin an expression.
    pub fn starts_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::NumberLit(_) | TokenKind::StringLit(_) | TokenKind::Identifier(_)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::NumberLit(n) => write!(f, "{n}"),
            TokenKind::StringLit(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) | TokenKind::StructType(name) => f.write_str(name),
            TokenKind::ProgramStart => f.write_str("yojna shuru"),
            TokenKind::ProgramEnd => f.write_str("yojna band"),
            TokenKind::Profile => f.write_str("parichay"),
            TokenKind::Payment => f.write_str("ghoos lo"),
            TokenKind::Input => f.write_str("pucho"),
            TokenKind::VarDecl => f.write_str("likho"),
            TokenKind::FileWrite => f.write_str("me likho"),
            TokenKind::Print => f.write_str("ghoshna"),
            TokenKind::NoNewline => f.write_str("isi line pe"),
            TokenKind::Operator(op) => write!(f, "{op}"),
            TokenKind::StructAccess => f.write_str("ka"),
            TokenKind::Increment => f.write_str("badhao"),
            TokenKind::Decrement => f.write_str("ghatao"),
            TokenKind::Comparison(op) => write!(f, "{op}"),
            TokenKind::If => f.write_str("agar"),
            TokenKind::Else => f.write_str("warna"),
            TokenKind::LoopStart => f.write_str("ginti karo"),
            TokenKind::LoopEnd => f.write_str("ginti band"),
            TokenKind::Break => f.write_str("bijli chali gayi"),
            TokenKind::Return => f.write_str("sarkar gir gayi"),
            TokenKind::FileOpen => f.write_str("file kholo"),
            TokenKind::FileAlias => f.write_str("aur naam do"),
            TokenKind::FileClose => f.write_str("band karo"),
            TokenKind::StructDecl => f.write_str("dhacha banao"),
            TokenKind::StructInstance => f.write_str("aur usko banao"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
