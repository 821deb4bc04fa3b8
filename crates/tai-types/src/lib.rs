//! Shared types for TaiScript.
//!
//! This crate defines the AST node types, source spans and the
//! diagnostic type reported by the lexer and parser.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCategory, ErrorCode, TaiError};
pub use span::{SourceFile, Span};

/// Result type used by the lexer and parser.
pub type Result<T> = std::result::Result<T, TaiError>;
