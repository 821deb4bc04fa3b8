//! TaiScript parser: converts a token stream into an AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::Parser;

use tai_lexer::Lexer;
use tai_types::ast::Program;
use tai_types::SourceFile;

/// Lex and parse a source file in one step.
pub fn parse_source(source_file: &SourceFile) -> tai_types::Result<Program> {
    let tokens = Lexer::new(source_file).lex()?;
    Parser::new(tokens, source_file).parse()
}
