//! Core TaiScript lexer: converts source text to a token stream.
//!
//! Features:
//! - Multi-word keyword phrases, matched by whole words with the longest
//!   phrase winning (see [`ALL_PHRASES`])
//! - Whitespace, `;` separators and filler words are consumed and dropped
//! - Struct type names are resolved in the same pass: the identifier after
//!   `dhacha banao` is registered and re-emitted as [`TokenKind::StructType`],
//!   and the identifier after `aur usko banao` is re-emitted the same way
//!   when it names a registered struct
//! - Fail-fast: the first unmatched character ends lexing

use std::collections::HashSet;

use tai_types::{ErrorCode, SourceFile, Span, TaiError};

use crate::token::{Token, TokenKind, ALL_PHRASES, FILLER_WORDS};

/// Which struct-name merge the next identifier is subject to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingMerge {
    /// After `dhacha banao`: register and re-emit.
    Declare,
    /// After `aur usko banao`: re-emit only if registered.
    Instantiate,
}

/// The TaiScript lexer.
pub struct Lexer<'src> {
    text: &'src str,
    source: &'src [u8],
    source_file: &'src SourceFile,
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// Struct type names registered so far in this pass.
    struct_types: HashSet<String>,
    pending_merge: Option<PendingMerge>,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            text: &source_file.source,
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            struct_types: HashSet::new(),
            pending_merge: None,
        }
    }

    /// Lex the entire source into a token stream ending with [`TokenKind::Eof`].
    pub fn lex(mut self) -> tai_types::Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_discardable();
            if self.at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.current_span()));
                return Ok(tokens);
            }
            if let Some(token) = self.scan_token()? {
                tokens.push(self.resolve_struct_name(token));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if ch & 0xC0 != 0x80 {
            // UTF-8 continuation bytes do not start a new column.
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_to(&mut self, end: usize) {
        while self.pos < end {
            self.advance();
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, line: u32, col: u32) -> Span {
        Span::new(line, col, self.line, self.col.saturating_sub(1).max(1))
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> TaiError {
        let source_line = self.source_file.line(span.line).unwrap_or("");
        TaiError::new(&self.source_file.name, code, message, span, source_line)
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace, newlines and `;` separators.
    fn skip_discardable(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n' | b';') = self.peek() {
            self.advance();
        }
    }

    /// Scan one token. Returns `None` for a dropped filler word.
    fn scan_token(&mut self) -> tai_types::Result<Option<Token>> {
        let (line, col) = (self.line, self.col);
        let Some(ch) = self.peek() else {
            return Ok(Some(Token::new(TokenKind::Eof, self.current_span())));
        };
        match ch {
            b'{' => {
                self.advance();
                Ok(Some(Token::new(TokenKind::LBrace, self.span_from(line, col))))
            }
            b'}' => {
                self.advance();
                Ok(Some(Token::new(TokenKind::RBrace, self.span_from(line, col))))
            }
            b'"' => self.scan_string(line, col).map(Some),
            b'0'..=b'9' => self.scan_number(line, col).map(Some),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => Ok(self.scan_word(line, col)),
            _ => {
                let found = self.text[self.pos..].chars().next().unwrap_or('\u{FFFD}');
                Err(self.error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{found}'"),
                    self.current_span(),
                ))
            }
        }
    }

    fn scan_string(&mut self, line: u32, col: u32) -> tai_types::Result<Token> {
        self.advance(); // opening quote
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => break,
                Some(b'\n') | None => {
                    return Err(self
                        .error(
                            ErrorCode::UNTERMINATED_STRING,
                            "unterminated string literal",
                            Span::point(line, col),
                        )
                        .with_suggestion("close the string with '\"' on the same line"));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let value = self.text[start..self.pos].to_string();
        self.advance(); // closing quote
        Ok(Token::new(TokenKind::StringLit(value), self.span_from(line, col)))
    }

    fn scan_number(&mut self, line: u32, col: u32) -> tai_types::Result<Token> {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        let digits = &self.text[start..self.pos];
        let span = self.span_from(line, col);
        match digits.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::new(TokenKind::NumberLit(value), span)),
            _ => Err(self.error(
                ErrorCode::NUMBER_TOO_LARGE,
                format!("number literal '{digits}' is too large"),
                span,
            )),
        }
    }

    /// Scan a keyword phrase, filler word or identifier.
    fn scan_word(&mut self, line: u32, col: u32) -> Option<Token> {
        for &phrase in ALL_PHRASES {
            if let Some(end) = self.match_phrase(phrase) {
                self.advance_to(end);
                let kind = TokenKind::from_phrase(phrase)?;
                return Some(Token::new(kind, self.span_from(line, col)));
            }
        }

        let end = self.word_end(self.pos);
        let word = &self.text[self.pos..end];
        let is_filler = FILLER_WORDS.contains(&word);
        let name = word.to_string();
        self.advance_to(end);
        if is_filler {
            None
        } else {
            Some(Token::new(TokenKind::Identifier(name), self.span_from(line, col)))
        }
    }

    /// End offset of the identifier-shaped word starting at `from`.
    fn word_end(&self, from: usize) -> usize {
        let mut end = from;
        while let Some(ch) = self.source.get(end) {
            if ch.is_ascii_alphanumeric() || *ch == b'_' {
                end += 1;
            } else {
                break;
            }
        }
        end
    }

    /// If `phrase` matches at the cursor on whole-word boundaries, return its
    /// end offset. Words may be separated by any run of spaces or tabs.
    fn match_phrase(&self, phrase: &str) -> Option<usize> {
        let mut at = self.pos;
        let mut words = phrase.split(' ').peekable();
        while let Some(word) = words.next() {
            let end = self.word_end(at);
            if &self.text[at..end] != word {
                return None;
            }
            at = end;
            if words.peek().is_some() {
                let gap_start = at;
                while let Some(b' ' | b'\t') = self.source.get(at) {
                    at += 1;
                }
                if at == gap_start {
                    return None;
                }
            }
        }
        Some(at)
    }

    // ─────────────────────────────────────────────────────────────
    // Struct name side table
    // ─────────────────────────────────────────────────────────────

    fn resolve_struct_name(&mut self, token: Token) -> Token {
        let pending = self.pending_merge.take();
        let token = match (pending, token.kind) {
            (Some(PendingMerge::Declare), TokenKind::Identifier(name)) => {
                self.struct_types.insert(name.clone());
                Token::new(TokenKind::StructType(name), token.span)
            }
            (Some(PendingMerge::Instantiate), TokenKind::Identifier(name))
                if self.struct_types.contains(&name) =>
            {
                Token::new(TokenKind::StructType(name), token.span)
            }
            (_, kind) => Token::new(kind, token.span),
        };
        self.pending_merge = match token.kind {
            TokenKind::StructDecl => Some(PendingMerge::Declare),
            TokenKind::StructInstance => Some(PendingMerge::Instantiate),
            _ => None,
        };
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let sf = SourceFile::new("test.tai", source);
        Lexer::new(&sf)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  ;\n\t; "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_phrase_words_allow_wide_gaps() {
        assert_eq!(
            kinds("ginti \t  karo"),
            vec![TokenKind::LoopStart, TokenKind::Eof]
        );
    }

    #[test]
    fn test_phrase_does_not_cross_lines() {
        assert_eq!(
            kinds("ginti\nkaro"),
            vec![
                TokenKind::Identifier("ginti".into()),
                TokenKind::Identifier("karo".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_of_identifier() {
        assert_eq!(
            kinds("kam likhovat"),
            vec![
                TokenKind::Identifier("kam".into()),
                TokenKind::Identifier("likhovat".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let sf = SourceFile::new("test.tai", "likho a\n  ghoshna a");
        let tokens = Lexer::new(&sf).lex().unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 5));
        assert_eq!(tokens[1].span, Span::new(1, 7, 1, 7));
        assert_eq!(tokens[2].span, Span::new(2, 3, 2, 9));
    }

    #[test]
    fn test_non_ascii_in_string_counts_characters() {
        let sf = SourceFile::new("test.tai", "ghoshna \"नमस्ते\" x");
        let tokens = Lexer::new(&sf).lex().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::StringLit("नमस्ते".into()));
        assert_eq!(tokens[2].span.col, tokens[1].span.end_col + 2);
    }
}
