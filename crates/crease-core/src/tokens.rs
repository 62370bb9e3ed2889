//! Source tokens as produced by the parser collaborator
//!
//! The token stream is lossless: whitespace, newlines, and comments are
//! tokens in their own right, so concatenating every token's text
//! reproduces the source exactly. Rules reason about adjacency and
//! inter-token spans through these tokens instead of raw string offsets.

use serde::{Deserialize, Serialize};

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// 1-based line/column position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexical token categories
///
/// The code kinds follow the token taxonomy of the JavaScript tokenizer;
/// the trivia kinds carry the inter-token character spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Punctuator,
    String,
    Number,
    Boolean,
    Null,
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
}

impl TokenKind {
    /// Whitespace, newlines, and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A single lexical token with its text, byte range, and line/column extent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        span: Span,
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            start,
            end,
        }
    }

    pub fn start_offset(&self) -> usize {
        self.span.start
    }

    pub fn end_offset(&self) -> usize {
        self.span.end
    }

    /// Check kind and exact text at once
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_punctuator(&self, text: &str) -> bool {
        self.is(TokenKind::Punctuator, text)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.is(TokenKind::Keyword, text)
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str, start: usize) -> Token {
        Token::new(
            kind,
            text,
            Span::new(start, start + text.len()),
            Position::new(1, start + 1),
            Position::new(1, start + 1 + text.len()),
        )
    }

    #[test]
    fn trivia_classification() {
        assert!(token(TokenKind::Whitespace, "  ", 0).is_trivia());
        assert!(token(TokenKind::LineComment, "// x", 0).is_trivia());
        assert!(token(TokenKind::LineComment, "// x", 0).is_comment());
        assert!(!token(TokenKind::Identifier, "a", 0).is_trivia());
    }

    #[test]
    fn kind_and_text_matching() {
        let paren = token(TokenKind::Punctuator, "(", 4);
        assert!(paren.is_punctuator("("));
        assert!(!paren.is_punctuator(")"));
        assert!(!paren.is_keyword("("));
        assert_eq!(paren.start_offset(), 4);
        assert_eq!(paren.end_offset(), 5);
    }

    #[test]
    fn span_basics() {
        let span = Span::new(2, 5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
    }
}
