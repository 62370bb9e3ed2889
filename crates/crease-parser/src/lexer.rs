//! Trivia-preserving JavaScript lexer
//!
//! Unlike a lexer that feeds only a parser, this one preserves ALL source
//! information: whitespace, newlines, and comments become tokens of their
//! own, so the stream is lossless and concatenating every token's text
//! reproduces the input exactly. Rules depend on that property to reason
//! about inter-token spans.

use crease_core::parser::SyntaxFailure;
use crease_core::tokens::{Position, Span, Token, TokenKind};

/// ES5 keywords, plus `let`/`const` which the parser gates separately
const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "finally",
    "for",
    "function",
    "if",
    "in",
    "instanceof",
    "let",
    "new",
    "return",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

/// Multi-character punctuators, longest first
const PUNCTUATORS: &[&str] = &[
    "...", "===", "!==", ">>>", "<<=", ">>=", "==", "!=", "<=", ">=", "&&", "||", "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "{", "}", "(", ")", "[", "]",
    ";", ",", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".",
];

/// Lex a source string into a lossless token stream
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxFailure> {
    Lexer::new(source).run()
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxFailure> {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' | '\r' => self.lex_newline(),
                c if c.is_whitespace() => self.lex_whitespace(),
                '/' if self.peek_ahead(1) == Some('/') => self.lex_line_comment(),
                '/' if self.peek_ahead(1) == Some('*') => self.lex_block_comment()?,
                '\'' | '"' => self.lex_string(ch)?,
                c if c.is_ascii_digit() => self.lex_number()?,
                '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_number()?
                }
                c if is_identifier_start(c) => self.lex_identifier(),
                _ => self.lex_punctuator()?,
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    /// Consume one char, keeping line/column in step; `\r\n` counts as a
    /// single line break on the `\n`
    fn advance(&mut self) {
        let Some(ch) = self.peek() else { return };
        self.pos += ch.len_utf8();
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                if self.peek() != Some('\n') {
                    self.line += 1;
                    self.column = 1;
                }
            }
            _ => self.column += 1,
        }
    }

    fn mark(&self) -> (usize, Position) {
        (self.pos, Position::new(self.line, self.column))
    }

    fn emit(&mut self, kind: TokenKind, start: (usize, Position)) {
        let (offset, position) = start;
        let span = Span::new(offset, self.pos);
        self.tokens.push(Token::new(
            kind,
            &self.source[offset..self.pos],
            span,
            position,
            Position::new(self.line, self.column),
        ));
    }

    fn failure(&self, message: impl Into<String>) -> SyntaxFailure {
        SyntaxFailure {
            message: message.into(),
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn lex_newline(&mut self) {
        let start = self.mark();
        if self.peek() == Some('\r') {
            self.advance();
        }
        if self.peek() == Some('\n') {
            self.advance();
        }
        self.emit(TokenKind::Newline, start);
    }

    fn lex_whitespace(&mut self) {
        let start = self.mark();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() && ch != '\n' && ch != '\r' {
                self.advance();
            } else {
                break;
            }
        }
        self.emit(TokenKind::Whitespace, start);
    }

    fn lex_line_comment(&mut self) {
        let start = self.mark();
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.advance();
        }
        self.emit(TokenKind::LineComment, start);
    }

    fn lex_block_comment(&mut self) -> Result<(), SyntaxFailure> {
        let start = self.mark();
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                Some('*') if self.peek_ahead(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
                None => return Err(self.failure("unterminated block comment")),
            }
        }
        self.emit(TokenKind::BlockComment, start);
        Ok(())
    }

    fn lex_string(&mut self, quote: char) -> Result<(), SyntaxFailure> {
        let start = self.mark();
        self.advance();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none() {
                        return Err(self.failure("unterminated string literal"));
                    }
                    self.advance();
                }
                Some('\n') | Some('\r') | None => {
                    return Err(self.failure("unterminated string literal"));
                }
                Some(_) => self.advance(),
            }
        }
        self.emit(TokenKind::String, start);
        Ok(())
    }

    fn lex_number(&mut self) -> Result<(), SyntaxFailure> {
        let start = self.mark();
        if self.peek() == Some('0')
            && matches!(self.peek_ahead(1), Some('x') | Some('X'))
        {
            self.advance();
            self.advance();
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                return Err(self.failure("missing hexadecimal digits"));
            }
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            self.emit(TokenKind::Number, start);
            return Ok(());
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.failure("missing exponent digits"));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.emit(TokenKind::Number, start);
        Ok(())
    }

    fn lex_identifier(&mut self) {
        let start = self.mark();
        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }
        let text = &self.source[start.0..self.pos];
        let kind = match text {
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            word if KEYWORDS.contains(&word) => TokenKind::Keyword,
            _ => TokenKind::Identifier,
        };
        self.emit(kind, start);
    }

    fn lex_punctuator(&mut self) -> Result<(), SyntaxFailure> {
        let start = self.mark();
        let rest = &self.source[self.pos..];
        for punct in PUNCTUATORS {
            if rest.starts_with(punct) {
                for _ in 0..punct.chars().count() {
                    self.advance();
                }
                self.emit(TokenKind::Punctuator, start);
                return Ok(());
            }
        }
        let ch = self.peek().unwrap_or('\0');
        Err(self.failure(format!("unexpected character '{ch}'")))
    }
}

pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

pub(crate) fn is_identifier_continue(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_numeric()
}
