//! The parser collaborator interface
//!
//! The engine never embeds a parser. A [`SourceParser`] implementation is
//! handed to the checker at construction time and consumed as an opaque
//! function from source text to an AST plus a lossless token stream, or a
//! structured syntax failure. A failure short-circuits checking and fixing
//! for that one source; the engine never attempts recovery.

use crate::ast::Ast;
use crate::tokens::Token;

/// Flags forwarded to the parser for one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Accept the next-generation language extensions (spread arguments,
    /// method shorthand, `let`/`const`)
    pub es_next: bool,
}

/// A successful parse: the node arena and the full token stream
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub ast: Ast,
    pub tokens: Vec<Token>,
}

/// A structured syntax failure reported by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFailure {
    pub message: String,
    /// 1-based line of the offending position
    pub line: usize,
    /// 1-based column of the offending position
    pub column: usize,
    /// Byte offset of the offending position
    pub offset: usize,
}

impl std::fmt::Display for SyntaxFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

impl std::error::Error for SyntaxFailure {}

/// Opaque source → parse-result collaborator
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str, options: &ParseOptions)
    -> Result<ParseOutput, SyntaxFailure>;
}
