//! Crease Parser
//!
//! The JavaScript parser collaborator for the Crease style checker: a
//! trivia-preserving lexer plus a recursive-descent parser producing the
//! `crease-core` AST and token stream. It plugs into the checker through
//! the [`crease_core::SourceParser`] trait; the engine itself never
//! embeds it.

pub mod lexer;
pub mod parser;

pub use lexer::lex;
pub use parser::JsParser;
