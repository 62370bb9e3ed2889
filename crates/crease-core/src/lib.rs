//! Crease Core
//!
//! Core engine of the Crease style checker for JavaScript sources: the
//! tokenized-file model, whitespace assertion primitives, the pluggable
//! rule contract, the checker that aggregates violations, and the
//! iterative fixer that rewrites source text toward a violation-free
//! form. Parsing is delegated to a [`SourceParser`] collaborator; this
//! crate never embeds one.

pub mod assert;
pub mod ast;
pub mod checker;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fixer;
pub mod parser;
pub mod result;
pub mod rule;
pub mod tokenized_file;
pub mod tokens;

// Re-export commonly used types
pub use assert::{NoWhitespaceBetween, WhitespaceBetween};
pub use ast::{Ast, DeclarationKind, Node, NodeId, NodeKind, NodeType, PropertyKind};
pub use checker::{Checker, UnknownRulePolicy};
pub use config::{CheckerConfig, ESNEXT_KEY, RuleSetting};
pub use diagnostics::{Edit, ErrorCollector, ErrorReport, StyleError};
pub use error::{CreaseError, ErrorKind};
pub use fixer::{DEFAULT_MAX_PASSES, FixOutcome, FixStatus};
pub use parser::{ParseOptions, ParseOutput, SourceParser, SyntaxFailure};
pub use result::Result;
pub use rule::{CheckContext, Rule};
pub use tokenized_file::TokenizedFile;
pub use tokens::{Position, Span, Token, TokenKind};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crease=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
