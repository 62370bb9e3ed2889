//! Error types and handling for style-checking operations

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::SyntaxFailure;

/// Main error type for style-checking operations
#[derive(Debug, Error)]
pub enum CreaseError {
    /// The parser collaborator rejected a source
    #[error("parse error: {message} at {line}:{column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// Checker-level configuration errors (unknown keys, malformed values)
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A rule rejected its configuration value
    #[error("invalid configuration for rule '{rule}': {message}")]
    RuleConfig { rule: String, message: String },

    /// An AST node's range covers no tokens
    #[error("node spanning {start}..{end} has no tokens")]
    NodeHasNoTokens { start: usize, end: usize },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    RuleConfig,
    NodeHasNoTokens,
    Io,
    Internal,
}

impl CreaseError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CreaseError::Parse { .. } => ErrorKind::Parse,
            CreaseError::Config { .. } => ErrorKind::Config,
            CreaseError::RuleConfig { .. } => ErrorKind::RuleConfig,
            CreaseError::NodeHasNoTokens { .. } => ErrorKind::NodeHasNoTokens,
            CreaseError::Io { .. } => ErrorKind::Io,
            CreaseError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other sources)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse)
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a rule configuration error
    pub fn rule_config(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleConfig {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<SyntaxFailure> for CreaseError {
    fn from(failure: SyntaxFailure) -> Self {
        Self::Parse {
            message: failure.message,
            line: failure.line,
            column: failure.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_recoverable() {
        let err = CreaseError::parse_error("unexpected token", 3, 7);
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "parse error: unexpected token at 3:7");
    }

    #[test]
    fn config_errors_are_fatal() {
        let err = CreaseError::rule_config("requireSpacesInFunction", "option must be an object");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "invalid configuration for rule 'requireSpacesInFunction': option must be an object"
        );
    }

    #[test]
    fn syntax_failure_converts_to_parse_error() {
        let failure = SyntaxFailure {
            message: "unterminated string".to_string(),
            line: 1,
            column: 12,
            offset: 11,
        };
        let err = CreaseError::from(failure);
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
