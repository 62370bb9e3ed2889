//! Whitespace assertion primitives for rules
//!
//! Assertions inspect the character span strictly between two tokens and
//! register a violation with a deferred edit when the expectation fails.
//! They are read-only with respect to the file: the edit is a descriptor,
//! applied only by the fixer so conflicts across rules surface in one
//! place.

use crate::diagnostics::{Edit, ErrorCollector};
use crate::tokens::Token;

/// Expectation that whitespace separates two adjacent code tokens
#[derive(Debug)]
pub struct WhitespaceBetween<'t> {
    token: &'t Token,
    next_token: &'t Token,
    message: &'t str,
    disallow_newline: bool,
    fix: Option<Edit>,
}

impl<'t> WhitespaceBetween<'t> {
    pub fn new(token: &'t Token, next_token: &'t Token, message: &'t str) -> Self {
        Self {
            token,
            next_token,
            message,
            disallow_newline: false,
            fix: None,
        }
    }

    /// Require a plain space or tab; newline-only separation still violates
    pub fn disallow_newline(mut self) -> Self {
        self.disallow_newline = true;
        self
    }

    /// Replace the default single-space insertion with a rule-supplied edit
    pub fn with_fix(mut self, edit: Edit) -> Self {
        self.fix = Some(edit);
        self
    }
}

/// Expectation that no whitespace separates two adjacent code tokens
#[derive(Debug)]
pub struct NoWhitespaceBetween<'t> {
    token: &'t Token,
    next_token: &'t Token,
    message: &'t str,
}

impl<'t> NoWhitespaceBetween<'t> {
    pub fn new(token: &'t Token, next_token: &'t Token, message: &'t str) -> Self {
        Self {
            token,
            next_token,
            message,
        }
    }
}

impl ErrorCollector<'_> {
    /// Violation iff the span between the tokens contains no whitespace
    ///
    /// The default fix inserts a single space immediately before
    /// `next_token`.
    pub fn assert_whitespace_between(&mut self, assertion: WhitespaceBetween<'_>) {
        let gap = self.file().text_between(assertion.token, assertion.next_token);
        let satisfied = if assertion.disallow_newline {
            gap.chars().any(|c| c == ' ' || c == '\t')
        } else {
            gap.chars().any(char::is_whitespace)
        };
        if satisfied {
            return;
        }
        let offset = assertion.next_token.span.start;
        let edit = assertion
            .fix
            .unwrap_or_else(|| Edit::insert(offset, " "));
        self.error_with_fix(assertion.message, offset, edit);
    }

    /// Violation iff any whitespace separates the tokens
    ///
    /// The default fix deletes the intervening span.
    pub fn assert_no_whitespace_between(&mut self, assertion: NoWhitespaceBetween<'_>) {
        let gap = self.file().text_between(assertion.token, assertion.next_token);
        if !gap.chars().any(char::is_whitespace) {
            return;
        }
        let edit = Edit::delete(assertion.token.span.end, assertion.next_token.span.start);
        self.error_with_fix(assertion.message, assertion.next_token.span.start, edit);
    }
}
