//! Requires a blank line before line comments.
//!
//! ```json
//! "requirePaddingNewLinesBeforeLineComments": true
//! "requirePaddingNewLinesBeforeLineComments": { "allExcept": "firstAfterCurly" }
//! ```
//!
//! Exempt: a comment opening the file, a comment directly continuing
//! another line comment, and — with the exception configured — the first
//! token after an opening `{`.
//!
//! ```js
//! var a = 2;
//!
//! // comment
//! ```
//!
//! The fix inserts a newline at the start of the comment's line; a
//! comment trailing code on its own line is reported without a fix.

use crease_core::diagnostics::{Edit, ErrorCollector};
use crease_core::error::CreaseError;
use crease_core::rule::{CheckContext, Rule};
use crease_core::tokenized_file::TokenizedFile;
use crease_core::tokens::{Token, TokenKind};
use crease_core::Result;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct RequirePaddingNewlinesBeforeLineComments {
    except_first_after_curly: bool,
}

impl RequirePaddingNewlinesBeforeLineComments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for RequirePaddingNewlinesBeforeLineComments {
    fn name(&self) -> &'static str {
        "requirePaddingNewLinesBeforeLineComments"
    }

    fn configure(&mut self, options: &Value) -> Result<()> {
        if options == &Value::Bool(true) {
            self.except_first_after_curly = false;
            return Ok(());
        }
        let Some(object) = options.as_object() else {
            return Err(CreaseError::rule_config(
                self.name(),
                "requires a true value or an object with allExcept",
            ));
        };
        for (key, value) in object {
            if key != "allExcept" {
                return Err(CreaseError::rule_config(
                    self.name(),
                    format!("unknown option '{key}'"),
                ));
            }
            if value.as_str() != Some("firstAfterCurly") {
                return Err(CreaseError::rule_config(
                    self.name(),
                    format!("unsupported 'allExcept' value {value}"),
                ));
            }
        }
        if object.is_empty() {
            return Err(CreaseError::rule_config(
                self.name(),
                "'allExcept' must be \"firstAfterCurly\"",
            ));
        }
        self.except_first_after_curly = true;
        Ok(())
    }

    fn check(
        &self,
        file: &TokenizedFile,
        _context: &CheckContext,
        errors: &mut ErrorCollector<'_>,
    ) {
        let tokens = file.tokens();
        for (index, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::LineComment {
                continue;
            }
            // Previous token that occupies space: code or another comment
            let Some(previous) = tokens[..index]
                .iter()
                .rev()
                .find(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline))
            else {
                // Comment opens the file
                continue;
            };
            if previous.kind == TokenKind::LineComment
                && token.start.line - previous.end.line == 1
            {
                // Directly continuing a comment block
                continue;
            }
            if self.except_first_after_curly && previous.is_punctuator("{") {
                continue;
            }
            if token.start.line.saturating_sub(previous.end.line) >= 2 {
                continue;
            }

            if let Some(line_start) = owns_its_line(file.source(), token) {
                errors.error_with_fix(
                    "Line comments must be preceded by a blank line",
                    token.span.start,
                    Edit::insert(line_start, "\n"),
                );
            } else {
                errors.error(
                    "Line comments must be preceded by a blank line",
                    token.span.start,
                );
            }
        }
    }
}

/// Start offset of the comment's line, if only whitespace precedes the
/// comment on that line
fn owns_its_line(source: &str, token: &Token) -> Option<usize> {
    let line_start = source[..token.span.start]
        .rfind('\n')
        .map(|index| index + 1)
        .unwrap_or(0);
    let leading = &source[line_start..token.span.start];
    leading
        .chars()
        .all(|c| c.is_whitespace())
        .then_some(line_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn configure_shapes() {
        let mut rule = RequirePaddingNewlinesBeforeLineComments::new();
        rule.configure(&json!(true)).unwrap();
        assert!(!rule.except_first_after_curly);

        rule.configure(&json!({ "allExcept": "firstAfterCurly" }))
            .unwrap();
        assert!(rule.except_first_after_curly);

        assert!(rule.configure(&json!(false)).is_err());
        assert!(rule.configure(&json!([])).is_err());
        assert!(rule.configure(&json!({})).is_err());
        assert!(rule.configure(&json!({ "allBut": false })).is_err());
        assert!(
            rule.configure(&json!({ "allExcept": "badOptionName" }))
                .is_err()
        );
    }
}
