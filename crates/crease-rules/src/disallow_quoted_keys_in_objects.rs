//! Disallows quoted keys in object literals when the key would be valid
//! without quotes.
//!
//! ```json
//! "disallowQuotedKeysInObjects": true
//! "disallowQuotedKeysInObjects": { "allExcept": ["reserved"] }
//! ```
//!
//! A quoted key is reported iff its content is a syntactically valid
//! unquoted key: an identifier name, or a canonical decimal integer
//! (rewriting `"010"` would change the key, so it stays quoted). With
//! `allExcept: ["reserved"]`, reserved words keep their quotes.
//!
//! The fix strips the quotes:
//!
//! ```js
//! var x = { "a": 1 };  // -> var x = { a: 1 }
//! ```

use std::sync::LazyLock;

use crease_core::ast::{NodeKind, NodeType};
use crease_core::diagnostics::{Edit, ErrorCollector};
use crease_core::error::CreaseError;
use crease_core::rule::{CheckContext, Rule};
use crease_core::tokenized_file::TokenizedFile;
use crease_core::Result;
use regex::Regex;
use serde_json::Value;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"));

/// Canonical decimal integers only; `"010"` or `"1e3"` would change value
static CANONICAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)$").expect("valid regex"));

/// ES3 keywords, future reserved words, and the boolean/null literals
const RESERVED_WORDS: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "debugger", "default", "delete", "do", "double", "else", "enum", "export",
    "extends", "false", "final", "finally", "float", "for", "function", "goto", "if",
    "implements", "import", "in", "instanceof", "int", "interface", "long", "native", "new",
    "null", "package", "private", "protected", "public", "return", "short", "static", "super",
    "switch", "synchronized", "this", "throw", "throws", "transient", "true", "try", "typeof",
    "var", "void", "volatile", "while", "with",
];

#[derive(Debug, Default)]
pub struct DisallowQuotedKeysInObjects {
    allow_reserved: bool,
}

impl DisallowQuotedKeysInObjects {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_valid_unquoted_key(content: &str) -> bool {
        IDENTIFIER.is_match(content) || CANONICAL_NUMBER.is_match(content)
    }

    fn is_reserved_word(content: &str) -> bool {
        RESERVED_WORDS.contains(&content)
    }
}

impl Rule for DisallowQuotedKeysInObjects {
    fn name(&self) -> &'static str {
        "disallowQuotedKeysInObjects"
    }

    fn configure(&mut self, options: &Value) -> Result<()> {
        if options == &Value::Bool(true) {
            self.allow_reserved = false;
            return Ok(());
        }
        let Some(object) = options.as_object() else {
            return Err(CreaseError::rule_config(
                self.name(),
                "requires a true value or an object with an allExcept array",
            ));
        };
        let mut allow_reserved = false;
        for (key, value) in object {
            if key != "allExcept" {
                return Err(CreaseError::rule_config(
                    self.name(),
                    format!("unknown option '{key}'"),
                ));
            }
            let Some(entries) = value.as_array() else {
                return Err(CreaseError::rule_config(
                    self.name(),
                    "'allExcept' must be an array",
                ));
            };
            for entry in entries {
                match entry.as_str() {
                    Some("reserved") => allow_reserved = true,
                    _ => {
                        return Err(CreaseError::rule_config(
                            self.name(),
                            format!("unsupported 'allExcept' entry {entry}"),
                        ));
                    }
                }
            }
        }
        if !allow_reserved {
            return Err(CreaseError::rule_config(
                self.name(),
                "'allExcept' must contain \"reserved\"",
            ));
        }
        self.allow_reserved = true;
        Ok(())
    }

    fn check(
        &self,
        file: &TokenizedFile,
        _context: &CheckContext,
        errors: &mut ErrorCollector<'_>,
    ) {
        file.iterate_nodes_by_type(&[NodeType::Property], |node| {
            let NodeKind::Property { key, .. } = &node.kind else {
                return;
            };
            let key_node = file.node(*key);
            let NodeKind::StringLiteral { value } = &key_node.kind else {
                return;
            };
            if !Self::is_valid_unquoted_key(value) {
                return;
            }
            if self.allow_reserved && Self::is_reserved_word(value) {
                return;
            }
            let Ok(token) = file.first_token(key_node) else {
                return;
            };
            let edit = Edit::replace(token.span.start, token.span.end, value.clone());
            errors.error_with_fix("Extra quotes for key", token.span.start, edit);
        });
    }
}
