//! Requires space before `()` or `{}` in function declarations and
//! function expressions.
//!
//! Configured with an object carrying at least one of two flags, each of
//! which must be literally `true` when present:
//!
//! ```json
//! "requireSpacesInFunction": {
//!     "beforeOpeningRoundBrace": true,
//!     "beforeOpeningCurlyBrace": true
//! }
//! ```
//!
//! Valid for `{ "beforeOpeningRoundBrace": true, "beforeOpeningCurlyBrace": true }`:
//!
//! ```js
//! var x = function () {};
//! function a () {}
//! ```
//!
//! Getter/setter shorthand is exempt. For shorthand methods the check
//! anchors on the property key instead of the `function` keyword.

use crease_core::assert::WhitespaceBetween;
use crease_core::ast::{NodeKind, NodeType};
use crease_core::diagnostics::ErrorCollector;
use crease_core::error::CreaseError;
use crease_core::rule::{CheckContext, Rule};
use crease_core::tokenized_file::TokenizedFile;
use crease_core::Result;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct RequireSpacesInFunction {
    before_opening_round_brace: bool,
    before_opening_curly_brace: bool,
}

impl RequireSpacesInFunction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for RequireSpacesInFunction {
    fn name(&self) -> &'static str {
        "requireSpacesInFunction"
    }

    fn configure(&mut self, options: &Value) -> Result<()> {
        let Some(object) = options.as_object() else {
            return Err(CreaseError::rule_config(
                self.name(),
                "option must be an object",
            ));
        };
        let mut round = false;
        let mut curly = false;
        for (key, value) in object {
            let flag = match key.as_str() {
                "beforeOpeningRoundBrace" => &mut round,
                "beforeOpeningCurlyBrace" => &mut curly,
                other => {
                    return Err(CreaseError::rule_config(
                        self.name(),
                        format!("unknown option '{other}'"),
                    ));
                }
            };
            if value != &Value::Bool(true) {
                return Err(CreaseError::rule_config(
                    self.name(),
                    format!("'{key}' requires a true value or should be removed"),
                ));
            }
            *flag = true;
        }
        if !round && !curly {
            return Err(CreaseError::rule_config(
                self.name(),
                "must have beforeOpeningCurlyBrace or beforeOpeningRoundBrace property",
            ));
        }
        self.before_opening_round_brace = round;
        self.before_opening_curly_brace = curly;
        Ok(())
    }

    fn check(
        &self,
        file: &TokenizedFile,
        _context: &CheckContext,
        errors: &mut ErrorCollector<'_>,
    ) {
        file.iterate_nodes_by_type(
            &[NodeType::FunctionDeclaration, NodeType::FunctionExpression],
            |node| {
                let (id, body) = match &node.kind {
                    NodeKind::FunctionDeclaration { id, body, .. }
                    | NodeKind::FunctionExpression { id, body, .. } => (*id, *body),
                    _ => return,
                };

                // For a named function the name token is the anchor
                let mut anchor = match id {
                    Some(id) => file.node(id),
                    None => node,
                };
                if let Some(parent) = file.parent(node.id) {
                    if let NodeKind::Property { kind, method, key, .. } = &parent.kind {
                        // Syntactic sugar for getters and setters is exempt
                        if kind.is_accessor() {
                            return;
                        }
                        // Shorthand methods have no function keyword
                        if *method {
                            anchor = file.node(*key);
                        }
                    }
                }

                if self.before_opening_round_brace {
                    let Ok(function_token) = file.first_token(anchor) else {
                        return;
                    };
                    let Some(next_token) = file.next_token(function_token) else {
                        return;
                    };
                    errors.assert_whitespace_between(WhitespaceBetween::new(
                        function_token,
                        next_token,
                        "Missing space before opening round brace",
                    ));
                }

                if self.before_opening_curly_brace {
                    let Ok(body_token) = file.first_token(file.node(body)) else {
                        return;
                    };
                    let Some(prev_token) = file.prev_token(body_token) else {
                        return;
                    };
                    errors.assert_whitespace_between(WhitespaceBetween::new(
                        prev_token,
                        body_token,
                        "Missing space before opening curly brace",
                    ));
                }
            },
        );
    }
}
