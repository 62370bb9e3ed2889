//! Requires the spread form instead of `Function.prototype.apply` when
//! the bound object is repeated as the first argument.
//!
//! ```json
//! "esnext": true,
//! "requireSpread": true
//! ```
//!
//! ```js
//! g.apply(g, args);  // use g(...args)
//! g.apply(h, args);  // different receiver, fine
//! ```
//!
//! Only runs when the `esnext` context flag is set — the spread form
//! does not exist otherwise. Not fixable: rewriting the call changes
//! the receiver when the callee is a bound member.

use crease_core::ast::{NodeKind, NodeType};
use crease_core::diagnostics::ErrorCollector;
use crease_core::error::CreaseError;
use crease_core::rule::{CheckContext, Rule};
use crease_core::tokenized_file::TokenizedFile;
use crease_core::Result;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct RequireSpread;

impl RequireSpread {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RequireSpread {
    fn name(&self) -> &'static str {
        "requireSpread"
    }

    fn configure(&mut self, options: &Value) -> Result<()> {
        if options == &Value::Bool(true) {
            return Ok(());
        }
        Err(CreaseError::rule_config(
            self.name(),
            "requires a true value or should be removed",
        ))
    }

    fn check(
        &self,
        file: &TokenizedFile,
        context: &CheckContext,
        errors: &mut ErrorCollector<'_>,
    ) {
        if !context.es_next {
            return;
        }
        file.iterate_nodes_by_type(&[NodeType::CallExpression], |node| {
            let NodeKind::CallExpression { callee, arguments } = &node.kind else {
                return;
            };
            if arguments.len() != 2 {
                return;
            }
            let NodeKind::MemberExpression {
                object,
                property,
                computed: false,
            } = &file.node(*callee).kind
            else {
                return;
            };
            if file.node(*property).identifier_name() != Some("apply") {
                return;
            }
            let Some(receiver) = file.node(*object).identifier_name() else {
                return;
            };
            if file.node(arguments[0]).identifier_name() != Some(receiver) {
                return;
            }
            errors.error("Illegal use of apply method", node.span.start);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_true_is_accepted() {
        let mut rule = RequireSpread::new();
        rule.configure(&json!(true)).unwrap();
        assert!(rule.configure(&json!(false)).is_err());
        assert!(rule.configure(&json!({})).is_err());
    }
}
