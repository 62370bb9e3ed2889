//! Rule registry and the check orchestrator
//!
//! The checker owns the registered rule instances and the parser
//! collaborator. `configure` validates the whole configuration up front
//! (nothing is checked until it succeeds); `check_string` then runs every
//! configured rule, in registration order, against one `TokenizedFile`,
//! producing a deterministic `ErrorReport`.

use std::collections::HashMap;

use tracing::debug;

use crate::config::CheckerConfig;
use crate::diagnostics::{ErrorCollector, ErrorReport};
use crate::error::CreaseError;
use crate::parser::{ParseOptions, SourceParser};
use crate::result::Result;
use crate::rule::{CheckContext, Rule};
use crate::tokenized_file::TokenizedFile;

/// What to do with configuration keys naming no registered rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownRulePolicy {
    /// Fail configuration with an error naming the key
    #[default]
    Strict,
    /// Skip the key
    Ignore,
}

pub struct Checker {
    parser: Box<dyn SourceParser>,
    rules: Vec<Box<dyn Rule>>,
    names: HashMap<&'static str, usize>,
    configured: Vec<usize>,
    context: CheckContext,
    unknown_rule_policy: UnknownRulePolicy,
}

impl Checker {
    pub fn new(parser: Box<dyn SourceParser>) -> Self {
        Self {
            parser,
            rules: Vec::new(),
            names: HashMap::new(),
            configured: Vec::new(),
            context: CheckContext::default(),
            unknown_rule_policy: UnknownRulePolicy::default(),
        }
    }

    pub fn with_unknown_rule_policy(mut self, policy: UnknownRulePolicy) -> Self {
        self.unknown_rule_policy = policy;
        self
    }

    /// Register one rule; names must be unique
    pub fn register_rule(&mut self, rule: Box<dyn Rule>) -> Result<()> {
        let name = rule.name();
        if self.names.contains_key(name) {
            return Err(CreaseError::config_error(format!(
                "a rule named '{name}' is already registered"
            )));
        }
        self.names.insert(name, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Names of the rules enabled by the last successful `configure`
    pub fn configured_rules(&self) -> impl Iterator<Item = &str> {
        self.configured.iter().map(|&index| self.rules[index].name())
    }

    /// The shared read-only context handed to every `check`
    pub fn context(&self) -> &CheckContext {
        &self.context
    }

    /// Apply a configuration: reserved keys first, then each enabled
    /// rule's own `configure`
    ///
    /// Any failure leaves no rule enabled, so a partially applied
    /// configuration can never run.
    pub fn configure(&mut self, config: &CheckerConfig) -> Result<()> {
        self.configured.clear();
        self.context = CheckContext {
            es_next: config.es_next(),
        };

        let mut enabled = Vec::new();
        for (name, setting) in config.rules() {
            let Some(&index) = self.names.get(name) else {
                match self.unknown_rule_policy {
                    UnknownRulePolicy::Strict => {
                        return Err(CreaseError::config_error(format!(
                            "unknown rule '{name}'"
                        )));
                    }
                    UnknownRulePolicy::Ignore => {
                        debug!(rule = name, "ignoring unknown rule");
                        continue;
                    }
                }
            };
            if !setting.is_enabled() {
                continue;
            }
            self.rules[index].configure(&setting.options())?;
            enabled.push(index);
        }

        // Execution follows registration order, not config document order
        enabled.sort_unstable();
        self.configured = enabled;
        debug!(rules = self.configured.len(), "checker configured");
        Ok(())
    }

    /// Check one source string, returning the ordered violation report
    pub fn check_string(&self, source: &str) -> Result<ErrorReport> {
        let options = ParseOptions {
            es_next: self.context.es_next,
        };
        let output = self
            .parser
            .parse(source, &options)
            .map_err(CreaseError::from)?;
        let file = TokenizedFile::new(source.to_string(), output);

        let mut errors = Vec::new();
        for &index in &self.configured {
            let rule = &self.rules[index];
            let mut collector = ErrorCollector::new(&file, rule.name());
            rule.check(&file, &self.context, &mut collector);
            debug!(rule = rule.name(), violations = collector.len(), "rule checked");
            errors.extend(collector.into_errors());
        }
        Ok(ErrorReport::from_errors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, NodeKind};
    use crate::config::RuleSetting;
    use crate::parser::{ParseOutput, SyntaxFailure};
    use crate::tokens::{Position, Span, Token, TokenKind};
    use serde_json::{Value, json};

    /// One identifier token per non-space character; spaces become trivia
    struct CharParser;

    impl SourceParser for CharParser {
        fn parse(
            &self,
            source: &str,
            _options: &ParseOptions,
        ) -> std::result::Result<ParseOutput, SyntaxFailure> {
            if source.contains('!') {
                return Err(SyntaxFailure {
                    message: "unexpected token !".to_string(),
                    line: 1,
                    column: source.find('!').unwrap() + 1,
                    offset: source.find('!').unwrap(),
                });
            }
            let tokens = source
                .char_indices()
                .map(|(offset, ch)| {
                    let kind = if ch.is_whitespace() {
                        TokenKind::Whitespace
                    } else {
                        TokenKind::Identifier
                    };
                    Token::new(
                        kind,
                        ch.to_string(),
                        Span::new(offset, offset + ch.len_utf8()),
                        Position::new(1, offset + 1),
                        Position::new(1, offset + 2),
                    )
                })
                .collect();
            let mut ast = Ast::new();
            let root = ast.alloc(NodeKind::Program { body: vec![] }, Span::new(0, source.len()));
            ast.set_root(root);
            Ok(ParseOutput { ast, tokens })
        }
    }

    /// Reports one violation per `x` token in the file
    struct FlagX {
        enabled: bool,
    }

    impl Rule for FlagX {
        fn name(&self) -> &'static str {
            "flagX"
        }

        fn configure(&mut self, options: &Value) -> Result<()> {
            if options != &json!(true) {
                return Err(CreaseError::rule_config(self.name(), "only true is supported"));
            }
            self.enabled = true;
            Ok(())
        }

        fn check(
            &self,
            file: &TokenizedFile,
            _context: &CheckContext,
            errors: &mut ErrorCollector<'_>,
        ) {
            if !self.enabled {
                return;
            }
            for token in file.tokens() {
                if token.text == "x" {
                    errors.error_at_token("x is not allowed", token);
                }
            }
        }
    }

    fn checker_with_flag_x() -> Checker {
        let mut checker = Checker::new(Box::new(CharParser));
        checker.register_rule(Box::new(FlagX { enabled: false })).unwrap();
        checker
    }

    #[test]
    fn duplicate_rule_names_fail() {
        let mut checker = checker_with_flag_x();
        let err = checker
            .register_rule(Box::new(FlagX { enabled: false }))
            .unwrap_err();
        assert!(err.to_string().contains("flagX"));
    }

    #[test]
    fn unknown_rules_follow_policy() {
        let config = CheckerConfig::new().with_rule("nosuchrule", RuleSetting::On);

        let mut strict = checker_with_flag_x();
        let err = strict.configure(&config).unwrap_err();
        assert!(err.to_string().contains("nosuchrule"));

        let mut lenient = checker_with_flag_x().with_unknown_rule_policy(UnknownRulePolicy::Ignore);
        lenient.configure(&config).unwrap();
        assert_eq!(lenient.configured_rules().count(), 0);
    }

    #[test]
    fn configure_failure_leaves_nothing_enabled() {
        let mut checker = checker_with_flag_x();
        checker
            .configure(&CheckerConfig::new().with_rule("flagX", RuleSetting::On))
            .unwrap();
        assert_eq!(checker.configured_rules().count(), 1);

        let bad = CheckerConfig::new().with_rule("flagX", RuleSetting::Options(json!({})));
        assert!(checker.configure(&bad).is_err());
        assert_eq!(checker.configured_rules().count(), 0);
        assert!(checker.check_string("x x").unwrap().is_empty());
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let mut checker = checker_with_flag_x();
        checker
            .configure(&CheckerConfig::new().with_rule("flagX", RuleSetting::Off))
            .unwrap();
        assert!(checker.check_string("x").unwrap().is_empty());
    }

    #[test]
    fn violations_are_ordered_and_deterministic() {
        let mut checker = checker_with_flag_x();
        checker
            .configure(&CheckerConfig::new().with_rule("flagX", RuleSetting::On))
            .unwrap();
        let first = checker.check_string("x a x").unwrap();
        let second = checker.check_string("x a x").unwrap();
        assert_eq!(first.count(), 2);
        assert_eq!(first, second);
        let columns: Vec<_> = first.iter().map(|e| e.column).collect();
        assert_eq!(columns, vec![1, 5]);
    }

    #[test]
    fn parse_failures_short_circuit() {
        let mut checker = checker_with_flag_x();
        checker
            .configure(&CheckerConfig::new().with_rule("flagX", RuleSetting::On))
            .unwrap();
        let err = checker.check_string("x!").unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn esnext_reaches_the_shared_context() {
        let mut checker = checker_with_flag_x();
        checker
            .configure(&CheckerConfig::new().with_es_next(true))
            .unwrap();
        assert!(checker.context().es_next);
    }
}
