//! End-to-end behavior of the iterative fixer

use crease_core::checker::Checker;
use crease_core::config::CheckerConfig;
use crease_core::diagnostics::{Edit, ErrorCollector};
use crease_core::error::CreaseError;
use crease_core::fixer::FixStatus;
use crease_core::rule::{CheckContext, Rule};
use crease_core::tokenized_file::TokenizedFile;
use crease_core::Result;
use crease_parser::JsParser;
use crease_rules::register_default_rules;
use serde_json::Value;

fn default_checker(config: &str) -> Checker {
    let mut checker = Checker::new(Box::new(JsParser::new()));
    register_default_rules(&mut checker).unwrap();
    checker
        .configure(&CheckerConfig::from_str(config).unwrap())
        .unwrap();
    checker
}

/// Flags every token matching `from` and rewrites it to `to`
struct Rewrite {
    name: &'static str,
    from: &'static str,
    to: &'static str,
}

impl Rule for Rewrite {
    fn name(&self) -> &'static str {
        self.name
    }

    fn configure(&mut self, options: &Value) -> Result<()> {
        if options == &Value::Bool(true) {
            Ok(())
        } else {
            Err(CreaseError::rule_config(self.name, "requires a true value"))
        }
    }

    fn check(
        &self,
        file: &TokenizedFile,
        _context: &CheckContext,
        errors: &mut ErrorCollector<'_>,
    ) {
        for token in file.tokens() {
            if token.text == self.from {
                errors.error_with_fix(
                    format!("'{}' is not allowed", self.from),
                    token.span.start,
                    Edit::replace(token.span.start, token.span.end, self.to),
                );
            }
        }
    }
}

fn custom_checker(rules: Vec<Box<dyn Rule>>, config: &CheckerConfig) -> Checker {
    let mut checker = Checker::new(Box::new(JsParser::new()));
    for rule in rules {
        checker.register_rule(rule).unwrap();
    }
    checker.configure(config).unwrap();
    checker
}

#[test]
fn clean_source_is_stable_in_one_pass() {
    let checker = default_checker(r#"{ "disallowQuotedKeysInObjects": true }"#);
    let outcome = checker.fix_string("var x = { a: 1 }").unwrap();
    assert_eq!(outcome.output, "var x = { a: 1 }");
    assert_eq!(outcome.passes, 1);
    assert!(outcome.is_stable());
}

#[test]
fn fixing_is_idempotent() {
    let checker = default_checker(
        r#"{
            "requireSpacesInFunction": {
                "beforeOpeningRoundBrace": true,
                "beforeOpeningCurlyBrace": true
            },
            "disallowQuotedKeysInObjects": true
        }"#,
    );
    let source = "var x = { \"a\": function(){} };";
    let first = checker.fix_string(source).unwrap();
    assert!(first.remaining.is_empty());
    assert!(first.is_stable());

    let second = checker.fix_string(&first.output).unwrap();
    assert_eq!(second.output, first.output);
    assert_eq!(second.passes, 1);
    assert!(second.is_stable());
}

#[test]
fn check_string_is_deterministic() {
    let checker = default_checker(
        r#"{
            "requireSpacesInFunction": { "beforeOpeningRoundBrace": true },
            "disallowQuotedKeysInObjects": true
        }"#,
    );
    let source = "var x = { \"a\": function(){} };";
    let first = checker.check_string(source).unwrap();
    let second = checker.check_string(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn oscillating_fixes_stop_at_the_pass_bound() {
    let config = CheckerConfig::new()
        .with_rule("banX", crease_core::config::RuleSetting::On)
        .with_rule("banY", crease_core::config::RuleSetting::On);
    let checker = custom_checker(
        vec![
            Box::new(Rewrite {
                name: "banX",
                from: "x",
                to: "y",
            }),
            Box::new(Rewrite {
                name: "banY",
                from: "y",
                to: "x",
            }),
        ],
        &config,
    );

    let outcome = checker.fix_string_with_limit("x;", 4).unwrap();
    assert_eq!(outcome.status, FixStatus::PassLimitReached);
    assert_eq!(outcome.passes, 4);
    assert_eq!(outcome.remaining.count(), 1, "violation is still reported");
}

#[test]
fn overlapping_edits_keep_the_earliest() {
    let config = CheckerConfig::new()
        .with_rule("first", crease_core::config::RuleSetting::On)
        .with_rule("second", crease_core::config::RuleSetting::On);
    let checker = custom_checker(
        vec![
            Box::new(Rewrite {
                name: "first",
                from: "x",
                to: "y",
            }),
            Box::new(Rewrite {
                name: "second",
                from: "x",
                to: "z",
            }),
        ],
        &config,
    );

    let outcome = checker.fix_string("x;").unwrap();
    assert_eq!(outcome.output, "y;", "registration order wins the conflict");
    assert!(outcome.is_stable());
    assert!(outcome.remaining.is_empty());
}

#[test]
fn unparsable_rewrite_keeps_the_previous_text() {
    let config = CheckerConfig::new().with_rule("breakIt", crease_core::config::RuleSetting::On);
    let checker = custom_checker(
        vec![Box::new(Rewrite {
            name: "breakIt",
            from: "x",
            to: "var",
        })],
        &config,
    );

    let outcome = checker.fix_string("x;").unwrap();
    assert_eq!(
        outcome.status,
        FixStatus::Failed {
            pass: 1,
            rule: "breakIt".to_string()
        }
    );
    assert_eq!(outcome.output, "x;", "last parsable text is returned");
    assert_eq!(outcome.remaining.count(), 1);
}

#[test]
fn unfixable_violations_survive_fixing() {
    let checker = default_checker(r#"{ "esnext": true, "requireSpread": true }"#);
    let outcome = checker.fix_string("g.apply(g, arguments);").unwrap();
    assert_eq!(outcome.output, "g.apply(g, arguments);");
    assert_eq!(outcome.remaining.count(), 1);
    assert_eq!(outcome.passes, 1);
    assert!(outcome.is_stable());
}

#[test]
fn mixed_rules_converge_in_one_rewrite() {
    let checker = default_checker(
        r#"{
            "requireSpacesInFunction": {
                "beforeOpeningRoundBrace": true,
                "beforeOpeningCurlyBrace": true
            },
            "disallowQuotedKeysInObjects": true
        }"#,
    );
    let outcome = checker
        .fix_string("var x = { \"a\": function(){} };")
        .unwrap();
    assert_eq!(outcome.output, "var x = { a: function () {} };");
    assert_eq!(outcome.passes, 2);
    assert!(outcome.remaining.is_empty());
}
