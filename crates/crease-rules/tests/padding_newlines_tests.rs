//! Behavior of requirePaddingNewLinesBeforeLineComments through the checker

use crease_core::checker::Checker;
use crease_core::config::CheckerConfig;
use crease_parser::JsParser;
use crease_rules::register_default_rules;

fn checker(config: &str) -> Checker {
    let mut checker = Checker::new(Box::new(JsParser::new()));
    register_default_rules(&mut checker).unwrap();
    checker
        .configure(&CheckerConfig::from_str(config).unwrap())
        .unwrap();
    checker
}

fn count(checker: &Checker, source: &str) -> usize {
    checker.check_string(source).unwrap().count()
}

#[test]
fn reports_missing_padding() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    assert_eq!(count(&checker, "var a = 2;\n// comment"), 1);
}

#[test]
fn reports_line_comment_after_block_comment() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    assert_eq!(count(&checker, "var a = 2;\n/* comment */\n// comment"), 1);
}

#[test]
fn does_not_report_padded_comments() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    assert_eq!(count(&checker, "var a = 2;\n\n// comment"), 0);
}

#[test]
fn does_not_report_a_comment_opening_the_file() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    assert_eq!(count(&checker, "// comment\nvar a = 2;"), 0);
}

#[test]
fn does_not_report_consecutive_line_comments() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    assert_eq!(count(&checker, "// comment\n//foo"), 0);
}

#[test]
fn first_comment_after_curly_is_exempt_when_configured() {
    let plain = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    assert_eq!(count(&plain, "function a () {\n// comment\nreturn;\n}"), 1);

    let except = checker(
        r#"{ "requirePaddingNewLinesBeforeLineComments": { "allExcept": "firstAfterCurly" } }"#,
    );
    assert_eq!(count(&except, "function a () {\n// comment\nreturn;\n}"), 0);
}

#[test]
fn fix_inserts_a_blank_line() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    let outcome = checker.fix_string("var a = 2;\n// comment").unwrap();
    assert_eq!(outcome.output, "var a = 2;\n\n// comment");
    assert!(outcome.remaining.is_empty());
    assert!(outcome.is_stable());
}

#[test]
fn trailing_comment_on_a_code_line_is_reported_without_a_fix() {
    let checker = checker(r#"{ "requirePaddingNewLinesBeforeLineComments": true }"#);
    let report = checker.check_string("var a = 2; // comment").unwrap();
    assert_eq!(report.count(), 1);
    assert!(!report.errors()[0].fixable);
}
