//! End-to-end tests for the crease binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn crease() -> Command {
    Command::cargo_bin("crease").unwrap()
}

const CONFIG: &str = r#"{
    // function spacing and quoted keys
    "requireSpacesInFunction": {
        "beforeOpeningRoundBrace": true,
        "beforeOpeningCurlyBrace": true
    },
    "disallowQuotedKeysInObjects": true,
}"#;

#[test]
fn check_reports_violations_with_locations() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", CONFIG);
    let file = write(&dir, "a.js", "function a(){}\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&file)
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Missing space before opening round brace",
        ))
        .stdout(predicate::str::contains("requireSpacesInFunction"))
        .stdout(predicate::str::contains(":1:11"));
}

#[test]
fn check_passes_clean_files() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", CONFIG);
    let file = write(&dir, "a.js", "function a () {}\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 violation(s)"));
}

#[test]
fn one_unparsable_file_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", CONFIG);
    let broken = write(&dir, "broken.js", "var x = ;\n");
    let dirty = write(&dir, "dirty.js", "var x = { \"a\": 1 };\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&broken)
        .arg(&dirty)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parse error"))
        .stdout(predicate::str::contains("Extra quotes for key"));
}

#[test]
fn fix_rewrites_files_in_place() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", CONFIG);
    let file = write(&dir, "a.js", "var x = { \"a\": function(){} };\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("fix")
        .arg(&file)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "var x = { a: function () {} };\n"
    );
}

#[test]
fn fix_dry_run_prints_a_diff_and_keeps_the_file() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", CONFIG);
    let file = write(&dir, "a.js", "function a(){}\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("fix")
        .arg("--dry-run")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("-function a(){}"))
        .stdout(predicate::str::contains("+function a () {}"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "function a(){}\n");
}

#[test]
fn unknown_rules_fail_unless_lenient() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", r#"{ "noSuchRule": true }"#);
    let file = write(&dir, "a.js", "var x = 1;\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown rule 'noSuchRule'"));

    crease()
        .arg("--config")
        .arg(&config)
        .arg("--lenient")
        .arg("check")
        .arg(&file)
        .assert()
        .success();
}

#[test]
fn directories_are_walked_for_js_files() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", CONFIG);
    write(&dir, "a.js", "function a(){}\n");
    write(&dir, "b.txt", "not javascript");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("a.js"))
        .stdout(predicate::str::contains("1 file(s) checked"));
}

#[test]
fn esnext_flag_reaches_the_rules() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, ".creaserc", r#"{ "requireSpread": true }"#);
    let file = write(&dir, "a.js", "g.apply(g, arguments);\n");

    crease()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&file)
        .assert()
        .success();

    crease()
        .arg("--config")
        .arg(&config)
        .arg("--esnext")
        .arg("check")
        .arg(&file)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Illegal use of apply method"));
}
