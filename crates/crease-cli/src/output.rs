//! Terminal output helpers for check and fix runs

use std::path::Path;

use is_terminal::IsTerminal;

use crease_core::diagnostics::ErrorReport;
use similar::TextDiff;

const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Print one file's violations, one line per error
pub fn print_report(path: &Path, report: &ErrorReport) {
    for error in report {
        println!(
            "{}:{}:{}  {}  {}",
            path.display(),
            error.line,
            error.column,
            error.rule,
            error.message
        );
    }
}

/// Print a closing summary line
pub fn print_summary(files: usize, violations: usize, failures: usize) {
    let line = format!(
        "{files} file(s) checked, {violations} violation(s), {failures} failure(s)"
    );
    if use_color() {
        let color = if violations > 0 || failures > 0 { RED } else { GREEN };
        println!("{BOLD}{color}{line}{RESET}");
    } else {
        println!("{line}");
    }
}

/// Unified diff between the original and fixed text
pub fn render_diff(path: &Path, original: &str, fixed: &str) -> String {
    let diff = TextDiff::from_lines(original, fixed);
    let name = path.display().to_string();
    diff.unified_diff()
        .header(&name, &name)
        .to_string()
}
