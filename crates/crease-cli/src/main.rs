//! Crease CLI
//!
//! Command-line interface for the Crease style checker: check JavaScript
//! sources against a configured rule set, or rewrite them with the
//! iterative fixer.

mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crease_core::checker::{Checker, UnknownRulePolicy};
use crease_core::config::CheckerConfig;
use crease_core::diagnostics::ErrorReport;
use crease_core::fixer::FixStatus;
use crease_core::init_tracing;
use crease_parser::JsParser;
use crease_rules::register_default_rules;

/// Default configuration file name searched in the working directory
const DEFAULT_CONFIG_FILE: &str = ".creaserc";

#[derive(Parser)]
#[command(name = "crease")]
#[command(about = "Crease: style checker and fixer for JavaScript sources")]
#[command(version = crease_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (JSON with comments)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable next-generation language features
    #[arg(long, global = true)]
    esnext: bool,

    /// Skip configuration keys that name no registered rule
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for style violations
    Check {
        /// Files or directories to check
        paths: Vec<PathBuf>,
    },
    /// Fix style violations in place
    Fix {
        /// Files or directories to fix
        paths: Vec<PathBuf>,
        /// Print a diff instead of writing files
        #[arg(long)]
        dry_run: bool,
        /// Bound on fix passes per file
        #[arg(long, default_value_t = crease_core::DEFAULT_MAX_PASSES)]
        max_passes: usize,
    },
}

/// Result of processing one file; parse failures stay per-file so one
/// bad source never stops the batch
struct FileOutcome {
    path: PathBuf,
    report: ErrorReport,
    failure: Option<String>,
    diff: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let checker = build_checker(&cli)?;
    let outcomes = match &cli.command {
        Commands::Check { paths } => {
            let files = discover_files(paths)?;
            files
                .par_iter()
                .map(|path| check_file(&checker, path))
                .collect::<Vec<_>>()
        }
        Commands::Fix {
            paths,
            dry_run,
            max_passes,
        } => {
            let files = discover_files(paths)?;
            files
                .par_iter()
                .map(|path| fix_file(&checker, path, *dry_run, *max_passes))
                .collect::<Vec<_>>()
        }
    };

    let mut violations = 0;
    let mut failures = 0;
    for outcome in &outcomes {
        if let Some(message) = &outcome.failure {
            eprintln!("{}: {message}", outcome.path.display());
            failures += 1;
        }
        if let Some(diff) = &outcome.diff {
            print!("{diff}");
        }
        output::print_report(&outcome.path, &outcome.report);
        violations += outcome.report.count();
    }
    output::print_summary(outcomes.len(), violations, failures);

    Ok(if violations > 0 || failures > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn build_checker(cli: &Cli) -> Result<Checker> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.esnext {
        config.set_es_next(true);
    }

    let policy = if cli.lenient {
        UnknownRulePolicy::Ignore
    } else {
        UnknownRulePolicy::Strict
    };
    let mut checker = Checker::new(Box::new(JsParser::new())).with_unknown_rule_policy(policy);
    register_default_rules(&mut checker).context("registering builtin rules")?;
    checker
        .configure(&config)
        .context("applying configuration")?;
    Ok(checker)
}

fn load_config(explicit: Option<&Path>) -> Result<CheckerConfig> {
    if let Some(path) = explicit {
        return CheckerConfig::load(path)
            .with_context(|| format!("loading config '{}'", path.display()));
    }
    let default = Path::new(DEFAULT_CONFIG_FILE);
    if default.exists() {
        return CheckerConfig::load(default)
            .with_context(|| format!("loading config '{DEFAULT_CONFIG_FILE}'"));
    }
    debug!("no configuration file found, all rules stay disabled");
    Ok(CheckerConfig::new())
}

/// Expand paths into a sorted list of JavaScript files
fn discover_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("walking '{}'", path.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "js")
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn check_file(checker: &Checker, path: &Path) -> FileOutcome {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            return FileOutcome {
                path: path.to_path_buf(),
                report: ErrorReport::default(),
                failure: Some(format!("cannot read file: {err}")),
                diff: None,
            };
        }
    };
    match checker.check_string(&source) {
        Ok(report) => FileOutcome {
            path: path.to_path_buf(),
            report,
            failure: None,
            diff: None,
        },
        Err(err) => FileOutcome {
            path: path.to_path_buf(),
            report: ErrorReport::default(),
            failure: Some(err.to_string()),
            diff: None,
        },
    }
}

fn fix_file(checker: &Checker, path: &Path, dry_run: bool, max_passes: usize) -> FileOutcome {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            return FileOutcome {
                path: path.to_path_buf(),
                report: ErrorReport::default(),
                failure: Some(format!("cannot read file: {err}")),
                diff: None,
            };
        }
    };
    let outcome = match checker.fix_string_with_limit(&source, max_passes) {
        Ok(outcome) => outcome,
        Err(err) => {
            return FileOutcome {
                path: path.to_path_buf(),
                report: ErrorReport::default(),
                failure: Some(err.to_string()),
                diff: None,
            };
        }
    };

    let failure = match &outcome.status {
        FixStatus::Failed { pass, rule } => Some(format!(
            "fix pass {pass} produced unparsable output (rule '{rule}'), keeping previous text"
        )),
        _ => None,
    };

    let diff = if dry_run && outcome.output != source {
        Some(output::render_diff(path, &source, &outcome.output))
    } else {
        None
    };
    if !dry_run && outcome.output != source {
        if let Err(err) = fs::write(path, &outcome.output) {
            return FileOutcome {
                path: path.to_path_buf(),
                report: outcome.remaining,
                failure: Some(format!("cannot write file: {err}")),
                diff: None,
            };
        }
        debug!(path = %path.display(), passes = outcome.passes, "file rewritten");
    }

    FileOutcome {
        path: path.to_path_buf(),
        report: outcome.remaining,
        failure,
        diff,
    }
}
