//! Iterative fix application
//!
//! Fixing is a bounded loop over check passes: check the current text,
//! keep the non-conflicting edits, splice them in descending offset
//! order, and re-check the rewritten text. The loop stops when a pass
//! produces no edits, when a rewrite changes nothing (oscillation
//! guard), when the pass bound is exhausted, or when a rewritten source
//! no longer parses — in which case the previous, known-parsable text is
//! returned.
//!
//! Within one pass, edits are ordered by start offset; when two ranges
//! overlap, the earlier-starting edit wins and the later one is dropped,
//! to be re-derived from the next pass's check.

use tracing::{debug, warn};

use crate::checker::Checker;
use crate::diagnostics::{Edit, ErrorReport};
use crate::result::Result;

/// Default bound on check passes per `fix_string` call
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Terminal state of one fixing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixStatus {
    /// No further edits were produced; the output is a fixed point
    Stable,
    /// The pass bound was exhausted before stabilizing
    PassLimitReached,
    /// A rewritten source failed to re-parse; the output is the previous
    /// pass's text
    Failed { pass: usize, rule: String },
}

/// Result of fixing one source string
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Final text: fully fixed, or as far as fixing got
    pub output: String,
    /// Violations still present in `output`
    pub remaining: ErrorReport,
    /// Number of check passes performed
    pub passes: usize,
    pub status: FixStatus,
}

impl FixOutcome {
    pub fn is_stable(&self) -> bool {
        matches!(self.status, FixStatus::Stable)
    }
}

/// An edit retained for application, tagged with its originating rule
#[derive(Debug, Clone)]
struct PendingEdit {
    edit: Edit,
    rule: String,
}

impl Checker {
    /// Fix one source string with the default pass bound
    pub fn fix_string(&self, source: &str) -> Result<FixOutcome> {
        self.fix_string_with_limit(source, DEFAULT_MAX_PASSES)
    }

    /// Fix one source string, performing at most `max_passes` check passes
    pub fn fix_string_with_limit(&self, source: &str, max_passes: usize) -> Result<FixOutcome> {
        let max_passes = max_passes.max(1);
        let mut current = source.to_string();
        let mut report = self.check_string(&current)?;
        let mut passes = 1usize;

        let status = loop {
            let retained = merge_edits(&report);
            if retained.is_empty() {
                break FixStatus::Stable;
            }

            let next = apply_edits(&current, &retained);
            if next == current {
                debug!(pass = passes, "rewrite changed nothing, stopping");
                break FixStatus::Stable;
            }
            if passes == max_passes {
                debug!(pass = passes, "pass bound exhausted before stabilizing");
                break FixStatus::PassLimitReached;
            }

            match self.check_string(&next) {
                Ok(next_report) => {
                    debug!(
                        pass = passes,
                        applied = retained.len(),
                        remaining = next_report.count(),
                        "pass applied"
                    );
                    current = next;
                    report = next_report;
                    passes += 1;
                }
                Err(err) if err.is_recoverable() => {
                    // The splice is applied back-to-front, so the
                    // earliest-offset edit is the last one applied.
                    let rule = retained
                        .first()
                        .map(|pending| pending.rule.clone())
                        .unwrap_or_default();
                    warn!(
                        pass = passes,
                        rule = %rule,
                        error = %err,
                        "rewritten source failed to re-parse, keeping previous text"
                    );
                    break FixStatus::Failed { pass: passes, rule };
                }
                Err(other) => return Err(other),
            }
        };

        Ok(FixOutcome {
            output: current,
            remaining: report,
            passes,
            status,
        })
    }
}

/// Keep the fixable errors' edits, sorted by start offset, dropping any
/// edit that overlaps an earlier-retained one
fn merge_edits(report: &ErrorReport) -> Vec<PendingEdit> {
    let mut fixable: Vec<PendingEdit> = report
        .iter()
        .filter_map(|error| {
            error.edit.as_ref().map(|edit| PendingEdit {
                edit: edit.clone(),
                rule: error.rule.clone(),
            })
        })
        .collect();
    // Stable: equal offsets keep registration order
    fixable.sort_by_key(|pending| pending.edit.start);

    let mut retained: Vec<PendingEdit> = Vec::new();
    let mut dropped = 0usize;
    for pending in fixable {
        if let Some(previous) = retained.last() {
            if pending.edit.overlaps(&previous.edit) {
                dropped += 1;
                continue;
            }
        }
        retained.push(pending);
    }
    if dropped > 0 {
        debug!(dropped, "conflicting edits deferred to a later pass");
    }
    retained
}

/// Apply offset-sorted edits in a single descending splice, so earlier
/// edits' offsets stay valid
fn apply_edits(source: &str, edits: &[PendingEdit]) -> String {
    let mut output = source.to_string();
    for pending in edits.iter().rev() {
        debug_assert!(pending.edit.end <= output.len());
        output.replace_range(pending.edit.start..pending.edit.end, &pending.edit.replacement);
    }
    output
}
