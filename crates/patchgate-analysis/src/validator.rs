//! Patch validation against size and API-preservation constraints.
//!
//! Four independent checks run over every original/patched pair; none
//! short-circuits another. Their error and warning texts accumulate into a
//! [`PatchVerdict`], and the patch is valid exactly when no error was
//! recorded.

use patchgate_syntax::parse_python;
use serde::Serialize;

use crate::signatures::extract_signatures_from_source;

/// Tracing target for patch validation.
const VALIDATE_TARGET: &str = "patchgate_analysis::validator";

/// Caller-supplied validation policy.
///
/// Values are taken as-is; nothing beyond the type is validated. A
/// `max_lines_changed` of zero simply rejects every non-identical patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSet {
    /// Upper bound on the change-magnitude metric.
    pub max_lines_changed: usize,
    /// Whether the API-preservation comparison runs at all.
    pub preserve_api: bool,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            max_lines_changed: 50,
            preserve_api: true,
        }
    }
}

/// Outcome of validating one patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchVerdict {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Blocking policy violations, in check order.
    pub errors: Vec<String>,
    /// Non-fatal observations, in check order.
    pub warnings: Vec<String>,
    /// Change-magnitude metric; reported regardless of validity.
    pub lines_changed: usize,
}

/// Validates a patched file against its original under the given constraints.
///
/// The change-magnitude metric counts index positions where the two line
/// sequences differ over their common prefix, plus the absolute difference
/// in line counts. It is a cheap proxy, not a minimal edit distance: a line
/// inserted at the top counts every subsequent line as changed, and trailing
/// additions are counted once per line on top of any prefix mismatch. The
/// proxy is kept deliberately; it is monotone in both content and length
/// divergence, which is all the gate needs.
#[must_use]
pub fn validate_patch(original: &str, patched: &str, constraints: &ConstraintSet) -> PatchVerdict {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let lines_changed = change_magnitude(original, patched);
    if lines_changed > constraints.max_lines_changed {
        errors.push(format!(
            "Too many lines changed: {lines_changed} > {}",
            constraints.max_lines_changed
        ));
    }

    // A broken original is tolerated; legacy files are sometimes committed
    // that way. Only the patched side hard-fails on syntax.
    if parse_python(original).is_err() {
        warnings.push("Original code has syntax errors".to_owned());
    }

    if let Err(failure) = parse_python(patched) {
        errors.push(format!("Patched code has syntax errors: {failure}"));
    }

    if constraints.preserve_api {
        compare_signatures(original, patched, &mut errors, &mut warnings);
    }

    tracing::debug!(
        target: VALIDATE_TARGET,
        lines_changed,
        errors = errors.len(),
        warnings = warnings.len(),
        "patch validated"
    );

    PatchVerdict {
        valid: errors.is_empty(),
        errors,
        warnings,
        lines_changed,
    }
}

/// Counts positional line mismatches plus the line-count difference.
fn change_magnitude(original: &str, patched: &str) -> usize {
    let original_lines: Vec<&str> = original.split('\n').collect();
    let patched_lines: Vec<&str> = patched.split('\n').collect();

    let mismatches = original_lines
        .iter()
        .zip(patched_lines.iter())
        .filter(|(o, p)| o != p)
        .count();

    mismatches + original_lines.len().abs_diff(patched_lines.len())
}

/// Diffs extracted signatures, name-keyed against the original.
///
/// A function missing from the patched side is an error; a signature string
/// that differs is a warning. Functions only present in the patched side are
/// never flagged.
fn compare_signatures(
    original: &str,
    patched: &str,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let original_functions = extract_signatures_from_source(original);
    let patched_functions = extract_signatures_from_source(patched);

    for (name, original_signature) in original_functions.iter() {
        match patched_functions.get(name) {
            None => errors.push(format!("Function {name} was removed")),
            Some(patched_signature) if patched_signature != original_signature => {
                warnings.push(format!("Function signature changed: {name}"));
            }
            Some(_) => {}
        }
    }
}
