//! CLI argument definitions for the Patchgate entry points.
//!
//! Three independent binaries share this module. Each takes file path
//! arguments and prints a single JSON result object; constraints and the
//! test timeout are plain flags with the gate's defaults, never read from a
//! configuration file.

use std::path::PathBuf;

use clap::Parser;

use patchgate_analysis::ConstraintSet;

/// Arguments for the `check-safety` binary.
#[derive(Parser, Debug)]
#[command(name = "check-safety", about = "Classify a Python file for risky constructs")]
pub struct CheckSafetyArgs {
    /// Python source file to classify.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the `validate-patch` binary.
#[derive(Parser, Debug)]
#[command(
    name = "validate-patch",
    about = "Validate a patched Python file against its original"
)]
pub struct ValidatePatchArgs {
    /// The original version of the file.
    #[arg(value_name = "ORIGINAL")]
    pub original: PathBuf,
    /// The patched version of the file.
    #[arg(value_name = "PATCHED")]
    pub patched: PathBuf,
    /// Upper bound on the change-magnitude metric.
    #[arg(long, value_name = "N", default_value_t = 50)]
    pub max_lines_changed: usize,
    /// Skip the API-preservation comparison.
    #[arg(long)]
    pub no_preserve_api: bool,
}

impl ValidatePatchArgs {
    /// Builds the constraint set these arguments describe.
    #[must_use]
    pub const fn constraints(&self) -> ConstraintSet {
        ConstraintSet {
            max_lines_changed: self.max_lines_changed,
            preserve_api: !self.no_preserve_api,
        }
    }
}

/// Arguments for the `run-tests` binary.
#[derive(Parser, Debug)]
#[command(name = "run-tests", about = "Run the project test suite under a deadline")]
pub struct RunTestsArgs {
    /// Directory to run the test suite in.
    #[arg(value_name = "REPO_PATH")]
    pub repo_path: PathBuf,
    /// Optional test file or selector to narrow the run.
    #[arg(value_name = "TEST_SELECTOR")]
    pub test_selector: Option<String>,
    /// Wall-clock budget in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = patchgate_testrun::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_patch_defaults_match_the_gate() {
        let args = ValidatePatchArgs::parse_from(["validate-patch", "a.py", "b.py"]);
        let constraints = args.constraints();

        assert_eq!(constraints.max_lines_changed, 50);
        assert!(constraints.preserve_api);
    }

    #[test]
    fn no_preserve_api_flag_disables_comparison() {
        let args =
            ValidatePatchArgs::parse_from(["validate-patch", "a.py", "b.py", "--no-preserve-api"]);

        assert!(!args.constraints().preserve_api);
    }

    #[test]
    fn run_tests_timeout_defaults_to_gateway_budget() {
        let args = RunTestsArgs::parse_from(["run-tests", "."]);

        assert_eq!(args.timeout, patchgate_testrun::DEFAULT_TIMEOUT_SECS);
        assert!(args.test_selector.is_none());
    }
}
