//! The report returned by a supervised test run.

use std::process::ExitStatus;

use serde::Serialize;

/// Exit-code sentinel for runs that never produced a real status.
const NO_EXIT_CODE: i32 = -1;

/// Outcome of one supervised test run.
///
/// Serialises untagged: a completed run carries the captured streams, a
/// failed run (spawn failure, wait failure, timeout) carries an explanatory
/// error and the `-1` sentinel. Callers inspect `success`, never a Rust
/// error, which keeps the gateway's contract panic- and error-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TestRunReport {
    /// The test process ran to completion, passing or not.
    Completed {
        /// True iff the process exited with status zero.
        success: bool,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
        /// The process exit code, or `-1` when terminated by a signal.
        returncode: i32,
    },
    /// The test process could not be run to completion.
    Failed {
        /// Always false.
        success: bool,
        /// Why the run failed.
        error: String,
        /// Always `-1`.
        returncode: i32,
    },
}

impl TestRunReport {
    /// Builds a report for a process that exited.
    #[must_use]
    pub fn completed(status: ExitStatus, stdout: String, stderr: String) -> Self {
        Self::Completed {
            success: status.success(),
            stdout,
            stderr,
            returncode: status.code().unwrap_or(NO_EXIT_CODE),
        }
    }

    /// Builds a report for a run that never produced an exit status.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            success: false,
            error: error.into(),
            returncode: NO_EXIT_CODE,
        }
    }

    /// Returns whether the run completed with a passing status.
    #[must_use]
    pub const fn success(&self) -> bool {
        match self {
            Self::Completed { success, .. } => *success,
            Self::Failed { .. } => false,
        }
    }
}
