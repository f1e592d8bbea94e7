//! Supervised execution of an external test command.
//!
//! The gate treats the project's test suite as a pass/fail oracle: it spawns
//! `pytest` in the target directory, captures stdout and stderr on reader
//! threads, and enforces a wall-clock deadline. On the timeout path the child
//! is killed and reaped before the report is returned, so no process or pipe
//! handle outlives the call. The report content is never interpreted here.

mod command;
mod report;

pub use command::{DEFAULT_TIMEOUT_SECS, TestCommand};
pub use report::TestRunReport;
