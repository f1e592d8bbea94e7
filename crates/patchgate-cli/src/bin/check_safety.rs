//! Entry point for the `check-safety` binary.
//!
//! Classifies one Python file for risky constructs and prints the safety
//! verdict as JSON. The exit status reflects invocation problems only; the
//! verdict lives in the output object.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    patchgate_cli::run_check_safety(std::env::args_os(), &mut stdout, &mut stderr)
}
