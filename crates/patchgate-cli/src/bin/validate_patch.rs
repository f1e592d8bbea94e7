//! Entry point for the `validate-patch` binary.
//!
//! Compares an original and a patched Python file against the gate's
//! constraints and prints the patch verdict as JSON. The exit status reflects
//! invocation problems only; the verdict lives in the output object.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    patchgate_cli::run_validate_patch(std::env::args_os(), &mut stdout, &mut stderr)
}
