//! Library backing the Patchgate command-line entry points.
//!
//! Each binary delegates to a `run_*` function here, passing its argument
//! iterator and locked output handles. The functions print one pretty JSON
//! result object to stdout and return an [`ExitCode`]: non-zero only for
//! argument errors and unreadable inputs, never for an unsafe or invalid
//! verdict. Callers inspect the JSON, not the exit status.

mod args;
mod error;

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use patchgate_analysis::{SafetyClassifier, validate_patch};
use patchgate_testrun::TestCommand;

pub use args::{CheckSafetyArgs, RunTestsArgs, ValidatePatchArgs};
pub use error::CliError;

/// Runs the `check-safety` entry point.
pub fn run_check_safety(
    args: impl IntoIterator<Item = OsString>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> ExitCode {
    init_logging();
    let parsed = match parse_args::<CheckSafetyArgs>(args, stdout, stderr) {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    let outcome = read_input(&parsed.file).map(|source| {
        let classifier = SafetyClassifier::default();
        classifier.check_source(&source)
    });
    finish(outcome, stdout, stderr)
}

/// Runs the `validate-patch` entry point.
pub fn run_validate_patch(
    args: impl IntoIterator<Item = OsString>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> ExitCode {
    init_logging();
    let parsed = match parse_args::<ValidatePatchArgs>(args, stdout, stderr) {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    let outcome = read_input(&parsed.original).and_then(|original| {
        let patched = read_input(&parsed.patched)?;
        Ok(validate_patch(&original, &patched, &parsed.constraints()))
    });
    finish(outcome, stdout, stderr)
}

/// Runs the `run-tests` entry point.
pub fn run_tests(
    args: impl IntoIterator<Item = OsString>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> ExitCode {
    init_logging();
    let parsed = match parse_args::<RunTestsArgs>(args, stdout, stderr) {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    let mut command =
        TestCommand::new(&parsed.repo_path).timeout(Duration::from_secs(parsed.timeout));
    if let Some(selector) = &parsed.test_selector {
        command = command.selector(selector.clone());
    }
    finish(Ok(command.run()), stdout, stderr)
}

/// Exit code for argument errors, matching clap's convention.
const USAGE_EXIT_CODE: u8 = 2;

/// Parses arguments, rendering clap output to the right stream.
///
/// Real argument errors go to stderr with the usage exit code; help and
/// version requests go to stdout and exit successfully. Either way no result
/// object is produced.
fn parse_args<A: Parser>(
    args: impl IntoIterator<Item = OsString>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<A, ExitCode> {
    match A::try_parse_from(args) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let rendered = err.render();
            if err.use_stderr() {
                drop(write!(stderr, "{rendered}"));
                Err(ExitCode::from(USAGE_EXIT_CODE))
            } else {
                drop(write!(stdout, "{rendered}"));
                Err(ExitCode::SUCCESS)
            }
        }
    }
}

/// Reads one input file.
fn read_input(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Emits the result object, or reports why it could not be produced.
fn finish<T: Serialize>(
    outcome: Result<T, CliError>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> ExitCode {
    match outcome.and_then(|result| emit(&result, stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            drop(writeln!(stderr, "error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Serialises a result object as pretty JSON on stdout.
fn emit<T: Serialize>(result: &T, stdout: &mut impl Write) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(stdout, "{json}")?;
    Ok(())
}

/// Installs the env-filtered stderr logger, once per process.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    drop(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init(),
    );
}
